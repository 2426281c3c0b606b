//! Error types for class metadata access.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ClassError   - Lookup and pointer adjustment on a class node
//! AccessError  - Invoking a function or reading/writing a property
//! ```
//!
//! Both are deterministic usage errors: nothing here is transient, so nothing
//! is retried. Callers that treat absence as a normal outcome use the
//! `try_*` lookups or the `UserObject::NOTHING` returned by `construct`.

use thiserror::Error;

use crate::{StringId, ValueKind};

// ============================================================================
// Class Errors
// ============================================================================

/// Errors raised by lookups and offset computation on a [`Class`](crate::Class).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    /// A positional index was past the end of a member or base table.
    #[error("index {index} out of range (size {size})")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The number of entries in the table.
        size: usize,
    },

    /// No function with this id exists in the class.
    #[error("function {id} not found in class '{class}'")]
    FunctionNotFound {
        /// The requested id.
        id: StringId,
        /// Name of the class that was searched.
        class: String,
    },

    /// No property with this id exists in the class.
    #[error("property {id} not found in class '{class}'")]
    PropertyNotFound {
        /// The requested id.
        id: StringId,
        /// Name of the class that was searched.
        class: String,
    },

    /// The two classes are neither ancestor nor descendant of each other.
    #[error("class '{class}' is not related to class '{target}'")]
    ClassUnrelated {
        /// Class the pointer currently refers to.
        class: String,
        /// Class the pointer was to be adjusted to.
        target: String,
    },
}

impl ClassError {
    /// Check if this is one of the not-found kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClassError::FunctionNotFound { .. } | ClassError::PropertyNotFound { .. }
        )
    }
}

// ============================================================================
// Access Errors
// ============================================================================

/// Errors raised when calling a function or accessing a property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The target object was the empty instance.
    #[error("cannot access member '{member}' on a null object")]
    NullObject {
        /// Member that was accessed.
        member: String,
    },

    /// The property has no getter.
    #[error("property '{0}' is not readable")]
    NotReadable(String),

    /// The property has no setter.
    #[error("property '{0}' is not writable")]
    NotWritable(String),

    /// Wrong number of arguments.
    #[error("'{member}' expects {expected} arguments, got {actual}")]
    ArgumentCount {
        /// Member that was called.
        member: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// An argument is not compatible with the declared parameter kind.
    #[error("'{member}' argument {index}: expected {expected:?}, got {actual:?}")]
    ArgumentType {
        /// Member that was called.
        member: String,
        /// Position of the offending argument.
        index: usize,
        /// Declared kind.
        expected: ValueKind,
        /// Kind that was supplied.
        actual: ValueKind,
    },

    /// The native implementation reported a failure.
    #[error("'{member}' failed: {message}")]
    Native {
        /// Member that was called.
        member: String,
        /// Message from the implementation.
        message: String,
    },
}

impl AccessError {
    /// Create a native failure for a member.
    pub fn native(member: impl Into<String>, message: impl Into<String>) -> Self {
        AccessError::Native {
            member: member.into(),
            message: message.into(),
        }
    }
}
