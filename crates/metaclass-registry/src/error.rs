//! Registry error types.
//!
//! ```text
//! RegistryError (top-level wrapper)
//! ├── RegistrationError - Rejected class declarations
//! ├── ClassError        - Lookup and offset failures from a class node
//! └── UnknownClass      - Id or name not registered
//! ```

use thiserror::Error;

use metaclass_core::ClassError;

/// Errors that reject a class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A class with this name (or id) is already registered.
    #[error("duplicate class: {0}")]
    DuplicateClass(String),

    /// The Rust type is already bound to another class.
    #[error("type already registered as class '{0}'")]
    DuplicateType(String),

    /// A declared base is not registered yet.
    #[error("class '{class}': unknown base '{base}'")]
    UnknownBase {
        /// Class being declared.
        class: String,
        /// Base as it was referenced.
        base: String,
    },

    /// The same direct base was declared twice.
    #[error("class '{class}': base '{base}' declared twice")]
    DuplicateBase {
        /// Class being declared.
        class: String,
        /// Repeated base.
        base: String,
    },

    /// Two functions share an id.
    #[error("class '{class}': duplicate function '{function}'")]
    DuplicateFunction {
        /// Class being declared.
        class: String,
        /// Repeated function name.
        function: String,
    },

    /// Two properties share an id.
    #[error("class '{class}': duplicate property '{property}'")]
    DuplicateProperty {
        /// Class being declared.
        class: String,
        /// Repeated property name.
        property: String,
    },

    /// The longest base chain exceeds the configured limit.
    #[error("class '{class}': inheritance depth {depth} exceeds limit {limit}")]
    InheritanceTooDeep {
        /// Class being declared.
        class: String,
        /// Depth the class would have.
        depth: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Every [`ClassIndex`](metaclass_core::ClassIndex) value is taken.
    #[error("class '{0}': registry is full")]
    TooManyClasses(String),
}

/// Top-level error for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A declaration was rejected.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A class node reported a failure.
    #[error(transparent)]
    Class(#[from] ClassError),

    /// No class with this id or name is registered.
    #[error("unknown class: {0}")]
    UnknownClass(String),
}

impl RegistryError {
    /// Check if a class or member could not be found.
    pub fn is_not_found(&self) -> bool {
        match self {
            RegistryError::UnknownClass(_) => true,
            RegistryError::Class(err) => err.is_not_found(),
            RegistryError::Registration(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_class_error() {
        let err: RegistryError = ClassError::OutOfRange { index: 1, size: 0 }.into();
        assert_eq!(err.to_string(), "index 1 out of range (size 0)");
    }

    #[test]
    fn wraps_registration_error() {
        let err: RegistryError = RegistrationError::DuplicateClass("Player".to_string()).into();
        assert_eq!(err.to_string(), "duplicate class: Player");
    }

    #[test]
    fn not_found_kinds() {
        assert!(RegistryError::UnknownClass("Ghost".to_string()).is_not_found());

        let missing = ClassError::FunctionNotFound {
            id: metaclass_core::StringId(7),
            class: "Player".to_string(),
        };
        assert!(RegistryError::from(missing).is_not_found());

        let out_of_range = ClassError::OutOfRange { index: 1, size: 0 };
        assert!(!RegistryError::from(out_of_range).is_not_found());

        let full = RegistrationError::TooManyClasses("Player".to_string());
        assert!(!RegistryError::from(full).is_not_found());
    }

    #[test]
    fn depth_message() {
        let err = RegistrationError::InheritanceTooDeep {
            class: "Leaf".to_string(),
            depth: 5,
            limit: 4,
        };
        assert_eq!(
            err.to_string(),
            "class 'Leaf': inheritance depth 5 exceeds limit 4"
        );
    }
}
