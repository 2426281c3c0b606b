//! Member function descriptors.

use std::fmt;
use std::sync::Arc;

use crate::{AccessError, Args, StringId, UserObject, Value, ValueKind};

/// Trait for callable member function implementations.
///
/// Implemented for every closure taking the target object and its arguments.
pub trait MethodCallable {
    /// Invoke the implementation.
    fn call(&self, object: &UserObject, args: &Args) -> Result<Value, AccessError>;
}

impl<F> MethodCallable for F
where
    F: Fn(&UserObject, &Args) -> Result<Value, AccessError>,
{
    fn call(&self, object: &UserObject, args: &Args) -> Result<Value, AccessError> {
        (self)(object, args)
    }
}

/// Metadata and implementation of one member function.
///
/// The implementation is shared behind an `Arc` so entries can be cloned
/// while building a class.
#[derive(Clone)]
pub struct FunctionEntry {
    /// Stable id, hashed from the name.
    pub id: StringId,
    /// Declared name.
    pub name: String,
    /// Declared parameter kinds.
    pub params: Vec<ValueKind>,
    /// Kind of the returned value.
    pub return_kind: ValueKind,
    callable: Arc<dyn MethodCallable + Send + Sync>,
}

impl FunctionEntry {
    /// Create a function entry from a closure. The id is computed from `name`.
    pub fn new<F>(
        name: impl Into<String>,
        params: Vec<ValueKind>,
        return_kind: ValueKind,
        callable: F,
    ) -> Self
    where
        F: Fn(&UserObject, &Args) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        Self::from_callable(name, params, return_kind, callable)
    }

    /// Create a function entry from any [`MethodCallable`].
    pub fn from_callable<C>(
        name: impl Into<String>,
        params: Vec<ValueKind>,
        return_kind: ValueKind,
        callable: C,
    ) -> Self
    where
        C: MethodCallable + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            id: StringId::from_name(&name),
            name,
            params,
            return_kind,
            callable: Arc::new(callable),
        }
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Call the function on `object`.
    ///
    /// The object must not be empty and `args` must match the declared
    /// parameters in count and kind.
    pub fn call(&self, object: &UserObject, args: &Args) -> Result<Value, AccessError> {
        if object.is_nothing() {
            return Err(AccessError::NullObject {
                member: self.name.clone(),
            });
        }

        if args.len() != self.params.len() {
            return Err(AccessError::ArgumentCount {
                member: self.name.clone(),
                expected: self.params.len(),
                actual: args.len(),
            });
        }

        if let Some((index, expected, actual)) = args.first_mismatch(&self.params) {
            return Err(AccessError::ArgumentType {
                member: self.name.clone(),
                index,
                expected,
                actual,
            });
        }

        self.callable.call(object, args)
    }
}

impl fmt::Debug for FunctionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_kind", &self.return_kind)
            .finish_non_exhaustive()
    }
}

impl PartialEq for FunctionEntry {
    fn eq(&self, other: &Self) -> bool {
        // The implementation is not comparable; compare the declaration.
        self.id == other.id
            && self.name == other.name
            && self.params == other.params
            && self.return_kind == other.return_kind
    }
}
