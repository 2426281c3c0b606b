//! Constructor and destructor descriptors.

use std::fmt;
use std::sync::Arc;

use crate::{Args, UserObject, ValueKind};

/// A way of creating an instance of a class from a set of arguments.
///
/// A class owns its constructors and tries them in registration order: the
/// first one whose [`matches`](Constructor::matches) accepts the arguments
/// is asked to [`create`](Constructor::create) the instance.
pub trait Constructor: Send + Sync {
    /// Check if the arguments are acceptable for this constructor.
    fn matches(&self, args: &Args) -> bool;

    /// Create a new instance. Only called after `matches` returned true.
    fn create(&self, args: &Args) -> UserObject;
}

type Factory = Box<dyn Fn(&Args) -> UserObject + Send + Sync>;

/// Constructor backed by a native factory closure.
///
/// Matches when the argument count equals the declared parameter count and
/// every argument is compatible with its declared kind.
pub struct NativeConstructor {
    params: Vec<ValueKind>,
    factory: Factory,
}

impl NativeConstructor {
    /// Create a constructor with the given parameter kinds.
    pub fn new<F>(params: Vec<ValueKind>, factory: F) -> Self
    where
        F: Fn(&Args) -> UserObject + Send + Sync + 'static,
    {
        Self {
            params,
            factory: Box::new(factory),
        }
    }

    /// Declared parameter kinds.
    pub fn params(&self) -> &[ValueKind] {
        &self.params
    }
}

impl Constructor for NativeConstructor {
    fn matches(&self, args: &Args) -> bool {
        args.len() == self.params.len() && args.first_mismatch(&self.params).is_none()
    }

    fn create(&self, args: &Args) -> UserObject {
        (self.factory)(args)
    }
}

impl fmt::Debug for NativeConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeConstructor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Callable that releases an instance of a class.
///
/// Shared rather than owned: several classes may use the same destructor,
/// and cloning only bumps a reference count.
#[derive(Clone)]
pub struct Destructor(Arc<dyn Fn(&UserObject) + Send + Sync>);

impl Destructor {
    /// Create a destructor from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&UserObject) + Send + Sync + 'static,
    {
        Destructor(Arc::new(f))
    }

    /// A destructor that does nothing.
    pub fn noop() -> Self {
        Destructor::new(|_| {})
    }

    /// Release `object`.
    pub fn call(&self, object: &UserObject) {
        (self.0)(object)
    }
}

impl Default for Destructor {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Destructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destructor").finish_non_exhaustive()
    }
}
