//! Member descriptor types stored by a class.
//!
//! - [`FunctionEntry`] - Member function with a native implementation
//! - [`PropertyEntry`] - Property with optional getter and setter
//! - [`Constructor`], [`NativeConstructor`] - Instance creation
//! - [`Destructor`] - Instance release

mod constructor;
mod function;
mod property;

pub use constructor::{Constructor, Destructor, NativeConstructor};
pub use function::{FunctionEntry, MethodCallable};
pub use property::{PropertyEntry, PropertyFlags};
