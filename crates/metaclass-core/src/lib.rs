//! Core types for runtime class metadata.
//!
//! This crate provides the class metadata node and the types it stores:
//!
//! - [`Class`] - Sorted member tables, constructors, destructor and base links
//! - [`FunctionEntry`], [`PropertyEntry`] - Member descriptors
//! - [`Constructor`], [`NativeConstructor`], [`Destructor`] - Instance lifecycle
//! - [`Value`], [`Args`], [`UserObject`] - Values passed across the metadata boundary
//! - [`StringId`], [`ClassIndex`] - Identity
//! - [`ClassError`], [`AccessError`] - Errors
//!
//! Registration and the class table live in `metaclass-registry`.

mod class;
pub mod entries;
mod error;
mod string_id;
mod user_object;
mod value;
mod visitor;

pub use class::{BaseInfo, Class, ClassMembers, ClassTable};
pub use entries::{
    Constructor, Destructor, FunctionEntry, MethodCallable, NativeConstructor, PropertyEntry,
    PropertyFlags,
};
pub use error::{AccessError, ClassError};
pub use string_id::{ClassIndex, StringId};
pub use user_object::UserObject;
pub use value::{Args, Value, ValueKind};
pub use visitor::{ClassVisitor, Member};
