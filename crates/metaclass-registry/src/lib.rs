//! Class registry for runtime class metadata.
//!
//! This crate owns the [`Class`](metaclass_core::Class) nodes defined in
//! `metaclass-core`:
//!
//! - [`ClassRegistry`] - Owning table, lookup by id, name, index or Rust type
//! - [`ClassBuilder`] - Declarative registration with validation
//! - [`RegistryConfig`] - Registry options
//! - [`RegistryError`], [`RegistrationError`] - Errors

mod builder;
mod config;
mod error;
mod registry;

pub use builder::ClassBuilder;
pub use config::{DEFAULT_MAX_INHERITANCE_DEPTH, RegistryConfig};
pub use error::{RegistrationError, RegistryError};
pub use registry::ClassRegistry;
