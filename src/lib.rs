//! Runtime class metadata.
//!
//! `metaclass` describes native types at runtime: their properties, member
//! functions, constructors and base classes. Code that only knows a class by
//! name or id can look members up, call them, construct and destroy
//! instances, and convert pointers between a class and any of its ancestors
//! or descendants, including across multiple inheritance.
//!
//! # Example
//!
//! ```
//! use metaclass::prelude::*;
//!
//! let mut registry = ClassRegistry::new();
//! registry.declare("Entity").register().unwrap();
//! registry
//!     .declare("Player")
//!     .base("Entity", 8)
//!     .property(PropertyEntry::read_only("level", ValueKind::Int, |_: &UserObject| {
//!         Ok(Value::Int(1))
//!     }))
//!     .register()
//!     .unwrap();
//!
//! let player = registry.get_by_name("Player").unwrap();
//! assert!(player.has_property(StringId::from_name("level")));
//! assert_eq!(
//!     registry.base_offset(player.id(), StringId::from_name("Entity")),
//!     Ok(Some(8))
//! );
//! ```

pub use metaclass_core as core;
pub use metaclass_registry as registry;

pub use metaclass_core::{
    AccessError, Args, BaseInfo, Class, ClassError, ClassIndex, ClassMembers, ClassTable,
    ClassVisitor, Constructor, Destructor, FunctionEntry, Member, MethodCallable,
    NativeConstructor, PropertyEntry, PropertyFlags, StringId, UserObject, Value, ValueKind,
};
pub use metaclass_registry::{
    ClassBuilder, ClassRegistry, RegistrationError, RegistryConfig, RegistryError,
};

// Re-export main types
pub mod prelude {
    pub use metaclass_core::{
        AccessError, Args, Class, ClassError, ClassTable, ClassVisitor, Destructor, FunctionEntry,
        Member, NativeConstructor, PropertyEntry, StringId, UserObject, Value, ValueKind,
    };
    pub use metaclass_registry::{ClassRegistry, RegistryConfig, RegistryError};
}
