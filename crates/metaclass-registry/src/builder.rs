//! Declarative class registration.
//!
//! A [`ClassBuilder`] is obtained from [`ClassRegistry::declare`] and
//! collects the members of one class. Nothing is visible in the registry
//! until [`register`](ClassBuilder::register) succeeds, and a failed
//! registration leaves the registry unchanged.
//!
//! # Example
//!
//! ```
//! use metaclass_core::{Args, FunctionEntry, UserObject, Value, ValueKind};
//! use metaclass_registry::ClassRegistry;
//!
//! let mut registry = ClassRegistry::new();
//! registry.declare("Shape").register().unwrap();
//! registry
//!     .declare("Circle")
//!     .base("Shape", 0)
//!     .function(FunctionEntry::new(
//!         "area",
//!         vec![],
//!         ValueKind::Real,
//!         |_: &UserObject, _: &Args| Ok(Value::from(3.14)),
//!     ))
//!     .register()
//!     .unwrap();
//!
//! assert_eq!(registry.len(), 2);
//! ```

use std::any::TypeId;

use rustc_hash::FxHashSet;

use metaclass_core::{
    BaseInfo, Class, ClassIndex, ClassMembers, Constructor, Destructor, FunctionEntry,
    PropertyEntry, StringId,
};

use crate::{ClassRegistry, RegistrationError};

/// A base as referenced in a declaration, resolved at registration.
struct BaseDecl {
    id: StringId,
    label: String,
    offset: isize,
}

/// Collects the members of a class before registering it.
#[must_use = "a declared class is only registered by calling `register`"]
pub struct ClassBuilder<'r> {
    registry: &'r mut ClassRegistry,
    name: String,
    type_id: Option<TypeId>,
    bases: Vec<BaseDecl>,
    functions: Vec<FunctionEntry>,
    properties: Vec<PropertyEntry>,
    constructors: Vec<Box<dyn Constructor>>,
    destructor: Destructor,
}

impl<'r> ClassBuilder<'r> {
    pub(crate) fn new(
        registry: &'r mut ClassRegistry,
        name: String,
        type_id: Option<TypeId>,
    ) -> Self {
        Self {
            registry,
            name,
            type_id,
            bases: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
            destructor: Destructor::noop(),
        }
    }

    /// Declare a direct base by name.
    ///
    /// `offset` is the byte distance from the start of this class to the
    /// start of the base sub-object, e.g. `std::mem::offset_of!`.
    pub fn base(mut self, name: &str, offset: isize) -> Self {
        self.bases.push(BaseDecl {
            id: StringId::from_name(name),
            label: name.to_string(),
            offset,
        });
        self
    }

    /// Declare a direct base by id.
    pub fn base_id(mut self, id: StringId, offset: isize) -> Self {
        self.bases.push(BaseDecl {
            id,
            label: id.to_string(),
            offset,
        });
        self
    }

    /// Add a member function.
    pub fn function(mut self, function: FunctionEntry) -> Self {
        self.functions.push(function);
        self
    }

    /// Add a property. Declaration order is kept for index access.
    pub fn property(mut self, property: PropertyEntry) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a constructor. Earlier constructors take priority.
    pub fn constructor(mut self, constructor: impl Constructor + 'static) -> Self {
        self.constructors.push(Box::new(constructor));
        self
    }

    /// Set the destructor.
    pub fn destructor(mut self, destructor: Destructor) -> Self {
        self.destructor = destructor;
        self
    }

    /// Validate the declaration and add the class to the registry.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn register(self) -> Result<ClassIndex, RegistrationError> {
        let ClassBuilder {
            registry,
            name,
            type_id,
            bases,
            functions,
            properties,
            constructors,
            destructor,
        } = self;

        let id = StringId::from_name(&name);
        if registry.contains(id) {
            return Err(RegistrationError::DuplicateClass(name));
        }
        if let Some(existing) = type_id.and_then(|t| registry.get_by_type_id(t)) {
            let existing = existing.name().to_string();
            return Err(RegistrationError::DuplicateType(existing));
        }

        let Some(index) = registry.next_index() else {
            return Err(RegistrationError::TooManyClasses(name));
        };

        let mut links = Vec::with_capacity(bases.len());
        let mut depth = 0;
        for decl in &bases {
            let Some(base) = registry.index_of(decl.id) else {
                return Err(RegistrationError::UnknownBase {
                    class: name,
                    base: decl.label.clone(),
                });
            };
            if links.iter().any(|link: &BaseInfo| link.base == base) {
                return Err(RegistrationError::DuplicateBase {
                    class: name,
                    base: decl.label.clone(),
                });
            }
            depth = depth.max(registry.depth(base) + 1);
            links.push(BaseInfo::new(base, decl.offset));
        }

        let limit = registry.config().max_inheritance_depth;
        if depth > limit {
            return Err(RegistrationError::InheritanceTooDeep {
                class: name,
                depth,
                limit,
            });
        }

        let mut seen = FxHashSet::default();
        if let Some(function) = functions.iter().find(|f| !seen.insert(f.id)) {
            return Err(RegistrationError::DuplicateFunction {
                class: name,
                function: function.name.clone(),
            });
        }

        seen.clear();
        if let Some(property) = properties.iter().find(|p| !seen.insert(p.id)) {
            return Err(RegistrationError::DuplicateProperty {
                class: name,
                property: property.name.clone(),
            });
        }

        let class = Class::with_members(
            id,
            name,
            ClassMembers {
                bases: links,
                functions,
                properties,
                constructors,
                destructor,
            },
        );
        Ok(registry.insert(index, class, depth, type_id))
    }
}
