//! ClassRegistry - owning table of class metadata.
//!
//! This module provides [`ClassRegistry`], the store that owns every
//! [`Class`] and resolves the base links between them.
//!
//! # Lifecycle
//!
//! - **Registration**: classes are declared one at a time through
//!   [`ClassRegistry::declare`]. A base must be registered before any class
//!   that derives from it, so the class graph is acyclic and stored in
//!   topological order.
//! - **Steady state**: every query takes `&self`. The registry is
//!   `Send + Sync`, so after registration it can be shared (for example in an
//!   `Arc`) and read from any number of threads without locking.
//! - **Teardown**: dropping the registry releases classes in reverse
//!   registration order, derived classes before their bases.
//!
//! # Example
//!
//! ```
//! use metaclass_registry::ClassRegistry;
//!
//! let mut registry = ClassRegistry::new();
//! registry.declare("Entity").register().unwrap();
//! registry.declare("Player").base("Entity", 16).register().unwrap();
//!
//! let player = registry.get_by_name("Player").unwrap();
//! let entity = registry.get_by_name("Entity").unwrap();
//! assert_eq!(player.base_offset(entity, &registry), Some(16));
//! ```

use std::any::TypeId;

use rustc_hash::{FxHashMap, FxHashSet};

use metaclass_core::{
    Class, ClassError, ClassIndex, ClassTable, ClassVisitor, StringId, UserObject,
};

use crate::{ClassBuilder, RegistryConfig, RegistryError};

/// Owning table of registered classes.
#[derive(Default)]
pub struct ClassRegistry {
    config: RegistryConfig,
    /// Registration order; positions are the `ClassIndex` values.
    classes: Vec<Class>,
    /// Longest base chain of each class, parallel to `classes`.
    depths: Vec<usize>,
    by_id: FxHashMap<StringId, ClassIndex>,
    by_type: FxHashMap<TypeId, ClassIndex>,
}

impl ClassRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            classes: Vec::with_capacity(config.capacity),
            depths: Vec::with_capacity(config.capacity),
            by_id: FxHashMap::with_capacity_and_hasher(config.capacity, Default::default()),
            by_type: FxHashMap::default(),
        }
    }

    /// Configuration the registry was created with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Start declaring a class named `name`.
    pub fn declare(&mut self, name: impl Into<String>) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name.into(), None)
    }

    /// Start declaring a class named `name` bound to the Rust type `T`.
    ///
    /// The class can later be found with [`get_by_type`](Self::get_by_type).
    pub fn declare_type<T: 'static>(&mut self, name: impl Into<String>) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name.into(), Some(TypeId::of::<T>()))
    }

    /// Index the next registered class will get, if one is left.
    pub(crate) fn next_index(&self) -> Option<ClassIndex> {
        index_at(self.classes.len())
    }

    pub(crate) fn insert(
        &mut self,
        index: ClassIndex,
        class: Class,
        depth: usize,
        type_id: Option<TypeId>,
    ) -> ClassIndex {
        debug_assert_eq!(index.as_usize(), self.classes.len());

        tracing::debug!(
            class = class.name(),
            id = %class.id(),
            %index,
            bases = class.base_count(),
            functions = class.function_count(),
            properties = class.property_count(),
            constructors = class.constructor_count(),
            "registered class"
        );

        self.by_id.insert(class.id(), index);
        if let Some(type_id) = type_id {
            self.by_type.insert(type_id, index);
        }
        self.classes.push(class);
        self.depths.push(depth);
        index
    }

    pub(crate) fn depth(&self, index: ClassIndex) -> usize {
        self.depths[index.as_usize()]
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter()
    }

    /// Check if a class with this id is registered.
    pub fn contains(&self, id: StringId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Position of the class with this id.
    pub fn index_of(&self, id: StringId) -> Option<ClassIndex> {
        self.by_id.get(&id).copied()
    }

    /// Class at `index` in registration order.
    pub fn get_by_index(&self, index: usize) -> Result<&Class, ClassError> {
        self.classes.get(index).ok_or(ClassError::OutOfRange {
            index,
            size: self.classes.len(),
        })
    }

    /// Class with this id.
    pub fn get(&self, id: StringId) -> Option<&Class> {
        self.index_of(id).map(|index| self.class(index))
    }

    /// Class with this name.
    pub fn get_by_name(&self, name: &str) -> Option<&Class> {
        self.get(StringId::from_name(name))
            .filter(|class| class.name() == name)
    }

    /// Class bound to the Rust type `T` by [`declare_type`](Self::declare_type).
    pub fn get_by_type<T: 'static>(&self) -> Option<&Class> {
        self.get_by_type_id(TypeId::of::<T>())
    }

    /// Class bound to a Rust `TypeId`.
    pub fn get_by_type_id(&self, type_id: TypeId) -> Option<&Class> {
        self.by_type.get(&type_id).map(|&index| self.class(index))
    }

    /// Class with this id, or [`RegistryError::UnknownClass`].
    pub fn require(&self, id: StringId) -> Result<&Class, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::UnknownClass(id.to_string()))
    }

    // ==========================================================================
    // Hierarchy
    // ==========================================================================

    /// Byte offset from class `from` to its ancestor `to`.
    ///
    /// `Ok(None)` when `to` is not an ancestor of `from`.
    pub fn base_offset(
        &self,
        from: StringId,
        to: StringId,
    ) -> Result<Option<isize>, RegistryError> {
        let from = self.require(from)?;
        let to = self.require(to)?;
        Ok(from.base_offset(to, self))
    }

    /// Adjust a pointer to a `from` instance into a pointer to its `to` view.
    pub fn apply_offset(
        &self,
        pointer: *mut u8,
        from: StringId,
        to: StringId,
    ) -> Result<*mut u8, RegistryError> {
        let from = self.require(from)?;
        let to = self.require(to)?;
        Ok(from.apply_offset(pointer, to, self)?)
    }

    /// View `object` as an instance of class `to`.
    ///
    /// The empty instance is returned unchanged.
    pub fn cast(&self, object: &UserObject, to: StringId) -> Result<UserObject, RegistryError> {
        if object.is_nothing() {
            return Ok(*object);
        }
        let pointer = self.apply_offset(object.pointer(), object.class_id(), to)?;
        Ok(object.rebind(to, pointer))
    }

    /// Every class that has `id` as a (direct or indirect) ancestor.
    pub fn derived_classes(&self, id: StringId) -> Result<Vec<&Class>, RegistryError> {
        let target = self.require(id)?;
        Ok(self
            .classes
            .iter()
            .filter(|class| *class != target && class.is_derived_from(target, self))
            .collect())
    }

    /// Visit the members of class `id` and of all its ancestors.
    ///
    /// Ancestors are visited depth-first in base declaration order, bases
    /// before the classes deriving from them, each class once even when it
    /// is reachable through several paths. The class itself comes last.
    pub fn visit_hierarchy<V>(&self, id: StringId, visitor: &mut V) -> Result<(), RegistryError>
    where
        V: ClassVisitor + ?Sized,
    {
        let index = self
            .index_of(id)
            .ok_or_else(|| RegistryError::UnknownClass(id.to_string()))?;

        let mut visited = FxHashSet::default();
        self.visit_post_order(index, &mut visited, visitor);
        Ok(())
    }

    fn visit_post_order<V>(
        &self,
        index: ClassIndex,
        visited: &mut FxHashSet<ClassIndex>,
        visitor: &mut V,
    ) where
        V: ClassVisitor + ?Sized,
    {
        if !visited.insert(index) {
            return;
        }
        let class = self.class(index);
        for base in class.bases() {
            self.visit_post_order(base.base, visited, visitor);
        }
        class.visit(visitor);
    }
}

fn index_at(position: usize) -> Option<ClassIndex> {
    u32::try_from(position).ok().map(ClassIndex::new)
}

impl ClassTable for ClassRegistry {
    fn class(&self, index: ClassIndex) -> &Class {
        &self.classes[index.as_usize()]
    }
}

impl Drop for ClassRegistry {
    fn drop(&mut self) {
        tracing::trace!(classes = self.classes.len(), "releasing class registry");
        // Derived classes were registered after their bases.
        while let Some(class) = self.classes.pop() {
            drop(class);
        }
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.classes.len())
            .field("types", &self.by_type.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaclass_core::{
        Args, Constructor, FunctionEntry, Member, PropertyEntry, Value, ValueKind,
    };
    use std::sync::{Arc, Mutex};

    fn function(name: &str) -> FunctionEntry {
        FunctionEntry::new(name, vec![], ValueKind::None, |_: &UserObject, _: &Args| {
            Ok(Value::None)
        })
    }

    fn property(name: &str) -> PropertyEntry {
        PropertyEntry::read_only(name, ValueKind::Int, |_: &UserObject| Ok(Value::Int(0)))
    }

    /// A <- B1 (4), A <- B2 (12), B1 <- D (8), B2 <- D (24), plus unrelated X.
    fn diamond() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry
            .declare("A")
            .property(property("a"))
            .register()
            .unwrap();
        registry
            .declare("B1")
            .base("A", 4)
            .function(function("b1"))
            .register()
            .unwrap();
        registry
            .declare("B2")
            .base("A", 12)
            .function(function("b2"))
            .register()
            .unwrap();
        registry
            .declare("D")
            .base("B1", 8)
            .base("B2", 24)
            .property(property("d"))
            .register()
            .unwrap();
        registry.declare("X").register().unwrap();
        registry
    }

    fn id(name: &str) -> StringId {
        StringId::from_name(name)
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = ClassRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get_by_name("A").is_none());
    }

    #[test]
    fn registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClassRegistry>();
    }

    #[test]
    fn lookup_by_id_name_index() {
        let registry = diamond();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get(id("B2")).unwrap().name(), "B2");
        assert_eq!(registry.get_by_name("D").unwrap().id(), id("D"));
        assert_eq!(registry.index_of(id("B1")), Some(ClassIndex(1)));
        assert_eq!(registry.get_by_index(4).unwrap().name(), "X");
        assert_eq!(
            registry.get_by_index(5).unwrap_err(),
            ClassError::OutOfRange { index: 5, size: 5 }
        );

        let names: Vec<_> = registry.classes().map(|c| c.name()).collect();
        assert_eq!(names, ["A", "B1", "B2", "D", "X"]);
    }

    #[test]
    fn index_range() {
        assert_eq!(index_at(0), Some(ClassIndex(0)));
        assert_eq!(index_at(u32::MAX as usize), Some(ClassIndex(u32::MAX)));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(index_at(u32::MAX as usize + 1), None);
        assert_eq!(ClassRegistry::new().next_index(), Some(ClassIndex(0)));
    }

    #[test]
    fn lookup_by_type() {
        struct Sprite;
        struct Sound;

        let mut registry = ClassRegistry::new();
        registry
            .declare_type::<Sprite>("Sprite")
            .register()
            .unwrap();

        assert_eq!(registry.get_by_type::<Sprite>().unwrap().name(), "Sprite");
        assert!(registry.get_by_type::<Sound>().is_none());
    }

    #[test]
    fn unknown_class() {
        let registry = diamond();
        assert_eq!(
            registry.base_offset(id("Nope"), id("A")),
            Err(RegistryError::UnknownClass(id("Nope").to_string()))
        );
    }

    #[test]
    fn base_offsets() {
        let registry = diamond();

        assert_eq!(registry.base_offset(id("D"), id("D")), Ok(Some(0)));
        assert_eq!(registry.base_offset(id("D"), id("B2")), Ok(Some(24)));
        // First declared base (B1) wins: 8 + 4.
        assert_eq!(registry.base_offset(id("D"), id("A")), Ok(Some(12)));
        assert_eq!(registry.base_offset(id("A"), id("D")), Ok(None));
    }

    #[test]
    fn apply_offset_and_cast() {
        let registry = diamond();
        let mut storage = [0u8; 64];
        let base = storage.as_mut_ptr();

        let up = registry.apply_offset(base, id("D"), id("B2")).unwrap();
        assert_eq!(up, base.wrapping_add(24));
        let down = registry.apply_offset(up, id("B2"), id("D")).unwrap();
        assert_eq!(down, base);

        let object = UserObject::new(id("D"), base);
        let as_a = registry.cast(&object, id("A")).unwrap();
        assert_eq!(as_a.class_id(), id("A"));
        assert_eq!(as_a.pointer(), base.wrapping_add(12));
        assert_eq!(registry.cast(&as_a, id("D")).unwrap(), object);
    }

    #[test]
    fn cast_unrelated_fails() {
        let registry = diamond();
        let mut storage = [0u8; 8];
        let object = UserObject::new(id("D"), storage.as_mut_ptr());

        let result = registry.cast(&object, id("X"));
        assert!(matches!(
            result,
            Err(RegistryError::Class(ClassError::ClassUnrelated { .. }))
        ));
        assert_eq!(
            registry.cast(&UserObject::NOTHING, id("X")),
            Ok(UserObject::NOTHING)
        );
    }

    #[test]
    fn derived_classes() {
        let registry = diamond();

        let names: Vec<_> = registry
            .derived_classes(id("A"))
            .unwrap()
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(names, ["B1", "B2", "D"]);
        assert!(registry.derived_classes(id("D")).unwrap().is_empty());
    }

    #[test]
    fn visit_hierarchy_bases_first_once() {
        let registry = diamond();
        let mut names = Vec::new();
        registry
            .visit_hierarchy(id("D"), &mut |member: Member<'_>| {
                names.push(member.name().to_string())
            })
            .unwrap();

        assert_eq!(names, ["a", "b1", "b2", "d"]);
    }

    #[test]
    fn teardown_releases_derived_first() {
        struct Recorder {
            name: &'static str,
            log: Arc<Mutex<Vec<&'static str>>>,
        }

        impl Constructor for Recorder {
            fn matches(&self, _args: &Args) -> bool {
                false
            }

            fn create(&self, _args: &Args) -> UserObject {
                UserObject::NOTHING
            }
        }

        impl Drop for Recorder {
            fn drop(&mut self) {
                if let Ok(mut log) = self.log.lock() {
                    log.push(self.name);
                }
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ClassRegistry::new();
        for (name, base) in [("Base", None), ("Mid", Some("Base")), ("Leaf", Some("Mid"))] {
            let mut builder = registry.declare(name).constructor(Recorder {
                name,
                log: Arc::clone(&log),
            });
            if let Some(base) = base {
                builder = builder.base(base, 0);
            }
            builder.register().unwrap();
        }

        drop(registry);
        assert_eq!(*log.lock().unwrap(), ["Leaf", "Mid", "Base"]);
    }
}
