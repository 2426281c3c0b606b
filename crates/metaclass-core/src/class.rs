//! Class metadata node.
//!
//! A [`Class`] holds everything known about one registered type: its
//! properties and member functions (sorted by id for binary search), its
//! constructors, its destructor and its direct base classes.
//!
//! Base classes are not referenced directly. Each [`BaseInfo`] stores the
//! [`ClassIndex`] of the base inside a [`ClassTable`] plus the byte offset
//! from the derived sub-object to the base sub-object. Operations that walk
//! the hierarchy take the table as an explicit argument.
//!
//! # Thread Safety
//!
//! A class is immutable once built: every operation takes `&self`, and
//! `Class` is `Send + Sync`, so it can be shared between threads freely
//! after registration.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::{
    Args, ClassError, ClassIndex, ClassVisitor, Constructor, Destructor, FunctionEntry,
    PropertyEntry, StringId, UserObject,
};

/// Link from a class to one of its direct bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseInfo {
    /// Position of the base class in the class table.
    pub base: ClassIndex,
    /// Byte offset from the derived sub-object to the base sub-object.
    pub offset: isize,
}

impl BaseInfo {
    /// Create a base link.
    pub fn new(base: ClassIndex, offset: isize) -> Self {
        Self { base, offset }
    }
}

/// Table of classes addressed by [`ClassIndex`].
///
/// Base links are resolved through this trait, so a class never holds a
/// reference to another class.
pub trait ClassTable {
    /// Get the class at `index`.
    ///
    /// Indices stored in base links are always valid for the table the class
    /// was registered in; implementations may panic on foreign indices.
    fn class(&self, index: ClassIndex) -> &Class;
}

impl ClassTable for [Class] {
    fn class(&self, index: ClassIndex) -> &Class {
        &self[index.as_usize()]
    }
}

impl ClassTable for Vec<Class> {
    fn class(&self, index: ClassIndex) -> &Class {
        &self[index.as_usize()]
    }
}

/// Members handed to [`Class::with_members`] by the registration code.
#[derive(Default)]
pub struct ClassMembers {
    /// Direct bases, in declaration order.
    pub bases: Vec<BaseInfo>,
    /// Member functions, in any order. Ids must be unique.
    pub functions: Vec<FunctionEntry>,
    /// Properties, in declaration order. Ids must be unique.
    pub properties: Vec<PropertyEntry>,
    /// Constructors, in match priority order.
    pub constructors: Vec<Box<dyn Constructor>>,
    /// Destructor for instances of the class.
    pub destructor: Destructor,
}

/// Metadata of one registered class.
pub struct Class {
    id: StringId,
    name: String,
    bases: Vec<BaseInfo>,
    /// Sorted by id; doubles as the index view.
    functions: Vec<FunctionEntry>,
    /// Declaration order; owns the entries.
    properties: Vec<PropertyEntry>,
    /// Sorted by id; positions into `properties`.
    properties_by_id: Vec<(StringId, usize)>,
    constructors: Vec<Box<dyn Constructor>>,
    destructor: Destructor,
}

impl Class {
    /// Create a class without members.
    pub fn new(id: StringId, name: impl Into<String>) -> Self {
        Self::with_members(id, name, ClassMembers::default())
    }

    /// Create a class and populate its tables.
    ///
    /// Functions and the id view of properties are sorted here, before the
    /// class can be observed.
    pub fn with_members(id: StringId, name: impl Into<String>, members: ClassMembers) -> Self {
        let ClassMembers {
            bases,
            mut functions,
            properties,
            constructors,
            destructor,
        } = members;

        functions.sort_by_key(|f| f.id);
        debug_assert!(
            functions.windows(2).all(|w| w[0].id != w[1].id),
            "duplicate function id"
        );

        let mut properties_by_id: Vec<(StringId, usize)> = properties
            .iter()
            .enumerate()
            .map(|(index, p)| (p.id, index))
            .collect();
        properties_by_id.sort_by_key(|&(id, _)| id);
        debug_assert!(
            properties_by_id.windows(2).all(|w| w[0].0 != w[1].0),
            "duplicate property id"
        );

        Self {
            id,
            name: name.into(),
            bases,
            functions,
            properties,
            properties_by_id,
            constructors,
            destructor,
        }
    }

    /// Stable id of the class.
    pub fn id(&self) -> StringId {
        self.id
    }

    /// Display name of the class.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ==========================================================================
    // Bases
    // ==========================================================================

    /// Number of direct bases.
    pub fn base_count(&self) -> usize {
        self.bases.len()
    }

    /// Index of the direct base at `index` (declaration order).
    pub fn base(&self, index: usize) -> Result<ClassIndex, ClassError> {
        self.base_info(index).map(|info| info.base)
    }

    /// Link to the direct base at `index` (declaration order).
    pub fn base_info(&self, index: usize) -> Result<&BaseInfo, ClassError> {
        self.bases.get(index).ok_or(ClassError::OutOfRange {
            index,
            size: self.bases.len(),
        })
    }

    /// All direct base links, in declaration order.
    pub fn bases(&self) -> &[BaseInfo] {
        &self.bases
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    /// Number of member functions.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Member functions, sorted by id.
    pub fn functions(&self) -> &[FunctionEntry] {
        &self.functions
    }

    /// Check if the class has a function with this id.
    pub fn has_function(&self, id: StringId) -> bool {
        self.function_position(id).is_some()
    }

    /// Function at `index`, in id order.
    pub fn function_by_index(&self, index: usize) -> Result<&FunctionEntry, ClassError> {
        self.functions.get(index).ok_or(ClassError::OutOfRange {
            index,
            size: self.functions.len(),
        })
    }

    /// Function with this id.
    pub fn function_by_id(&self, id: StringId) -> Result<&FunctionEntry, ClassError> {
        self.try_function_by_id(id)
            .ok_or_else(|| ClassError::FunctionNotFound {
                id,
                class: self.name.clone(),
            })
    }

    /// Function with this id, or `None`.
    pub fn try_function_by_id(&self, id: StringId) -> Option<&FunctionEntry> {
        self.function_position(id).map(|pos| &self.functions[pos])
    }

    /// Function with this declared name.
    pub fn function(&self, name: &str) -> Result<&FunctionEntry, ClassError> {
        self.function_by_id(StringId::from_name(name))
    }

    fn function_position(&self, id: StringId) -> Option<usize> {
        self.functions.binary_search_by_key(&id, |f| f.id).ok()
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    /// Number of properties.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Properties, in declaration order.
    pub fn properties(&self) -> &[PropertyEntry] {
        &self.properties
    }

    /// Check if the class has a property with this id.
    pub fn has_property(&self, id: StringId) -> bool {
        self.property_position(id).is_some()
    }

    /// Property at `index`, in declaration order.
    pub fn property_by_index(&self, index: usize) -> Result<&PropertyEntry, ClassError> {
        self.properties.get(index).ok_or(ClassError::OutOfRange {
            index,
            size: self.properties.len(),
        })
    }

    /// Property with this id.
    pub fn property_by_id(&self, id: StringId) -> Result<&PropertyEntry, ClassError> {
        self.try_property_by_id(id)
            .ok_or_else(|| ClassError::PropertyNotFound {
                id,
                class: self.name.clone(),
            })
    }

    /// Property with this id, or `None`.
    pub fn try_property_by_id(&self, id: StringId) -> Option<&PropertyEntry> {
        self.property_position(id).map(|pos| &self.properties[pos])
    }

    /// Property with this declared name.
    pub fn property(&self, name: &str) -> Result<&PropertyEntry, ClassError> {
        self.property_by_id(StringId::from_name(name))
    }

    fn property_position(&self, id: StringId) -> Option<usize> {
        self.properties_by_id
            .binary_search_by_key(&id, |&(pid, _)| pid)
            .ok()
            .map(|pos| self.properties_by_id[pos].1)
    }

    fn properties_in_id_order(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.properties_by_id
            .iter()
            .map(|&(_, index)| &self.properties[index])
    }

    // ==========================================================================
    // Construction
    // ==========================================================================

    /// Number of constructors.
    pub fn constructor_count(&self) -> usize {
        self.constructors.len()
    }

    /// Create an instance with the first constructor accepting `args`.
    ///
    /// Returns [`UserObject::NOTHING`] when no constructor matches.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn construct(&self, args: &Args) -> UserObject {
        match self.constructors.iter().find(|c| c.matches(args)) {
            Some(constructor) => constructor.create(args),
            None => {
                tracing::trace!(
                    class = %self.name,
                    args = args.len(),
                    constructors = self.constructors.len(),
                    "no constructor matches"
                );
                UserObject::NOTHING
            }
        }
    }

    /// Release an instance through the class destructor.
    ///
    /// The handle is passed through unchecked.
    pub fn destroy(&self, object: &UserObject) {
        self.destructor.call(object)
    }

    // ==========================================================================
    // Visitation
    // ==========================================================================

    /// Present every property, then every function, to `visitor`.
    ///
    /// Both passes go in id order. Inherited members are not included.
    pub fn visit<V: ClassVisitor + ?Sized>(&self, visitor: &mut V) {
        for property in self.properties_in_id_order() {
            visitor.visit_property(property);
        }
        for function in &self.functions {
            visitor.visit_function(function);
        }
    }

    // ==========================================================================
    // Hierarchy
    // ==========================================================================

    /// Byte offset from this class to `target`, if `target` is this class or
    /// one of its ancestors.
    ///
    /// Bases are searched depth-first in declaration order and the first path
    /// that reaches `target` wins. With diamond inheritance the result
    /// therefore depends on the order bases were declared in.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn base_offset<T>(&self, target: &Class, classes: &T) -> Option<isize>
    where
        T: ClassTable + ?Sized,
    {
        let mut dead_ends = FxHashSet::default();
        self.offset_to(target, classes, &mut dead_ends)
    }

    /// Depth-first search for `target`, skipping bases already known not to
    /// reach it. Skipping only removes subtrees that yield `None`, so the
    /// first declared path still wins.
    fn offset_to<T>(
        &self,
        target: &Class,
        classes: &T,
        dead_ends: &mut FxHashSet<ClassIndex>,
    ) -> Option<isize>
    where
        T: ClassTable + ?Sized,
    {
        if self == target {
            return Some(0);
        }

        for info in &self.bases {
            if dead_ends.contains(&info.base) {
                continue;
            }
            let base = classes.class(info.base);
            match base.offset_to(target, classes, dead_ends) {
                Some(offset) => return Some(offset + info.offset),
                None => {
                    dead_ends.insert(info.base);
                }
            }
        }
        None
    }

    /// Check if `target` is this class or one of its ancestors.
    pub fn is_derived_from<T>(&self, target: &Class, classes: &T) -> bool
    where
        T: ClassTable + ?Sized,
    {
        self.base_offset(target, classes).is_some()
    }

    /// Convert a pointer to an instance of this class into a pointer to the
    /// `target` sub-object (if `target` is an ancestor) or to the enclosing
    /// `target` object (if `target` is a descendant).
    ///
    /// Null pointers are returned unchanged. The pointer is never
    /// dereferenced.
    pub fn apply_offset<T>(
        &self,
        pointer: *mut u8,
        target: &Class,
        classes: &T,
    ) -> Result<*mut u8, ClassError>
    where
        T: ClassTable + ?Sized,
    {
        if pointer.is_null() {
            return Ok(pointer);
        }

        if let Some(offset) = self.base_offset(target, classes) {
            tracing::trace!(class = %self.name, target = %target.name, offset, "upcast");
            return Ok(pointer.wrapping_offset(offset));
        }

        if let Some(offset) = target.base_offset(self, classes) {
            tracing::trace!(class = %self.name, target = %target.name, offset, "downcast");
            return Ok(pointer.wrapping_offset(-offset));
        }

        Err(ClassError::ClassUnrelated {
            class: self.name.clone(),
            target: target.name.clone(),
        })
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("bases", &self.bases)
            .field("functions", &self.functions.len())
            .field("properties", &self.properties.len())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
