//! Property descriptors.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::{AccessError, StringId, UserObject, Value, ValueKind};

bitflags! {
    /// Access rights of a property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// The property has a getter.
        const READABLE = 0b01;
        /// The property has a setter.
        const WRITABLE = 0b10;
    }
}

type Getter = Arc<dyn Fn(&UserObject) -> Result<Value, AccessError> + Send + Sync>;
type Setter = Arc<dyn Fn(&UserObject, Value) -> Result<(), AccessError> + Send + Sync>;

/// Metadata and accessors of one property.
#[derive(Clone)]
pub struct PropertyEntry {
    /// Stable id, hashed from the name.
    pub id: StringId,
    /// Declared name.
    pub name: String,
    /// Kind of the stored value.
    pub kind: ValueKind,
    /// Access rights, derived from which accessors are present.
    pub flags: PropertyFlags,
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl PropertyEntry {
    fn new(
        name: impl Into<String>,
        kind: ValueKind,
        getter: Option<Getter>,
        setter: Option<Setter>,
    ) -> Self {
        let name = name.into();
        let mut flags = PropertyFlags::empty();
        flags.set(PropertyFlags::READABLE, getter.is_some());
        flags.set(PropertyFlags::WRITABLE, setter.is_some());
        Self {
            id: StringId::from_name(&name),
            name,
            kind,
            flags,
            getter,
            setter,
        }
    }

    /// Create a read-only property.
    pub fn read_only<G>(name: impl Into<String>, kind: ValueKind, getter: G) -> Self
    where
        G: Fn(&UserObject) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        Self::new(name, kind, Some(Arc::new(getter)), None)
    }

    /// Create a read-write property.
    pub fn read_write<G, S>(name: impl Into<String>, kind: ValueKind, getter: G, setter: S) -> Self
    where
        G: Fn(&UserObject) -> Result<Value, AccessError> + Send + Sync + 'static,
        S: Fn(&UserObject, Value) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        Self::new(name, kind, Some(Arc::new(getter)), Some(Arc::new(setter)))
    }

    /// Create a write-only property.
    pub fn write_only<S>(name: impl Into<String>, kind: ValueKind, setter: S) -> Self
    where
        S: Fn(&UserObject, Value) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        Self::new(name, kind, None, Some(Arc::new(setter)))
    }

    /// Check if this property can be read.
    pub fn is_readable(&self) -> bool {
        self.flags.contains(PropertyFlags::READABLE)
    }

    /// Check if this property can be written.
    pub fn is_writable(&self) -> bool {
        self.flags.contains(PropertyFlags::WRITABLE)
    }

    /// Read the property from `object`.
    pub fn get(&self, object: &UserObject) -> Result<Value, AccessError> {
        if object.is_nothing() {
            return Err(AccessError::NullObject {
                member: self.name.clone(),
            });
        }
        match &self.getter {
            Some(getter) => getter(object),
            None => Err(AccessError::NotReadable(self.name.clone())),
        }
    }

    /// Write `value` to the property of `object`.
    pub fn set(&self, object: &UserObject, value: Value) -> Result<(), AccessError> {
        if object.is_nothing() {
            return Err(AccessError::NullObject {
                member: self.name.clone(),
            });
        }
        let Some(setter) = &self.setter else {
            return Err(AccessError::NotWritable(self.name.clone()));
        };
        if !value.is_compatible(self.kind) {
            return Err(AccessError::ArgumentType {
                member: self.name.clone(),
                index: 0,
                expected: self.kind,
                actual: value.kind(),
            });
        }
        setter(object, value)
    }
}

impl fmt::Debug for PropertyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl PartialEq for PropertyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.kind == other.kind
            && self.flags == other.flags
    }
}
