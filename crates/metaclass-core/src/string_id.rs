//! Deterministic hash-based identity for classes and members.
//!
//! This module provides [`StringId`], a 64-bit hash computed from a declared
//! name, and [`ClassIndex`], the position of a class inside the table that
//! owns it.
//!
//! Ids are what the class tables are sorted by. Because the hash is a pure
//! function of the name, lookups never depend on registration order and
//! callers can compute the id of a member before the class exists.
//!
//! # Examples
//!
//! ```
//! use metaclass_core::StringId;
//!
//! let a = StringId::from_name("position");
//! let b = StringId::from_name("position");
//! assert_eq!(a, b);
//! assert_ne!(a, StringId::from_name("velocity"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain mixing constant applied to every name hash.
///
/// Keeps ids distinct from raw XXH64 values that may be used elsewhere.
const NAME_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// A deterministic 64-bit hash identifying a class, function, or property.
///
/// Computed from the declared name. The same input always produces the same
/// id; ids are totally ordered so they can key a sorted table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct StringId(pub u64);

impl StringId {
    /// Empty/invalid id constant.
    pub const EMPTY: StringId = StringId(0);

    /// Create an id from a declared name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        StringId(NAME_DOMAIN ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is the empty id.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<&str> for StringId {
    fn from(name: &str) -> Self {
        StringId::from_name(name)
    }
}

impl fmt::Debug for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringId({:#018x})", self.0)
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Position of a class in the table that owns it.
///
/// Base links refer to other classes through this index rather than through
/// references, so a class never borrows its bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ClassIndex(pub u32);

impl ClassIndex {
    /// Create an index from a table position.
    #[inline]
    pub const fn new(index: u32) -> Self {
        ClassIndex(index)
    }

    /// Get the position as a `usize`.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
