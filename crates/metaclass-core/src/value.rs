//! Generic values passed to and returned from class members.
//!
//! [`Value`] is the dynamically typed container used for arguments, property
//! values and return values. [`ValueKind`] is its type tag, and [`Args`] an
//! ordered argument bundle.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use ordered_float::OrderedFloat;

use crate::UserObject;

/// Type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ValueKind {
    /// No value.
    None = 0,
    /// Boolean.
    Bool = 1,
    /// Signed 64-bit integer.
    Int = 2,
    /// 64-bit float.
    Real = 3,
    /// Owned string.
    String = 4,
    /// Instance of a registered class.
    User = 5,
}

impl ValueKind {
    /// Check if this is a numeric kind.
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Real)
    }
}

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// No value.
    #[default]
    None,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Real(OrderedFloat<f64>),
    /// Owned string.
    String(String),
    /// Instance of a registered class.
    User(UserObject),
}

impl Value {
    /// Get the type tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Real(_) => ValueKind::Real,
            Value::String(_) => ValueKind::String,
            Value::User(_) => ValueKind::User,
        }
    }

    /// Check if this value can be passed where `kind` is expected.
    ///
    /// Accepts the same kind, any numeric kind for another numeric kind, and
    /// booleans for integers (and the reverse).
    pub fn is_compatible(&self, kind: ValueKind) -> bool {
        let own = self.kind();
        own == kind
            || (own.is_numeric() && kind.is_numeric())
            || matches!(
                (own, kind),
                (ValueKind::Bool, ValueKind::Int) | (ValueKind::Int, ValueKind::Bool)
            )
    }

    /// Get as a boolean, converting from integers.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Get as an integer, converting from booleans and truncating reals.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Real(r) => Some(r.0 as i64),
            _ => None,
        }
    }

    /// Get as a float, converting from integers.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(r.0),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a class instance.
    pub fn as_user(&self) -> Option<UserObject> {
        match self {
            Value::User(object) => Some(*object),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(OrderedFloat(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<UserObject> for Value {
    fn from(value: UserObject) -> Self {
        Value::User(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r.0),
            Value::String(s) => write!(f, "{:?}", s),
            Value::User(object) => write!(f, "<{} @ {:p}>", object.class_id(), object.pointer()),
        }
    }
}

/// Ordered argument bundle for constructors and functions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Args(Vec<Value>);

impl Args {
    /// Create an empty argument list.
    pub const fn empty() -> Self {
        Args(Vec::new())
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an argument by position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Iterate over the arguments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Append an argument.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    /// Check every argument against a list of declared kinds.
    ///
    /// Returns the first mismatching position and its kind.
    pub fn first_mismatch(&self, params: &[ValueKind]) -> Option<(usize, ValueKind, ValueKind)> {
        self.0
            .iter()
            .zip(params)
            .enumerate()
            .find(|(_, (arg, kind))| !arg.is_compatible(**kind))
            .map(|(i, (arg, kind))| (i, *kind, arg.kind()))
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Args(values)
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Args(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
