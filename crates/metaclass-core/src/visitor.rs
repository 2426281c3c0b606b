//! Visitation of class members.

use crate::{FunctionEntry, PropertyEntry, StringId};

/// A member of a class, as presented to a visitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Member<'a> {
    /// A property.
    Property(&'a PropertyEntry),
    /// A member function.
    Function(&'a FunctionEntry),
}

impl<'a> Member<'a> {
    /// Id of the member.
    pub fn id(&self) -> StringId {
        match self {
            Member::Property(p) => p.id,
            Member::Function(f) => f.id,
        }
    }

    /// Declared name of the member.
    pub fn name(&self) -> &'a str {
        match self {
            Member::Property(p) => &p.name,
            Member::Function(f) => &f.name,
        }
    }
}

/// Receives the members of a class from [`Class::visit`](crate::Class::visit).
///
/// Properties are presented first, then functions. Both methods default to
/// doing nothing so a visitor only overrides the kinds it cares about.
pub trait ClassVisitor {
    /// Called once per property.
    fn visit_property(&mut self, _property: &PropertyEntry) {}

    /// Called once per function.
    fn visit_function(&mut self, _function: &FunctionEntry) {}
}

impl<F> ClassVisitor for F
where
    F: FnMut(Member<'_>),
{
    fn visit_property(&mut self, property: &PropertyEntry) {
        self(Member::Property(property))
    }

    fn visit_function(&mut self, function: &FunctionEntry) {
        self(Member::Function(function))
    }
}
