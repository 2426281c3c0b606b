//! Opaque handles to native instances.

use std::ptr;

use crate::StringId;

/// Handle to a native instance of a registered class.
///
/// The handle is a class id plus an untyped pointer to the instance. It does
/// not own the instance: creating one is done through a class constructor and
/// releasing it through the class destructor.
///
/// [`UserObject::NOTHING`] is the "no instance" value returned when no
/// constructor accepts a set of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserObject {
    class: StringId,
    pointer: *mut u8,
}

impl UserObject {
    /// The empty instance.
    pub const NOTHING: UserObject = UserObject {
        class: StringId::EMPTY,
        pointer: ptr::null_mut(),
    };

    /// Create a handle for an instance of `class` located at `pointer`.
    pub fn new(class: StringId, pointer: *mut u8) -> Self {
        Self { class, pointer }
    }

    /// Create a handle from a typed pointer.
    pub fn from_ptr<T>(class: StringId, pointer: *mut T) -> Self {
        Self::new(class, pointer.cast())
    }

    /// Check if this is the empty instance.
    pub fn is_nothing(&self) -> bool {
        self.pointer.is_null()
    }

    /// Id of the class this handle was created for.
    pub fn class_id(&self) -> StringId {
        self.class
    }

    /// Untyped address of the instance.
    pub fn pointer(&self) -> *mut u8 {
        self.pointer
    }

    /// Re-point this handle at another class view of the same instance.
    ///
    /// Used after a pointer adjustment to a base or derived sub-object.
    pub fn rebind(&self, class: StringId, pointer: *mut u8) -> Self {
        Self { class, pointer }
    }

    /// Borrow the instance as a `T`.
    ///
    /// Returns `None` for the empty instance.
    ///
    /// # Safety
    ///
    /// The pointer must address a live, properly aligned `T` for the whole
    /// lifetime of the returned reference, and no mutable access may alias it.
    pub unsafe fn as_ref<'a, T>(&self) -> Option<&'a T> {
        unsafe { self.pointer.cast::<T>().as_ref() }
    }

    /// Mutably borrow the instance as a `T`.
    ///
    /// Returns `None` for the empty instance.
    ///
    /// # Safety
    ///
    /// Same requirements as [`as_ref`](Self::as_ref), and the returned
    /// reference must be the only live reference to the instance.
    pub unsafe fn as_mut<'a, T>(&self) -> Option<&'a mut T> {
        unsafe { self.pointer.cast::<T>().as_mut() }
    }
}

impl Default for UserObject {
    fn default() -> Self {
        Self::NOTHING
    }
}
