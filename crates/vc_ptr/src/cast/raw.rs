use core::ptr::NonNull;

use crate::ConstNonNull;

mod sealed {
    pub trait Sealed {}
}

// -----------------------------------------------------------------------------
// CastPtr

/// A pointer kind that can be reinterpreted as a pointer to another type.
///
/// The mutability of the source is carried over to the result, a cast never
/// turns a read-only pointer into a writable one:
///
/// | source             | `Cast<T>`           |
/// |--------------------|---------------------|
/// | `*const U`         | `*const T`          |
/// | `*mut U`           | `*mut T`            |
/// | `NonNull<U>`       | `NonNull<T>`        |
/// | `ConstNonNull<U>`  | `ConstNonNull<T>`   |
///
/// This trait is sealed.
pub trait CastPtr: Copy + sealed::Sealed {
    /// The same pointer kind, pointing to `T`.
    type Cast<T>: CastPtr;

    /// Returns the address of the pointer, without provenance.
    fn addr(self) -> usize;

    /// Changes the pointee type to `T`.
    ///
    /// The address is unchanged. With the `cast_via_bytes` feature the pointer
    /// is retyped to `u8` first.
    fn retype<T>(self) -> Self::Cast<T>;
}

/// A [`CastPtr`] whose address can be moved to one of its fields.
///
/// Only raw pointers implement this, as wrapping address arithmetic on them
/// is safe.
pub trait FieldPtr: CastPtr {
    /// Moves the address forward by `offset` bytes.
    ///
    /// The pointer is not dereferenced, and the arithmetic wraps.
    fn field_at(self, offset: usize) -> Self;
}

// -----------------------------------------------------------------------------
// Implementation

macro_rules! retype_body {
    ($ptr:ident, $T:ty) => {
        crate::cfg::cast_via_bytes! {
            if {
                $ptr.cast::<u8>().cast::<$T>()
            } else {
                $ptr.cast::<$T>()
            }
        }
    };
}

impl<U: ?Sized> sealed::Sealed for *const U {}
impl<U: ?Sized> sealed::Sealed for *mut U {}
impl<U: ?Sized> sealed::Sealed for NonNull<U> {}
impl<U: ?Sized> sealed::Sealed for ConstNonNull<U> {}

impl<U: ?Sized> CastPtr for *const U {
    type Cast<T> = *const T;

    #[inline(always)]
    fn addr(self) -> usize {
        <*const U>::addr(self)
    }

    #[inline(always)]
    fn retype<T>(self) -> *const T {
        retype_body!(self, T)
    }
}

impl<U: ?Sized> CastPtr for *mut U {
    type Cast<T> = *mut T;

    #[inline(always)]
    fn addr(self) -> usize {
        <*mut U>::addr(self)
    }

    #[inline(always)]
    fn retype<T>(self) -> *mut T {
        retype_body!(self, T)
    }
}

impl<U: ?Sized> CastPtr for NonNull<U> {
    type Cast<T> = NonNull<T>;

    #[inline(always)]
    fn addr(self) -> usize {
        NonNull::addr(self).get()
    }

    #[inline(always)]
    fn retype<T>(self) -> NonNull<T> {
        retype_body!(self, T)
    }
}

impl<U: ?Sized> CastPtr for ConstNonNull<U> {
    type Cast<T> = ConstNonNull<T>;

    #[inline(always)]
    fn addr(self) -> usize {
        ConstNonNull::addr(self)
    }

    #[inline(always)]
    fn retype<T>(self) -> ConstNonNull<T> {
        retype_body!(self, T)
    }
}

impl<U: ?Sized> FieldPtr for *const U {
    #[inline(always)]
    fn field_at(self, offset: usize) -> Self {
        self.wrapping_byte_add(offset)
    }
}

impl<U: ?Sized> FieldPtr for *mut U {
    #[inline(always)]
    fn field_at(self, offset: usize) -> Self {
        self.wrapping_byte_add(offset)
    }
}

// -----------------------------------------------------------------------------
// Tests
