use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::ConstNonNull;
use crate::cast;

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_ptr {
    ($ptr:ident) => {
        impl $ptr<'_> {
            /// Returns the address of the pointer, without provenance.
            #[inline(always)]
            pub fn addr(&self) -> usize {
                self.0.addr().get()
            }

            /// Check if the pointer is aligned to type `T`.
            #[inline]
            pub fn is_aligned<T>(&self) -> bool {
                cast::is_aligned_to(self.addr(), align_of::<T>())
            }

            /// Calculates the offset from a pointer.
            ///
            /// As the pointer is type-erased, `count` parameter is in raw bytes.
            ///
            /// # Safety
            /// - The offset cannot make the existing ptr null or invalid target.
            /// - The resulting pointer must outlive the lifetime of this pointer.
            #[inline]
            pub const unsafe fn byte_add(self, count: usize) -> Self {
                Self(
                    // SAFETY: The caller upholds safety for `add` and ensures the result is not null.
                    unsafe { self.0.add(count) },
                    PhantomData,
                )
            }
        }

        impl fmt::Pointer for $ptr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $ptr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($ptr), self.0)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Ptr

/// A type-erased, borrowed address, similar to `&'a [u8]` without a length.
///
/// Typed access goes through [`cast`](crate::cast::cast), so it follows the
/// configured cast strategy and alignment checks.
///
/// # borrow-like
///
/// - The lifetime `'a` accurately represents how long the pointer is valid for.
/// - Its target must not be changed while this pointer is alive.
///
/// # Examples
///
/// ```
/// # use vc_ptr::Ptr;
/// let buf = [7u32, 9];
/// let ptr = Ptr::from_ref(&buf);
///
/// let second = unsafe { ptr.byte_add(4).as_ref::<u32>() };
/// assert_eq!(*second, 9);
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Ptr<'a>(NonNull<u8>, PhantomData<&'a u8>);

impl_ptr!(Ptr);

impl<'a> Ptr<'a> {
    /// Create a `Ptr` from a raw `NonNull<u8>` pointer.
    ///
    /// # Safety
    ///
    /// - The provided lifetime `'a` must be valid for the pointee.
    /// - The pointee must not be mutated while the `Ptr` is alive.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Ptr<'a> {
        Ptr(ptr, PhantomData)
    }

    /// Creates a `Ptr` from a reference with same lifetime.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vc_ptr::Ptr;
    /// let packet = [0u8; 16];
    /// let ptr = Ptr::from_ref(&packet);
    /// assert_eq!(ptr.as_ptr(), packet.as_ptr());
    /// ```
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(val: &'a T) -> Ptr<'a> {
        Ptr(NonNull::from_ref(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Reinterprets the address as a read-only pointer to `T`.
    ///
    /// No dereference happens, so this is safe.
    #[cfg_attr(feature = "check_align", track_caller)]
    #[inline]
    pub fn cast<T>(self) -> ConstNonNull<T> {
        cast::cast::<T, _>(ConstNonNull::from(self.0))
    }

    /// Convert this [`Ptr`] into a `&T` with the same lifetime `'a`.
    ///
    /// The address is reinterpreted with [`cast`](crate::cast::cast).
    ///
    /// # Safety
    ///
    /// - The pointee is a valid `T`.
    /// - `Ptr` must be properly aligned for `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vc_ptr::Ptr;
    /// let x = 8i32;
    /// let ptr = Ptr::from_ref(&x);
    ///
    /// assert!(ptr.is_aligned::<i32>());
    ///
    /// let rx = unsafe { ptr.as_ref::<i32>() };
    /// assert_eq!(*rx, 8);
    /// ```
    #[cfg_attr(feature = "check_align", track_caller)]
    #[inline]
    pub unsafe fn as_ref<T>(self) -> &'a T {
        // SAFETY: valid, aligned `T`, borrowed for `'a`.
        unsafe { self.cast::<T>().as_ref() }
    }
}

impl<'a, T: ?Sized> From<&'a T> for Ptr<'a> {
    #[inline]
    fn from(val: &'a T) -> Self {
        Self::from_ref(val)
    }
}

// -----------------------------------------------------------------------------
// PtrMut

/// A type-erased, exclusively borrowed address, similar to `&'a mut [u8]`
/// without a length.
///
/// # mutable and exclusive
///
/// It cannot be cloned, and the caller must comply with Rust alias rules.
///
/// # Examples
///
/// ```
/// # use vc_ptr::PtrMut;
/// let mut buf = [0u16; 4];
/// let mut ptr = PtrMut::from_mut(&mut buf);
///
/// unsafe { *ptr.as_mut::<u16>() = 3 };
/// assert_eq!(buf[0], 3);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_ptr!(PtrMut);

impl<'a> PtrMut<'a> {
    /// Create a `PtrMut` from a raw `NonNull<u8>` pointer.
    ///
    /// # Safety
    ///
    /// - The data pointed to by this `ptr` must be valid for writes.
    /// - The provided lifetime `'a` must be valid for the pointee.
    /// - No other pointer may access the pointee while `PtrMut` is alive.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> PtrMut<'a> {
        PtrMut(ptr, PhantomData)
    }

    /// Creates a `PtrMut` from a mutable reference with same lifetime.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(val: &'a mut T) -> PtrMut<'a> {
        PtrMut(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Reinterprets the address as a writable pointer to `T`.
    #[cfg_attr(feature = "check_align", track_caller)]
    #[inline]
    pub fn cast<T>(&mut self) -> NonNull<T> {
        cast::cast::<T, _>(self.0)
    }

    /// Get a `&T` with the lifetime of `&self`.
    ///
    /// # Safety
    /// - The pointee is a valid `T`.
    /// - Self must be properly aligned for type `T`.
    #[cfg_attr(feature = "check_align", track_caller)]
    #[inline]
    pub unsafe fn as_ref<T>(&self) -> &'_ T {
        // SAFETY: valid, aligned `T`, borrowed for `'_`.
        unsafe { self.borrow().as_ref::<T>() }
    }

    /// Get a `&mut T` with the lifetime of `&mut self`.
    ///
    /// # Safety
    /// - The pointee is a valid `T`.
    /// - Self must be properly aligned for type `T`.
    #[cfg_attr(feature = "check_align", track_caller)]
    #[inline]
    pub unsafe fn as_mut<T>(&mut self) -> &'_ mut T {
        // SAFETY: valid, aligned `T`, exclusively borrowed for `'_`.
        unsafe { self.cast::<T>().as_mut() }
    }

    /// Gets a [`Ptr`] from self with a **smaller** lifetime.
    #[inline(always)]
    pub const fn borrow(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }

    /// Gets a [`PtrMut`] from self with a **smaller** lifetime.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> PtrMut<'_> {
        PtrMut(self.0, PhantomData)
    }

    /// Convert this [`PtrMut`] into a `&mut T` with the **same** lifetime.
    ///
    /// # Safety
    /// - The pointee is a valid `T`.
    /// - Self must be properly aligned for type `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vc_ptr::PtrMut;
    /// let mut x = 8;
    /// let ptr = PtrMut::from_mut(&mut x);
    ///
    /// let rx = unsafe { ptr.consume::<i32>() };
    /// *rx += 2;
    /// assert_eq!(*rx, 10);
    /// ```
    #[cfg_attr(feature = "check_align", track_caller)]
    #[inline]
    pub unsafe fn consume<T>(mut self) -> &'a mut T {
        // SAFETY: valid, aligned `T`, exclusively borrowed for `'a`.
        unsafe { self.cast::<T>().as_mut() }
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for PtrMut<'a> {
    #[inline]
    fn from(val: &'a mut T) -> Self {
        Self::from_mut(val)
    }
}

// -----------------------------------------------------------------------------
// Tests
