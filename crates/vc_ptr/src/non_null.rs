use core::fmt;
use core::ptr::NonNull;

/// A read-only `NonNull<T>`.
///
/// Casting through [`cast`](crate::cast::cast) keeps it read-only:
/// a `ConstNonNull<U>` only ever becomes a `ConstNonNull<T>`.
///
/// # Examples
///
/// ```
/// use vc_ptr::ConstNonNull;
///
/// let x = 10;
///
/// let ptr = ConstNonNull::from_ref(&x);
///
/// assert_eq!(unsafe{ *ptr.as_ref() }, 10);
/// ```
#[repr(transparent)]
pub struct ConstNonNull<T: ?Sized>(NonNull<T>);

impl<T: ?Sized> ConstNonNull<T> {
    /// Create a new `ConstNonNull` or return `None` if `ptr` is null.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_ptr::ConstNonNull;
    ///
    /// let x = 0u32;
    /// assert!(ConstNonNull::new(&raw const x).is_some());
    /// assert!(ConstNonNull::new(core::ptr::null::<u32>()).is_none());
    /// ```
    #[inline]
    pub const fn new(ptr: *const T) -> Option<Self> {
        match NonNull::new(ptr.cast_mut()) {
            Some(x) => Some(Self(x)),
            None => None,
        }
    }

    /// Return an immutable reference to the value.
    ///
    /// # Safety
    ///
    /// When calling this method, you have to ensure that the pointer is
    /// [convertible to a reference](https://doc.rust-lang.org/stable/core/ptr/index.html#pointer-to-reference-conversion).
    #[inline(always)]
    pub const unsafe fn as_ref<'a>(&self) -> &'a T {
        // Safety: See `NonNull::as_ref`
        unsafe { self.0.as_ref() }
    }

    /// Acquires the underlying `*const` pointer.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    /// Returns the address of the pointer, without provenance.
    #[inline(always)]
    pub fn addr(self) -> usize {
        self.0.addr().get()
    }

    /// Changes the pointee type, without any check.
    ///
    /// Prefer [`cast`](crate::cast::cast), which follows the configured
    /// cast strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_ptr::ConstNonNull;
    ///
    /// let x = [1u8, 2, 3, 4];
    /// let ptr = ConstNonNull::from_ref(&x).cast::<u8>();
    ///
    /// assert_eq!(unsafe { *ptr.as_ref() }, 1);
    /// ```
    #[inline(always)]
    pub const fn cast<U>(self) -> ConstNonNull<U> {
        ConstNonNull(self.0.cast())
    }

    /// Converts a reference to a `ConstNonNull` pointer.
    #[inline(always)]
    pub const fn from_ref(r: &T) -> Self {
        Self(NonNull::from_ref(r))
    }

    /// Converts a mutable reference to a `ConstNonNull` pointer.
    ///
    /// Write access is given up.
    #[inline(always)]
    pub const fn from_mut(r: &mut T) -> Self {
        Self(NonNull::from_mut(r))
    }
}

impl<T: ?Sized> From<NonNull<T>> for ConstNonNull<T> {
    #[inline(always)]
    fn from(value: NonNull<T>) -> Self {
        Self(value)
    }
}

impl<'a, T: ?Sized> From<&'a T> for ConstNonNull<T> {
    #[inline]
    fn from(value: &'a T) -> Self {
        Self::from_ref(value)
    }
}

impl<T: ?Sized> From<ConstNonNull<T>> for *const T {
    #[inline(always)]
    fn from(value: ConstNonNull<T>) -> Self {
        value.as_ptr()
    }
}

impl<T: ?Sized> Clone for ConstNonNull<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ConstNonNull<T> {}

impl<T: ?Sized> fmt::Pointer for ConstNonNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<T: ?Sized> fmt::Debug for ConstNonNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::ConstNonNull;

    #[test]
    fn null_is_rejected() {
        assert!(ConstNonNull::new(core::ptr::null::<u64>()).is_none());
    }

    #[test]
    fn cast_keeps_address() {
        let x = [0u16; 4];
        let ptr = ConstNonNull::from_ref(&x);
        assert_eq!(ptr.cast::<u8>().addr(), x.as_ptr().addr());
        assert_eq!(<*const [u16; 4]>::from(ptr), &raw const x);
    }

    #[test]
    fn from_mut_gives_up_writes() {
        let mut x = [1u8, 2, 3, 4];
        let addr = x.as_ptr().addr();
        let ptr = ConstNonNull::from_mut(&mut x);

        let first = crate::cast::cast::<u8, _>(ptr);
        assert_eq!(first.addr(), addr);
        assert_eq!(unsafe { *first.as_ref() }, 1);
    }

    #[test]
    fn formats_as_address() {
        let x = 0u64;
        let ptr = ConstNonNull::from_ref(&x);
        let raw = &raw const x;

        assert_eq!(format!("{ptr:p}"), format!("{raw:p}"));
        assert_eq!(format!("{ptr:?}"), format!("{raw:p}"));
    }
}
