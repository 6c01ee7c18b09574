//! Reinterpreting raw addresses as pointers to other types.
//!
//! Byte buffers such as packets or configuration blobs are often viewed as
//! typed records in place. On some targets a misaligned typed access faults or
//! reads garbage, on others it is only slower. The functions here perform such
//! casts the same way everywhere and can check alignment at runtime.
//!
//! # Strategy
//!
//! Two Cargo features select how a cast is compiled:
//!
//! - `cast_via_bytes`: the pointer is retyped to `u8` before its final type.
//!   The produced pointer is identical.
//! - `check_align`: the address is checked against the alignment of the
//!   target type. A violation is [reported](Report) at [`Level::Info`] and the
//!   pointer is produced anyway. Without this feature the check does not exist
//!   in the binary.
//!
//! `align_panic` turns reports into panics. [`Strategy::ACTIVE`] holds the
//! resolved configuration.
//!
//! A report names the target type, the required alignment, the address and
//! the call site. Casts made through [`ptr_cast!`](crate::ptr_cast) and
//! [`ptr_cast_field!`](crate::ptr_cast_field) also name the pointer
//! expression, as in `alignment error - (u32 *)(raw) - alignment 4, address
//! 0x1003, at src/main.rs:7:13`.
//!
//! # Mutability
//!
//! The result has the same pointer kind as the input, see [`CastPtr`].
//!
//! # Examples
//!
//! ```
//! use vc_ptr::{ptr_cast, ptr_cast_field};
//!
//! #[repr(C)]
//! struct Header {
//!     kind: u16,
//!     len: u16,
//! }
//!
//! let buf = [1u16, 16, 0, 0];
//! let raw: *const u8 = buf.as_ptr().cast();
//!
//! let header: *const Header = ptr_cast!(Header, raw);
//! let len: *const u16 = ptr_cast_field!(u16, Header, raw, len);
//!
//! assert_eq!(unsafe { (*header).kind }, 1);
//! assert_eq!(unsafe { *len }, 16);
//! ```

mod align;
mod raw;
mod report;

pub use align::{AlignmentViolation, check_align, is_aligned_to};
pub use log::Level;
pub use raw::{CastPtr, FieldPtr};
pub use report::{AlignPolicy, LogReport, REPORT_LEVEL, Report, Strategy};

use core::any::type_name;

// -----------------------------------------------------------------------------
// Direct cast

/// Reinterprets `ptr` as a pointer to `T`.
///
/// The address is unchanged. With `check_align`, a misaligned address is
/// reported through [`LogReport`].
///
/// # Examples
///
/// ```
/// let mut x = 0x0102_0304u32;
///
/// let p = vc_ptr::cast::cast::<[u8; 4], _>(&raw mut x);
/// assert_eq!(p.addr(), (&raw mut x).addr());
/// ```
#[cfg_attr(feature = "check_align", track_caller, inline)]
#[cfg_attr(not(feature = "check_align"), inline(always))]
#[must_use]
pub fn cast<T, P: CastPtr>(ptr: P) -> P::Cast<T> {
    cast_at::<T, P, LogReport>(ptr, None, &LogReport)
}

/// Reinterprets `ptr` as a pointer to `T`, reporting to `reporter`.
///
/// Same as [`cast`] with an explicit [`Report`] implementation.
#[cfg_attr(feature = "check_align", track_caller, inline)]
#[cfg_attr(not(feature = "check_align"), inline(always))]
#[must_use]
pub fn cast_with<T, P: CastPtr, R: Report + ?Sized>(ptr: P, reporter: &R) -> P::Cast<T> {
    cast_at::<T, P, R>(ptr, None, reporter)
}

/// Same as [`cast_with`], naming the pointer expression `expr` in reports.
///
/// This is what [`ptr_cast!`](crate::ptr_cast) calls, with the source text of
/// its pointer argument.
#[cfg_attr(feature = "check_align", track_caller, inline)]
#[cfg_attr(not(feature = "check_align"), inline(always))]
#[must_use]
pub fn cast_named<T, P: CastPtr, R: Report + ?Sized>(
    ptr: P,
    expr: &'static str,
    reporter: &R,
) -> P::Cast<T> {
    cast_at::<T, P, R>(ptr, Some(expr), reporter)
}

#[cfg_attr(feature = "check_align", track_caller, inline)]
#[cfg_attr(not(feature = "check_align"), inline(always))]
fn cast_at<T, P: CastPtr, R: Report + ?Sized>(
    ptr: P,
    expr: Option<&'static str>,
    reporter: &R,
) -> P::Cast<T> {
    crate::cfg::check_align! {
        if {
            align::validate::<T, R>(ptr.addr(), expr, AlignPolicy::ACTIVE, reporter);
        } else {
            let _ = (expr, reporter);
        }
    }
    ptr.retype::<T>()
}

/// Reinterprets `ptr` as a pointer to `T`, or returns the alignment violation.
///
/// The check always runs, whatever the enabled features, and nothing is
/// reported.
///
/// # Examples
///
/// ```
/// use vc_ptr::cast::try_cast;
///
/// let buf = [0u32; 2];
/// let raw: *const u8 = buf.as_ptr().cast();
///
/// assert!(try_cast::<u32, _>(raw).is_ok());
/// assert!(try_cast::<u32, _>(raw.wrapping_add(1)).is_err());
/// ```
#[track_caller]
#[inline]
pub fn try_cast<T, P: CastPtr>(ptr: P) -> Result<P::Cast<T>, AlignmentViolation> {
    check_align::<T>(ptr.addr())?;
    Ok(ptr.retype::<T>())
}

// -----------------------------------------------------------------------------
// Field cast

/// Reinterprets the field at `offset` of the `U` at `ptr` as a pointer to `T`.
///
/// `offset` is normally produced by [`offset_of!`](core::mem::offset_of), which
/// [`ptr_cast_field!`](crate::ptr_cast_field) does for you.
///
/// With `check_align` two checks run: `ptr` against the alignment of `U`,
/// then `ptr + offset` against the alignment of `T`. Each failing check is
/// reported separately.
#[cfg_attr(feature = "check_align", track_caller, inline)]
#[cfg_attr(not(feature = "check_align"), inline(always))]
#[must_use]
pub fn cast_field<T, U, P: FieldPtr>(ptr: P, offset: usize) -> P::Cast<T> {
    cast_field_at::<T, U, P, LogReport>(ptr, offset, None, &LogReport)
}

/// Same as [`cast_field`] with an explicit [`Report`] implementation.
#[cfg_attr(feature = "check_align", track_caller, inline)]
#[cfg_attr(not(feature = "check_align"), inline(always))]
#[must_use]
pub fn cast_field_with<T, U, P: FieldPtr, R: Report + ?Sized>(
    ptr: P,
    offset: usize,
    reporter: &R,
) -> P::Cast<T> {
    cast_field_at::<T, U, P, R>(ptr, offset, None, reporter)
}

/// Same as [`cast_field_with`], naming the base pointer and the field in
/// reports: `names` is `[base, field]`.
///
/// This is what [`ptr_cast_field!`](crate::ptr_cast_field) calls.
#[cfg_attr(feature = "check_align", track_caller, inline)]
#[cfg_attr(not(feature = "check_align"), inline(always))]
#[must_use]
pub fn cast_field_named<T, U, P: FieldPtr, R: Report + ?Sized>(
    ptr: P,
    offset: usize,
    names: [&'static str; 2],
    reporter: &R,
) -> P::Cast<T> {
    cast_field_at::<T, U, P, R>(ptr, offset, Some(names), reporter)
}

#[cfg_attr(feature = "check_align", track_caller, inline)]
#[cfg_attr(not(feature = "check_align"), inline(always))]
fn cast_field_at<T, U, P: FieldPtr, R: Report + ?Sized>(
    ptr: P,
    offset: usize,
    names: Option<[&'static str; 2]>,
    reporter: &R,
) -> P::Cast<T> {
    debug_assert!(
        offset <= size_of::<U>(),
        "offset {offset} is outside of {}",
        type_name::<U>(),
    );
    crate::cfg::check_align! {
        if {
            align::validate_field::<U, T, R>(ptr.addr(), offset, names, AlignPolicy::ACTIVE, reporter);
        } else {
            let _ = (names, reporter);
        }
    }
    ptr.field_at(offset).retype::<T>()
}

// -----------------------------------------------------------------------------
// Macros

/// Reinterprets a pointer as a pointer to another type.
///
/// `ptr_cast!(T, ptr)` calls [`cast`](crate::cast::cast),
/// `ptr_cast!(T, ptr, reporter)` calls [`cast_with`](crate::cast::cast_with).
/// Reports name the source text of `ptr`.
///
/// # Examples
///
/// ```
/// # use vc_ptr::ptr_cast;
/// let x = 5u64;
/// let p = ptr_cast!(u32, &raw const x);
/// assert_eq!(p.addr(), (&raw const x).addr());
/// ```
#[macro_export]
macro_rules! ptr_cast {
    ($ty:ty, $ptr:expr) => {
        $crate::cast::cast_named::<$ty, _, _>(
            $ptr,
            ::core::stringify!($ptr),
            &$crate::cast::LogReport,
        )
    };
    ($ty:ty, $ptr:expr, $reporter:expr) => {
        $crate::cast::cast_named::<$ty, _, _>($ptr, ::core::stringify!($ptr), $reporter)
    };
}

/// Reinterprets a field of a record behind a raw pointer.
///
/// `ptr_cast_field!(T, Record, ptr, field)` views `ptr` as a `Record` and
/// returns a pointer to `T` at the address of `field`. Nested fields
/// (`a.b`) are accepted. See [`cast_field`](crate::cast::cast_field).
/// Reports name `ptr` and `ptr.field`.
///
/// # Examples
///
/// ```
/// # use vc_ptr::ptr_cast_field;
/// #[repr(C)]
/// struct Pair {
///     a: u32,
///     b: u32,
/// }
///
/// let mut pair = Pair { a: 1, b: 2 };
/// let p: *mut u32 = ptr_cast_field!(u32, Pair, (&raw mut pair).cast::<u8>(), b);
///
/// unsafe { *p = 7 };
/// assert_eq!(pair.b, 7);
/// ```
#[macro_export]
macro_rules! ptr_cast_field {
    ($ty:ty, $record:ty, $ptr:expr, $($field:tt)+) => {
        $crate::cast::cast_field_named::<$ty, $record, _, _>(
            $ptr,
            ::core::mem::offset_of!($record, $($field)+),
            [
                ::core::stringify!($ptr),
                ::core::concat!(::core::stringify!($ptr), ".", ::core::stringify!($($field)+)),
            ],
            &$crate::cast::LogReport,
        )
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::ptr;

    use super::{cast, try_cast};

    #[repr(C, align(8))]
    struct Header {
        kind: u32,
        len: u32,
    }

    #[repr(C)]
    struct Packet {
        tag: u64,
        header: Header,
    }

    #[expect(dead_code, reason = "only the layout is used")]
    #[repr(C)]
    struct Loose {
        a: u8,
        b: u16,
    }

    fn at(addr: usize) -> *const u8 {
        ptr::without_provenance(addr)
    }

    #[test]
    fn cast_keeps_address() {
        for addr in 0x1000..0x1040 {
            let p = at(addr);
            let out = try_cast::<u64, _>(p).unwrap_or(p.cast());
            assert_eq!(out.addr(), addr);
        }
    }

    #[test]
    fn cast_keeps_mutability() {
        let mut x = [0u32; 2];

        let p: *mut u16 = cast::<u16, _>(x.as_mut_ptr());
        assert_eq!(p.addr(), x.as_ptr().addr());

        let p: *const u16 = cast::<u16, _>(x.as_ptr());
        assert_eq!(p.addr(), x.as_ptr().addr());
    }

    #[test]
    fn try_cast_ignores_features() {
        let err = try_cast::<u32, _>(at(0x1003)).unwrap_err();
        assert_eq!((err.align, err.addr), (4, 0x1003));
        assert!(try_cast::<u32, _>(at(0x1004)).is_ok());
        assert!(try_cast::<u32, _>(at(0)).is_ok());
    }

    #[test]
    fn field_macro_nested() {
        let p: *const u32 = ptr_cast_field!(u32, Packet, at(0x3000), header.len);
        assert_eq!(p.addr(), 0x3000 + 8 + 4);

        let p: *mut u64 = ptr_cast_field!(u64, Packet, at(0x3000).cast_mut(), tag);
        assert_eq!(p.addr(), 0x3000);
    }

    #[test]
    fn field_cast_reads_real_buffer() {
        let packet = Packet {
            tag: 9,
            header: Header { kind: 3, len: 42 },
        };
        let raw: *const u8 = (&raw const packet).cast();

        let kind: *const u32 = ptr_cast_field!(u32, Packet, raw, header.kind);
        let len: *const u32 = ptr_cast_field!(u32, Packet, raw, header.len);

        assert_eq!(unsafe { (*kind, *len) }, (3, 42));
        assert_eq!(packet.tag, 9);
    }

    #[cfg(feature = "align_panic")]
    #[test]
    #[should_panic(expected = "alignment error - (u32 *)(at(0x1003)) - alignment 4, address 0x1003")]
    fn misaligned_cast_panics() {
        let _ = ptr_cast!(u32, at(0x1003));
    }

    #[cfg(feature = "align_panic")]
    #[test]
    fn aligned_cast_does_not_panic() {
        let p = cast::<u32, _>(at(0x1004));
        assert_eq!(p.addr(), 0x1004);

        let p: *const u32 = ptr_cast_field!(u32, Header, at(0x1000), len);
        assert_eq!(p.addr(), 0x1004);
    }

    #[cfg(feature = "align_panic")]
    #[test]
    #[should_panic(expected = "Header *)(at(0x1001)) - alignment 8, address 0x1001")]
    fn misaligned_field_base_panics() {
        let _: *const u32 = ptr_cast_field!(u32, Header, at(0x1001), len);
    }

    #[cfg(feature = "align_panic")]
    #[test]
    #[should_panic(expected = "(u32 *) - alignment 4, address 0x1002")]
    fn misaligned_field_panics() {
        let _ = super::cast_field::<u32, Loose, _>(at(0x1000), core::mem::offset_of!(Loose, b));
    }

    #[cfg(not(feature = "align_panic"))]
    mod reporting {
        use alloc::string::String;
        use core::fmt;
        use std::sync::Mutex;

        use super::{Header, Loose, at};
        use crate::cast::report::tests::Recorder;
        use crate::cast::{Level, Report, Strategy, cast_field_named, cast_field_with, cast_with};

        #[derive(Default)]
        struct SyncCounter(Mutex<usize>);

        impl Report for SyncCounter {
            fn report(&self, _: Level, _: fmt::Arguments<'_>) {
                if let Ok(mut n) = self.0.lock() {
                    *n += 1;
                }
            }
        }

        /// Checks that `out` holds one report per expected prefix, or none
        /// when casts are unchecked.
        fn assert_reports(out: &[(Level, String)], prefixes: &[&str]) {
            if !Strategy::ACTIVE.check_align {
                assert!(out.is_empty());
                return;
            }
            assert_eq!(out.len(), prefixes.len());
            for ((level, msg), prefix) in out.iter().zip(prefixes) {
                assert_eq!(*level, Level::Info);
                assert!(msg.starts_with(prefix), "{msg:?} does not start with {prefix:?}");
                assert!(msg.contains(file!()));
            }
        }

        #[test]
        fn aligned_cast_is_silent() {
            let rec = Recorder::default();
            let p = cast_with::<u32, _, _>(at(0x1004), &rec);
            assert_eq!(p.addr(), 0x1004);
            assert!(rec.take().is_empty());
        }

        #[test]
        fn misaligned_cast_reports_once() {
            let rec = Recorder::default();
            let p = cast_with::<u32, _, _>(at(0x1003), &rec);
            assert_eq!(p.addr(), 0x1003);

            let out = rec.take();
            assert_reports(&out, &["alignment error - (u32 *) - alignment 4, address 0x1003, at "]);
        }

        #[test]
        fn macro_names_pointer_expression() {
            let rec = Recorder::default();
            let raw = at(0x1003);
            let p = ptr_cast!(u32, raw, &rec);
            assert_eq!(p.addr(), 0x1003);

            let out = rec.take();
            assert_reports(&out, &["alignment error - (u32 *)(raw) - alignment 4, address 0x1003"]);
        }

        #[test]
        fn null_is_checked_like_any_address() {
            let rec = Recorder::default();
            let p = cast_with::<u64, _, _>(at(0), &rec);
            assert!(p.is_null());
            assert!(rec.take().is_empty());

            let p = cast_with::<u64, _, _>(at(0).wrapping_add(1), &rec);
            assert_eq!(p.addr(), 1);
            assert_reports(&rec.take(), &["alignment error - (u64 *) - alignment 8, address 0x1,"]);
        }

        #[test]
        fn field_cast_aligned_base() {
            let rec = Recorder::default();
            let p = cast_field_with::<u32, Header, _, _>(at(0x1000), 4, &rec);
            assert_eq!(p.addr(), 0x1004);
            assert!(rec.take().is_empty());
        }

        #[test]
        fn field_cast_reports_both_stages() {
            let rec = Recorder::default();
            let p = cast_field_named::<u32, Header, _, _>(at(0x1001), 4, ["raw", "raw.len"], &rec);
            assert_eq!(p.addr(), 0x1005);

            let out = rec.take();
            assert_reports(&out, &[
                "alignment error - (vc_ptr::cast::tests::Header *)(raw) - alignment 8, address 0x1001",
                "alignment error - (u32 *)(raw.len) - alignment 4, address 0x1005",
            ]);
        }

        #[test]
        fn field_cast_reports_field_only() {
            let rec = Recorder::default();
            let p = cast_field_with::<u32, Loose, _, _>(
                at(0x1000).cast_mut(),
                core::mem::offset_of!(Loose, b),
                &rec,
            );
            assert_eq!(p.addr(), 0x1002);
            assert_reports(&rec.take(), &["alignment error - (u32 *) - alignment 4, address 0x1002"]);
        }

        #[test]
        fn concurrent_casts() {
            let counter = SyncCounter::default();
            std::thread::scope(|s| {
                for t in 0..4 {
                    let counter = &counter;
                    s.spawn(move || {
                        for i in 0..64 {
                            let addr = 0x4000 + t * 0x100 + i * 8 + 1;
                            let p = cast_with::<u64, _, _>(at(addr), counter);
                            assert_eq!(p.addr(), addr);
                        }
                    });
                }
            });
            let total = counter.0.lock().map(|n| *n).unwrap_or(0);
            let expected = if Strategy::ACTIVE.check_align { 4 * 64 } else { 0 };
            assert_eq!(total, expected);
        }
    }
}
