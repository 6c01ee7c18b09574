use core::any::type_name;
use core::fmt;
use core::panic::Location;

use thiserror::Error;

// -----------------------------------------------------------------------------
// AlignmentViolation

/// A pointer cast to a type whose alignment the address does not satisfy.
///
/// The `Display` output is the message reported for the violation.
///
/// # Examples
///
/// ```
/// use vc_ptr::cast::check_align;
///
/// let err = check_align::<u32>(0x1003).unwrap_err();
///
/// assert_eq!(err.align, 4);
/// assert_eq!(err.addr, 0x1003);
/// assert!(err.to_string().starts_with("alignment error - (u32 *) - alignment 4, address 0x1003"));
/// ```
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error(
    "alignment error - ({type_name} *){} - alignment {align}, address {addr:#x}, at {location}",
    Parenthesized(.expr)
)]
pub struct AlignmentViolation {
    /// Name of the target type.
    pub type_name: &'static str,
    /// Source text of the cast pointer, when the cast came from
    /// [`ptr_cast!`](crate::ptr_cast) or [`ptr_cast_field!`](crate::ptr_cast_field).
    pub expr: Option<&'static str>,
    /// Alignment required by the target type.
    pub align: usize,
    /// The misaligned address.
    pub addr: usize,
    /// Where the cast was requested.
    pub location: &'static Location<'static>,
}

/// `(expr)`, or nothing.
struct Parenthesized<'a>(&'a Option<&'static str>);

impl fmt::Display for Parenthesized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(expr) => write!(f, "({expr})"),
            None => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// Checks

/// Returns `true` if `addr` is a multiple of `align`.
///
/// Address `0` is aligned to everything.
///
/// # Panics
///
/// Panics if `align` is not a power of two, `0` included.
///
/// # Examples
///
/// ```
/// use vc_ptr::cast::is_aligned_to;
///
/// assert!(is_aligned_to(0x1004, 4));
/// assert!(!is_aligned_to(0x1003, 4));
/// assert!(is_aligned_to(0, 64));
/// ```
#[inline(always)]
pub const fn is_aligned_to(addr: usize, align: usize) -> bool {
    assert!(align.is_power_of_two(), "alignment must be a power of two");
    addr & (align - 1) == 0
}

/// Checks `addr` against the alignment of `T`.
///
/// This check does not depend on the `check_align` feature.
#[track_caller]
#[inline]
pub fn check_align<T>(addr: usize) -> Result<(), AlignmentViolation> {
    let align = align_of::<T>();
    if is_aligned_to(addr, align) {
        Ok(())
    } else {
        Err(AlignmentViolation {
            type_name: type_name::<T>(),
            expr: None,
            align,
            addr,
            location: Location::caller(),
        })
    }
}

// -----------------------------------------------------------------------------
// Validation

#[cfg(any(feature = "check_align", test))]
use super::report::{AlignPolicy, REPORT_LEVEL, Report};

/// Runs the alignment check of a cast and handles a violation according to
/// `policy`.
///
/// Never refuses the cast under [`AlignPolicy::Report`]. Casts only call this
/// with `check_align`.
#[cfg(any(feature = "check_align", test))]
#[track_caller]
#[inline]
pub(crate) fn validate<T, R: Report + ?Sized>(
    addr: usize,
    expr: Option<&'static str>,
    policy: AlignPolicy,
    reporter: &R,
) {
    if let Err(violation) = check_align::<T>(addr) {
        let violation = AlignmentViolation { expr, ..violation };
        match policy {
            AlignPolicy::Report => reporter.report(REPORT_LEVEL, format_args!("{violation}")),
            AlignPolicy::Panic => panic!("{violation}"),
        }
    }
}

/// The two checks of a field cast: `base` against `U`, then the field at
/// `base + offset` against `T`. Each one is handled on its own.
///
/// `names` holds the source text of the base pointer and of the field.
#[cfg(any(feature = "check_align", test))]
#[track_caller]
#[inline]
pub(crate) fn validate_field<U, T, R: Report + ?Sized>(
    base: usize,
    offset: usize,
    names: Option<[&'static str; 2]>,
    policy: AlignPolicy,
    reporter: &R,
) {
    let [base_expr, field_expr] = match names {
        Some([base, field]) => [Some(base), Some(field)],
        None => [None, None],
    };
    validate::<U, R>(base, base_expr, policy, reporter);
    validate::<T, R>(base.wrapping_add(offset), field_expr, policy, reporter);
}

// -----------------------------------------------------------------------------
// Tests
