use core::fmt;

use log::Level;

/// Severity of an alignment violation report.
///
/// Violations are diagnostics, not faults.
pub const REPORT_LEVEL: Level = Level::Info;

// -----------------------------------------------------------------------------
// Report

/// Receiver of alignment violation reports.
///
/// Called at most once per checked stage of a cast, and only when the check
/// fails. Implementations used from several threads must be thread-safe
/// themselves; the cast functions add no synchronization.
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
/// use core::fmt;
/// use vc_ptr::cast::{Level, Report};
///
/// #[derive(Default)]
/// struct Counter(Cell<usize>);
///
/// impl Report for Counter {
///     fn report(&self, _: Level, _: fmt::Arguments<'_>) {
///         self.0.set(self.0.get() + 1);
///     }
/// }
///
/// let counter = Counter::default();
/// let x = 0u32;
/// let _ = vc_ptr::cast::cast_with::<u32, _, _>(&raw const x, &counter);
/// assert_eq!(counter.0.get(), 0);
/// ```
pub trait Report {
    /// Emits one report.
    fn report(&self, level: Level, message: fmt::Arguments<'_>);
}

impl<R: Report + ?Sized> Report for &R {
    #[inline]
    fn report(&self, level: Level, message: fmt::Arguments<'_>) {
        (**self).report(level, message);
    }
}

/// Forwards reports to the [`log`] facade, under the `vc_ptr::cast` target.
///
/// This is the reporter used by [`cast`](super::cast) and
/// [`cast_field`](super::cast_field).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReport;

impl Report for LogReport {
    #[inline]
    fn report(&self, level: Level, message: fmt::Arguments<'_>) {
        log::log!(target: "vc_ptr::cast", level, "{message}");
    }
}

// -----------------------------------------------------------------------------
// AlignPolicy

/// What a failed alignment check does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignPolicy {
    /// Report the violation and produce the pointer anyway.
    Report,
    /// Panic with the violation message.
    Panic,
}

impl AlignPolicy {
    /// The policy selected by the `align_panic` feature.
    pub const ACTIVE: Self = if crate::cfg::align_panic!() {
        Self::Panic
    } else {
        Self::Report
    };
}

// -----------------------------------------------------------------------------
// Strategy

/// The cast strategy compiled into this build.
///
/// Every field is fixed by Cargo features; nothing here changes at runtime.
///
/// # Examples
///
/// ```
/// use vc_ptr::cast::Strategy;
///
/// if Strategy::ACTIVE.check_align {
///     println!("casts are checked, policy: {:?}", Strategy::ACTIVE.policy);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    /// Casts go through a `u8` pointer first (`cast_via_bytes`).
    pub via_bytes: bool,
    /// Casts check the alignment of the address (`check_align`).
    pub check_align: bool,
    /// What a failed check does. Only meaningful with `check_align`.
    pub policy: AlignPolicy,
}

impl Strategy {
    /// The strategy selected by the enabled features.
    pub const ACTIVE: Self = Self {
        via_bytes: crate::cfg::cast_via_bytes!(),
        check_align: crate::cfg::check_align!(),
        policy: AlignPolicy::ACTIVE,
    };
}

// -----------------------------------------------------------------------------
// Tests
