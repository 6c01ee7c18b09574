//! This crate provides pointer casts and lightweight pointer wrappers.
//!
//! The goal is to view untyped memory, such as packet or configuration
//! buffers, as typed records without copying, while keeping casts auditable:
//! every cast can be checked for alignment at runtime, at no cost when the
//! check is disabled.
//!
//! **cast**
//!
//! The [`cast`] module reinterprets raw addresses as pointers to other types,
//! with [`ptr_cast!`] and [`ptr_cast_field!`] as call-site shorthands.
//! Its behavior is selected by Cargo features:
//!
//! - `cast_via_bytes`: cast through a `u8` pointer first.
//! - `check_align`: check and report misaligned casts.
//! - `align_panic`: panic on misaligned casts instead of reporting.
//!
//! **ConstNonNull**
//!
//! [`ConstNonNull<T>`] is similar to [`NonNull<T>`](core::ptr::NonNull): a non-null
//! pointer that cannot be used to obtain mutable references directly.
//!
//! **Ptr** and **PtrMut**
//!
//! [`Ptr<'a>`] and [`PtrMut<'a>`] are type-erased `&[u8]` and `&mut [u8]`
//! equivalents without a length. Typed access through them goes through
//! [`cast`].
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    vc_cfg::define_alias! {
        #[cfg(feature = "cast_via_bytes")] => cast_via_bytes,
        #[cfg(feature = "check_align")] => check_align,
        #[cfg(feature = "align_panic")] => align_panic,
    }
}

// -----------------------------------------------------------------------------
// no_std support

#[cfg(test)]
extern crate alloc;

#[cfg(test)]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

pub mod cast;

mod non_null;
mod type_erased;

// -----------------------------------------------------------------------------
// Top-level exports

pub use non_null::ConstNonNull;
pub use type_erased::{Ptr, PtrMut};
