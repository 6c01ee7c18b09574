//! Macros for compile-time configuration.
//!
//! Cargo features are usually checked with `#[cfg(feature = "...")]` spread
//! over the whole crate. This crate lets a crate give each such condition a
//! name once, as a macro alias, and use that alias everywhere else:
//!
//! ```
//! mod cfg {
//!     vc_cfg::define_alias! {
//!         #[cfg(debug_assertions)] => debug,
//!         #[cfg(any())] => never,
//!     }
//! }
//!
//! // Items are kept or removed.
//! cfg::never! { compile_error!("removed"); }
//!
//! // Branches are selected.
//! let x = cfg::never! { if { 1 } else { 2 } };
//! assert_eq!(x, 2);
//!
//! // Conditions can be read as `bool` constants.
//! const NEVER: bool = cfg::never!();
//! assert!(!NEVER);
//! ```
#![no_std]

/// Always passes the provided code.
///
/// Aliases defined by [`define_alias!`] resolve to this macro when their
/// condition is active.
///
/// - `enabled!()` is `true`.
/// - `enabled! { if { A } else { B } }` is `A`.
/// - `enabled! { A }` is `A`.
#[doc(hidden)]
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

/// Always suppresses the provided code.
///
/// Aliases defined by [`define_alias!`] resolve to this macro when their
/// condition is not active.
///
/// - `disabled!()` is `false`.
/// - `disabled! { if { A } else { B } }` is `B`.
/// - `disabled! { A }` is nothing.
#[doc(hidden)]
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    ($($p:tt)*) => {};
}

/// Defines macro aliases for `#[cfg(...)]` conditions.
///
/// Each alias becomes a `pub` macro in the current module, re-exported from
/// either [`enabled!`] or [`disabled!`] depending on the condition.
///
/// # Examples
///
/// ```
/// pub mod cfg {
///     vc_cfg::define_alias! {
///         #[cfg(all())] => always,
///         #[cfg(any())] => {
///             /// Never active.
///             never
///         }
///     }
/// }
///
/// assert!(cfg::always!());
/// assert!(!cfg::never!());
/// ```
#[macro_export]
macro_rules! define_alias {
    () => {};
    (
        #[cfg($meta:meta)] => $alias:ident
        $(, $($rest:tt)*)?
    ) => {
        $crate::define_alias! {
            #[cfg($meta)] => { $alias }
        }
        $(
            $crate::define_alias! { $($rest)* }
        )?
    };
    (
        #[cfg($meta:meta)] => {
            $(#[$attr:meta])*
            $alias:ident
        }
        $(, $($rest:tt)*)?
    ) => {
        #[cfg($meta)]
        $(#[$attr])*
        #[doc = concat!("Passes the provided code, `#[cfg(", stringify!($meta), ")]` is active.")]
        #[doc(inline)]
        pub use $crate::enabled as $alias;

        #[cfg(not($meta))]
        $(#[$attr])*
        #[doc = concat!("Suppresses the provided code, `#[cfg(", stringify!($meta), ")]` is not active.")]
        #[doc(inline)]
        pub use $crate::disabled as $alias;

        $(
            $crate::define_alias! { $($rest)* }
        )?
    };
}
