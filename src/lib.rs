#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_cfg as cfg;
pub use vc_ptr as ptr;

pub use vc_ptr::{ptr_cast, ptr_cast_field};
