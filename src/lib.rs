//! vnni-core - bit-exact widening multiply-add kernels for AVX-VNNI
//!
//! This library defines the numeric contract of the AVX-VNNI dot-product
//! instructions and the capability gate that decides whether they may run.
//!
//! # Features
//!
//! - **Capability gate**: process-wide, probed once, read-only afterwards
//! - **Widening multiply-add**: `u8 x i8` groups of four and `i16 x i16`
//!   groups of two, accumulated into `i32` lanes, at 128 and 256 bits
//! - **Wrapping and saturating** forms of every operation
//! - **Reference provider**: portable arithmetic identical to the hardware,
//!   selected explicitly by the caller
//! - **Conformance checks**: compare any provider against the reference
//!
//! # Example - Gated accelerated call
//!
//! ```rust
//! use vnni_core::{capability, kernel, I16x8, I32x4};
//!
//! if capability::is_supported() {
//!     let addend = I32x4::from_array([5, 0, 0, 0]);
//!     let left = I16x8::from_array([3, 4, 0, 0, 0, 0, 0, 0]);
//!     let right = I16x8::splat(2);
//!     let out = kernel::multiply_widening_and_add(addend, left, right).unwrap();
//!     assert_eq!(out.lane(0), 19);
//! }
//! ```
//!
//! # Example - Portable path chosen by the caller
//!
//! ```rust
//! use vnni_core::kernel::{self, Accumulate};
//! use vnni_core::{I32x8, I8x32, Provider, U8x32};
//!
//! let provider = kernel::select_provider();
//! let out = provider.dpbusd_256(
//!     I32x8::splat(i32::MAX),
//!     U8x32::splat(1),
//!     I8x32::splat(1),
//!     Accumulate::Saturating,
//! );
//! assert_eq!(out, I32x8::splat(i32::MAX));
//! ```
//!
//! # Performance Considerations
//!
//! Kernel calls do not allocate, lock or perform I/O. The capability gate is a
//! single lazily-initialized read after the first call.

// Core modules
pub mod capability;
pub mod common;
pub mod kernel;

// Re-export commonly used types
pub use common::{
    Error, I8x16, I8x32, I16x8, I16x16, I32x4, I32x8, Result, U8x16, U8x32, Vector,
    saturate_i32, saturating_add_i32,
};
pub use kernel::{
    Kernel, Operation, Provider, multiply_widening_and_add, multiply_widening_and_add_saturate,
};
