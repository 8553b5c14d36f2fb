//! Common types shared by the capability gate and the kernels.
//!
//! This module provides the error type, the fixed-width lane vectors that
//! every operation consumes and produces, and the signed saturation helpers.

// Submodule declarations
pub mod error;
pub mod saturate;
pub mod vector;

// Re-exports for convenience
pub use error::{Error, Result};
pub use saturate::{saturate_i32, saturating_add_i32};
pub use vector::{I8x16, I8x32, I16x8, I16x16, I32x4, I32x8, Lane, U8x16, U8x32, Vector};
