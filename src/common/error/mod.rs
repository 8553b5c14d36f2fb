//! Unified error type for vnni-core.
//!
//! A single enum covers the closed capability gate, byte-view size errors and
//! provider conformance failures.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
