//! Unified error type for vnni-core.
//!
//! Kernel calls fail in exactly one way (the capability gate is closed). The
//! remaining variants come from the vector byte views and from checking an
//! execution provider against the reference arithmetic.
use thiserror::Error;

use crate::kernel::Operation;

/// Main error type for vnni-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A kernel operation was invoked while the capability gate is closed
    #[error("Unsupported operation: {operation} requires AVX-VNNI, which is not available")]
    UnsupportedOperation { operation: Operation },

    /// Byte slice does not match the size of the vector being built
    #[error("Length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Provider output diverged from the reference arithmetic
    #[error("{operation} lane {lane}: expected {expected}, got {actual}")]
    Mismatch {
        operation: Operation,
        lane: usize,
        expected: i32,
        actual: i32,
    },
}

/// Result type for vnni-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Accumulate, SourceElement, Width};

    #[test]
    fn test_unsupported_operation_message() {
        let err = Error::UnsupportedOperation {
            operation: Operation::new(Width::W256, SourceElement::Word, Accumulate::Saturating),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported operation: vpdpwssds ymm requires AVX-VNNI, which is not available"
        );
    }

    #[test]
    fn test_length_mismatch_message() {
        let err = Error::LengthMismatch {
            expected: 16,
            actual: 15,
        };
        assert_eq!(err.to_string(), "Length mismatch: expected 16 bytes, got 15");
    }
}
