//! Capability gate.
//!
//! The gate answers whether the accelerated widening multiply-add instructions
//! may be used in this process. The host is probed once, on first use, and the
//! answer is kept in a read-only table for the rest of the process.
//!
//! Two predicates are exposed:
//!
//! - [`is_supported`]: the AVX-VNNI instruction family is usable
//! - [`is_supported_x64`]: the same, in a 64-bit process
//!
//! # Examples
//!
//! ```rust
//! use vnni_core::capability;
//!
//! if capability::is_supported() {
//!     // safe to call the accelerated kernels
//! }
//! assert_eq!(capability::is_supported(), capability::is_supported());
//! ```

// Submodule declarations
pub mod flags;
pub mod probe;

// Re-exports
pub use flags::Capabilities;
pub use probe::{CapabilityProbe, HostProbe, StaticProbe};

use once_cell::sync::Lazy;

// Probed once, thread-safe, never refreshed
static HOST_CAPABILITIES: Lazy<Capabilities> = Lazy::new(|| {
    let caps = HostProbe.probe();
    log::debug!(
        "Probed host capabilities: {:?} (avx_vnni={}, avx_vnni_x64={}, hardware provider compiled={})",
        caps,
        caps.avx_vnni(),
        caps.avx_vnni_x64(),
        cfg!(feature = "hardware")
    );
    caps
});

/// Capability set of the running host, probed on first call.
#[inline]
pub fn host_capabilities() -> Capabilities {
    *HOST_CAPABILITIES
}

/// Whether the accelerated widening multiply-add operations are usable.
///
/// Constant for the lifetime of the process. Always `false` when the crate
/// is built without the `hardware` feature, since no instruction-level
/// provider exists to run them.
#[inline]
pub fn is_supported() -> bool {
    cfg!(feature = "hardware") && host_capabilities().avx_vnni()
}

/// Whether the accelerated operations are usable in a 64-bit process.
///
/// Implies [`is_supported`].
#[inline]
pub fn is_supported_x64() -> bool {
    cfg!(feature = "hardware") && host_capabilities().avx_vnni_x64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_is_idempotent() {
        let first = is_supported();
        for _ in 0..8 {
            assert_eq!(is_supported(), first);
        }
        assert_eq!(host_capabilities(), host_capabilities());
    }

    #[test]
    fn test_x64_implies_supported() {
        if is_supported_x64() {
            assert!(is_supported());
        }
    }

    #[test]
    fn test_gate_matches_probe() {
        let expected = cfg!(feature = "hardware") && HostProbe.probe().avx_vnni();
        assert_eq!(is_supported(), expected);
    }

    #[test]
    fn test_gate_is_consistent_across_threads() {
        let here = is_supported();
        let handles: Vec<_> = (0..4).map(|_| std::thread::spawn(is_supported)).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), here);
        }
    }
}
