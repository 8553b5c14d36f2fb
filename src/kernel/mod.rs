//! Widening multiply-add kernels
//!
//! Each operation multiplies groups of narrow elements, sums every group into
//! one 32-bit lane and adds it to the matching addend lane:
//!
//! | Operands             | Group | 128-bit     | 256-bit     |
//! |----------------------|-------|-------------|-------------|
//! | `u8` x `i8`          | 4     | `vpdpbusd`  | `vpdpbusd`  |
//! | `i16` x `i16`        | 2     | `vpdpwssd`  | `vpdpwssd`  |
//!
//! The final addition either wraps ([`multiply_widening_and_add`]) or saturates
//! ([`multiply_widening_and_add_saturate`]).
//!
//! # Capability gate
//!
//! Operations run only when [`capability::is_supported`] is true. Otherwise
//! they return [`Error::UnsupportedOperation`] without touching the
//! arithmetic; there is no silent fallback. Callers that want a portable path
//! choose one themselves, for example with [`select_provider`].
//!
//! # Examples
//!
//! ```rust
//! use vnni_core::{capability, kernel, Error, I32x4, I8x16, U8x16};
//!
//! let addend = I32x4::splat(1);
//! let left = U8x16::splat(2);
//! let right = I8x16::splat(-3);
//!
//! match kernel::multiply_widening_and_add(addend, left, right) {
//!     Ok(out) => assert_eq!(out, I32x4::splat(1 + 4 * (2 * -3))),
//!     Err(Error::UnsupportedOperation { .. }) => assert!(!capability::is_supported()),
//!     Err(e) => panic!("{e}"),
//! }
//! ```

// Submodule declarations
pub mod conformance;
pub mod hardware;
pub mod operation;
pub mod provider;
pub mod reference;

// Re-exports
pub use hardware::HardwareProvider;
pub use operation::{Accumulate, Operation, SourceElement, Width};
pub use provider::{Provider, WideningOperands};
pub use reference::ReferenceProvider;

use std::fmt;

use once_cell::sync::Lazy;

use crate::capability;
use crate::common::error::{Error, Result};

static HARDWARE: Lazy<Option<HardwareProvider>> = Lazy::new(|| {
    let provider = HardwareProvider::detect();
    log::debug!(
        "Widening multiply-add provider: {}",
        provider.as_ref().map_or("none (capability gate closed)", |p| p.name())
    );
    provider
});

static REFERENCE: ReferenceProvider = ReferenceProvider;

/// The instruction-level provider, if the capability gate is open.
#[inline]
pub fn hardware_provider() -> Option<&'static dyn Provider> {
    (*HARDWARE).as_ref().map(|p| p as &dyn Provider)
}

/// The hardware provider when the gate is open, the reference provider
/// otherwise.
///
/// This is the explicit portable path. The gated operations never fall back on
/// their own.
#[inline]
pub fn select_provider() -> &'static dyn Provider {
    hardware_provider().unwrap_or(&REFERENCE)
}

/// A capability gate bound to an execution provider.
///
/// Operations run on the provider only while the gate is open; a closed gate
/// refuses every call with [`Error::UnsupportedOperation`].
#[derive(Clone, Copy)]
pub struct Kernel<'p> {
    supported: bool,
    provider: Option<&'p dyn Provider>,
}

impl<'p> Kernel<'p> {
    /// Bind a gate answer to a provider.
    #[inline]
    pub const fn new(supported: bool, provider: &'p dyn Provider) -> Self {
        Self {
            supported,
            provider: Some(provider),
        }
    }

    /// A kernel that refuses every operation.
    #[inline]
    pub const fn unsupported() -> Self {
        Self {
            supported: false,
            provider: None,
        }
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        self.supported && self.provider.is_some()
    }

    #[inline]
    pub fn provider(&self) -> Option<&'p dyn Provider> {
        self.provider
    }

    /// `addend + Σ left * right` per lane, wrapping on overflow.
    pub fn multiply_widening_and_add<L: WideningOperands>(
        &self,
        addend: L::Accumulator,
        left: L,
        right: L::Right,
    ) -> Result<L::Accumulator> {
        self.run(addend, left, right, Accumulate::Wrapping)
    }

    /// `addend + Σ left * right` per lane, clamped to the `i32` range.
    pub fn multiply_widening_and_add_saturate<L: WideningOperands>(
        &self,
        addend: L::Accumulator,
        left: L,
        right: L::Right,
    ) -> Result<L::Accumulator> {
        self.run(addend, left, right, Accumulate::Saturating)
    }

    #[inline]
    fn run<L: WideningOperands>(
        &self,
        addend: L::Accumulator,
        left: L,
        right: L::Right,
        mode: Accumulate,
    ) -> Result<L::Accumulator> {
        match self.provider {
            Some(provider) if self.supported => Ok(L::apply(provider, addend, left, right, mode)),
            _ => Err(Error::UnsupportedOperation {
                operation: L::operation(mode),
            }),
        }
    }
}

impl Kernel<'static> {
    /// The host kernel: process capability gate and hardware provider.
    #[inline]
    pub fn host() -> Self {
        match hardware_provider() {
            Some(provider) => Self::new(capability::is_supported(), provider),
            None => Self::unsupported(),
        }
    }
}

impl fmt::Debug for Kernel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("supported", &self.supported)
            .field("provider", &self.provider.map(|p| p.name()))
            .finish()
    }
}

/// [`Kernel::multiply_widening_and_add`] on the host kernel.
#[inline]
pub fn multiply_widening_and_add<L: WideningOperands>(
    addend: L::Accumulator,
    left: L,
    right: L::Right,
) -> Result<L::Accumulator> {
    Kernel::host().multiply_widening_and_add(addend, left, right)
}

/// [`Kernel::multiply_widening_and_add_saturate`] on the host kernel.
#[inline]
pub fn multiply_widening_and_add_saturate<L: WideningOperands>(
    addend: L::Accumulator,
    left: L,
    right: L::Right,
) -> Result<L::Accumulator> {
    Kernel::host().multiply_widening_and_add_saturate(addend, left, right)
}
