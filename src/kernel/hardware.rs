//! Instruction-level provider.
//!
//! Issues the VEX-encoded AVX-VNNI instructions (`vpdpbusd`, `vpdpbusds`,
//! `vpdpwssd`, `vpdpwssds`) through inline assembly. A [`HardwareProvider`]
//! can only be obtained from [`HardwareProvider::detect`], which succeeds only
//! when the capability gate is open, so holding one proves the instructions
//! are executable.
//!
//! On targets other than x86/x86_64, or without the `hardware` feature, the
//! provider type is uninhabited.

use super::operation::Accumulate;
use super::provider::Provider;
use crate::common::vector::{I8x16, I8x32, I16x8, I16x16, I32x4, I32x8, U8x16, U8x32};

#[cfg(all(feature = "hardware", any(target_arch = "x86", target_arch = "x86_64")))]
type Token = ();

#[cfg(not(all(feature = "hardware", any(target_arch = "x86", target_arch = "x86_64"))))]
type Token = std::convert::Infallible;

/// Provider backed by the AVX-VNNI instructions.
#[derive(Debug, Clone, Copy)]
pub struct HardwareProvider {
    _token: Token,
}

impl HardwareProvider {
    /// Obtain the provider if the capability gate is open.
    #[cfg(all(feature = "hardware", any(target_arch = "x86", target_arch = "x86_64")))]
    pub fn detect() -> Option<Self> {
        crate::capability::is_supported().then_some(Self { _token: () })
    }

    /// Obtain the provider if the capability gate is open.
    #[cfg(not(all(feature = "hardware", any(target_arch = "x86", target_arch = "x86_64"))))]
    pub fn detect() -> Option<Self> {
        None
    }
}

#[cfg(all(feature = "hardware", any(target_arch = "x86", target_arch = "x86_64")))]
mod x86 {
    use std::arch::asm;
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    use crate::common::vector::{I8x16, I8x32, I16x8, I16x16, I32x4, I32x8, U8x16, U8x32};

    macro_rules! vnni_xmm {
        ($name:ident, $insn:literal, $left:ty, $right:ty) => {
            /// # Safety
            ///
            /// Caller must ensure that AVX-VNNI instructions are available on the target CPU.
            #[target_feature(enable = "avx2")]
            #[inline]
            pub(super) unsafe fn $name(addend: I32x4, left: $left, right: $right) -> I32x4 {
                unsafe {
                    let mut acc = _mm_loadu_si128(addend.as_ptr() as *const __m128i);
                    let a = _mm_loadu_si128(left.as_ptr() as *const __m128i);
                    let b = _mm_loadu_si128(right.as_ptr() as *const __m128i);

                    asm!(
                        concat!("{{vex}} ", $insn, " {acc:x}, {a:x}, {b:x}"),
                        acc = inout(xmm_reg) acc,
                        a = in(xmm_reg) a,
                        b = in(xmm_reg) b,
                        options(pure, nomem, nostack, preserves_flags)
                    );

                    let mut out = [0i32; 4];
                    _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, acc);
                    I32x4::from_array(out)
                }
            }
        };
    }

    macro_rules! vnni_ymm {
        ($name:ident, $insn:literal, $left:ty, $right:ty) => {
            /// # Safety
            ///
            /// Caller must ensure that AVX-VNNI instructions are available on the target CPU.
            #[target_feature(enable = "avx2")]
            #[inline]
            pub(super) unsafe fn $name(addend: I32x8, left: $left, right: $right) -> I32x8 {
                unsafe {
                    let mut acc = _mm256_loadu_si256(addend.as_ptr() as *const __m256i);
                    let a = _mm256_loadu_si256(left.as_ptr() as *const __m256i);
                    let b = _mm256_loadu_si256(right.as_ptr() as *const __m256i);

                    asm!(
                        concat!("{{vex}} ", $insn, " {acc:y}, {a:y}, {b:y}"),
                        acc = inout(ymm_reg) acc,
                        a = in(ymm_reg) a,
                        b = in(ymm_reg) b,
                        options(pure, nomem, nostack, preserves_flags)
                    );

                    let mut out = [0i32; 8];
                    _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, acc);
                    I32x8::from_array(out)
                }
            }
        };
    }

    vnni_xmm!(vpdpbusd_xmm, "vpdpbusd", U8x16, I8x16);
    vnni_xmm!(vpdpbusds_xmm, "vpdpbusds", U8x16, I8x16);
    vnni_xmm!(vpdpwssd_xmm, "vpdpwssd", I16x8, I16x8);
    vnni_xmm!(vpdpwssds_xmm, "vpdpwssds", I16x8, I16x8);

    vnni_ymm!(vpdpbusd_ymm, "vpdpbusd", U8x32, I8x32);
    vnni_ymm!(vpdpbusds_ymm, "vpdpbusds", U8x32, I8x32);
    vnni_ymm!(vpdpwssd_ymm, "vpdpwssd", I16x16, I16x16);
    vnni_ymm!(vpdpwssds_ymm, "vpdpwssds", I16x16, I16x16);
}

// SAFETY (all methods): a HardwareProvider is only constructed by `detect`,
// after the capability gate reported AVX-VNNI with OS-enabled YMM state.
#[cfg(all(feature = "hardware", any(target_arch = "x86", target_arch = "x86_64")))]
impl Provider for HardwareProvider {
    fn name(&self) -> &'static str {
        "avx-vnni"
    }

    #[inline]
    fn dpbusd_128(&self, addend: I32x4, left: U8x16, right: I8x16, mode: Accumulate) -> I32x4 {
        match mode {
            Accumulate::Wrapping => unsafe { x86::vpdpbusd_xmm(addend, left, right) },
            Accumulate::Saturating => unsafe { x86::vpdpbusds_xmm(addend, left, right) },
        }
    }

    #[inline]
    fn dpwssd_128(&self, addend: I32x4, left: I16x8, right: I16x8, mode: Accumulate) -> I32x4 {
        match mode {
            Accumulate::Wrapping => unsafe { x86::vpdpwssd_xmm(addend, left, right) },
            Accumulate::Saturating => unsafe { x86::vpdpwssds_xmm(addend, left, right) },
        }
    }

    #[inline]
    fn dpbusd_256(&self, addend: I32x8, left: U8x32, right: I8x32, mode: Accumulate) -> I32x8 {
        match mode {
            Accumulate::Wrapping => unsafe { x86::vpdpbusd_ymm(addend, left, right) },
            Accumulate::Saturating => unsafe { x86::vpdpbusds_ymm(addend, left, right) },
        }
    }

    #[inline]
    fn dpwssd_256(
        &self,
        addend: I32x8,
        left: I16x16,
        right: I16x16,
        mode: Accumulate,
    ) -> I32x8 {
        match mode {
            Accumulate::Wrapping => unsafe { x86::vpdpwssd_ymm(addend, left, right) },
            Accumulate::Saturating => unsafe { x86::vpdpwssds_ymm(addend, left, right) },
        }
    }
}

#[cfg(not(all(feature = "hardware", any(target_arch = "x86", target_arch = "x86_64"))))]
impl Provider for HardwareProvider {
    fn name(&self) -> &'static str {
        match self._token {}
    }

    fn dpbusd_128(&self, _: I32x4, _: U8x16, _: I8x16, _: Accumulate) -> I32x4 {
        match self._token {}
    }

    fn dpwssd_128(&self, _: I32x4, _: I16x8, _: I16x8, _: Accumulate) -> I32x4 {
        match self._token {}
    }

    fn dpbusd_256(&self, _: I32x8, _: U8x32, _: I8x32, _: Accumulate) -> I32x8 {
        match self._token {}
    }

    fn dpwssd_256(&self, _: I32x8, _: I16x16, _: I16x16, _: Accumulate) -> I32x8 {
        match self._token {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ReferenceProvider;
    use crate::kernel::conformance::{self, Sample};
    use proptest::prelude::*;

    #[test]
    fn test_detect_follows_gate() {
        assert_eq!(HardwareProvider::detect().is_some(), crate::capability::is_supported());
    }

    #[test]
    fn test_edge_cases_conform() {
        let Some(hw) = HardwareProvider::detect() else {
            eprintln!("AVX-VNNI not available, skipping hardware conformance");
            return;
        };
        conformance::verify(&hw, &Sample::edge_cases()).unwrap();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_hardware_matches_reference(
            addend in any::<[i32; 8]>(),
            bytes_left in any::<[u8; 32]>(),
            bytes_right in any::<[i8; 32]>(),
            words_left in any::<[i16; 16]>(),
            words_right in any::<[i16; 16]>(),
        ) {
            let Some(hw) = HardwareProvider::detect() else {
                return Ok(());
            };
            let sample = Sample {
                addend: I32x8::from_array(addend),
                bytes_left: U8x32::from_array(bytes_left),
                bytes_right: I8x32::from_array(bytes_right),
                words_left: I16x16::from_array(words_left),
                words_right: I16x16::from_array(words_right),
            };
            prop_assert_eq!(conformance::verify(&hw, &[sample]), Ok(()));
            // the reference trivially conforms to itself
            prop_assert_eq!(conformance::verify(&ReferenceProvider, &[sample]), Ok(()));
        }
    }
}
