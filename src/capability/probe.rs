//! Capability probes.
//!
//! A probe answers which capabilities the current process has. [`HostProbe`]
//! asks the CPU; [`StaticProbe`] returns a fixed answer.

use super::flags::Capabilities;

/// Source of the capability set behind the gate.
pub trait CapabilityProbe {
    fn probe(&self) -> Capabilities;
}

/// Probe the running CPU.
///
/// - AVX2 through `is_x86_feature_detected!`, which also checks that the OS
///   saves YMM state
/// - AVX-VNNI through CPUID leaf 7, sub-leaf 1, EAX bit 4
/// - X64 from the compilation target
///
/// Non-x86 targets report an empty set apart from pointer width.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl CapabilityProbe for HostProbe {
    fn probe(&self) -> Capabilities {
        let mut caps = Capabilities::empty();

        if cfg!(target_arch = "x86_64") {
            caps |= Capabilities::X64;
        }

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if is_x86_feature_detected!("avx2") {
                caps |= Capabilities::AVX2;
            }
            if cpuid_avx_vnni() {
                caps |= Capabilities::AVX_VNNI;
            }
        }

        caps
    }
}

/// A probe with a fixed answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticProbe(pub Capabilities);

impl CapabilityProbe for StaticProbe {
    #[inline]
    fn probe(&self) -> Capabilities {
        self.0
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const CPUID_EXTENDED_FEATURES: u32 = 7;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const AVX_VNNI_EAX_BIT: u32 = 1 << 4;

#[cfg(target_arch = "x86")]
fn cpuid_present() -> bool {
    std::arch::x86::has_cpuid()
}

#[cfg(target_arch = "x86_64")]
fn cpuid_present() -> bool {
    true
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[allow(unused_unsafe)]
fn cpuid_avx_vnni() -> bool {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::{__cpuid_count, __get_cpuid_max};
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::{__cpuid_count, __get_cpuid_max};

    if !cpuid_present() {
        return false;
    }

    // SAFETY: CPUID is available
    let (max_leaf, _) = unsafe { __get_cpuid_max(0) };
    if max_leaf < CPUID_EXTENDED_FEATURES {
        return false;
    }

    // SAFETY: leaf 7 is within the supported range
    let leaf = unsafe { __cpuid_count(CPUID_EXTENDED_FEATURES, 1) };
    leaf.eax & AVX_VNNI_EAX_BIT != 0
}
