//! Capability flag set reported by a probe.

use bitflags::bitflags;

bitflags! {
    /// CPU and process capabilities relevant to the widening multiply-add family
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// AVX2 with OS-enabled YMM state
        const AVX2 = 0x0001;
        /// AVX-VNNI (CPUID.(EAX=7,ECX=1):EAX[4])
        const AVX_VNNI = 0x0002;
        /// 64-bit process
        const X64 = 0x0004;
    }
}

impl Capabilities {
    /// Whether the VEX-encoded VNNI instructions may be issued.
    ///
    /// The CPUID bit alone is not enough: the OS must also save YMM state,
    /// which AVX2 detection verifies.
    #[inline]
    pub const fn avx_vnni(self) -> bool {
        self.contains(Self::AVX2.union(Self::AVX_VNNI))
    }

    /// [`avx_vnni`](Self::avx_vnni) in a 64-bit process.
    #[inline]
    pub const fn avx_vnni_x64(self) -> bool {
        self.avx_vnni() && self.contains(Self::X64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vnni_requires_avx2() {
        assert!(!Capabilities::AVX_VNNI.avx_vnni());
        assert!(!Capabilities::AVX2.avx_vnni());
        assert!((Capabilities::AVX2 | Capabilities::AVX_VNNI).avx_vnni());
    }

    #[test]
    fn test_x64_is_an_independent_axis() {
        let vnni = Capabilities::AVX2 | Capabilities::AVX_VNNI;
        assert!(!vnni.avx_vnni_x64());
        assert!((vnni | Capabilities::X64).avx_vnni_x64());
        assert!(!(Capabilities::X64 | Capabilities::AVX2).avx_vnni_x64());
        assert!(!Capabilities::default().avx_vnni());
    }
}
