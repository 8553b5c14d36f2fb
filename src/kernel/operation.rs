//! Operation descriptors for the widening multiply-add family.

use std::fmt;

/// Vector width of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    /// 128-bit (XMM) vectors, four accumulator lanes
    W128,
    /// 256-bit (YMM) vectors, eight accumulator lanes
    W256,
}

impl Width {
    #[inline]
    pub const fn bits(self) -> usize {
        match self {
            Self::W128 => 128,
            Self::W256 => 256,
        }
    }

    /// Number of `i32` accumulator lanes.
    #[inline]
    pub const fn accumulator_lanes(self) -> usize {
        self.bits() / 32
    }

    const fn register(self) -> &'static str {
        match self {
            Self::W128 => "xmm",
            Self::W256 => "ymm",
        }
    }
}

/// Element type of the narrow operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceElement {
    /// Unsigned 8-bit left operand times signed 8-bit right operand
    Byte,
    /// Signed 16-bit operands on both sides
    Word,
}

impl SourceElement {
    /// Narrow elements feeding one accumulator lane.
    #[inline]
    pub const fn group_size(self) -> usize {
        match self {
            Self::Byte => 4,
            Self::Word => 2,
        }
    }
}

/// How the group sum is combined with the addend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accumulate {
    /// Two's-complement wraparound
    Wrapping,
    /// Clamp to `[i32::MIN, i32::MAX]`
    Saturating,
}

/// One of the eight widening multiply-add operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    pub width: Width,
    pub source: SourceElement,
    pub accumulate: Accumulate,
}

impl Operation {
    /// Every operation, 128-bit forms first.
    pub const ALL: [Operation; 8] = [
        Operation::new(Width::W128, SourceElement::Byte, Accumulate::Wrapping),
        Operation::new(Width::W128, SourceElement::Word, Accumulate::Wrapping),
        Operation::new(Width::W128, SourceElement::Byte, Accumulate::Saturating),
        Operation::new(Width::W128, SourceElement::Word, Accumulate::Saturating),
        Operation::new(Width::W256, SourceElement::Byte, Accumulate::Wrapping),
        Operation::new(Width::W256, SourceElement::Word, Accumulate::Wrapping),
        Operation::new(Width::W256, SourceElement::Byte, Accumulate::Saturating),
        Operation::new(Width::W256, SourceElement::Word, Accumulate::Saturating),
    ];

    #[inline]
    pub const fn new(width: Width, source: SourceElement, accumulate: Accumulate) -> Self {
        Self {
            width,
            source,
            accumulate,
        }
    }

    #[inline]
    pub const fn is_saturating(self) -> bool {
        matches!(self.accumulate, Accumulate::Saturating)
    }

    /// Number of narrow elements in each of `left` and `right`.
    #[inline]
    pub const fn source_lanes(self) -> usize {
        self.width.accumulator_lanes() * self.source.group_size()
    }

    /// Instruction mnemonic, e.g. `vpdpbusds`.
    pub const fn mnemonic(self) -> &'static str {
        match (self.source, self.accumulate) {
            (SourceElement::Byte, Accumulate::Wrapping) => "vpdpbusd",
            (SourceElement::Byte, Accumulate::Saturating) => "vpdpbusds",
            (SourceElement::Word, Accumulate::Wrapping) => "vpdpwssd",
            (SourceElement::Word, Accumulate::Saturating) => "vpdpwssds",
        }
    }

    /// C intrinsic name, e.g. `_mm256_dpwssd_epi32`.
    pub const fn intrinsic(self) -> &'static str {
        match (self.width, self.source, self.accumulate) {
            (Width::W128, SourceElement::Byte, Accumulate::Wrapping) => "_mm_dpbusd_epi32",
            (Width::W128, SourceElement::Byte, Accumulate::Saturating) => "_mm_dpbusds_epi32",
            (Width::W128, SourceElement::Word, Accumulate::Wrapping) => "_mm_dpwssd_epi32",
            (Width::W128, SourceElement::Word, Accumulate::Saturating) => "_mm_dpwssds_epi32",
            (Width::W256, SourceElement::Byte, Accumulate::Wrapping) => "_mm256_dpbusd_epi32",
            (Width::W256, SourceElement::Byte, Accumulate::Saturating) => "_mm256_dpbusds_epi32",
            (Width::W256, SourceElement::Word, Accumulate::Wrapping) => "_mm256_dpwssd_epi32",
            (Width::W256, SourceElement::Word, Accumulate::Saturating) => "_mm256_dpwssds_epi32",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mnemonic(), self.width.register())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_operations_are_distinct() {
        let unique: HashSet<_> = Operation::ALL.iter().copied().collect();
        assert_eq!(unique.len(), 8);

        let intrinsics: HashSet<_> = Operation::ALL.iter().map(|op| op.intrinsic()).collect();
        assert_eq!(intrinsics.len(), 8);
    }

    #[test]
    fn test_display() {
        let op = Operation::new(Width::W128, SourceElement::Byte, Accumulate::Wrapping);
        assert_eq!(op.to_string(), "vpdpbusd xmm");

        let op = Operation::new(Width::W256, SourceElement::Word, Accumulate::Saturating);
        assert_eq!(op.to_string(), "vpdpwssds ymm");
        assert_eq!(op.intrinsic(), "_mm256_dpwssds_epi32");
        assert!(op.is_saturating());
    }

    #[test]
    fn test_lane_counts() {
        for op in Operation::ALL {
            let expected = match (op.width, op.source) {
                (Width::W128, SourceElement::Byte) => 16,
                (Width::W128, SourceElement::Word) => 8,
                (Width::W256, SourceElement::Byte) => 32,
                (Width::W256, SourceElement::Word) => 16,
            };
            assert_eq!(op.source_lanes(), expected, "{op}");
        }
        assert_eq!(Width::W256.accumulator_lanes(), 8);
    }
}
