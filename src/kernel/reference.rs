//! Portable reference arithmetic.
//!
//! Plain-Rust rendition of the widening multiply-add formulas. Each accumulator
//! lane `i` reads its own group of narrow elements and nothing else:
//!
//! ```text
//! byte:  result[i] = addend[i] + Σ(k=0..4) u8(left[4i+k]) * i8(right[4i+k])
//! word:  result[i] = addend[i] + Σ(k=0..2) i16(left[2i+k]) * i16(right[2i+k])
//! ```
//!
//! Products are exact in 32 bits. The group sum is exact as well; only the
//! final addition with the addend wraps or saturates. The 256-bit forms apply
//! the 128-bit formula to each half independently.
//!
//! This provider is not used behind the capability gate. Callers that want a
//! portable path pick it explicitly, for example through
//! [`select_provider`](super::select_provider).

use super::operation::Accumulate;
use super::provider::Provider;
use crate::common::saturate::{saturate_i32, saturating_add_i32};
use crate::common::vector::{I8x16, I8x32, I16x8, I16x16, I32x4, I32x8, U8x16, U8x32};

/// Portable provider computing the exact formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceProvider;

/// One byte-lane group: four `u8 x i8` products added to `addend`.
#[inline]
pub fn dpbusd_lane(addend: i32, left: [u8; 4], right: [i8; 4], mode: Accumulate) -> i32 {
    // |sum| <= 4 * 255 * 128, no overflow
    let sum: i32 = left
        .iter()
        .zip(right.iter())
        .map(|(&l, &r)| i32::from(l) * i32::from(r))
        .sum();

    match mode {
        Accumulate::Wrapping => addend.wrapping_add(sum),
        Accumulate::Saturating => saturating_add_i32(addend, sum),
    }
}

/// One word-lane group: two `i16 x i16` products added to `addend`.
#[inline]
pub fn dpwssd_lane(addend: i32, left: [i16; 2], right: [i16; 2], mode: Accumulate) -> i32 {
    // Two products of i16::MIN * i16::MIN reach 2^31, one past i32::MAX
    let sum: i64 = left
        .iter()
        .zip(right.iter())
        .map(|(&l, &r)| i64::from(i32::from(l) * i32::from(r)))
        .sum();

    match mode {
        Accumulate::Wrapping => addend.wrapping_add(sum as i32),
        Accumulate::Saturating => saturate_i32(i64::from(addend) + sum),
    }
}

impl Provider for ReferenceProvider {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn dpbusd_128(&self, addend: I32x4, left: U8x16, right: I8x16, mode: Accumulate) -> I32x4 {
        let mut out = addend.to_array();
        for (i, acc) in out.iter_mut().enumerate() {
            let base = 4 * i;
            let l = [left[base], left[base + 1], left[base + 2], left[base + 3]];
            let r = [right[base], right[base + 1], right[base + 2], right[base + 3]];
            *acc = dpbusd_lane(*acc, l, r, mode);
        }
        I32x4::from_array(out)
    }

    fn dpwssd_128(&self, addend: I32x4, left: I16x8, right: I16x8, mode: Accumulate) -> I32x4 {
        let mut out = addend.to_array();
        for (i, acc) in out.iter_mut().enumerate() {
            let base = 2 * i;
            *acc = dpwssd_lane(
                *acc,
                [left[base], left[base + 1]],
                [right[base], right[base + 1]],
                mode,
            );
        }
        I32x4::from_array(out)
    }

    fn dpbusd_256(&self, addend: I32x8, left: U8x32, right: I8x32, mode: Accumulate) -> I32x8 {
        let (acc_lo, acc_hi) = addend.split_halves();
        let (left_lo, left_hi) = left.split_halves();
        let (right_lo, right_hi) = right.split_halves();
        I32x8::join_halves(
            self.dpbusd_128(acc_lo, left_lo, right_lo, mode),
            self.dpbusd_128(acc_hi, left_hi, right_hi, mode),
        )
    }

    fn dpwssd_256(
        &self,
        addend: I32x8,
        left: I16x16,
        right: I16x16,
        mode: Accumulate,
    ) -> I32x8 {
        let (acc_lo, acc_hi) = addend.split_halves();
        let (left_lo, left_hi) = left.split_halves();
        let (right_lo, right_hi) = right.split_halves();
        I32x8::join_halves(
            self.dpwssd_128(acc_lo, left_lo, right_lo, mode),
            self.dpwssd_128(acc_hi, left_hi, right_hi, mode),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::kernel::Accumulate::{Saturating, Wrapping};

    fn ramp_u8<const N: usize>(start: u8) -> [u8; N] {
        std::array::from_fn(|i| start.wrapping_add(i as u8))
    }

    #[test]
    fn test_byte_grouping() {
        let left = U8x16::from_array(ramp_u8(1));
        let right = I8x16::splat(1);
        let out = ReferenceProvider.dpbusd_128(I32x4::default(), left, right, Wrapping);
        assert_eq!(out.lane(0), 1 + 2 + 3 + 4);
        assert_eq!(out.lane(1), 5 + 6 + 7 + 8);
        assert_eq!(out.lane(3), 13 + 14 + 15 + 16);
    }

    #[test]
    fn test_word_grouping() {
        let addend = I32x4::from_array([5, 0, 0, 0]);
        let left = I16x8::from_array([3, 4, 0, 0, 0, 0, 0, 0]);
        let right = I16x8::splat(2);
        let out = ReferenceProvider.dpwssd_128(addend, left, right, Wrapping);
        assert_eq!(out.to_array(), [19, 0, 0, 0]);
    }

    #[test]
    fn test_byte_operands_are_unsigned_times_signed() {
        // 255 is unsigned on the left, -1 is signed on the right
        let got = dpbusd_lane(0, [255, 0, 0, 0], [-1, 0, 0, 0], Wrapping);
        assert_eq!(got, -255);

        let got = dpbusd_lane(0, [255; 4], [-128; 4], Wrapping);
        assert_eq!(got, -4 * 255 * 128);

        let got = dpbusd_lane(0, [255; 4], [127; 4], Wrapping);
        assert_eq!(got, 4 * 255 * 127);
    }

    #[test]
    fn test_wraparound_law() {
        let sum = 4 * 255 * 127;
        let expected = ((i32::MAX as i64 + sum as i64) as u32) as i32;
        assert!(expected < 0);
        assert_eq!(dpbusd_lane(i32::MAX, [255; 4], [127; 4], Wrapping), expected);
        assert_eq!(dpbusd_lane(i32::MAX, [255; 4], [127; 4], Saturating), i32::MAX);
        assert_eq!(dpbusd_lane(i32::MIN, [255; 4], [-128; 4], Saturating), i32::MIN);
    }

    #[test]
    fn test_word_sum_exceeding_i32() {
        let min = [i16::MIN; 2];
        // sum = 2^31
        assert_eq!(dpwssd_lane(0, min, min, Wrapping), i32::MIN);
        assert_eq!(dpwssd_lane(0, min, min, Saturating), i32::MAX);
        assert_eq!(dpwssd_lane(-1, min, min, Saturating), i32::MAX);
        assert_eq!(dpwssd_lane(-2, min, min, Saturating), i32::MAX - 1);
        assert_eq!(dpwssd_lane(i32::MIN, min, min, Saturating), 0);
        assert_eq!(dpwssd_lane(i32::MIN, min, min, Wrapping), 0);
    }

    #[test]
    fn test_256_matches_halves() {
        let addend = I32x8::from_array([1, -2, 3, -4, 5, -6, 7, i32::MAX]);
        let left = U8x32::from_array(ramp_u8(200));
        let right = I8x32::from_array(std::array::from_fn(|i| (i as i8).wrapping_mul(-7)));
        let wide = ReferenceProvider.dpbusd_256(addend, left, right, Saturating);

        let (a_lo, a_hi) = addend.split_halves();
        let (l_lo, l_hi) = left.split_halves();
        let (r_lo, r_hi) = right.split_halves();
        assert_eq!(
            wide.split_halves(),
            (
                ReferenceProvider.dpbusd_128(a_lo, l_lo, r_lo, Saturating),
                ReferenceProvider.dpbusd_128(a_hi, l_hi, r_hi, Saturating),
            )
        );
    }
}
