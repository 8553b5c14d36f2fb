//! Signed 32-bit saturation.
//!
//! The saturating kernels accumulate a group of products exactly and clamp once
//! at the end. [`saturate_i32`] is that clamp; [`saturating_add_i32`] is the
//! two-operand form.

/// Clamp an exact 64-bit value into `[i32::MIN, i32::MAX]`.
#[inline]
pub const fn saturate_i32(wide: i64) -> i32 {
    if wide > i32::MAX as i64 {
        i32::MAX
    } else if wide < i32::MIN as i64 {
        i32::MIN
    } else {
        wide as i32
    }
}

/// Add two `i32` values, clamping to `i32::MAX` on positive overflow and to
/// `i32::MIN` on negative overflow.
#[inline]
pub const fn saturating_add_i32(a: i32, b: i32) -> i32 {
    saturate_i32(a as i64 + b as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_saturation_boundary() {
        assert_eq!(saturating_add_i32(i32::MAX, 1), i32::MAX);
        assert_eq!(saturating_add_i32(i32::MIN, -1), i32::MIN);
        assert_eq!(saturating_add_i32(i32::MAX, i32::MAX), i32::MAX);
        assert_eq!(saturating_add_i32(i32::MIN, i32::MIN), i32::MIN);
        assert_eq!(saturating_add_i32(i32::MAX, i32::MIN), -1);
        assert_eq!(saturating_add_i32(-5, 3), -2);
    }

    #[test]
    fn test_saturate_wide() {
        assert_eq!(saturate_i32(1 << 31), i32::MAX);
        assert_eq!(saturate_i32(-(1 << 31)), i32::MIN);
        assert_eq!(saturate_i32(-(1 << 31) - 1), i32::MIN);
        assert_eq!(saturate_i32(i64::MAX), i32::MAX);
        assert_eq!(saturate_i32(12345), 12345);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_zero_is_identity(x in any::<i32>()) {
            prop_assert_eq!(saturating_add_i32(x, 0), x);
        }

        #[test]
        fn prop_matches_std_saturating_add(a in any::<i32>(), b in any::<i32>()) {
            prop_assert_eq!(saturating_add_i32(a, b), a.saturating_add(b));
        }
    }
}
