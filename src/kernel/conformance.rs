//! Checking a provider against the reference arithmetic.
//!
//! A substitute execution provider must agree with [`ReferenceProvider`] on
//! every lane of every operation. [`verify`] runs all eight operations over a
//! set of [`Sample`]s and reports the first divergence as
//! [`Error::Mismatch`].
//!
//! ```rust
//! use vnni_core::kernel::ReferenceProvider;
//! use vnni_core::kernel::conformance::{verify, Sample};
//!
//! verify(&ReferenceProvider, &Sample::edge_cases()).unwrap();
//! ```

use super::operation::{Operation, SourceElement, Width};
use super::provider::Provider;
use super::reference::ReferenceProvider;
use crate::common::error::{Error, Result};
use crate::common::vector::{I8x32, I16x16, I32x4, I32x8, U8x32};

/// Inputs for one conformance round.
///
/// 256-bit operations use the full vectors; 128-bit operations run once on
/// each half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub addend: I32x8,
    pub bytes_left: U8x32,
    pub bytes_right: I8x32,
    pub words_left: I16x16,
    pub words_right: I16x16,
}

impl Sample {
    /// Build a sample with every lane of each vector set to one value.
    pub fn splat(
        addend: i32,
        byte_left: u8,
        byte_right: i8,
        word_left: i16,
        word_right: i16,
    ) -> Self {
        Self {
            addend: I32x8::splat(addend),
            bytes_left: U8x32::splat(byte_left),
            bytes_right: I8x32::splat(byte_right),
            words_left: I16x16::splat(word_left),
            words_right: I16x16::splat(word_right),
        }
    }

    /// Deterministic samples around the overflow and saturation boundaries.
    pub fn edge_cases() -> Vec<Sample> {
        let mut samples = vec![
            Self::splat(0, 0, 0, 0, 0),
            // largest positive group sums
            Self::splat(i32::MAX, u8::MAX, i8::MAX, i16::MAX, i16::MAX),
            Self::splat(i32::MAX, u8::MAX, i8::MAX, i16::MIN, i16::MIN),
            // largest negative group sums
            Self::splat(i32::MIN, u8::MAX, i8::MIN, i16::MIN, i16::MAX),
            // word sum of exactly 2^31
            Self::splat(0, 1, 1, i16::MIN, i16::MIN),
            Self::splat(-1, 1, -1, i16::MIN, i16::MIN),
            Self::splat(i32::MIN, u8::MAX, i8::MIN, i16::MIN, i16::MIN),
            // just inside the boundary
            Self::splat(i32::MAX - 4 * 255 * 127, u8::MAX, i8::MAX, 1, 1),
            Self::splat(i32::MIN + 4 * 255 * 128, u8::MAX, i8::MIN, -1, 1),
        ];

        // mixed signs and magnitudes in every lane
        samples.push(Self {
            addend: I32x8::from_array([
                i32::MAX,
                i32::MIN,
                -1,
                1,
                0,
                i32::MAX - 1,
                i32::MIN + 1,
                0x1234_5678,
            ]),
            bytes_left: U8x32::from_array(std::array::from_fn(|i| (i as u8).wrapping_mul(37))),
            bytes_right: I8x32::from_array(std::array::from_fn(|i| {
                (i as i8).wrapping_mul(-59).wrapping_add(3)
            })),
            words_left: I16x16::from_array(std::array::from_fn(|i| {
                (i as i16).wrapping_mul(4099).wrapping_sub(i16::MAX)
            })),
            words_right: I16x16::from_array(std::array::from_fn(|i| {
                if i % 3 == 0 { i16::MIN } else { (i as i16).wrapping_mul(-2311) }
            })),
        });

        samples
    }
}

/// Compare `provider` with the reference on every operation and sample.
pub fn verify(provider: &dyn Provider, samples: &[Sample]) -> Result<()> {
    for sample in samples {
        for operation in Operation::ALL {
            let (expected, actual) = run(provider, operation, sample);
            compare(operation, &expected, &actual)?;
        }
    }
    Ok(())
}

fn run(provider: &dyn Provider, operation: Operation, sample: &Sample) -> (Vec<i32>, Vec<i32>) {
    let reference = ReferenceProvider;
    let mode = operation.accumulate;

    match (operation.width, operation.source) {
        (Width::W256, SourceElement::Byte) => {
            let args = (sample.addend, sample.bytes_left, sample.bytes_right);
            (
                reference.dpbusd_256(args.0, args.1, args.2, mode).iter().collect(),
                provider.dpbusd_256(args.0, args.1, args.2, mode).iter().collect(),
            )
        },
        (Width::W256, SourceElement::Word) => {
            let args = (sample.addend, sample.words_left, sample.words_right);
            (
                reference.dpwssd_256(args.0, args.1, args.2, mode).iter().collect(),
                provider.dpwssd_256(args.0, args.1, args.2, mode).iter().collect(),
            )
        },
        (Width::W128, SourceElement::Byte) => {
            let (acc_lo, acc_hi) = sample.addend.split_halves();
            let (left_lo, left_hi) = sample.bytes_left.split_halves();
            let (right_lo, right_hi) = sample.bytes_right.split_halves();
            let halves = [(acc_lo, left_lo, right_lo), (acc_hi, left_hi, right_hi)];
            collect_halves(&halves, |p, (a, l, r)| p.dpbusd_128(a, l, r, mode), provider)
        },
        (Width::W128, SourceElement::Word) => {
            let (acc_lo, acc_hi) = sample.addend.split_halves();
            let (left_lo, left_hi) = sample.words_left.split_halves();
            let (right_lo, right_hi) = sample.words_right.split_halves();
            let halves = [(acc_lo, left_lo, right_lo), (acc_hi, left_hi, right_hi)];
            collect_halves(&halves, |p, (a, l, r)| p.dpwssd_128(a, l, r, mode), provider)
        },
    }
}

fn collect_halves<A: Copy>(
    halves: &[A; 2],
    apply: impl Fn(&dyn Provider, A) -> I32x4,
    provider: &dyn Provider,
) -> (Vec<i32>, Vec<i32>) {
    let mut expected = Vec::with_capacity(8);
    let mut actual = Vec::with_capacity(8);
    for &half in halves {
        expected.extend(apply(&ReferenceProvider, half).iter());
        actual.extend(apply(provider, half).iter());
    }
    (expected, actual)
}

fn compare(operation: Operation, expected: &[i32], actual: &[i32]) -> Result<()> {
    match expected.iter().zip(actual).position(|(e, a)| e != a) {
        Some(lane) => Err(Error::Mismatch {
            operation,
            lane,
            expected: expected[lane],
            actual: actual[lane],
        }),
        None => Ok(()),
    }
}
