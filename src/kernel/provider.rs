//! Execution providers and operand shapes.
//!
//! A [`Provider`] computes the widening multiply-add arithmetic, either with the
//! instructions themselves or in portable code. [`WideningOperands`] ties each
//! left-operand shape to its right-operand and accumulator shapes so that lane
//! counts always agree.

use super::operation::{Accumulate, Operation, SourceElement, Width};
use crate::common::vector::{I8x16, I8x32, I16x8, I16x16, I32x4, I32x8, U8x16, U8x32};

/// Implementation of the widening multiply-add arithmetic.
///
/// Every implementation must produce bit-identical results to
/// [`ReferenceProvider`](super::ReferenceProvider);
/// [`conformance::verify`](super::conformance::verify) checks this.
pub trait Provider: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// `u8 x i8` groups of four, 128-bit.
    fn dpbusd_128(&self, addend: I32x4, left: U8x16, right: I8x16, mode: Accumulate) -> I32x4;

    /// `i16 x i16` groups of two, 128-bit.
    fn dpwssd_128(&self, addend: I32x4, left: I16x8, right: I16x8, mode: Accumulate) -> I32x4;

    /// `u8 x i8` groups of four, 256-bit.
    fn dpbusd_256(&self, addend: I32x8, left: U8x32, right: I8x32, mode: Accumulate) -> I32x8;

    /// `i16 x i16` groups of two, 256-bit.
    fn dpwssd_256(&self, addend: I32x8, left: I16x16, right: I16x16, mode: Accumulate)
    -> I32x8;
}

mod sealed {
    pub trait Sealed {}
}

/// Left-operand shape of a widening multiply-add.
///
/// Implemented for [`U8x16`], [`I16x8`], [`U8x32`] and [`I16x16`].
pub trait WideningOperands: Copy + sealed::Sealed {
    /// Shape of the right operand.
    type Right: Copy;
    /// Shape of the addend and of the result.
    type Accumulator: Copy;

    const WIDTH: Width;
    const SOURCE: SourceElement;

    /// The operation these operands select under `mode`.
    #[inline]
    fn operation(mode: Accumulate) -> Operation {
        Operation::new(Self::WIDTH, Self::SOURCE, mode)
    }

    #[doc(hidden)]
    fn apply(
        provider: &dyn Provider,
        addend: Self::Accumulator,
        left: Self,
        right: Self::Right,
        mode: Accumulate,
    ) -> Self::Accumulator;
}

macro_rules! impl_widening_operands {
    ($left:ty, $right:ty, $acc:ty, $width:expr, $source:expr, $method:ident) => {
        impl sealed::Sealed for $left {}

        impl WideningOperands for $left {
            type Right = $right;
            type Accumulator = $acc;

            const WIDTH: Width = $width;
            const SOURCE: SourceElement = $source;

            #[inline]
            fn apply(
                provider: &dyn Provider,
                addend: $acc,
                left: Self,
                right: $right,
                mode: Accumulate,
            ) -> $acc {
                provider.$method(addend, left, right, mode)
            }
        }
    };
}

impl_widening_operands!(U8x16, I8x16, I32x4, Width::W128, SourceElement::Byte, dpbusd_128);
impl_widening_operands!(I16x8, I16x8, I32x4, Width::W128, SourceElement::Word, dpwssd_128);
impl_widening_operands!(U8x32, I8x32, I32x8, Width::W256, SourceElement::Byte, dpbusd_256);
impl_widening_operands!(I16x16, I16x16, I32x8, Width::W256, SourceElement::Word, dpwssd_256);
