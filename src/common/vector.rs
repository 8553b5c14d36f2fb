//! Fixed-width lane vectors.
//!
//! [`Vector`] is an immutable array of `N` lanes. The eight concrete shapes used
//! by the widening multiply-add family are exposed as aliases: four 128-bit
//! shapes and four 256-bit shapes. Lane 0 is the lowest-addressed element, so
//! [`Vector::as_bytes`] matches the in-register layout on little-endian x86.
//!
//! # Examples
//!
//! ```rust
//! use vnni_core::{I32x4, U8x16};
//!
//! let acc = I32x4::splat(7);
//! assert_eq!(acc.lane(3), 7);
//!
//! let bytes = U8x16::from_array([1; 16]);
//! assert_eq!(bytes.as_bytes().len(), 16);
//! ```

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Index;

use zerocopy::{FromBytes, Immutable, IntoBytes};

use super::error::{Error, Result};

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
}

/// Element types a [`Vector`] lane may hold.
pub trait Lane:
    sealed::Sealed
    + Copy
    + Default
    + Eq
    + Hash
    + Debug
    + Send
    + Sync
    + FromBytes
    + IntoBytes
    + Immutable
    + 'static
{
}

impl Lane for u8 {}
impl Lane for i8 {}
impl Lane for i16 {}
impl Lane for i32 {}

/// An immutable vector of `N` lanes of type `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Vector<E, const N: usize>([E; N]);

/// Four `i32` lanes (128 bits).
pub type I32x4 = Vector<i32, 4>;
/// Sixteen `u8` lanes (128 bits).
pub type U8x16 = Vector<u8, 16>;
/// Sixteen `i8` lanes (128 bits).
pub type I8x16 = Vector<i8, 16>;
/// Eight `i16` lanes (128 bits).
pub type I16x8 = Vector<i16, 8>;
/// Eight `i32` lanes (256 bits).
pub type I32x8 = Vector<i32, 8>;
/// Thirty-two `u8` lanes (256 bits).
pub type U8x32 = Vector<u8, 32>;
/// Thirty-two `i8` lanes (256 bits).
pub type I8x32 = Vector<i8, 32>;
/// Sixteen `i16` lanes (256 bits).
pub type I16x16 = Vector<i16, 16>;

impl<E: Lane, const N: usize> Vector<E, N> {
    /// Number of lanes.
    pub const LANES: usize = N;

    /// Width of the vector in bits.
    pub const BITS: usize = N * std::mem::size_of::<E>() * 8;

    const BYTES: usize = N * std::mem::size_of::<E>();

    /// Build a vector from its lanes, lane 0 first.
    #[inline]
    pub const fn from_array(lanes: [E; N]) -> Self {
        Self(lanes)
    }

    /// Build a vector with every lane set to `value`.
    #[inline]
    pub fn splat(value: E) -> Self {
        Self([value; N])
    }

    /// Build a vector from its little-endian in-memory representation.
    ///
    /// Fails with [`Error::LengthMismatch`] unless `bytes` is exactly
    /// `BITS / 8` bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        <[E; N]>::read_from_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::LengthMismatch {
                expected: Self::BYTES,
                actual: bytes.len(),
            })
    }

    /// Lane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn lane(&self, index: usize) -> E {
        self.0[index]
    }

    /// Lane `index`, or `None` when out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<E> {
        self.0.get(index).copied()
    }

    /// Copy of this vector with lane `index` replaced by `value`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn with_lane(mut self, index: usize, value: E) -> Self {
        self.0[index] = value;
        self
    }

    #[inline]
    pub const fn as_array(&self) -> &[E; N] {
        &self.0
    }

    #[inline]
    pub const fn to_array(self) -> [E; N] {
        self.0
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = E> + '_ {
        self.0.iter().copied()
    }

    /// In-memory representation, lane 0 at the lowest address.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const E {
        self.0.as_ptr()
    }
}

impl<E: Lane, const N: usize> Default for Vector<E, N> {
    fn default() -> Self {
        Self([E::default(); N])
    }
}

impl<E: Lane, const N: usize> From<[E; N]> for Vector<E, N> {
    fn from(lanes: [E; N]) -> Self {
        Self(lanes)
    }
}

impl<E: Lane, const N: usize> From<Vector<E, N>> for [E; N] {
    fn from(vector: Vector<E, N>) -> Self {
        vector.0
    }
}

impl<E: Lane, const N: usize> Index<usize> for Vector<E, N> {
    type Output = E;

    #[inline]
    fn index(&self, index: usize) -> &E {
        &self.0[index]
    }
}

macro_rules! impl_halves {
    ($wide:ty, $narrow:ty, $half:literal) => {
        impl $wide {
            /// Split into the low half (lanes `0..N/2`) and the high half.
            #[inline]
            pub fn split_halves(self) -> ($narrow, $narrow) {
                let mut lo = <$narrow>::default().0;
                let mut hi = <$narrow>::default().0;
                lo.copy_from_slice(&self.0[..$half]);
                hi.copy_from_slice(&self.0[$half..]);
                (Vector(lo), Vector(hi))
            }

            /// Rebuild a vector from the halves produced by `split_halves`.
            #[inline]
            pub fn join_halves(lo: $narrow, hi: $narrow) -> Self {
                let mut lanes = <$wide>::default().0;
                lanes[..$half].copy_from_slice(&lo.0);
                lanes[$half..].copy_from_slice(&hi.0);
                Vector(lanes)
            }
        }
    };
}

impl_halves!(I32x8, I32x4, 4);
impl_halves!(U8x32, U8x16, 16);
impl_halves!(I8x32, I8x16, 16);
impl_halves!(I16x16, I16x8, 8);
