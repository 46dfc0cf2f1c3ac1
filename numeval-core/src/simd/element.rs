//! Element types and their per-kind pack mapping.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

use super::{ArrayPack, Avx, Lanes, Pack, ScalarPack, SimdKind, Sse};

/// Scalar type that can be stored in a matrix and evaluated by kernels.
pub trait Element:
    Copy
    + Default
    + Debug
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    const NAME: &'static str;

    /// `self < other ? self : other`. For floats this returns `other` when
    /// either side is NaN, which is what the SIMD `min` instructions do.
    #[inline(always)]
    fn min_of(self, other: Self) -> Self {
        if self < other {
            self
        } else {
            other
        }
    }

    /// `self > other ? self : other`.
    #[inline(always)]
    fn max_of(self, other: Self) -> Self {
        if self > other {
            self
        } else {
            other
        }
    }
}

macro_rules! impl_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                const NAME: &'static str = stringify!($t);
            }
        )*
    };
}

impl_element!(f32, f64, i32, i64, u32, u64);

/// Maps an element type to its pack for kind `K`.
///
/// Element types with no real pack for a kind (integers, or any type when the
/// kind is not enabled in this build) map to [`ScalarPack`], which the
/// dispatcher treats as "not vectorizable".
pub trait SimdElement<K: SimdKind>: Element {
    type Pack: Pack<Elem = Self>;
}

macro_rules! impl_scalar_only {
    ($kind:ty: $($t:ty),*) => {
        $(
            impl SimdElement<$kind> for $t {
                type Pack = ScalarPack<$t>;
            }
        )*
    };
}

#[cfg(numeval_sse)]
impl SimdElement<Sse> for f32 {
    type Pack = super::sse::F32x4;
}

#[cfg(numeval_sse)]
impl SimdElement<Sse> for f64 {
    type Pack = super::sse::F64x2;
}

#[cfg(not(numeval_sse))]
impl_scalar_only!(Sse: f32, f64);

impl_scalar_only!(Sse: i32, i64, u32, u64);

#[cfg(numeval_avx)]
impl SimdElement<Avx> for f32 {
    type Pack = super::avx::F32x8;
}

#[cfg(numeval_avx)]
impl SimdElement<Avx> for f64 {
    type Pack = super::avx::F64x4;
}

#[cfg(not(numeval_avx))]
impl_scalar_only!(Avx: f32, f64);

impl_scalar_only!(Avx: i32, i64, u32, u64);

macro_rules! impl_lanes {
    ($($w:literal),*) => {
        $(
            impl<T: Element> SimdElement<Lanes<$w>> for T {
                type Pack = ArrayPack<T, $w>;
            }
        )*
    };
}

impl_lanes!(2, 4, 8, 16);
