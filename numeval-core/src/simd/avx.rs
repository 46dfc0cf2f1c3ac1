//! AVX packs (256-bit): f32x8, f64x4.
//!
//! Horizontal reductions fold the high 128-bit half onto the low half and
//! finish with the SSE reduction, so the lane order is the same halving tree
//! as every other pack.

#![allow(unused_unsafe)]

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Sub};

use super::sse::{hmax_pd, hmax_ps, hmin_pd, hmin_ps, hsum_pd, hsum_ps};
use super::{Pack, PackMask};

macro_rules! avx_mask_ops {
    ($mask:ident, $and:ident, $or:ident, $xor:ident, $ones:expr) => {
        impl BitAnd for $mask {
            type Output = Self;
            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                $mask(unsafe { $and(self.0, rhs.0) })
            }
        }

        impl BitOr for $mask {
            type Output = Self;
            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                $mask(unsafe { $or(self.0, rhs.0) })
            }
        }

        impl BitXor for $mask {
            type Output = Self;
            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                $mask(unsafe { $xor(self.0, rhs.0) })
            }
        }

        impl Not for $mask {
            type Output = Self;
            #[inline(always)]
            fn not(self) -> Self {
                $mask(unsafe { $xor(self.0, $ones) })
            }
        }
    };
}

macro_rules! avx_arith {
    ($pack:ident, $add:ident, $sub:ident, $mul:ident, $div:ident) => {
        impl Add for $pack {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                $pack(unsafe { $add(self.0, rhs.0) })
            }
        }

        impl Sub for $pack {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                $pack(unsafe { $sub(self.0, rhs.0) })
            }
        }

        impl Mul for $pack {
            type Output = Self;
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                $pack(unsafe { $mul(self.0, rhs.0) })
            }
        }

        impl Div for $pack {
            type Output = Self;
            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                $pack(unsafe { $div(self.0, rhs.0) })
            }
        }
    };
}

// ============================================================================
// f32x8
// ============================================================================

/// Eight-lane f32 comparison mask.
#[derive(Clone, Copy)]
pub struct F32x8Mask(__m256);

/// Eight f32 lanes in an `__m256`.
#[derive(Clone, Copy)]
pub struct F32x8(pub __m256);

impl F32x8 {
    #[inline(always)]
    pub fn to_array(self) -> [f32; 8] {
        let mut out = [0.0f32; 8];
        unsafe { _mm256_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    fn halves(self) -> (__m128, __m128) {
        unsafe { (_mm256_castps256_ps128(self.0), _mm256_extractf128_ps(self.0, 1)) }
    }
}

impl fmt::Debug for F32x8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F32x8").field(&self.to_array()).finish()
    }
}

impl fmt::Debug for F32x8Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F32x8Mask({:08b})", self.bitmask())
    }
}

avx_mask_ops!(
    F32x8Mask,
    _mm256_and_ps,
    _mm256_or_ps,
    _mm256_xor_ps,
    _mm256_castsi256_ps(_mm256_set1_epi32(-1))
);

impl PackMask for F32x8Mask {
    const WIDTH: usize = 8;

    #[inline(always)]
    fn bitmask(self) -> u32 {
        unsafe { _mm256_movemask_ps(self.0) as u32 }
    }
}

avx_arith!(F32x8, _mm256_add_ps, _mm256_sub_ps, _mm256_mul_ps, _mm256_div_ps);

impl Pack for F32x8 {
    type Elem = f32;
    type Mask = F32x8Mask;

    const WIDTH: usize = 8;
    const ALIGN: usize = 32;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        F32x8(unsafe { _mm256_set1_ps(value) })
    }

    #[inline(always)]
    fn from_fn<F: FnMut(usize) -> f32>(f: F) -> Self {
        let lanes: [f32; 8] = std::array::from_fn(f);
        F32x8(unsafe { _mm256_loadu_ps(lanes.as_ptr()) })
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        F32x8(_mm256_loadu_ps(ptr))
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        F32x8(_mm256_load_ps(ptr))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        _mm256_storeu_ps(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        _mm256_store_ps(ptr, self.0)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        F32x8(unsafe { _mm256_min_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        F32x8(unsafe { _mm256_max_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> F32x8Mask {
        F32x8Mask(unsafe { _mm256_cmp_ps(self.0, other.0, _CMP_LT_OQ) })
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> F32x8Mask {
        F32x8Mask(unsafe { _mm256_cmp_ps(self.0, other.0, _CMP_LE_OQ) })
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> F32x8Mask {
        F32x8Mask(unsafe { _mm256_cmp_ps(self.0, other.0, _CMP_GT_OQ) })
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> F32x8Mask {
        F32x8Mask(unsafe { _mm256_cmp_ps(self.0, other.0, _CMP_GE_OQ) })
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> F32x8Mask {
        F32x8Mask(unsafe { _mm256_cmp_ps(self.0, other.0, _CMP_EQ_OQ) })
    }

    #[inline(always)]
    fn cmp_ne(self, other: Self) -> F32x8Mask {
        F32x8Mask(unsafe { _mm256_cmp_ps(self.0, other.0, _CMP_NEQ_UQ) })
    }

    #[inline(always)]
    fn select(mask: F32x8Mask, a: Self, b: Self) -> Self {
        F32x8(unsafe { _mm256_blendv_ps(b.0, a.0, mask.0) })
    }

    #[inline(always)]
    fn reduce_sum(self) -> f32 {
        let (lo, hi) = self.halves();
        hsum_ps(unsafe { _mm_add_ps(lo, hi) })
    }

    #[inline(always)]
    fn reduce_min(self) -> f32 {
        let (lo, hi) = self.halves();
        hmin_ps(unsafe { _mm_min_ps(lo, hi) })
    }

    #[inline(always)]
    fn reduce_max(self) -> f32 {
        let (lo, hi) = self.halves();
        hmax_ps(unsafe { _mm_max_ps(lo, hi) })
    }
}

// ============================================================================
// f64x4
// ============================================================================

/// Four-lane f64 comparison mask.
#[derive(Clone, Copy)]
pub struct F64x4Mask(__m256d);

/// Four f64 lanes in an `__m256d`.
#[derive(Clone, Copy)]
pub struct F64x4(pub __m256d);

impl F64x4 {
    #[inline(always)]
    pub fn to_array(self) -> [f64; 4] {
        let mut out = [0.0f64; 4];
        unsafe { _mm256_storeu_pd(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    fn halves(self) -> (__m128d, __m128d) {
        unsafe { (_mm256_castpd256_pd128(self.0), _mm256_extractf128_pd(self.0, 1)) }
    }
}

impl fmt::Debug for F64x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F64x4").field(&self.to_array()).finish()
    }
}

impl fmt::Debug for F64x4Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F64x4Mask({:04b})", self.bitmask())
    }
}

avx_mask_ops!(
    F64x4Mask,
    _mm256_and_pd,
    _mm256_or_pd,
    _mm256_xor_pd,
    _mm256_castsi256_pd(_mm256_set1_epi32(-1))
);

impl PackMask for F64x4Mask {
    const WIDTH: usize = 4;

    #[inline(always)]
    fn bitmask(self) -> u32 {
        unsafe { _mm256_movemask_pd(self.0) as u32 }
    }
}

avx_arith!(F64x4, _mm256_add_pd, _mm256_sub_pd, _mm256_mul_pd, _mm256_div_pd);

impl Pack for F64x4 {
    type Elem = f64;
    type Mask = F64x4Mask;

    const WIDTH: usize = 4;
    const ALIGN: usize = 32;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        F64x4(unsafe { _mm256_set1_pd(value) })
    }

    #[inline(always)]
    fn from_fn<F: FnMut(usize) -> f64>(f: F) -> Self {
        let lanes: [f64; 4] = std::array::from_fn(f);
        F64x4(unsafe { _mm256_loadu_pd(lanes.as_ptr()) })
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f64 {
        self.to_array()[lane]
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        F64x4(_mm256_loadu_pd(ptr))
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        F64x4(_mm256_load_pd(ptr))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        _mm256_storeu_pd(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f64) {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        _mm256_store_pd(ptr, self.0)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        F64x4(unsafe { _mm256_min_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        F64x4(unsafe { _mm256_max_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> F64x4Mask {
        F64x4Mask(unsafe { _mm256_cmp_pd(self.0, other.0, _CMP_LT_OQ) })
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> F64x4Mask {
        F64x4Mask(unsafe { _mm256_cmp_pd(self.0, other.0, _CMP_LE_OQ) })
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> F64x4Mask {
        F64x4Mask(unsafe { _mm256_cmp_pd(self.0, other.0, _CMP_GT_OQ) })
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> F64x4Mask {
        F64x4Mask(unsafe { _mm256_cmp_pd(self.0, other.0, _CMP_GE_OQ) })
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> F64x4Mask {
        F64x4Mask(unsafe { _mm256_cmp_pd(self.0, other.0, _CMP_EQ_OQ) })
    }

    #[inline(always)]
    fn cmp_ne(self, other: Self) -> F64x4Mask {
        F64x4Mask(unsafe { _mm256_cmp_pd(self.0, other.0, _CMP_NEQ_UQ) })
    }

    #[inline(always)]
    fn select(mask: F64x4Mask, a: Self, b: Self) -> Self {
        F64x4(unsafe { _mm256_blendv_pd(b.0, a.0, mask.0) })
    }

    #[inline(always)]
    fn reduce_sum(self) -> f64 {
        let (lo, hi) = self.halves();
        hsum_pd(unsafe { _mm_add_pd(lo, hi) })
    }

    #[inline(always)]
    fn reduce_min(self) -> f64 {
        let (lo, hi) = self.halves();
        hmin_pd(unsafe { _mm_min_pd(lo, hi) })
    }

    #[inline(always)]
    fn reduce_max(self) -> f64 {
        let (lo, hi) = self.halves();
        hmax_pd(unsafe { _mm_max_pd(lo, hi) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::{ArrayPack, Element};

    #[test]
    fn test_f32x8_reduce_matches_portable_tree() {
        let v = [1e8f32, 3.0, -1e8, 0.5, 1.0, 2.0, 4.0, 8.0];
        let hw = F32x8::from_slice(&v);
        let sw = ArrayPack::<f32, 8>::from_slice(&v);
        assert_eq!(hw.reduce_sum().to_bits(), sw.reduce_sum().to_bits());
        assert_eq!(hw.reduce_min(), -1e8);
        assert_eq!(hw.reduce_max(), 1e8);
    }

    #[test]
    fn test_f64x4_ops() {
        let a = F64x4::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        let b = F64x4::splat(2.0);
        assert_eq!((a * b - b).to_array(), [0.0, 2.0, 4.0, 6.0]);
        assert_eq!(a.min(b).to_array(), [1.0, 2.0, 2.0, 2.0]);
        assert_eq!(a.max(b).to_array(), [2.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_f64x4_mask_select() {
        let a = F64x4::from_slice(&[1.0, f64::NAN, 3.0, 4.0]);
        let b = F64x4::splat(3.0);
        assert_eq!(a.cmp_ge(b).bitmask(), 0b1100);
        assert_eq!(a.cmp_ne(a).bitmask(), 0b0010);
        assert_eq!((!a.cmp_eq(b)).bitmask(), 0b1011);
        let picked = F64x4::select(a.cmp_lt(b), a, b).to_array();
        assert_eq!([picked[0], picked[2], picked[3]], [1.0, 3.0, 3.0]);
        assert_eq!(picked[1], 3.0);
    }

    #[test]
    fn test_min_nan_matches_scalar() {
        let a = F32x8::from_fn(|l| if l == 3 { f32::NAN } else { l as f32 });
        let b = F32x8::splat(2.0);
        let got = a.min(b).to_array();
        for (l, g) in got.iter().enumerate() {
            let x = if l == 3 { f32::NAN } else { l as f32 };
            assert_eq!(*g, x.min_of(2.0));
        }
    }
}
