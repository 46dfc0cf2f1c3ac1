//! SSE packs (128-bit): f32x4, f64x2.
//!
//! Compiled only when the build enables `sse2` (see `build.rs`), so every
//! intrinsic here is statically available.

// Register intrinsics are safe fns on newer toolchains when the feature is
// statically enabled; the unsafe blocks keep older toolchains building.
#![allow(unused_unsafe)]

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Sub};

use super::{Pack, PackMask};

// ============================================================================
// Horizontal reductions (shared with the AVX packs)
// ============================================================================

// Halving tree: lanes (0,2) and (1,3) first, then the two partials.
#[inline(always)]
pub(crate) fn hsum_ps(v: __m128) -> f32 {
    unsafe {
        let s = _mm_add_ps(v, _mm_movehl_ps(v, v));
        _mm_cvtss_f32(_mm_add_ss(s, _mm_shuffle_ps(s, s, 0b01)))
    }
}

#[inline(always)]
pub(crate) fn hmin_ps(v: __m128) -> f32 {
    unsafe {
        let s = _mm_min_ps(v, _mm_movehl_ps(v, v));
        _mm_cvtss_f32(_mm_min_ss(s, _mm_shuffle_ps(s, s, 0b01)))
    }
}

#[inline(always)]
pub(crate) fn hmax_ps(v: __m128) -> f32 {
    unsafe {
        let s = _mm_max_ps(v, _mm_movehl_ps(v, v));
        _mm_cvtss_f32(_mm_max_ss(s, _mm_shuffle_ps(s, s, 0b01)))
    }
}

#[inline(always)]
pub(crate) fn hsum_pd(v: __m128d) -> f64 {
    unsafe { _mm_cvtsd_f64(_mm_add_sd(v, _mm_unpackhi_pd(v, v))) }
}

#[inline(always)]
pub(crate) fn hmin_pd(v: __m128d) -> f64 {
    unsafe { _mm_cvtsd_f64(_mm_min_sd(v, _mm_unpackhi_pd(v, v))) }
}

#[inline(always)]
pub(crate) fn hmax_pd(v: __m128d) -> f64 {
    unsafe { _mm_cvtsd_f64(_mm_max_sd(v, _mm_unpackhi_pd(v, v))) }
}

// ============================================================================
// f32x4
// ============================================================================

/// Four-lane f32 comparison mask.
#[derive(Clone, Copy)]
pub struct F32x4Mask(__m128);

/// Four f32 lanes in an `__m128`.
#[derive(Clone, Copy)]
pub struct F32x4(pub __m128);

impl F32x4 {
    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }
}

impl fmt::Debug for F32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F32x4").field(&self.to_array()).finish()
    }
}

impl fmt::Debug for F32x4Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F32x4Mask({:04b})", self.bitmask())
    }
}

impl BitAnd for F32x4Mask {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        F32x4Mask(unsafe { _mm_and_ps(self.0, rhs.0) })
    }
}

impl BitOr for F32x4Mask {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        F32x4Mask(unsafe { _mm_or_ps(self.0, rhs.0) })
    }
}

impl BitXor for F32x4Mask {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        F32x4Mask(unsafe { _mm_xor_ps(self.0, rhs.0) })
    }
}

impl Not for F32x4Mask {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        F32x4Mask(unsafe { _mm_xor_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(-1))) })
    }
}

impl PackMask for F32x4Mask {
    const WIDTH: usize = 4;

    #[inline(always)]
    fn bitmask(self) -> u32 {
        unsafe { _mm_movemask_ps(self.0) as u32 }
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        F32x4(unsafe { _mm_add_ps(self.0, rhs.0) })
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        F32x4(unsafe { _mm_sub_ps(self.0, rhs.0) })
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        F32x4(unsafe { _mm_mul_ps(self.0, rhs.0) })
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        F32x4(unsafe { _mm_div_ps(self.0, rhs.0) })
    }
}

impl Pack for F32x4 {
    type Elem = f32;
    type Mask = F32x4Mask;

    const WIDTH: usize = 4;
    const ALIGN: usize = 16;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        F32x4(unsafe { _mm_set1_ps(value) })
    }

    #[inline(always)]
    fn from_fn<F: FnMut(usize) -> f32>(f: F) -> Self {
        let lanes: [f32; 4] = std::array::from_fn(f);
        F32x4(unsafe { _mm_loadu_ps(lanes.as_ptr()) })
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        F32x4(_mm_loadu_ps(ptr))
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        F32x4(_mm_load_ps(ptr))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        _mm_storeu_ps(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        _mm_store_ps(ptr, self.0)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        F32x4(unsafe { _mm_min_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        F32x4(unsafe { _mm_max_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> F32x4Mask {
        F32x4Mask(unsafe { _mm_cmplt_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> F32x4Mask {
        F32x4Mask(unsafe { _mm_cmple_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> F32x4Mask {
        F32x4Mask(unsafe { _mm_cmpgt_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> F32x4Mask {
        F32x4Mask(unsafe { _mm_cmpge_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> F32x4Mask {
        F32x4Mask(unsafe { _mm_cmpeq_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_ne(self, other: Self) -> F32x4Mask {
        F32x4Mask(unsafe { _mm_cmpneq_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn select(mask: F32x4Mask, a: Self, b: Self) -> Self {
        F32x4(unsafe { _mm_or_ps(_mm_and_ps(mask.0, a.0), _mm_andnot_ps(mask.0, b.0)) })
    }

    #[inline(always)]
    fn reduce_sum(self) -> f32 {
        hsum_ps(self.0)
    }

    #[inline(always)]
    fn reduce_min(self) -> f32 {
        hmin_ps(self.0)
    }

    #[inline(always)]
    fn reduce_max(self) -> f32 {
        hmax_ps(self.0)
    }
}

// ============================================================================
// f64x2
// ============================================================================

/// Two-lane f64 comparison mask.
#[derive(Clone, Copy)]
pub struct F64x2Mask(__m128d);

/// Two f64 lanes in an `__m128d`.
#[derive(Clone, Copy)]
pub struct F64x2(pub __m128d);

impl F64x2 {
    #[inline(always)]
    pub fn to_array(self) -> [f64; 2] {
        let mut out = [0.0f64; 2];
        unsafe { _mm_storeu_pd(out.as_mut_ptr(), self.0) };
        out
    }
}

impl fmt::Debug for F64x2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F64x2").field(&self.to_array()).finish()
    }
}

impl fmt::Debug for F64x2Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F64x2Mask({:02b})", self.bitmask())
    }
}

impl BitAnd for F64x2Mask {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        F64x2Mask(unsafe { _mm_and_pd(self.0, rhs.0) })
    }
}

impl BitOr for F64x2Mask {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        F64x2Mask(unsafe { _mm_or_pd(self.0, rhs.0) })
    }
}

impl BitXor for F64x2Mask {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        F64x2Mask(unsafe { _mm_xor_pd(self.0, rhs.0) })
    }
}

impl Not for F64x2Mask {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        F64x2Mask(unsafe { _mm_xor_pd(self.0, _mm_castsi128_pd(_mm_set1_epi32(-1))) })
    }
}

impl PackMask for F64x2Mask {
    const WIDTH: usize = 2;

    #[inline(always)]
    fn bitmask(self) -> u32 {
        unsafe { _mm_movemask_pd(self.0) as u32 }
    }
}

impl Add for F64x2 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        F64x2(unsafe { _mm_add_pd(self.0, rhs.0) })
    }
}

impl Sub for F64x2 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        F64x2(unsafe { _mm_sub_pd(self.0, rhs.0) })
    }
}

impl Mul for F64x2 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        F64x2(unsafe { _mm_mul_pd(self.0, rhs.0) })
    }
}

impl Div for F64x2 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        F64x2(unsafe { _mm_div_pd(self.0, rhs.0) })
    }
}

impl Pack for F64x2 {
    type Elem = f64;
    type Mask = F64x2Mask;

    const WIDTH: usize = 2;
    const ALIGN: usize = 16;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        F64x2(unsafe { _mm_set1_pd(value) })
    }

    #[inline(always)]
    fn from_fn<F: FnMut(usize) -> f64>(f: F) -> Self {
        let lanes: [f64; 2] = std::array::from_fn(f);
        F64x2(unsafe { _mm_loadu_pd(lanes.as_ptr()) })
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f64 {
        self.to_array()[lane]
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        F64x2(_mm_loadu_pd(ptr))
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        F64x2(_mm_load_pd(ptr))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        _mm_storeu_pd(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f64) {
        debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
        _mm_store_pd(ptr, self.0)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        F64x2(unsafe { _mm_min_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        F64x2(unsafe { _mm_max_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> F64x2Mask {
        F64x2Mask(unsafe { _mm_cmplt_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> F64x2Mask {
        F64x2Mask(unsafe { _mm_cmple_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> F64x2Mask {
        F64x2Mask(unsafe { _mm_cmpgt_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> F64x2Mask {
        F64x2Mask(unsafe { _mm_cmpge_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> F64x2Mask {
        F64x2Mask(unsafe { _mm_cmpeq_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn cmp_ne(self, other: Self) -> F64x2Mask {
        F64x2Mask(unsafe { _mm_cmpneq_pd(self.0, other.0) })
    }

    #[inline(always)]
    fn select(mask: F64x2Mask, a: Self, b: Self) -> Self {
        F64x2(unsafe { _mm_or_pd(_mm_and_pd(mask.0, a.0), _mm_andnot_pd(mask.0, b.0)) })
    }

    #[inline(always)]
    fn reduce_sum(self) -> f64 {
        hsum_pd(self.0)
    }

    #[inline(always)]
    fn reduce_min(self) -> f64 {
        hmin_pd(self.0)
    }

    #[inline(always)]
    fn reduce_max(self) -> f64 {
        hmax_pd(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::{Element, ScalarPack};

    #[test]
    fn test_f32x4_arith() {
        let a = F32x4::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        let b = F32x4::splat(2.0);
        assert_eq!((a + b).to_array(), [3.0, 4.0, 5.0, 6.0]);
        assert_eq!((a - b).to_array(), [-1.0, 0.0, 1.0, 2.0]);
        assert_eq!((a * b).to_array(), [2.0, 4.0, 6.0, 8.0]);
        assert_eq!((a / b).to_array(), [0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_f32x4_reduce() {
        let a = F32x4::from_slice(&[3.0, -1.0, 7.5, 2.0]);
        assert_eq!(a.reduce_sum(), (3.0 + 7.5) + (-1.0 + 2.0));
        assert_eq!(a.reduce_min(), -1.0);
        assert_eq!(a.reduce_max(), 7.5);
    }

    #[test]
    fn test_f32x4_mask_select() {
        let a = F32x4::from_slice(&[1.0, 5.0, 3.0, 7.0]);
        let b = F32x4::splat(4.0);
        let gt = a.cmp_gt(b);
        assert_eq!(gt.bitmask(), 0b1010);
        assert_eq!((!gt).bitmask(), 0b0101);
        assert!(!(gt & !gt).any());
        assert!((gt ^ !gt).all());
        assert_eq!(F32x4::select(gt, b, a).to_array(), [1.0, 4.0, 3.0, 4.0]);
    }

    #[test]
    fn test_f64x2_matches_scalar_min_max_with_nan() {
        let a = F64x2::from_slice(&[f64::NAN, 1.0]);
        let b = F64x2::from_slice(&[2.0, f64::NAN]);
        let lo = a.min(b).to_array();
        let hi = a.max(b).to_array();
        assert_eq!(lo[0], f64::NAN.min_of(2.0));
        assert!(lo[1].is_nan() && 1.0f64.min_of(f64::NAN).is_nan());
        assert_eq!(hi[0], ScalarPack(f64::NAN).max(ScalarPack(2.0)).0);
        assert_eq!(a.cmp_ne(a).bitmask(), 0b01);
    }

    #[test]
    fn test_f32x4_matches_portable_pack() {
        use crate::simd::ArrayPack;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let x: [f32; 4] = std::array::from_fn(|_| rng.gen_range(-10.0..10.0));
            let y: [f32; 4] = std::array::from_fn(|_| rng.gen_range(-10.0..10.0));
            let (a, b) = (F32x4::from_slice(&x), F32x4::from_slice(&y));
            let (pa, pb) = (ArrayPack(x), ArrayPack(y));
            assert_eq!((a * b + a).to_array(), (pa * pb + pa).0);
            assert_eq!(a.min(b).to_array(), pa.min(pb).0);
            assert_eq!(a.reduce_max(), pa.reduce_max());
            assert_eq!(a.cmp_lt(b).bitmask(), pa.cmp_lt(pb).bitmask());
        }
    }

    #[test]
    fn test_f64x2_reduce_and_store() {
        let v = [0.25f64, 0.5, 4.0];
        let p = F64x2::from_slice(&v[1..]);
        assert_eq!(p.reduce_sum(), 4.5);
        let mut out = [0.0; 3];
        p.copy_to_slice(&mut out[1..]);
        assert_eq!(out, [0.0, 0.5, 4.0]);
    }

    #[test]
    fn test_aligned_load() {
        #[repr(align(16))]
        struct Aligned([f64; 2]);
        let buf = Aligned([1.0, 2.0]);
        let p = unsafe { F64x2::load_aligned(buf.0.as_ptr()) };
        assert_eq!(p.to_array(), [1.0, 2.0]);
    }
}
