//! Loops over one run of elements.
//!
//! Each loop handles `major(len, P::WIDTH)` elements in whole packs, then the
//! remaining `minor(len, P::WIDTH)` elements one at a time. With
//! `P = ScalarPack<T>` the pack loop is skipped entirely, so scalar
//! evaluation only ever calls the kernels' scalar paths.
//!
//! The strided variants are scalar only; they serve views whose rows are not
//! adjacent.

use numeval_core::simd::major;
use numeval_core::{Element, Pack};

use crate::kernel::{AccumKernel, MapKernel};

/// `dst[k] = kernel(src_0[k], .., src_{N-1}[k])` for `k` in `0..len`.
///
/// # Safety
/// Every `src` pointer must be valid for `len` reads and `dst` for `len`
/// writes.
#[inline(always)]
pub(crate) unsafe fn map<T, P, F, const N: usize>(
    kernel: &F,
    len: usize,
    src: [*const T; N],
    dst: *mut T,
) where
    T: Element,
    P: Pack<Elem = T>,
    F: MapKernel<T, N>,
{
    let mut k = 0;
    if P::WIDTH > 1 {
        let body = major(len, P::WIDTH);
        while k < body {
            // SAFETY: k + WIDTH <= len.
            unsafe {
                let args = src.map(|p| P::load(p.add(k)));
                kernel.apply_pack(args).store(dst.add(k));
            }
            k += P::WIDTH;
        }
    }
    while k < len {
        // SAFETY: k < len.
        unsafe {
            let args = src.map(|p| *p.add(k));
            *dst.add(k) = kernel.apply(args);
        }
        k += 1;
    }
}

/// Like [`map`] with per-operand element steps. Scalar.
///
/// # Safety
/// `src[n]` must be valid for reads at `k * src_step[n]` and `dst` for writes
/// at `k * dst_step`, for every `k` in `0..len`.
#[inline]
pub(crate) unsafe fn map_strided<T, F, const N: usize>(
    kernel: &F,
    len: usize,
    src: [*const T; N],
    src_step: [usize; N],
    dst: *mut T,
    dst_step: usize,
) where
    T: Element,
    F: MapKernel<T, N>,
{
    for k in 0..len {
        // SAFETY: in range per the contract above.
        unsafe {
            let args: [T; N] = std::array::from_fn(|n| *src[n].add(k * src_step[n]));
            *dst.add(k * dst_step) = kernel.apply(args);
        }
    }
}

/// Fold `src[0..len]` into `acc`: packs in order through
/// [`AccumKernel::reduce_lanes`], then the tail element by element.
///
/// # Safety
/// `src` must be valid for `len` reads.
#[inline(always)]
pub(crate) unsafe fn accum<T, P, F>(kernel: &F, len: usize, src: *const T, acc: &mut T)
where
    T: Element,
    P: Pack<Elem = T>,
    F: AccumKernel<T>,
{
    let mut k = 0;
    if P::WIDTH > 1 {
        let body = major(len, P::WIDTH);
        while k < body {
            // SAFETY: k + WIDTH <= len.
            let x = unsafe { P::load(src.add(k)) };
            kernel.reduce_lanes(x, acc);
            k += P::WIDTH;
        }
    }
    while k < len {
        // SAFETY: k < len.
        kernel.combine(unsafe { *src.add(k) }, acc);
        k += 1;
    }
}

/// Fold `src[k * step]` for `k` in `0..len` into `acc`. Scalar.
///
/// # Safety
/// `src` must be valid for reads at every `k * step`.
#[inline]
pub(crate) unsafe fn accum_strided<T, F>(
    kernel: &F,
    len: usize,
    src: *const T,
    step: usize,
    acc: &mut T,
) where
    T: Element,
    F: AccumKernel<T>,
{
    for k in 0..len {
        // SAFETY: in range per the contract above.
        kernel.combine(unsafe { *src.add(k * step) }, acc);
    }
}

/// `acc[k] = acc[k] ⊕ src[k]` for `k` in `0..len`, lane-vertical on packs.
///
/// # Safety
/// `src` must be valid for `len` reads, `acc` for `len` reads and writes, and
/// the two must not overlap.
#[inline(always)]
pub(crate) unsafe fn accum_vertical<T, P, F>(kernel: &F, len: usize, src: *const T, acc: *mut T)
where
    T: Element,
    P: Pack<Elem = T>,
    F: AccumKernel<T>,
{
    let mut k = 0;
    if P::WIDTH > 1 {
        let body = major(len, P::WIDTH);
        while k < body {
            // SAFETY: k + WIDTH <= len.
            unsafe {
                let mut a = P::load(acc.add(k));
                kernel.combine_pack(P::load(src.add(k)), &mut a);
                a.store(acc.add(k));
            }
            k += P::WIDTH;
        }
    }
    while k < len {
        // SAFETY: k < len, no overlap.
        unsafe { kernel.combine(*src.add(k), &mut *acc.add(k)) };
        k += 1;
    }
}

/// Strided-source variant of [`accum_vertical`]. Scalar.
///
/// # Safety
/// `src` must be valid for reads at every `k * step`, `acc` for `len` reads
/// and writes, and the two must not overlap.
#[inline]
pub(crate) unsafe fn accum_vertical_strided<T, F>(
    kernel: &F,
    len: usize,
    src: *const T,
    step: usize,
    acc: *mut T,
) where
    T: Element,
    F: AccumKernel<T>,
{
    for k in 0..len {
        // SAFETY: in range per the contract above.
        unsafe { kernel.combine(*src.add(k * step), &mut *acc.add(k)) };
    }
}
