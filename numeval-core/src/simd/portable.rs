//! Array-backed packs for the portable [`Lanes`](super::Lanes) kind.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Sub};

use super::{Element, Pack, PackMask};

/// `W`-lane mask backed by a bool array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayMask<const W: usize>(pub [bool; W]);

macro_rules! array_mask_binop {
    ($($trait:ident :: $method:ident => $op:tt),*) => {
        $(
            impl<const W: usize> $trait for ArrayMask<W> {
                type Output = Self;
                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    ArrayMask(std::array::from_fn(|l| self.0[l] $op rhs.0[l]))
                }
            }
        )*
    };
}

array_mask_binop!(BitAnd::bitand => &, BitOr::bitor => |, BitXor::bitxor => ^);

impl<const W: usize> Not for ArrayMask<W> {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        ArrayMask(self.0.map(|b| !b))
    }
}

impl<const W: usize> PackMask for ArrayMask<W> {
    const WIDTH: usize = W;

    #[inline]
    fn bitmask(self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .fold(0u32, |acc, (l, &b)| acc | ((b as u32) << l))
    }
}

/// `W`-lane pack backed by an array of `T`.
///
/// Horizontal reductions halve the lane count at each step (lane `i` with lane
/// `i + W/2`), the same tree the hardware packs use.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct ArrayPack<T, const W: usize>(pub [T; W]);

impl<T: Element, const W: usize> ArrayPack<T, W> {
    #[inline(always)]
    fn zip_with(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        ArrayPack(std::array::from_fn(|l| f(self.0[l], rhs.0[l])))
    }

    #[inline(always)]
    fn compare(self, rhs: Self, f: impl Fn(T, T) -> bool) -> ArrayMask<W> {
        ArrayMask(std::array::from_fn(|l| f(self.0[l], rhs.0[l])))
    }

    #[inline]
    fn tree_reduce(self, f: impl Fn(T, T) -> T) -> T {
        let mut lanes = self.0;
        let mut n = W;
        while n > 1 {
            let half = n / 2;
            for l in 0..half {
                lanes[l] = f(lanes[l], lanes[l + half]);
            }
            n = half;
        }
        lanes[0]
    }
}

macro_rules! array_pack_binop {
    ($($trait:ident :: $method:ident),*) => {
        $(
            impl<T: Element, const W: usize> $trait for ArrayPack<T, W> {
                type Output = Self;
                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    self.zip_with(rhs, |a, b| a.$method(b))
                }
            }
        )*
    };
}

array_pack_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl<T: Element, const W: usize> Pack for ArrayPack<T, W> {
    type Elem = T;
    type Mask = ArrayMask<W>;

    const WIDTH: usize = W;
    const ALIGN: usize = std::mem::align_of::<[T; W]>();

    #[inline(always)]
    fn splat(value: T) -> Self {
        ArrayPack([value; W])
    }

    #[inline(always)]
    fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self {
        ArrayPack(std::array::from_fn(f))
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> T {
        self.0[lane]
    }

    #[inline(always)]
    unsafe fn load(ptr: *const T) -> Self {
        ArrayPack((ptr as *const [T; W]).read_unaligned())
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> Self {
        ArrayPack((ptr as *const [T; W]).read())
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut T) {
        (ptr as *mut [T; W]).write_unaligned(self.0)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut T) {
        (ptr as *mut [T; W]).write(self.0)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        self.zip_with(other, T::min_of)
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        self.zip_with(other, T::max_of)
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> ArrayMask<W> {
        self.compare(other, |a, b| a < b)
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> ArrayMask<W> {
        self.compare(other, |a, b| a <= b)
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> ArrayMask<W> {
        self.compare(other, |a, b| a > b)
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> ArrayMask<W> {
        self.compare(other, |a, b| a >= b)
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> ArrayMask<W> {
        self.compare(other, |a, b| a == b)
    }

    #[inline(always)]
    fn cmp_ne(self, other: Self) -> ArrayMask<W> {
        self.compare(other, |a, b| a != b)
    }

    #[inline(always)]
    fn select(mask: ArrayMask<W>, a: Self, b: Self) -> Self {
        ArrayPack(std::array::from_fn(|l| if mask.0[l] { a.0[l] } else { b.0[l] }))
    }

    #[inline]
    fn reduce_sum(self) -> T {
        self.tree_reduce(|a, b| a + b)
    }

    #[inline]
    fn reduce_min(self) -> T {
        self.tree_reduce(T::min_of)
    }

    #[inline]
    fn reduce_max(self) -> T {
        self.tree_reduce(T::max_of)
    }
}
