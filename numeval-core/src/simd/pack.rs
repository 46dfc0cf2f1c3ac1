//! The pack interface and its width-1 scalar implementation.

use std::fmt::Debug;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Sub};

use super::Element;

/// Lane mask produced by pack comparisons.
pub trait PackMask:
    Copy
    + Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    const WIDTH: usize;

    /// Bit `i` is set iff lane `i` is set.
    fn bitmask(self) -> u32;

    #[inline]
    fn test(self, lane: usize) -> bool {
        (self.bitmask() >> lane) & 1 != 0
    }

    #[inline]
    fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline]
    fn all(self) -> bool {
        self.bitmask() == u32::MAX >> (32 - Self::WIDTH)
    }
}

/// Fixed-width vector of `Elem`, tagged by a SIMD kind.
///
/// Arithmetic, `min`/`max` and comparisons act on each lane independently with
/// the IEEE 754 semantics of the element type. `min(a, b)` is `a < b ? a : b`
/// and `max(a, b)` is `a > b ? a : b` per lane, matching [`Element::min_of`] /
/// [`Element::max_of`] exactly, NaNs included.
///
/// The horizontal reductions combine lanes in a fixed order per pack type, so
/// the same input always reduces to the same bits.
pub trait Pack:
    Copy
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    type Elem: Element;
    type Mask: PackMask;

    /// Number of lanes.
    const WIDTH: usize;
    /// Required alignment, in bytes, of `load_aligned` / `store_aligned`.
    const ALIGN: usize;

    /// Broadcast one value to all lanes.
    fn splat(value: Self::Elem) -> Self;

    /// Build a pack from a per-lane function, called for lanes `0..WIDTH` in order.
    fn from_fn<F: FnMut(usize) -> Self::Elem>(f: F) -> Self;

    /// Value of one lane. Panics if `lane >= WIDTH`.
    fn extract(self, lane: usize) -> Self::Elem;

    /// Load `WIDTH` consecutive elements.
    ///
    /// # Safety
    /// `ptr` must be valid for reading `WIDTH` elements.
    unsafe fn load(ptr: *const Self::Elem) -> Self;

    /// Load `WIDTH` consecutive elements from an `ALIGN`-aligned address.
    ///
    /// # Safety
    /// `ptr` must be valid for reading `WIDTH` elements and aligned to `ALIGN`.
    unsafe fn load_aligned(ptr: *const Self::Elem) -> Self;

    /// Store all lanes to `WIDTH` consecutive elements.
    ///
    /// # Safety
    /// `ptr` must be valid for writing `WIDTH` elements.
    unsafe fn store(self, ptr: *mut Self::Elem);

    /// Store all lanes to an `ALIGN`-aligned address.
    ///
    /// # Safety
    /// `ptr` must be valid for writing `WIDTH` elements and aligned to `ALIGN`.
    unsafe fn store_aligned(self, ptr: *mut Self::Elem);

    /// Load the first `WIDTH` elements of a slice.
    #[inline]
    fn from_slice(src: &[Self::Elem]) -> Self {
        assert!(
            src.len() >= Self::WIDTH,
            "slice of {} elements is shorter than pack width {}",
            src.len(),
            Self::WIDTH
        );
        // SAFETY: length checked above.
        unsafe { Self::load(src.as_ptr()) }
    }

    /// Store all lanes into the first `WIDTH` elements of a slice.
    #[inline]
    fn copy_to_slice(self, dst: &mut [Self::Elem]) {
        assert!(
            dst.len() >= Self::WIDTH,
            "slice of {} elements is shorter than pack width {}",
            dst.len(),
            Self::WIDTH
        );
        // SAFETY: length checked above.
        unsafe { self.store(dst.as_mut_ptr()) }
    }

    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;

    fn cmp_lt(self, other: Self) -> Self::Mask;
    fn cmp_le(self, other: Self) -> Self::Mask;
    fn cmp_gt(self, other: Self) -> Self::Mask;
    fn cmp_ge(self, other: Self) -> Self::Mask;
    fn cmp_eq(self, other: Self) -> Self::Mask;
    /// Unordered not-equal: lanes holding NaN compare as not equal.
    fn cmp_ne(self, other: Self) -> Self::Mask;

    /// Per lane: `mask ? a : b`.
    fn select(mask: Self::Mask, a: Self, b: Self) -> Self;

    fn reduce_sum(self) -> Self::Elem;
    fn reduce_min(self) -> Self::Elem;
    fn reduce_max(self) -> Self::Elem;
}

// ============================================================================
// Width-1 scalar pack
// ============================================================================

/// One-lane mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScalarMask(pub bool);

impl BitAnd for ScalarMask {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        ScalarMask(self.0 & rhs.0)
    }
}

impl BitOr for ScalarMask {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        ScalarMask(self.0 | rhs.0)
    }
}

impl BitXor for ScalarMask {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        ScalarMask(self.0 ^ rhs.0)
    }
}

impl Not for ScalarMask {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        ScalarMask(!self.0)
    }
}

impl PackMask for ScalarMask {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn bitmask(self) -> u32 {
        self.0 as u32
    }
}

/// The scalar fallback: a pack of width 1.
///
/// Every element type supports it, so evaluator code written against [`Pack`]
/// runs unchanged when no SIMD kind applies.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(transparent)]
pub struct ScalarPack<T>(pub T);

macro_rules! scalar_pack_binop {
    ($($trait:ident :: $method:ident),*) => {
        $(
            impl<T: Element> $trait for ScalarPack<T> {
                type Output = Self;
                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    ScalarPack(self.0.$method(rhs.0))
                }
            }
        )*
    };
}

scalar_pack_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl<T: Element> Pack for ScalarPack<T> {
    type Elem = T;
    type Mask = ScalarMask;

    const WIDTH: usize = 1;
    const ALIGN: usize = std::mem::align_of::<T>();

    #[inline(always)]
    fn splat(value: T) -> Self {
        ScalarPack(value)
    }

    #[inline(always)]
    fn from_fn<F: FnMut(usize) -> T>(mut f: F) -> Self {
        ScalarPack(f(0))
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> T {
        assert!(lane == 0, "lane {lane} out of range for width 1");
        self.0
    }

    #[inline(always)]
    unsafe fn load(ptr: *const T) -> Self {
        ScalarPack(ptr.read_unaligned())
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> Self {
        ScalarPack(ptr.read())
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut T) {
        ptr.write_unaligned(self.0)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut T) {
        ptr.write(self.0)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        ScalarPack(self.0.min_of(other.0))
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        ScalarPack(self.0.max_of(other.0))
    }

    #[inline(always)]
    fn cmp_lt(self, other: Self) -> ScalarMask {
        ScalarMask(self.0 < other.0)
    }

    #[inline(always)]
    fn cmp_le(self, other: Self) -> ScalarMask {
        ScalarMask(self.0 <= other.0)
    }

    #[inline(always)]
    fn cmp_gt(self, other: Self) -> ScalarMask {
        ScalarMask(self.0 > other.0)
    }

    #[inline(always)]
    fn cmp_ge(self, other: Self) -> ScalarMask {
        ScalarMask(self.0 >= other.0)
    }

    #[inline(always)]
    fn cmp_eq(self, other: Self) -> ScalarMask {
        ScalarMask(self.0 == other.0)
    }

    #[inline(always)]
    fn cmp_ne(self, other: Self) -> ScalarMask {
        ScalarMask(self.0 != other.0)
    }

    #[inline(always)]
    fn select(mask: ScalarMask, a: Self, b: Self) -> Self {
        if mask.0 {
            a
        } else {
            b
        }
    }

    #[inline(always)]
    fn reduce_sum(self) -> T {
        self.0
    }

    #[inline(always)]
    fn reduce_min(self) -> T {
        self.0
    }

    #[inline(always)]
    fn reduce_max(self) -> T {
        self.0
    }
}
