//! Kernel contracts and the builtin kernels.
//!
//! A kernel is a small value describing one element-wise operation. It always
//! has a scalar path. If `SIMDIZABLE` is `true` for an element type, it also
//! has a pack path that computes the same thing lane by lane; the engine only
//! calls the pack path in that case.
//!
//! Pack methods have lane-wise defaults built from the scalar path, so a
//! kernel that sets `SIMDIZABLE = true` without overriding them is correct,
//! just not fast.

use numeval_core::{Element, Pack};

// ============================================================================
// Contracts
// ============================================================================

/// `N`-ary element-wise map: one output element per position.
pub trait MapKernel<T: Element, const N: usize> {
    /// Whether the pack path may be used for `T`.
    const SIMDIZABLE: bool = false;

    /// Output element for one position.
    fn apply(&self, args: [T; N]) -> T;

    /// Output pack for `P::WIDTH` consecutive positions.
    #[inline(always)]
    fn apply_pack<P: Pack<Elem = T>>(&self, args: [P; N]) -> P {
        P::from_fn(|l| self.apply(args.map(|p| p.extract(l))))
    }
}

/// Accumulation into a running value.
///
/// `combine` must be associative. It need not be commutative, and the engine
/// never assumes an identity element: every accumulator starts from a seed
/// supplied by the caller.
pub trait AccumKernel<T: Element> {
    const SIMDIZABLE: bool = false;

    /// `acc = acc ⊕ x`.
    fn combine(&self, x: T, acc: &mut T);

    /// Lane-vertical combine: lane `l` of `acc` absorbs lane `l` of `x`.
    #[inline(always)]
    fn combine_pack<P: Pack<Elem = T>>(&self, x: P, acc: &mut P) {
        let cur = *acc;
        *acc = P::from_fn(|l| {
            let mut a = cur.extract(l);
            self.combine(x.extract(l), &mut a);
            a
        });
    }

    /// Fold every lane of `x` into the scalar `acc`.
    ///
    /// The default combines lanes in increasing order. Overrides may reduce
    /// the pack horizontally first, which regroups the combine but, by
    /// associativity, not its value.
    #[inline(always)]
    fn reduce_lanes<P: Pack<Elem = T>>(&self, x: P, acc: &mut T) {
        for l in 0..P::WIDTH {
            self.combine(x.extract(l), acc);
        }
    }
}

impl<T: Element, const N: usize, K: MapKernel<T, N>> MapKernel<T, N> for &K {
    const SIMDIZABLE: bool = K::SIMDIZABLE;

    #[inline(always)]
    fn apply(&self, args: [T; N]) -> T {
        (**self).apply(args)
    }

    #[inline(always)]
    fn apply_pack<P: Pack<Elem = T>>(&self, args: [P; N]) -> P {
        (**self).apply_pack(args)
    }
}

impl<T: Element, K: AccumKernel<T>> AccumKernel<T> for &K {
    const SIMDIZABLE: bool = K::SIMDIZABLE;

    #[inline(always)]
    fn combine(&self, x: T, acc: &mut T) {
        (**self).combine(x, acc)
    }

    #[inline(always)]
    fn combine_pack<P: Pack<Elem = T>>(&self, x: P, acc: &mut P) {
        (**self).combine_pack(x, acc)
    }

    #[inline(always)]
    fn reduce_lanes<P: Pack<Elem = T>>(&self, x: P, acc: &mut T) {
        (**self).reduce_lanes(x, acc)
    }
}

// ============================================================================
// Closure adapters (scalar only)
// ============================================================================

/// Map kernel from a closure over `[T; N]`. Never vectorized.
#[derive(Debug, Clone, Copy)]
pub struct MapFn<G>(pub G);

impl<T: Element, const N: usize, G: Fn([T; N]) -> T> MapKernel<T, N> for MapFn<G> {
    #[inline(always)]
    fn apply(&self, args: [T; N]) -> T {
        (self.0)(args)
    }
}

/// Accumulate kernel from a closure `(x, &mut acc)`. Never vectorized.
#[derive(Debug, Clone, Copy)]
pub struct AccumFn<G>(pub G);

impl<T: Element, G: Fn(T, &mut T)> AccumKernel<T> for AccumFn<G> {
    #[inline(always)]
    fn combine(&self, x: T, acc: &mut T) {
        (self.0)(x, acc)
    }
}

// ============================================================================
// Builtin map kernels
// ============================================================================

macro_rules! binary_map_kernel {
    ($(#[$doc:meta])* $name:ident, |$a:ident, $b:ident| $scalar:expr, $pack:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl<T: Element> MapKernel<T, 2> for $name {
            const SIMDIZABLE: bool = true;

            #[inline(always)]
            fn apply(&self, [$a, $b]: [T; 2]) -> T {
                $scalar
            }

            #[inline(always)]
            fn apply_pack<P: Pack<Elem = T>>(&self, [$a, $b]: [P; 2]) -> P {
                $pack
            }
        }
    };
}

binary_map_kernel!(
    /// `a + b`
    Add,
    |a, b| a + b,
    a + b
);
binary_map_kernel!(
    /// `a - b`
    Sub,
    |a, b| a - b,
    a - b
);
binary_map_kernel!(
    /// `a * b`
    Mul,
    |a, b| a * b,
    a * b
);
binary_map_kernel!(
    /// `a / b`
    Div,
    |a, b| a / b,
    a / b
);
binary_map_kernel!(
    /// `a < b ? a : b`
    MinOf,
    |a, b| a.min_of(b),
    a.min(b)
);
binary_map_kernel!(
    /// `a > b ? a : b`
    MaxOf,
    |a, b| a.max_of(b),
    a.max(b)
);

/// `alpha * x + y`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Axpy<T> {
    pub alpha: T,
}

impl<T: Element> MapKernel<T, 2> for Axpy<T> {
    const SIMDIZABLE: bool = true;

    #[inline(always)]
    fn apply(&self, [x, y]: [T; 2]) -> T {
        self.alpha * x + y
    }

    #[inline(always)]
    fn apply_pack<P: Pack<Elem = T>>(&self, [x, y]: [P; 2]) -> P {
        P::splat(self.alpha) * x + y
    }
}

/// Clamp into `[lo, hi]`. NaN inputs pass through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clamp<T> {
    pub lo: T,
    pub hi: T,
}

impl<T: Element> MapKernel<T, 1> for Clamp<T> {
    const SIMDIZABLE: bool = true;

    #[inline(always)]
    fn apply(&self, [x]: [T; 1]) -> T {
        let x = if x < self.lo { self.lo } else { x };
        if x > self.hi {
            self.hi
        } else {
            x
        }
    }

    #[inline(always)]
    fn apply_pack<P: Pack<Elem = T>>(&self, [x]: [P; 1]) -> P {
        let lo = P::splat(self.lo);
        let hi = P::splat(self.hi);
        let x = P::select(x.cmp_lt(lo), lo, x);
        P::select(x.cmp_gt(hi), hi, x)
    }
}

// ============================================================================
// Builtin accumulate kernels
// ============================================================================

/// Running sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sum;

impl<T: Element> AccumKernel<T> for Sum {
    const SIMDIZABLE: bool = true;

    #[inline(always)]
    fn combine(&self, x: T, acc: &mut T) {
        *acc = *acc + x;
    }

    #[inline(always)]
    fn combine_pack<P: Pack<Elem = T>>(&self, x: P, acc: &mut P) {
        *acc = *acc + x;
    }

    #[inline(always)]
    fn reduce_lanes<P: Pack<Elem = T>>(&self, x: P, acc: &mut T) {
        *acc = *acc + x.reduce_sum();
    }
}

/// Running sum of squares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumSq;

impl<T: Element> AccumKernel<T> for SumSq {
    const SIMDIZABLE: bool = true;

    #[inline(always)]
    fn combine(&self, x: T, acc: &mut T) {
        *acc = *acc + x * x;
    }

    #[inline(always)]
    fn combine_pack<P: Pack<Elem = T>>(&self, x: P, acc: &mut P) {
        *acc = *acc + x * x;
    }

    #[inline(always)]
    fn reduce_lanes<P: Pack<Elem = T>>(&self, x: P, acc: &mut T) {
        *acc = *acc + (x * x).reduce_sum();
    }
}

/// Running minimum, `x < acc ? x : acc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Min;

impl<T: Element> AccumKernel<T> for Min {
    const SIMDIZABLE: bool = true;

    #[inline(always)]
    fn combine(&self, x: T, acc: &mut T) {
        *acc = x.min_of(*acc);
    }

    #[inline(always)]
    fn combine_pack<P: Pack<Elem = T>>(&self, x: P, acc: &mut P) {
        *acc = x.min(*acc);
    }

    #[inline(always)]
    fn reduce_lanes<P: Pack<Elem = T>>(&self, x: P, acc: &mut T) {
        *acc = x.reduce_min().min_of(*acc);
    }
}

/// Running maximum, `x > acc ? x : acc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Max;

impl<T: Element> AccumKernel<T> for Max {
    const SIMDIZABLE: bool = true;

    #[inline(always)]
    fn combine(&self, x: T, acc: &mut T) {
        *acc = x.max_of(*acc);
    }

    #[inline(always)]
    fn combine_pack<P: Pack<Elem = T>>(&self, x: P, acc: &mut P) {
        *acc = x.max(*acc);
    }

    #[inline(always)]
    fn reduce_lanes<P: Pack<Elem = T>>(&self, x: P, acc: &mut T) {
        *acc = x.reduce_max().max_of(*acc);
    }
}
