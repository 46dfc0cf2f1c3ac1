//! Strategy selection.
//!
//! A call is tagged with an access mode ([`Linear`] or [`PerCol`]) and a
//! vectorization request ([`Scalar`] or [`Simd<K>`]), bundled as [`Macc`].
//! Both are zero-sized types, so the strategy is fixed per call site:
//!
//! 1. Linear access with any operand that is not whole-contiguous does not
//!    type-check (see [`crate::operands::LinearOperands`]).
//! 2. A SIMD request falls back to scalar when the kernel is not vectorizable
//!    for the element type, when the kind has no pack for it in this build, or
//!    when a per-column operand has strided rows.
//! 3. Otherwise the requested pack type is used.
//!
//! Every input to step 2 is an associated const, so the branch folds away.

use std::fmt;
use std::marker::PhantomData;

use numeval_core::{Element, Pack, ScalarPack, SimdElement, SimdKind};

// ============================================================================
// Access modes
// ============================================================================

/// Runtime mirror of an access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Linear,
    PerCol,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Linear => f.write_str("linear"),
            AccessKind::PerCol => f.write_str("percol"),
        }
    }
}

/// Compile-time access mode tag.
pub trait AccessMode: Copy + Default + fmt::Debug + 'static {
    const KIND: AccessKind;
}

/// Treat all operands as one run of `rows * cols` elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

/// Walk columns left to right, each column top to bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerCol;

impl AccessMode for Linear {
    const KIND: AccessKind = AccessKind::Linear;
}

impl AccessMode for PerCol {
    const KIND: AccessKind = AccessKind::PerCol;
}

// ============================================================================
// Vectorization requests
// ============================================================================

/// Compile-time vectorization request for element type `T`.
pub trait Vectorize<T: Element>: Copy + Default + fmt::Debug + 'static {
    /// Pack used when the request is honored.
    type Pack: Pack<Elem = T>;
    const NAME: &'static str;
}

/// Scalar evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scalar;

/// Evaluation with the packs of SIMD kind `K`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Simd<K>(PhantomData<K>);

impl<T: Element> Vectorize<T> for Scalar {
    type Pack = ScalarPack<T>;
    const NAME: &'static str = "scalar";
}

impl<T: SimdElement<K>, K: SimdKind> Vectorize<T> for Simd<K> {
    type Pack = <T as SimdElement<K>>::Pack;
    const NAME: &'static str = K::NAME;
}

// ============================================================================
// Mode value
// ============================================================================

/// Access mode `A` combined with vectorization request `U`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Macc<A, U>(PhantomData<(A, U)>);

impl<A: AccessMode, U> Macc<A, U> {
    pub const fn new() -> Self {
        Macc(PhantomData)
    }

    pub const fn access(&self) -> AccessKind {
        A::KIND
    }
}

/// Mode value for `Macc<A, U>`, e.g. `macc::<PerCol, Simd<Avx>>()`.
pub const fn macc<A: AccessMode, U>() -> Macc<A, U> {
    Macc::new()
}

// ============================================================================
// Resolution
// ============================================================================

/// The strategy a call resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub access: AccessKind,
    /// Kind name of the pack in use (`"scalar"` after a fallback).
    pub kind: &'static str,
    /// Lanes per step; 1 for scalar.
    pub width: usize,
}

impl Strategy {
    #[inline]
    pub const fn is_vectorized(&self) -> bool {
        self.width > 1
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}[{}]", self.access, self.kind, self.width)
    }
}

/// Whether a call with these properties runs on packs.
#[inline(always)]
pub const fn vectorizes(pack_width: usize, simdizable: bool, contiguous: bool) -> bool {
    pack_width > 1 && simdizable && contiguous
}

/// Resolve the strategy for access `A`, request `U`, a kernel with the given
/// `simdizable` flag, and operands whose columns are (or are not) contiguous.
#[inline(always)]
pub const fn resolve<T: Element, A: AccessMode, U: Vectorize<T>>(
    simdizable: bool,
    contiguous: bool,
) -> Strategy {
    let width = <U::Pack as Pack>::WIDTH;
    if vectorizes(width, simdizable, contiguous) {
        Strategy {
            access: A::KIND,
            kind: U::NAME,
            width,
        }
    } else {
        Strategy {
            access: A::KIND,
            kind: "scalar",
            width: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numeval_core::{Avx, Lanes, Sse};

    #[test]
    fn test_scalar_request() {
        let s = resolve::<f64, Linear, Scalar>(true, true);
        assert_eq!(s.width, 1);
        assert_eq!(s.kind, "scalar");
        assert!(!s.is_vectorized());
        assert_eq!(s.to_string(), "linear:scalar[1]");
    }

    #[test]
    fn test_lanes_request() {
        let s = resolve::<f32, PerCol, Simd<Lanes<8>>>(true, true);
        assert_eq!(s.width, 8);
        assert_eq!(s.kind, "lanes");
        assert_eq!(s.to_string(), "percol:lanes[8]");
    }

    #[test]
    fn test_fallbacks() {
        // kernel not vectorizable
        assert!(!resolve::<f64, Linear, Simd<Lanes<4>>>(false, true).is_vectorized());
        // strided columns
        assert!(!resolve::<f64, PerCol, Simd<Lanes<4>>>(true, false).is_vectorized());
        // integers have no hardware packs
        assert!(!resolve::<i32, Linear, Simd<Avx>>(true, true).is_vectorized());
        assert!(!resolve::<u64, PerCol, Simd<Sse>>(true, true).is_vectorized());
    }

    #[test]
    fn test_hardware_kinds_follow_build() {
        let sse = resolve::<f64, Linear, Simd<Sse>>(true, true);
        assert_eq!(sse.is_vectorized(), Sse::AVAILABLE);
        if Sse::AVAILABLE {
            assert_eq!((sse.kind, sse.width), ("sse", 2));
        }
        let avx = resolve::<f32, PerCol, Simd<Avx>>(true, true);
        assert_eq!(avx.is_vectorized(), Avx::AVAILABLE);
        if Avx::AVAILABLE {
            assert_eq!((avx.kind, avx.width), ("avx", 8));
        }
    }

    #[test]
    fn test_macc_value() {
        let m = macc::<PerCol, Simd<Sse>>();
        assert_eq!(m.access(), AccessKind::PerCol);
        assert_eq!(Macc::<Linear, Scalar>::new().access(), AccessKind::Linear);
    }
}
