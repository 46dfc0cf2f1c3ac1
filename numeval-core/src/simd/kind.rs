//! SIMD kind tags.
//!
//! A kind names an instruction-set width. It fixes, per element type, the pack
//! type used for vectorized evaluation (see [`SimdElement`](super::SimdElement)).

use std::fmt::Debug;

/// Compile-time tag for a SIMD instruction set.
pub trait SimdKind: Copy + Default + Debug + Send + Sync + 'static {
    /// Short name used in strategy reports.
    const NAME: &'static str;
    /// Whether this build has real packs for the kind. When `false`, every
    /// element type maps the kind to the width-1 scalar pack.
    const AVAILABLE: bool;
}

/// 128-bit packs: `f32x4`, `f64x2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sse;

/// 256-bit packs: `f32x8`, `f64x4`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Avx;

/// Portable `W`-lane packs backed by plain arrays (`W` in 2, 4, 8, 16).
///
/// Always available. Lanes are evaluated one after another, so this kind is
/// about reproducing a given pack width on any target rather than speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lanes<const W: usize>;

impl SimdKind for Sse {
    const NAME: &'static str = "sse";
    const AVAILABLE: bool = cfg!(numeval_sse);
}

impl SimdKind for Avx {
    const NAME: &'static str = "avx";
    const AVAILABLE: bool = cfg!(numeval_avx);
}

impl<const W: usize> SimdKind for Lanes<W> {
    const NAME: &'static str = "lanes";
    const AVAILABLE: bool = true;
}
