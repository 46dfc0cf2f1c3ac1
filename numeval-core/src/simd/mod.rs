//! SIMD packs shared by the evaluators.
//!
//! A [`Pack`] is a fixed-width vector of one [`Element`] type. Which pack an
//! element uses is decided at compile time by a [`SimdKind`] tag through
//! [`SimdElement`]. Kinds that this build cannot use (see `build.rs`) resolve
//! to [`ScalarPack`], so generic code never needs its own `cfg` switches.

mod element;
mod kind;
mod pack;
mod portable;

#[cfg(numeval_sse)]
pub mod sse;

#[cfg(numeval_avx)]
pub mod avx;

pub use element::{Element, SimdElement};
pub use kind::{Avx, Lanes, SimdKind, Sse};
pub use pack::{Pack, PackMask, ScalarMask, ScalarPack};
pub use portable::{ArrayMask, ArrayPack};

// ============================================================================
// Loop splitting
// ============================================================================

/// Elements covered by whole packs of `width` lanes.
#[inline(always)]
pub const fn major(len: usize, width: usize) -> usize {
    len - len % width
}

/// Elements left for the scalar tail after [`major`].
#[inline(always)]
pub const fn minor(len: usize, width: usize) -> usize {
    len % width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_minor() {
        assert_eq!(major(13, 4), 12);
        assert_eq!(minor(13, 4), 1);
        assert_eq!(major(3, 4), 0);
        assert_eq!(minor(3, 4), 3);
        assert_eq!(major(0, 8), 0);
        assert_eq!(major(16, 1), 16);
    }
}
