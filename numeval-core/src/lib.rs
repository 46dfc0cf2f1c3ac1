//! # Numeval Core
//!
//! Building blocks for the numeval element-wise engine.
//!
//! This crate provides:
//! - **SIMD packs**: one [`Pack`] trait over scalar, SSE, AVX and portable
//!   array packs. The pack an element uses for a [`SimdKind`] is fixed at
//!   compile time through [`SimdElement`].
//! - **Layout classification**: every view type carries a compile-time
//!   contiguity level ([`ContWhole`], [`ContPerCol`], [`ContNone`]).
//! - **Matrix views**: non-owning column-major views for each level.
//! - **Build capabilities**: which SIMD kinds this build compiled in, plus a
//!   cached runtime CPU report.

pub mod caps;
pub mod error;
pub mod layout;
pub mod simd;
pub mod view;

pub use caps::{BuildCaps, RuntimeCaps, BUILD};
pub use error::{Result, ViewError};
pub use layout::{ContKind, ContLevel, ContNone, ContPerCol, ContWhole, DynShape, MatrixShape};
pub use simd::{
    ArrayMask, ArrayPack, Avx, Element, Lanes, Pack, PackMask, ScalarMask, ScalarPack, SimdElement,
    SimdKind, Sse,
};
pub use view::{BlockMut, BlockRef, GridMut, GridRef, MatMut, MatRef, MatrixView, MatrixViewMut};
