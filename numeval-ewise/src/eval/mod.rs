//! Evaluators.
//!
//! [`MapEval`] and [`AccumEval`] are implemented by the access-mode tags.
//! The set of impls is what makes a combination legal: linear access exists
//! only for whole-contiguous operands and the scalar sink, per-column access
//! for every view and every sink.
//!
//! Each impl checks shapes once, resolves the strategy from associated consts
//! and hands off to the loops in [`linear`] / [`percol`].
//!
//! # Rejected combinations
//!
//! Per-column access takes a block input and a row-wise sink:
//!
//! ```
//! use numeval_core::{BlockRef, DynShape, MatMut};
//! use numeval_ewise::{ewise, macc, rowwise, PerCol, Scalar, Sum};
//!
//! let x = [1.0f64; 12];
//! let mut out = [0.0f64; 3];
//! ewise(Sum).accum(
//!     macc::<PerCol, Scalar>(),
//!     DynShape::new(3, 3),
//!     BlockRef::new(&x, 3, 3, 4).unwrap(),
//!     rowwise(MatMut::new(&mut out, 3, 1).unwrap()),
//! );
//! assert_eq!(out, [3.0; 3]);
//! ```
//!
//! Linear access over a block input does not compile:
//!
//! ```compile_fail
//! use numeval_core::{BlockRef, DynShape};
//! use numeval_ewise::{ewise, macc, to_scalar, Linear, Scalar, Sum};
//!
//! let x = [1.0f64; 12];
//! let mut acc = 0.0;
//! ewise(Sum).accum(
//!     macc::<Linear, Scalar>(),
//!     DynShape::new(3, 3),
//!     BlockRef::new(&x, 3, 3, 4).unwrap(),
//!     to_scalar(&mut acc),
//! );
//! ```
//!
//! Nor over a grid input:
//!
//! ```compile_fail
//! use numeval_core::{DynShape, GridRef, MatMut, MatRef};
//! use numeval_ewise::{ewise, macc, Add, Linear, Scalar};
//!
//! let x = [1.0f64; 12];
//! let mut out = [0.0f64; 6];
//! ewise(Add).map(
//!     macc::<Linear, Scalar>(),
//!     DynShape::new(3, 2),
//!     (GridRef::new(&x, 3, 2, 2, 6).unwrap(), MatRef::new(&x, 3, 2).unwrap()),
//!     MatMut::new(&mut out, 3, 2).unwrap(),
//! );
//! ```
//!
//! Nor a linear map into a block output:
//!
//! ```compile_fail
//! use numeval_core::{BlockMut, DynShape, MatRef};
//! use numeval_ewise::{ewise, macc, Clamp, Linear, Scalar};
//!
//! let x = [1.0f64; 6];
//! let mut out = [0.0f64; 8];
//! ewise(Clamp { lo: 0.0, hi: 1.0 }).map(
//!     macc::<Linear, Scalar>(),
//!     DynShape::new(3, 2),
//!     (MatRef::new(&x, 3, 2).unwrap(),),
//!     BlockMut::new(&mut out, 3, 2, 4).unwrap(),
//! );
//! ```
//!
//! Row-wise and column-wise sinks need per-column access:
//!
//! ```compile_fail
//! use numeval_core::{DynShape, MatMut, MatRef};
//! use numeval_ewise::{ewise, macc, rowwise, Linear, Scalar, Sum};
//!
//! let x = [1.0f64; 6];
//! let mut out = [0.0f64; 3];
//! ewise(Sum).accum(
//!     macc::<Linear, Scalar>(),
//!     DynShape::new(3, 2),
//!     MatRef::new(&x, 3, 2).unwrap(),
//!     rowwise(MatMut::new(&mut out, 3, 1).unwrap()),
//! );
//! ```
//!
//! ```compile_fail
//! use numeval_core::{DynShape, MatMut, MatRef};
//! use numeval_ewise::{colwise, ewise, macc, Linear, Scalar, Sum};
//!
//! let x = [1.0f64; 6];
//! let mut out = [0.0f64; 2];
//! ewise(Sum).accum(
//!     macc::<Linear, Scalar>(),
//!     DynShape::new(3, 2),
//!     MatRef::new(&x, 3, 2).unwrap(),
//!     colwise(MatMut::new(&mut out, 1, 2).unwrap()),
//! );
//! ```

pub(crate) mod linear;
pub(crate) mod percol;

use numeval_core::{
    ContLevel, ContWhole, Element, MatrixShape, MatrixView, MatrixViewMut, ScalarPack,
};

use crate::dispatch::{resolve, AccessMode, Linear, PerCol, Strategy, Vectorize};
use crate::kernel::{AccumKernel, MapKernel};
use crate::operands::{check_operand, LinearOperands, Operands};
use crate::sink::{Sink, ToScalar};

/// Map evaluation for access mode `Self` over inputs `I` into output `O`.
pub trait MapEval<I: Operands<N>, O, const N: usize>: AccessMode {
    fn map<F, U, const M: usize, const NC: usize>(
        kernel: &F,
        shape: MatrixShape<M, NC>,
        inputs: &I,
        out: &mut O,
    ) -> Strategy
    where
        F: MapKernel<I::Elem, N>,
        U: Vectorize<I::Elem>;
}

/// Accumulate evaluation for access mode `Self` over input `V` into sink `S`.
pub trait AccumEval<V: MatrixView, S>: AccessMode {
    fn accum<F, U, const M: usize, const NC: usize>(
        kernel: &F,
        shape: MatrixShape<M, NC>,
        input: &V,
        sink: &mut S,
    ) -> Strategy
    where
        F: AccumKernel<V::Elem>,
        U: Vectorize<V::Elem>;
}

// ============================================================================
// Linear
// ============================================================================

impl<I, O, const N: usize> MapEval<I, O, N> for Linear
where
    I: LinearOperands<N>,
    O: MatrixViewMut<Elem = I::Elem, Cont = ContWhole>,
{
    fn map<F, U, const M: usize, const NC: usize>(
        kernel: &F,
        shape: MatrixShape<M, NC>,
        inputs: &I,
        out: &mut O,
    ) -> Strategy
    where
        F: MapKernel<I::Elem, N>,
        U: Vectorize<I::Elem>,
    {
        let (rows, cols) = (shape.rows(), shape.cols());
        inputs.check_shape(rows, cols);
        check_operand(&*out, "output", rows, cols);

        let strategy = resolve::<I::Elem, Linear, U>(F::SIMDIZABLE, true);
        log::trace!("ewise map {strategy} over {rows}x{cols}");

        let len = shape.nelems();
        let src = inputs.ptrs();
        let dst = out.as_mut_ptr();
        // SAFETY: every operand is a whole-contiguous rows x cols view, so it
        // spans exactly `len` elements from its base pointer.
        unsafe {
            if strategy.is_vectorized() {
                linear::map::<I::Elem, U::Pack, F, N>(kernel, len, src, dst);
            } else {
                linear::map::<I::Elem, ScalarPack<I::Elem>, F, N>(kernel, len, src, dst);
            }
        }
        strategy
    }
}

impl<'a, T, V> AccumEval<V, ToScalar<'a, T>> for Linear
where
    T: Element,
    V: MatrixView<Elem = T, Cont = ContWhole>,
{
    fn accum<F, U, const M: usize, const NC: usize>(
        kernel: &F,
        shape: MatrixShape<M, NC>,
        input: &V,
        sink: &mut ToScalar<'a, T>,
    ) -> Strategy
    where
        F: AccumKernel<V::Elem>,
        U: Vectorize<V::Elem>,
    {
        let (rows, cols) = (shape.rows(), shape.cols());
        check_operand(input, "input", rows, cols);

        let strategy = resolve::<T, Linear, U>(F::SIMDIZABLE, true);
        log::trace!("ewise accum {strategy} over {rows}x{cols} into scalar");

        let len = shape.nelems();
        let src = input.as_ptr();
        // SAFETY: whole-contiguous rows x cols view.
        unsafe {
            if strategy.is_vectorized() {
                linear::accum::<T, U::Pack, F>(kernel, len, src, sink.acc());
            } else {
                linear::accum::<T, ScalarPack<T>, F>(kernel, len, src, sink.acc());
            }
        }
        strategy
    }
}

// ============================================================================
// Per-column
// ============================================================================

impl<I, O, const N: usize> MapEval<I, O, N> for PerCol
where
    I: Operands<N>,
    O: MatrixViewMut<Elem = I::Elem>,
{
    fn map<F, U, const M: usize, const NC: usize>(
        kernel: &F,
        shape: MatrixShape<M, NC>,
        inputs: &I,
        out: &mut O,
    ) -> Strategy
    where
        F: MapKernel<I::Elem, N>,
        U: Vectorize<I::Elem>,
    {
        let (rows, cols) = (shape.rows(), shape.cols());
        inputs.check_shape(rows, cols);
        check_operand(&*out, "output", rows, cols);

        let contiguous = I::COLUMNS_CONTIGUOUS && <O::Cont as ContLevel>::COLUMNS_CONTIGUOUS;
        let strategy = resolve::<I::Elem, PerCol, U>(F::SIMDIZABLE, contiguous);
        log::trace!("ewise map {strategy} over {rows}x{cols}");

        // SAFETY: shapes checked above.
        unsafe {
            if strategy.is_vectorized() {
                percol::map::<U::Pack, F, I, O, N>(kernel, rows, cols, inputs, out);
            } else {
                percol::map::<ScalarPack<I::Elem>, F, I, O, N>(kernel, rows, cols, inputs, out);
            }
        }
        strategy
    }
}

impl<V, S> AccumEval<V, S> for PerCol
where
    V: MatrixView,
    S: Sink<V::Elem>,
{
    fn accum<F, U, const M: usize, const NC: usize>(
        kernel: &F,
        shape: MatrixShape<M, NC>,
        input: &V,
        sink: &mut S,
    ) -> Strategy
    where
        F: AccumKernel<V::Elem>,
        U: Vectorize<V::Elem>,
    {
        let (rows, cols) = (shape.rows(), shape.cols());
        check_operand(input, "input", rows, cols);
        sink.check_shape(rows, cols);

        let contiguous = <V::Cont as ContLevel>::COLUMNS_CONTIGUOUS;
        let strategy = resolve::<V::Elem, PerCol, U>(F::SIMDIZABLE, contiguous);
        log::trace!("ewise accum {strategy} over {rows}x{cols}");

        // SAFETY: input and sink shapes checked above.
        unsafe {
            if strategy.is_vectorized() {
                sink.accum_percol::<F, U::Pack, V>(kernel, input, rows, cols);
            } else {
                sink.accum_percol::<F, ScalarPack<V::Elem>, V>(kernel, input, rows, cols);
            }
        }
        strategy
    }
}
