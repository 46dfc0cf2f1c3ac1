//! Front end: `ewise(kernel).map(..)` and `ewise(kernel).accum(..)`.

use numeval_core::{MatrixShape, MatrixView};

use crate::dispatch::{Macc, Strategy, Vectorize};
use crate::eval::{AccumEval, MapEval};
use crate::kernel::{AccumKernel, MapKernel};
use crate::operands::Operands;

/// A kernel ready to be evaluated over matrices.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ewise<F> {
    kernel: F,
}

/// Wrap `kernel` for evaluation.
pub fn ewise<F>(kernel: F) -> Ewise<F> {
    Ewise { kernel }
}

impl<F> Ewise<F> {
    pub fn kernel(&self) -> &F {
        &self.kernel
    }

    /// `out(i, j) = kernel(inputs(i, j))` for every position of `shape`.
    ///
    /// `inputs` is a tuple of one to four views. `mode` picks the access
    /// pattern and the vectorization request; combinations that are not legal
    /// for the operand layouts do not compile, and requests that cannot be
    /// honored fall back to scalar. Returns the strategy that ran.
    ///
    /// # Panics
    /// If any input or the output is not `shape.rows() x shape.cols()`.
    pub fn map<A, U, I, O, const N: usize, const M: usize, const NC: usize>(
        &self,
        _mode: Macc<A, U>,
        shape: MatrixShape<M, NC>,
        inputs: I,
        mut out: O,
    ) -> Strategy
    where
        I: Operands<N>,
        F: MapKernel<I::Elem, N>,
        U: Vectorize<I::Elem>,
        A: MapEval<I, O, N>,
    {
        A::map::<F, U, M, NC>(&self.kernel, shape, &inputs, &mut out)
    }

    /// Fold every element of `input` into `sink` with the kernel's combine.
    ///
    /// Linear access folds in increasing column-major index order. Per-column
    /// access folds column by column, top to bottom; row-wise and
    /// column-wise sinks are available only there. Returns the strategy that
    /// ran.
    ///
    /// # Panics
    /// If `input` is not `shape.rows() x shape.cols()` or the sink's storage
    /// does not match.
    pub fn accum<A, U, V, S, const M: usize, const NC: usize>(
        &self,
        _mode: Macc<A, U>,
        shape: MatrixShape<M, NC>,
        input: V,
        mut sink: S,
    ) -> Strategy
    where
        V: MatrixView,
        F: AccumKernel<V::Elem>,
        U: Vectorize<V::Elem>,
        A: AccumEval<V, S>,
    {
        A::accum::<F, U, M, NC>(&self.kernel, shape, &input, &mut sink)
    }
}
