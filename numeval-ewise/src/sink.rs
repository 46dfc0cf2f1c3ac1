//! Reduction result adapters.
//!
//! A sink borrows the caller's storage for the duration of one accumulate
//! call. It reads each accumulator's seed once before the first combine and
//! writes the final value back; nothing else is retained.
//!
//! | Sink | Storage | Access modes |
//! |------|---------|--------------|
//! | [`ToScalar`] | `&mut T` | linear, per-column |
//! | [`Rowwise`] | `m x 1` view, one value per row | per-column |
//! | [`Colwise`] | `1 x n` view, one value per column | per-column |

use smallvec::SmallVec;

use numeval_core::{Element, MatrixView, MatrixViewMut, Pack};

use crate::eval::percol;
use crate::kernel::AccumKernel;
use crate::operands::check_operand;

/// Rows staged on the stack by [`Rowwise`] before spilling to the heap.
pub const ROWWISE_INLINE: usize = 64;

/// Destination for a per-column accumulation.
pub trait Sink<T: Element> {
    /// Panics unless the sink's storage fits a `rows x cols` input.
    fn check_shape(&self, rows: usize, cols: usize);

    /// Fold `input` into the sink column by column.
    ///
    /// # Safety
    /// `input` must be `rows x cols` and [`check_shape`](Self::check_shape)
    /// must have passed.
    unsafe fn accum_percol<F, P, V>(&mut self, kernel: &F, input: &V, rows: usize, cols: usize)
    where
        F: AccumKernel<T>,
        P: Pack<Elem = T>,
        V: MatrixView<Elem = T>;
}

// ============================================================================
// Scalar
// ============================================================================

/// Single accumulator.
#[derive(Debug)]
pub struct ToScalar<'a, T>(&'a mut T);

/// Accumulate into `acc`, starting from its current value.
pub fn to_scalar<T: Element>(acc: &mut T) -> ToScalar<'_, T> {
    ToScalar(acc)
}

impl<T: Element> ToScalar<'_, T> {
    #[inline(always)]
    pub(crate) fn acc(&mut self) -> &mut T {
        self.0
    }
}

impl<T: Element> Sink<T> for ToScalar<'_, T> {
    #[inline]
    fn check_shape(&self, _rows: usize, _cols: usize) {}

    #[inline]
    unsafe fn accum_percol<F, P, V>(&mut self, kernel: &F, input: &V, rows: usize, cols: usize)
    where
        F: AccumKernel<T>,
        P: Pack<Elem = T>,
        V: MatrixView<Elem = T>,
    {
        // SAFETY: forwarded from the caller.
        unsafe { percol::accum_scalar::<T, P, F, V>(kernel, rows, cols, input, self.0) }
    }
}

// ============================================================================
// Row-wise
// ============================================================================

/// One accumulator per input row, stored in an `m x 1` view.
#[derive(Debug)]
pub struct Rowwise<O>(O);

/// Accumulate each row of the input into `out(i, 0)`.
pub fn rowwise<O: MatrixViewMut>(out: O) -> Rowwise<O> {
    Rowwise(out)
}

impl<T: Element, O: MatrixViewMut<Elem = T>> Sink<T> for Rowwise<O> {
    fn check_shape(&self, rows: usize, _cols: usize) {
        check_operand(&self.0, "row-wise output", rows, 1);
    }

    unsafe fn accum_percol<F, P, V>(&mut self, kernel: &F, input: &V, rows: usize, cols: usize)
    where
        F: AccumKernel<T>,
        P: Pack<Elem = T>,
        V: MatrixView<Elem = T>,
    {
        let mut stage: SmallVec<[T; ROWWISE_INLINE]> =
            (0..rows).map(|i| self.0.get(i, 0)).collect();
        // SAFETY: `stage` holds `rows` elements; the rest is forwarded.
        unsafe { percol::accum_rowwise::<T, P, F, V>(kernel, rows, cols, input, &mut stage) };
        for (i, &acc) in stage.iter().enumerate() {
            self.0.set(i, 0, acc);
        }
    }
}

// ============================================================================
// Column-wise
// ============================================================================

/// One accumulator per input column, stored in a `1 x n` view.
#[derive(Debug)]
pub struct Colwise<O>(O);

/// Accumulate each column of the input into `out(0, j)`.
pub fn colwise<O: MatrixViewMut>(out: O) -> Colwise<O> {
    Colwise(out)
}

impl<T: Element, O: MatrixViewMut<Elem = T>> Sink<T> for Colwise<O> {
    fn check_shape(&self, _rows: usize, cols: usize) {
        check_operand(&self.0, "column-wise output", 1, cols);
    }

    unsafe fn accum_percol<F, P, V>(&mut self, kernel: &F, input: &V, rows: usize, cols: usize)
    where
        F: AccumKernel<T>,
        P: Pack<Elem = T>,
        V: MatrixView<Elem = T>,
    {
        // SAFETY: forwarded from the caller.
        unsafe { percol::accum_colwise::<T, P, F, V, O>(kernel, rows, cols, input, &mut self.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Min, Sum};
    use numeval_core::{GridMut, MatMut, MatRef, ScalarPack};

    #[test]
    fn test_to_scalar_keeps_seed_on_empty() {
        let x: Vec<f64> = Vec::new();
        let v = MatRef::new(&x, 0, 4).unwrap();
        let mut acc = 2.5;
        let mut sink = to_scalar(&mut acc);
        unsafe { sink.accum_percol::<_, ScalarPack<f64>, _>(&Sum, &v, 0, 4) };
        assert_eq!(acc, 2.5);
    }

    #[test]
    fn test_rowwise_into_strided_output() {
        // 3 rows x 2 cols; output rows live at stride 2
        let x = [1.0, 5.0, -2.0, 3.0, 0.0, 7.0];
        let v = MatRef::new(&x, 3, 2).unwrap();
        let mut out = [0.5, 9.0, 0.5, 9.0, 0.5];
        let mut sink = rowwise(GridMut::new(&mut out, 3, 1, 2, 5).unwrap());
        sink.check_shape(3, 2);
        unsafe { sink.accum_percol::<_, ScalarPack<f64>, _>(&Min, &v, 3, 2) };
        assert_eq!(out, [0.5, 9.0, 0.0, 9.0, -2.0]);
    }

    #[test]
    fn test_rowwise_spills_past_inline() {
        let rows = ROWWISE_INLINE + 3;
        let x: Vec<f64> = (0..rows * 2).map(|k| k as f64).collect();
        let v = MatRef::new(&x, rows, 2).unwrap();
        let mut out = vec![1.0; rows];
        let mut sink = rowwise(MatMut::new(&mut out, rows, 1).unwrap());
        unsafe { sink.accum_percol::<_, ScalarPack<f64>, _>(&Sum, &v, rows, 2) };
        for i in 0..rows {
            assert_eq!(out[i], 1.0 + x[i] + x[rows + i]);
        }
    }

    #[test]
    #[should_panic(expected = "column-wise output is 1x2, expected 1x3")]
    fn test_colwise_shape() {
        let mut out = [0.0f64; 2];
        let sink = colwise(MatMut::new(&mut out, 1, 2).unwrap());
        Sink::<f64>::check_shape(&sink, 4, 3);
    }
}
