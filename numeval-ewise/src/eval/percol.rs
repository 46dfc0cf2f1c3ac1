//! Column-by-column loops.
//!
//! Columns are visited left to right; within a column the linear loops of
//! [`super::linear`] run over its `rows` elements. Views with contiguous
//! columns use the pack loops, strided views the scalar strided loops.

use numeval_core::{ContLevel, Element, MatrixView, MatrixViewMut, Pack};

use super::linear;
use crate::kernel::{AccumKernel, MapKernel};
use crate::operands::Operands;

/// Column-wise map.
///
/// # Safety
/// Every input and `out` must be `rows x cols`.
pub(crate) unsafe fn map<P, F, I, O, const N: usize>(
    kernel: &F,
    rows: usize,
    cols: usize,
    inputs: &I,
    out: &mut O,
) where
    P: Pack<Elem = I::Elem>,
    F: MapKernel<I::Elem, N>,
    I: Operands<N>,
    O: MatrixViewMut<Elem = I::Elem>,
{
    let contiguous = I::COLUMNS_CONTIGUOUS && <O::Cont as ContLevel>::COLUMNS_CONTIGUOUS;
    let steps = inputs.row_steps();
    let out_step = out.row_step();
    for j in 0..cols {
        let src = inputs.col_ptrs(j);
        let dst = out.col_ptr_mut(j);
        // SAFETY: column j of each view holds `rows` elements.
        unsafe {
            if contiguous {
                linear::map::<I::Elem, P, F, N>(kernel, rows, src, dst);
            } else {
                linear::map_strided(kernel, rows, src, steps, dst, out_step);
            }
        }
    }
}

/// Accumulate column `j` of `input` into `acc`.
///
/// # Safety
/// `j < input.ncols()` and `rows == input.nrows()`.
#[inline(always)]
unsafe fn accum_column<T, P, F, V>(kernel: &F, rows: usize, input: &V, j: usize, acc: &mut T)
where
    T: Element,
    P: Pack<Elem = T>,
    F: AccumKernel<T>,
    V: MatrixView<Elem = T>,
{
    let src = input.col_ptr(j);
    // SAFETY: forwarded from the caller.
    unsafe {
        if <V::Cont as ContLevel>::COLUMNS_CONTIGUOUS {
            linear::accum::<T, P, F>(kernel, rows, src, acc);
        } else {
            linear::accum_strided(kernel, rows, src, input.row_step(), acc);
        }
    }
}

/// One running accumulator over all columns.
///
/// # Safety
/// `input` must be `rows x cols`.
pub(crate) unsafe fn accum_scalar<T, P, F, V>(
    kernel: &F,
    rows: usize,
    cols: usize,
    input: &V,
    acc: &mut T,
) where
    T: Element,
    P: Pack<Elem = T>,
    F: AccumKernel<T>,
    V: MatrixView<Elem = T>,
{
    for j in 0..cols {
        // SAFETY: j < cols.
        unsafe { accum_column::<T, P, F, V>(kernel, rows, input, j, acc) };
    }
}

/// One accumulator per column, `acc_j` seeded from and written back to `out(0, j)`.
///
/// # Safety
/// `input` must be `rows x cols` and `out` must be `1 x cols`.
pub(crate) unsafe fn accum_colwise<T, P, F, V, O>(
    kernel: &F,
    rows: usize,
    cols: usize,
    input: &V,
    out: &mut O,
) where
    T: Element,
    P: Pack<Elem = T>,
    F: AccumKernel<T>,
    V: MatrixView<Elem = T>,
    O: MatrixViewMut<Elem = T>,
{
    for j in 0..cols {
        let mut acc = out.get(0, j);
        // SAFETY: j < cols.
        unsafe { accum_column::<T, P, F, V>(kernel, rows, input, j, &mut acc) };
        out.set(0, j, acc);
    }
}

/// One accumulator per row in `stage`; column `j` is folded in before column
/// `j + 1`, lane-vertically when `P` is a real pack.
///
/// # Safety
/// `input` must be `rows x cols` and `stage` must hold `rows` elements.
pub(crate) unsafe fn accum_rowwise<T, P, F, V>(
    kernel: &F,
    rows: usize,
    cols: usize,
    input: &V,
    stage: &mut [T],
) where
    T: Element,
    P: Pack<Elem = T>,
    F: AccumKernel<T>,
    V: MatrixView<Elem = T>,
{
    debug_assert_eq!(stage.len(), rows);
    let acc = stage.as_mut_ptr();
    for j in 0..cols {
        let src = input.col_ptr(j);
        // SAFETY: column j and `stage` each hold `rows` elements and are
        // distinct allocations.
        unsafe {
            if <V::Cont as ContLevel>::COLUMNS_CONTIGUOUS {
                linear::accum_vertical::<T, P, F>(kernel, rows, src, acc);
            } else {
                linear::accum_vertical_strided(kernel, rows, src, input.row_step(), acc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Max, Mul, Sum};
    use numeval_core::{ArrayPack, BlockRef, GridMut, GridRef, MatMut, MatRef, ScalarPack};

    fn grid(rows: usize, cols: usize) -> Vec<f64> {
        (0..rows * cols).map(|k| k as f64 * 0.5 - 3.0).collect()
    }

    #[test]
    fn test_map_block_into_grid() {
        // 3x2 block (ld 4) times a 3x2 whole matrix, written to a strided grid
        let a = grid(4, 2);
        let b = grid(3, 2);
        let mut c = vec![0.0; 12];
        let av = BlockRef::new(&a, 3, 2, 4).unwrap();
        let bv = MatRef::new(&b, 3, 2).unwrap();
        let mut cv = GridMut::new(&mut c, 3, 2, 2, 6).unwrap();
        unsafe { map::<ScalarPack<f64>, _, _, _, 2>(&Mul, 3, 2, &(av, bv), &mut cv) };
        for j in 0..2 {
            for i in 0..3 {
                assert_eq!(cv.get(i, j), av.get(i, j) * bv.get(i, j));
            }
        }
        assert_eq!(c[1], 0.0);
    }

    #[test]
    fn test_map_vectorized_columns() {
        let a = grid(7, 3);
        let b = grid(7, 3);
        let mut c = vec![0.0; 21];
        let av = MatRef::new(&a, 7, 3).unwrap();
        let bv = MatRef::new(&b, 7, 3).unwrap();
        let mut cv = MatMut::new(&mut c, 7, 3).unwrap();
        unsafe { map::<ArrayPack<f64, 4>, _, _, _, 2>(&Mul, 7, 3, &(av, bv), &mut cv) };
        for k in 0..21 {
            assert_eq!(c[k], a[k] * b[k]);
        }
    }

    #[test]
    fn test_colwise_and_rowwise() {
        let x = grid(5, 3);
        let v = MatRef::new(&x, 5, 3).unwrap();

        let mut col_acc = vec![-100.0; 3];
        let mut out = MatMut::new(&mut col_acc, 1, 3).unwrap();
        unsafe { accum_colwise::<_, ArrayPack<f64, 2>, _, _, _>(&Max, 5, 3, &v, &mut out) };
        assert_eq!(col_acc, vec![x[4], x[9], x[14]]);

        let mut stage = vec![0.0; 5];
        unsafe { accum_rowwise::<_, ArrayPack<f64, 2>, _, _>(&Sum, 5, 3, &v, &mut stage) };
        for i in 0..5 {
            assert_eq!(stage[i], ((0.0 + x[i]) + x[5 + i]) + x[10 + i]);
        }
    }

    #[test]
    fn test_strided_scalar_total() {
        let x = grid(6, 4);
        // every other row of a 6x4 matrix
        let g = GridRef::new(&x, 3, 4, 2, 6).unwrap();
        let mut acc = 0.0;
        unsafe { accum_scalar::<_, ScalarPack<f64>, _, _>(&Sum, 3, 4, &g, &mut acc) };
        let mut expected = 0.0;
        for j in 0..4 {
            for i in 0..3 {
                expected += x[j * 6 + 2 * i];
            }
        }
        assert_eq!(acc, expected);
    }
}
