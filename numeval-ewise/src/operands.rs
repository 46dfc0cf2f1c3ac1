//! Input operand tuples for map kernels.
//!
//! A map call takes its inputs as a tuple of views, `(a,)` up to
//! `(a, b, c, d)`. All views in a tuple share an element type but may have
//! different contiguity levels.

use numeval_core::{ContLevel, ContWhole, Element, MatrixView};

/// Tuple of `N` input views with a common element type.
pub trait Operands<const N: usize> {
    type Elem: Element;

    /// Every operand has unit-stride columns.
    const COLUMNS_CONTIGUOUS: bool;

    /// Panics unless every operand is `rows x cols`.
    fn check_shape(&self, rows: usize, cols: usize);

    /// Pointers to element `(0, 0)` of each operand.
    fn ptrs(&self) -> [*const Self::Elem; N];

    /// Pointers to element `(0, j)` of each operand.
    fn col_ptrs(&self, j: usize) -> [*const Self::Elem; N];

    fn row_steps(&self) -> [usize; N];
}

/// Operand tuples whose members are all whole-contiguous, the precondition
/// for linear access.
pub trait LinearOperands<const N: usize>: Operands<N> {}

#[inline]
pub(crate) fn check_operand<V: MatrixView>(view: &V, what: &str, rows: usize, cols: usize) {
    assert!(
        view.nrows() == rows && view.ncols() == cols,
        "{what} is {}x{}, expected {rows}x{cols}",
        view.nrows(),
        view.ncols()
    );
}

macro_rules! impl_operands {
    ($n:literal; $($v:ident . $idx:tt),+) => {
        impl<T: Element, $($v: MatrixView<Elem = T>),+> Operands<$n> for ($($v,)+) {
            type Elem = T;

            const COLUMNS_CONTIGUOUS: bool =
                $(<$v::Cont as ContLevel>::COLUMNS_CONTIGUOUS)&&+;

            #[inline]
            fn check_shape(&self, rows: usize, cols: usize) {
                $(
                    check_operand(
                        &self.$idx,
                        concat!("input ", stringify!($idx)),
                        rows,
                        cols,
                    );
                )+
            }

            #[inline(always)]
            fn ptrs(&self) -> [*const T; $n] {
                [$(self.$idx.as_ptr()),+]
            }

            #[inline(always)]
            fn col_ptrs(&self, j: usize) -> [*const T; $n] {
                [$(self.$idx.col_ptr(j)),+]
            }

            #[inline(always)]
            fn row_steps(&self) -> [usize; $n] {
                [$(self.$idx.row_step()),+]
            }
        }

        impl<T: Element, $($v: MatrixView<Elem = T, Cont = ContWhole>),+> LinearOperands<$n>
            for ($($v,)+)
        {
        }
    };
}

impl_operands!(1; A.0);
impl_operands!(2; A.0, B.1);
impl_operands!(3; A.0, B.1, C.2);
impl_operands!(4; A.0, B.1, C.2, D.3);

#[cfg(test)]
mod tests {
    use super::*;
    use numeval_core::{BlockRef, GridRef, MatRef};

    fn contiguous<I: Operands<N>, const N: usize>(_: &I) -> bool {
        I::COLUMNS_CONTIGUOUS
    }

    #[test]
    fn test_pointers() {
        let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let a = MatRef::new(&x, 3, 4).unwrap();
        let b = BlockRef::new(&x, 2, 4, 3).unwrap();
        let ops = (a, b);
        let [pa, pb] = ops.col_ptrs(2);
        assert_eq!(unsafe { *pa }, 6.0);
        assert_eq!(unsafe { *pb }, 6.0);
        assert_eq!(ops.row_steps(), [1, 1]);
        assert!(contiguous(&ops));
    }

    #[test]
    fn test_strided_not_contiguous() {
        let x: Vec<f64> = vec![0.0; 16];
        let a = MatRef::new(&x, 2, 2).unwrap();
        let g = GridRef::new(&x, 2, 2, 3, 8).unwrap();
        let ops = (a, &g);
        assert!(!contiguous(&ops));
        assert_eq!(ops.row_steps(), [1, 3]);
    }

    #[test]
    #[should_panic(expected = "input 1 is 2x3, expected 3x2")]
    fn test_shape_check() {
        let x = vec![0.0f32; 6];
        let a = MatRef::new(&x, 3, 2).unwrap();
        let b = MatRef::new(&x, 2, 3).unwrap();
        (a, b).check_shape(3, 2);
    }
}
