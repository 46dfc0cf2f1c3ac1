//! Compile-time layout classification and matrix shapes.
//!
//! All matrices are column-major: element `(i, j)` of a view with lead
//! dimension `ld` and row step `rs` lives at offset `j * ld + i * rs`.
//!
//! The contiguity level of a view type decides which traversals are legal:
//!
//! | Level | Meaning | Linear access | Per-column access |
//! |-------|---------|---------------|-------------------|
//! | [`ContWhole`] | the whole `rows * cols` block is one run | yes | yes |
//! | [`ContPerCol`] | each column is one run, columns are not adjacent | no | yes |
//! | [`ContNone`] | rows within a column may be strided | no | yes (scalar) |

/// Runtime mirror of a contiguity level, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContKind {
    Whole,
    PerCol,
    None,
}

/// Contiguity level of a view type. Fixed at compile time.
pub trait ContLevel: Copy + Default + 'static {
    const KIND: ContKind;
    /// Each column is a unit-stride run, so packs can be loaded from it.
    const COLUMNS_CONTIGUOUS: bool;
}

/// The entire block is one contiguous run (lead dimension == rows).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContWhole;

/// Each column is contiguous; the lead dimension may exceed the row count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContPerCol;

/// Arbitrary strides in both dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContNone;

impl ContLevel for ContWhole {
    const KIND: ContKind = ContKind::Whole;
    const COLUMNS_CONTIGUOUS: bool = true;
}

impl ContLevel for ContPerCol {
    const KIND: ContKind = ContKind::PerCol;
    const COLUMNS_CONTIGUOUS: bool = true;
}

impl ContLevel for ContNone {
    const KIND: ContKind = ContKind::None;
    const COLUMNS_CONTIGUOUS: bool = false;
}

/// Column-major offset of `(i, j)` for lead dimension `ld` and row step `rs`.
#[inline(always)]
pub fn col_major_offset(i: usize, j: usize, ld: usize, rs: usize) -> usize {
    j * ld + i * rs
}

/// Matrix shape with optional compile-time dimensions.
///
/// `M` / `N` of `0` mean the dimension is only known at runtime. When a
/// dimension is fixed, [`rows`](Self::rows) / [`cols`](Self::cols) return the
/// constant, which lets loops over small fixed shapes fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixShape<const M: usize = 0, const N: usize = 0> {
    rows: usize,
    cols: usize,
}

/// Shape whose dimensions are both runtime values.
pub type DynShape = MatrixShape<0, 0>;

impl<const M: usize, const N: usize> MatrixShape<M, N> {
    /// Create a shape. Panics if a runtime value contradicts a fixed dimension
    /// or if `rows * cols` overflows.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(M == 0 || rows == M, "rows {rows} != compile-time rows {M}");
        assert!(N == 0 || cols == N, "cols {cols} != compile-time cols {N}");
        assert!(
            rows.checked_mul(cols).is_some(),
            "shape {rows}x{cols} overflows usize"
        );
        Self { rows, cols }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        if M != 0 {
            M
        } else {
            self.rows
        }
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        if N != 0 {
            N
        } else {
            self.cols
        }
    }

    /// Total element count `rows * cols`.
    #[inline(always)]
    pub fn nelems(&self) -> usize {
        self.rows() * self.cols()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nelems() == 0
    }

    /// `true` when both dimensions are compile-time constants.
    pub const fn is_static() -> bool {
        M != 0 && N != 0
    }
}

impl DynShape {
    /// Shape of an existing view.
    pub fn of<V: crate::view::MatrixView>(view: &V) -> Self {
        Self::new(view.nrows(), view.ncols())
    }
}

impl<const M: usize, const N: usize> From<(usize, usize)> for MatrixShape<M, N> {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::new(rows, cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cont_levels() {
        assert_eq!(ContWhole::KIND, ContKind::Whole);
        assert!(ContWhole::COLUMNS_CONTIGUOUS);
        assert!(ContPerCol::COLUMNS_CONTIGUOUS);
        assert!(!ContNone::COLUMNS_CONTIGUOUS);
    }

    #[test]
    fn test_offset() {
        // 3x2 block inside a buffer with ld = 5
        assert_eq!(col_major_offset(0, 0, 5, 1), 0);
        assert_eq!(col_major_offset(2, 0, 5, 1), 2);
        assert_eq!(col_major_offset(1, 1, 5, 1), 6);
        // row step 2
        assert_eq!(col_major_offset(2, 1, 10, 2), 14);
    }

    #[test]
    fn test_static_shape() {
        let s = MatrixShape::<4, 3>::new(4, 3);
        assert_eq!(s.rows(), 4);
        assert_eq!(s.cols(), 3);
        assert_eq!(s.nelems(), 12);
        assert!(MatrixShape::<4, 3>::is_static());
        assert!(!MatrixShape::<4, 0>::is_static());
    }

    #[test]
    fn test_dynamic_shape() {
        let s = DynShape::new(13, 9);
        assert_eq!((s.rows(), s.cols()), (13, 9));
        assert!(!s.is_empty());
        assert!(DynShape::new(0, 9).is_empty());
        assert!(DynShape::new(5, 0).is_empty());
    }

    #[test]
    #[should_panic(expected = "compile-time rows")]
    fn test_static_mismatch() {
        let _ = MatrixShape::<4, 0>::new(5, 2);
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn test_overflow() {
        let _ = DynShape::new(usize::MAX, 2);
    }
}
