//! Non-owning column-major matrix views.
//!
//! Three view families, one per contiguity level:
//!
//! - [`MatRef`] / [`MatMut`]: the whole `rows * cols` block is one run.
//! - [`BlockRef`] / [`BlockMut`]: each column is contiguous, columns are
//!   `lead_dim` apart.
//! - [`GridRef`] / [`GridMut`]: rows are `row_step` apart inside a column,
//!   columns are `lead_dim` apart.
//!
//! Views are built from slices with one extent check, after which element
//! access needs no further validation. Views borrow; they never allocate.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{Result, ViewError};
use crate::layout::{col_major_offset, ContLevel, ContNone, ContPerCol, ContWhole, DynShape};
use crate::simd::Element;

// ============================================================================
// View traits
// ============================================================================

/// Read access to a column-major matrix.
pub trait MatrixView {
    type Elem: Element;
    /// Compile-time contiguity level.
    type Cont: ContLevel;

    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;

    /// Distance, in elements, between the starts of successive columns.
    fn lead_dim(&self) -> usize;

    /// Distance, in elements, between successive rows of a column.
    #[inline(always)]
    fn row_step(&self) -> usize {
        1
    }

    /// Pointer to element `(0, 0)`.
    fn as_ptr(&self) -> *const Self::Elem;

    /// Pointer to element `(0, j)`.
    ///
    /// Computed with wrapping arithmetic; it is only dereferenceable for
    /// `j < ncols()`.
    #[inline(always)]
    fn col_ptr(&self, j: usize) -> *const Self::Elem {
        self.as_ptr().wrapping_add(j * self.lead_dim())
    }

    #[inline]
    fn nelems(&self) -> usize {
        self.nrows() * self.ncols()
    }

    #[inline]
    fn shape(&self) -> DynShape {
        DynShape::new(self.nrows(), self.ncols())
    }

    /// Element `(i, j)`. Panics when out of range.
    #[inline]
    fn get(&self, i: usize, j: usize) -> Self::Elem {
        assert!(
            i < self.nrows() && j < self.ncols(),
            "index ({i}, {j}) out of range for {}x{} view",
            self.nrows(),
            self.ncols()
        );
        // SAFETY: in range, and the view's extent was validated at construction.
        unsafe {
            *self
                .as_ptr()
                .add(col_major_offset(i, j, self.lead_dim(), self.row_step()))
        }
    }
}

/// Write access to a column-major matrix.
pub trait MatrixViewMut: MatrixView {
    fn as_mut_ptr(&mut self) -> *mut Self::Elem;

    #[inline(always)]
    fn col_ptr_mut(&mut self, j: usize) -> *mut Self::Elem {
        let ld = self.lead_dim();
        self.as_mut_ptr().wrapping_add(j * ld)
    }

    /// Overwrite element `(i, j)`. Panics when out of range.
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: Self::Elem) {
        assert!(
            i < self.nrows() && j < self.ncols(),
            "index ({i}, {j}) out of range for {}x{} view",
            self.nrows(),
            self.ncols()
        );
        let offset = col_major_offset(i, j, self.lead_dim(), self.row_step());
        // SAFETY: in range, and the view's extent was validated at construction.
        unsafe { *self.as_mut_ptr().add(offset) = value }
    }
}

macro_rules! forward_view {
    ($($r:ty),*) => {
        $(
            impl<V: MatrixView + ?Sized> MatrixView for $r {
                type Elem = V::Elem;
                type Cont = V::Cont;

                #[inline(always)]
                fn nrows(&self) -> usize {
                    (**self).nrows()
                }
                #[inline(always)]
                fn ncols(&self) -> usize {
                    (**self).ncols()
                }
                #[inline(always)]
                fn lead_dim(&self) -> usize {
                    (**self).lead_dim()
                }
                #[inline(always)]
                fn row_step(&self) -> usize {
                    (**self).row_step()
                }
                #[inline(always)]
                fn as_ptr(&self) -> *const V::Elem {
                    (**self).as_ptr()
                }
            }
        )*
    };
}

forward_view!(&V, &mut V);

impl<V: MatrixViewMut + ?Sized> MatrixViewMut for &mut V {
    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut V::Elem {
        (**self).as_mut_ptr()
    }
}

// ============================================================================
// Extent checks
// ============================================================================

/// Elements spanned by a view, from `(0, 0)` to `(rows-1, cols-1)` inclusive.
fn extent(rows: usize, cols: usize, row_step: usize, lead_dim: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Ok(0);
    }
    let overflow = ViewError::ShapeOverflow { rows, cols };
    rows.checked_mul(cols).ok_or(overflow.clone())?;
    let last_row = (rows - 1).checked_mul(row_step).ok_or(overflow.clone())?;
    let last_col = (cols - 1).checked_mul(lead_dim).ok_or(overflow.clone())?;
    last_row
        .checked_add(last_col)
        .and_then(|x| x.checked_add(1))
        .ok_or(overflow)
}

fn check_len(needed: usize, len: usize) -> Result<()> {
    if len < needed {
        return Err(ViewError::BufferTooSmall { needed, len });
    }
    Ok(())
}

/// No two `(i, j)` map to the same offset. Sufficient, not necessary: either
/// columns are separated, or rows are.
fn check_disjoint(rows: usize, cols: usize, row_step: usize, lead_dim: usize) -> Result<()> {
    if rows == 0 || cols == 0 || (rows == 1 && cols == 1) {
        return Ok(());
    }
    let col_span = (rows - 1).saturating_mul(row_step);
    let row_span = (cols - 1).saturating_mul(lead_dim);
    let cols_apart = cols == 1 || lead_dim > col_span;
    // a zero lead dimension stacks every column on the first one
    let rows_apart = lead_dim > 0 && (rows == 1 || row_step > row_span);
    if cols_apart || rows_apart {
        Ok(())
    } else {
        Err(ViewError::StridesAlias {
            rows,
            cols,
            row_step,
            lead_dim,
        })
    }
}

fn check_sub(parent: (usize, usize), r0: usize, c0: usize, m: usize, n: usize) -> Result<()> {
    let found = (r0.saturating_add(m), c0.saturating_add(n));
    if found.0 > parent.0 || found.1 > parent.1 {
        return Err(ViewError::ShapeMismatch {
            expected: parent,
            found,
        });
    }
    Ok(())
}

// ============================================================================
// View types
// ============================================================================

macro_rules! view_struct {
    ($(#[$doc:meta])* $name:ident, $ptr:ty) => {
        $(#[$doc])*
        pub struct $name<'a, T> {
            ptr: $ptr,
            rows: usize,
            cols: usize,
            lead_dim: usize,
            row_step: usize,
            _marker: PhantomData<&'a mut [T]>,
        }

        impl<T> fmt::Debug for $name<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("rows", &self.rows)
                    .field("cols", &self.cols)
                    .field("lead_dim", &self.lead_dim)
                    .field("row_step", &self.row_step)
                    .finish()
            }
        }
    };
}

macro_rules! impl_matrix_view {
    ($($name:ident => $cont:ty),*) => {
        $(
            impl<T: Element> MatrixView for $name<'_, T> {
                type Elem = T;
                type Cont = $cont;

                #[inline(always)]
                fn nrows(&self) -> usize {
                    self.rows
                }
                #[inline(always)]
                fn ncols(&self) -> usize {
                    self.cols
                }
                #[inline(always)]
                fn lead_dim(&self) -> usize {
                    self.lead_dim
                }
                #[inline(always)]
                fn row_step(&self) -> usize {
                    self.row_step
                }
                #[inline(always)]
                fn as_ptr(&self) -> *const T {
                    self.ptr as *const T
                }
            }
        )*
    };
}

macro_rules! impl_copy_ref {
    ($($name:ident),*) => {
        $(
            impl<T> Clone for $name<'_, T> {
                fn clone(&self) -> Self {
                    *self
                }
            }
            impl<T> Copy for $name<'_, T> {}

            // SAFETY: a shared view behaves like `&[T]`.
            unsafe impl<T: Sync> Send for $name<'_, T> {}
            unsafe impl<T: Sync> Sync for $name<'_, T> {}
        )*
    };
}

macro_rules! impl_send_mut {
    ($($name:ident),*) => {
        $(
            // SAFETY: a mutable view behaves like `&mut [T]`.
            unsafe impl<T: Send> Send for $name<'_, T> {}
            unsafe impl<T: Sync> Sync for $name<'_, T> {}

            impl<T: Element> MatrixViewMut for $name<'_, T> {
                #[inline(always)]
                fn as_mut_ptr(&mut self) -> *mut T {
                    self.ptr
                }
            }
        )*
    };
}

view_struct!(
    /// Shared view of a fully contiguous `rows x cols` block (lead dimension == rows).
    MatRef,
    *const T
);
view_struct!(
    /// Mutable view of a fully contiguous `rows x cols` block.
    MatMut,
    *mut T
);
view_struct!(
    /// Shared view whose columns are contiguous and `lead_dim` apart.
    BlockRef,
    *const T
);
view_struct!(
    /// Mutable view whose columns are contiguous and `lead_dim` apart.
    BlockMut,
    *mut T
);
view_struct!(
    /// Shared view with independent row and column strides.
    GridRef,
    *const T
);
view_struct!(
    /// Mutable view with independent row and column strides.
    GridMut,
    *mut T
);

impl_matrix_view!(
    MatRef => ContWhole,
    MatMut => ContWhole,
    BlockRef => ContPerCol,
    BlockMut => ContPerCol,
    GridRef => ContNone,
    GridMut => ContNone
);

impl_copy_ref!(MatRef, BlockRef, GridRef);
impl_send_mut!(MatMut, BlockMut, GridMut);

// ============================================================================
// MatRef / MatMut
// ============================================================================

impl<'a, T: Element> MatRef<'a, T> {
    /// View the first `rows * cols` elements of `data` as a column-major matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        check_len(extent(rows, cols, 1, rows)?, data.len())?;
        // SAFETY: extent checked against the slice.
        Ok(unsafe { Self::from_raw_parts(data.as_ptr(), rows, cols) })
    }

    /// # Safety
    /// `ptr` must be valid for reads of `rows * cols` elements for `'a`.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: *const T, rows: usize, cols: usize) -> Self {
        Self {
            ptr,
            rows,
            cols,
            lead_dim: rows,
            row_step: 1,
            _marker: PhantomData,
        }
    }

    /// The underlying `rows * cols` elements in column-major order.
    pub fn as_slice(&self) -> &'a [T] {
        if self.rows * self.cols == 0 {
            return &[];
        }
        // SAFETY: validated extent of a whole-contiguous view.
        unsafe { std::slice::from_raw_parts(self.ptr, self.rows * self.cols) }
    }

    /// Column `j` as an `rows x 1` whole view. Panics if `j >= cols`.
    pub fn col(&self, j: usize) -> MatRef<'a, T> {
        assert!(j < self.cols, "column {j} out of range for {} columns", self.cols);
        // SAFETY: column j lies inside the validated extent.
        unsafe { MatRef::from_raw_parts(self.col_ptr(j), self.rows, 1) }
    }

    /// Row `i` as a `1 x cols` grid view. Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> GridRef<'a, T> {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        let ptr = self.ptr.wrapping_add(i);
        // SAFETY: (i, 0..cols) lies inside the validated extent.
        unsafe { GridRef::from_raw_parts(ptr, 1, self.cols, 1, self.rows) }
    }

    /// The `m x n` sub-block starting at `(r0, c0)`.
    pub fn block(&self, r0: usize, c0: usize, m: usize, n: usize) -> Result<BlockRef<'a, T>> {
        check_sub((self.rows, self.cols), r0, c0, m, n)?;
        let start = self.ptr.wrapping_add(col_major_offset(r0, c0, self.rows, 1));
        // SAFETY: the block lies inside the validated extent.
        Ok(unsafe { BlockRef::from_raw_parts(start, m, n, self.rows) })
    }

    /// Every `row_step`-th row and `col_step`-th column of the `m x n` region
    /// that starts at `(r0, c0)`. `m` / `n` count selected rows / columns.
    pub fn grid(
        &self,
        r0: usize,
        c0: usize,
        m: usize,
        n: usize,
        row_step: usize,
        col_step: usize,
    ) -> Result<GridRef<'a, T>> {
        if row_step == 0 || col_step == 0 {
            return Err(ViewError::ZeroStep);
        }
        let spanned = |count: usize, step: usize| match count {
            0 => Some(0),
            _ => (count - 1).checked_mul(step)?.checked_add(1),
        };
        let overflow = ViewError::ShapeOverflow { rows: m, cols: n };
        let rows_spanned = spanned(m, row_step).ok_or(overflow.clone())?;
        let cols_spanned = spanned(n, col_step).ok_or(overflow)?;
        let lead_dim = col_step.checked_mul(self.rows).ok_or(ViewError::ShapeOverflow {
            rows: self.rows,
            cols: col_step,
        })?;
        check_sub((self.rows, self.cols), r0, c0, rows_spanned, cols_spanned)?;
        let start = self.ptr.wrapping_add(col_major_offset(r0, c0, self.rows, 1));
        // SAFETY: every selected element lies inside the validated extent.
        Ok(unsafe { GridRef::from_raw_parts(start, m, n, row_step, lead_dim) })
    }
}

impl<'a, T: Element> MatMut<'a, T> {
    pub fn new(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self> {
        check_len(extent(rows, cols, 1, rows)?, data.len())?;
        // SAFETY: extent checked against the slice.
        Ok(unsafe { Self::from_raw_parts(data.as_mut_ptr(), rows, cols) })
    }

    /// # Safety
    /// `ptr` must be valid for reads and writes of `rows * cols` elements for
    /// `'a`, with no other live reference to that memory.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: *mut T, rows: usize, cols: usize) -> Self {
        Self {
            ptr,
            rows,
            cols,
            lead_dim: rows,
            row_step: 1,
            _marker: PhantomData,
        }
    }

    /// Shared reborrow.
    pub fn as_ref(&self) -> MatRef<'_, T> {
        // SAFETY: same extent, shared borrow of self.
        unsafe { MatRef::from_raw_parts(self.ptr, self.rows, self.cols) }
    }

    /// Mutable reborrow for a shorter lifetime.
    pub fn rb_mut(&mut self) -> MatMut<'_, T> {
        // SAFETY: same extent, exclusive borrow of self.
        unsafe { MatMut::from_raw_parts(self.ptr, self.rows, self.cols) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.rows * self.cols == 0 {
            return &mut [];
        }
        // SAFETY: validated extent of a whole-contiguous view.
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.rows * self.cols) }
    }

    /// Column `j` as an `rows x 1` whole view. Panics if `j >= cols`.
    pub fn col_mut(&mut self, j: usize) -> MatMut<'_, T> {
        assert!(j < self.cols, "column {j} out of range for {} columns", self.cols);
        let ptr = self.col_ptr_mut(j);
        // SAFETY: column j lies inside the validated extent.
        unsafe { MatMut::from_raw_parts(ptr, self.rows, 1) }
    }

    /// Row `i` as a `1 x cols` grid view. Panics if `i >= rows`.
    pub fn row_mut(&mut self, i: usize) -> GridMut<'_, T> {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        let ptr = self.ptr.wrapping_add(i);
        // SAFETY: (i, 0..cols) lies inside the validated extent.
        unsafe { GridMut::from_raw_parts(ptr, 1, self.cols, 1, self.rows) }
    }

    pub fn block_mut(
        &mut self,
        r0: usize,
        c0: usize,
        m: usize,
        n: usize,
    ) -> Result<BlockMut<'_, T>> {
        check_sub((self.rows, self.cols), r0, c0, m, n)?;
        let start = self.ptr.wrapping_add(col_major_offset(r0, c0, self.rows, 1));
        // SAFETY: the block lies inside the validated extent.
        Ok(unsafe { BlockMut::from_raw_parts(start, m, n, self.rows) })
    }
}

// ============================================================================
// BlockRef / BlockMut
// ============================================================================

impl<'a, T: Element> BlockRef<'a, T> {
    /// View `rows x cols` elements of `data` whose columns start `lead_dim` apart.
    pub fn new(data: &'a [T], rows: usize, cols: usize, lead_dim: usize) -> Result<Self> {
        if lead_dim < rows {
            return Err(ViewError::LeadDimTooSmall { lead_dim, rows });
        }
        check_len(extent(rows, cols, 1, lead_dim)?, data.len())?;
        // SAFETY: extent checked against the slice.
        Ok(unsafe { Self::from_raw_parts(data.as_ptr(), rows, cols, lead_dim) })
    }

    /// # Safety
    /// `ptr` must be valid for reads of the extent described by the arguments
    /// for `'a`, and `lead_dim >= rows`.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: *const T, rows: usize, cols: usize, lead_dim: usize) -> Self {
        debug_assert!(lead_dim >= rows);
        Self {
            ptr,
            rows,
            cols,
            lead_dim,
            row_step: 1,
            _marker: PhantomData,
        }
    }

    /// Promote to a whole view when the columns are adjacent.
    pub fn to_whole(&self) -> Option<MatRef<'a, T>> {
        if self.lead_dim == self.rows || self.cols <= 1 {
            // SAFETY: adjacent columns make the extent one run.
            Some(unsafe { MatRef::from_raw_parts(self.ptr, self.rows, self.cols) })
        } else {
            None
        }
    }

    /// Column `j` as an `rows x 1` whole view. Panics if `j >= cols`.
    pub fn col(&self, j: usize) -> MatRef<'a, T> {
        assert!(j < self.cols, "column {j} out of range for {} columns", self.cols);
        // SAFETY: column j lies inside the validated extent.
        unsafe { MatRef::from_raw_parts(self.col_ptr(j), self.rows, 1) }
    }
}

impl<'a, T: Element> BlockMut<'a, T> {
    pub fn new(data: &'a mut [T], rows: usize, cols: usize, lead_dim: usize) -> Result<Self> {
        if lead_dim < rows {
            return Err(ViewError::LeadDimTooSmall { lead_dim, rows });
        }
        check_len(extent(rows, cols, 1, lead_dim)?, data.len())?;
        // SAFETY: extent checked against the slice.
        Ok(unsafe { Self::from_raw_parts(data.as_mut_ptr(), rows, cols, lead_dim) })
    }

    /// # Safety
    /// `ptr` must be valid for reads and writes of the described extent for
    /// `'a`, with no other live reference to it, and `lead_dim >= rows`.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: *mut T, rows: usize, cols: usize, lead_dim: usize) -> Self {
        debug_assert!(lead_dim >= rows);
        Self {
            ptr,
            rows,
            cols,
            lead_dim,
            row_step: 1,
            _marker: PhantomData,
        }
    }

    pub fn as_ref(&self) -> BlockRef<'_, T> {
        // SAFETY: same extent, shared borrow of self.
        unsafe { BlockRef::from_raw_parts(self.ptr, self.rows, self.cols, self.lead_dim) }
    }

    pub fn to_whole(self) -> Option<MatMut<'a, T>> {
        if self.lead_dim == self.rows || self.cols <= 1 {
            // SAFETY: adjacent columns make the extent one run.
            Some(unsafe { MatMut::from_raw_parts(self.ptr, self.rows, self.cols) })
        } else {
            None
        }
    }

    pub fn col_mut(&mut self, j: usize) -> MatMut<'_, T> {
        assert!(j < self.cols, "column {j} out of range for {} columns", self.cols);
        let ptr = self.col_ptr_mut(j);
        // SAFETY: column j lies inside the validated extent.
        unsafe { MatMut::from_raw_parts(ptr, self.rows, 1) }
    }
}

// ============================================================================
// GridRef / GridMut
// ============================================================================

impl<'a, T: Element> GridRef<'a, T> {
    /// View `rows x cols` elements of `data` at offsets `j * lead_dim + i * row_step`.
    pub fn new(
        data: &'a [T],
        rows: usize,
        cols: usize,
        row_step: usize,
        lead_dim: usize,
    ) -> Result<Self> {
        if row_step == 0 {
            return Err(ViewError::ZeroStep);
        }
        check_len(extent(rows, cols, row_step, lead_dim)?, data.len())?;
        // SAFETY: extent checked against the slice.
        Ok(unsafe { Self::from_raw_parts(data.as_ptr(), rows, cols, row_step, lead_dim) })
    }

    /// # Safety
    /// `ptr` must be valid for reads of the described extent for `'a`.
    #[inline]
    pub unsafe fn from_raw_parts(
        ptr: *const T,
        rows: usize,
        cols: usize,
        row_step: usize,
        lead_dim: usize,
    ) -> Self {
        Self {
            ptr,
            rows,
            cols,
            lead_dim,
            row_step,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: Element> GridMut<'a, T> {
    /// Like [`GridRef::new`], and additionally rejects strides under which two
    /// indices could share an address.
    pub fn new(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        row_step: usize,
        lead_dim: usize,
    ) -> Result<Self> {
        if row_step == 0 {
            return Err(ViewError::ZeroStep);
        }
        check_disjoint(rows, cols, row_step, lead_dim)?;
        check_len(extent(rows, cols, row_step, lead_dim)?, data.len())?;
        // SAFETY: extent checked against the slice.
        Ok(unsafe { Self::from_raw_parts(data.as_mut_ptr(), rows, cols, row_step, lead_dim) })
    }

    /// # Safety
    /// `ptr` must be valid for reads and writes of the described extent for
    /// `'a`, no two indices may alias, and no other live reference may exist.
    #[inline]
    pub unsafe fn from_raw_parts(
        ptr: *mut T,
        rows: usize,
        cols: usize,
        row_step: usize,
        lead_dim: usize,
    ) -> Self {
        Self {
            ptr,
            rows,
            cols,
            lead_dim,
            row_step,
            _marker: PhantomData,
        }
    }

    pub fn as_ref(&self) -> GridRef<'_, T> {
        // SAFETY: same extent, shared borrow of self.
        unsafe {
            GridRef::from_raw_parts(self.ptr, self.rows, self.cols, self.row_step, self.lead_dim)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iota(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_mat_ref_indexing() {
        let data = iota(12);
        let a = MatRef::new(&data, 4, 3).unwrap();
        assert_eq!(a.get(0, 0), 0.0);
        assert_eq!(a.get(3, 0), 3.0);
        assert_eq!(a.get(1, 2), 9.0);
        assert_eq!(a.lead_dim(), 4);
        assert_eq!(a.row_step(), 1);
        assert_eq!(a.as_slice().len(), 12);
    }

    #[test]
    fn test_mat_ref_too_small() {
        let data = iota(11);
        assert_eq!(
            MatRef::new(&data, 4, 3).unwrap_err(),
            ViewError::BufferTooSmall { needed: 12, len: 11 }
        );
    }

    #[test]
    fn test_overflow_rejected() {
        let data = iota(4);
        assert!(matches!(
            MatRef::new(&data, usize::MAX, 2),
            Err(ViewError::ShapeOverflow { .. })
        ));
    }

    #[test]
    fn test_empty_views() {
        let data: Vec<f64> = Vec::new();
        let a = MatRef::new(&data, 0, 5).unwrap();
        assert_eq!(a.nelems(), 0);
        assert!(a.as_slice().is_empty());
        let b = BlockRef::new(&data, 3, 0, 7).unwrap();
        assert_eq!(b.nelems(), 0);
    }

    #[test]
    fn test_col_and_row() {
        let data = iota(12);
        let a = MatRef::new(&data, 4, 3).unwrap();
        let c = a.col(2);
        assert_eq!((c.nrows(), c.ncols()), (4, 1));
        assert_eq!(c.as_slice(), &[8.0, 9.0, 10.0, 11.0]);
        let r = a.row(1);
        assert_eq!((r.nrows(), r.ncols()), (1, 3));
        assert_eq!([r.get(0, 0), r.get(0, 1), r.get(0, 2)], [1.0, 5.0, 9.0]);
    }

    #[test]
    fn test_block() {
        let data = iota(20);
        let a = MatRef::new(&data, 5, 4).unwrap();
        let b = a.block(1, 1, 3, 2).unwrap();
        assert_eq!(b.lead_dim(), 5);
        assert_eq!(b.get(0, 0), 6.0);
        assert_eq!(b.get(2, 1), 13.0);
        assert!(b.to_whole().is_none());
        assert_eq!(b.col(1).as_slice(), &[11.0, 12.0, 13.0]);

        let full = a.block(0, 1, 5, 2).unwrap();
        let whole = full.to_whole().unwrap();
        assert_eq!(whole.as_slice(), &data[5..15]);

        assert_eq!(
            a.block(3, 0, 3, 1).unwrap_err(),
            ViewError::ShapeMismatch {
                expected: (5, 4),
                found: (6, 1),
            }
        );
    }

    #[test]
    fn test_grid() {
        let data = iota(20);
        let a = MatRef::new(&data, 5, 4).unwrap();
        let g = a.grid(0, 0, 3, 2, 2, 2).unwrap();
        assert_eq!(g.row_step(), 2);
        assert_eq!(g.lead_dim(), 10);
        assert_eq!(g.get(2, 1), 14.0);
        assert_eq!(a.grid(0, 0, 3, 2, 0, 1).unwrap_err(), ViewError::ZeroStep);
        assert!(a.grid(0, 0, 3, 3, 2, 2).is_err());
    }

    #[test]
    fn test_block_lead_dim() {
        let data = iota(10);
        assert_eq!(
            BlockRef::new(&data, 4, 2, 3).unwrap_err(),
            ViewError::LeadDimTooSmall { lead_dim: 3, rows: 4 }
        );
        // needs (2-1)*6 + 4 = 10
        assert!(BlockRef::new(&data, 4, 2, 6).is_ok());
        assert!(BlockRef::new(&data, 4, 2, 7).is_err());
    }

    #[test]
    fn test_grid_mut_aliasing() {
        let mut data = vec![0.0f64; 16];
        // row-major 3x4 seen as a column-major grid
        assert!(GridMut::new(&mut data, 3, 4, 4, 1).is_ok());
        assert_eq!(
            GridMut::new(&mut data, 3, 3, 1, 2).unwrap_err(),
            ViewError::StridesAlias {
                rows: 3,
                cols: 3,
                row_step: 1,
                lead_dim: 2,
            }
        );
    }

    #[test]
    fn test_grid_mut_single_row_zero_lead_dim() {
        let mut data = [0.0f64; 4];
        // every column would land on data[0]
        assert!(matches!(
            GridMut::new(&mut data, 1, 3, 1, 0),
            Err(ViewError::StridesAlias { .. })
        ));
        assert!(GridMut::new(&mut data, 1, 1, 1, 0).is_ok());
        assert!(GridMut::new(&mut data, 0, 3, 1, 0).is_ok());

        let mut g = GridMut::new(&mut data, 1, 3, 1, 1).unwrap();
        g.set(0, 0, 1.0);
        g.set(0, 1, 2.0);
        g.set(0, 2, 3.0);
        assert_eq!(data, [1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_grid_step_overflow() {
        let data = iota(20);
        let a = MatRef::new(&data, 5, 4).unwrap();
        assert!(matches!(
            a.grid(0, 0, usize::MAX, 1, 2, 1),
            Err(ViewError::ShapeOverflow { .. })
        ));
        assert!(matches!(
            a.grid(0, 0, 1, 2, 1, usize::MAX),
            Err(ViewError::ShapeOverflow { .. })
        ));
    }

    #[test]
    fn test_mat_mut_write() {
        let mut data = vec![0.0f64; 6];
        let mut m = MatMut::new(&mut data, 2, 3).unwrap();
        m.set(1, 2, 5.0);
        m.col_mut(0).set(0, 0, 1.0);
        m.row_mut(1).set(0, 1, 3.0);
        let mut blk = m.block_mut(0, 1, 2, 2).unwrap();
        blk.set(0, 0, 2.0);
        assert_eq!(m.as_ref().get(1, 2), 5.0);
        assert_eq!(data, vec![1.0, 0.0, 2.0, 3.0, 0.0, 5.0]);
    }

    #[test]
    fn test_forwarding_impls() {
        fn total<V: MatrixView<Elem = f64>>(v: V) -> f64 {
            let mut s = 0.0;
            for j in 0..v.ncols() {
                for i in 0..v.nrows() {
                    s += v.get(i, j);
                }
            }
            s
        }
        let data = iota(6);
        let a = MatRef::new(&data, 3, 2).unwrap();
        assert_eq!(total(&a), 15.0);
        assert_eq!(total(a), 15.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range() {
        let data = iota(4);
        let a = MatRef::new(&data, 2, 2).unwrap();
        let _ = a.get(2, 0);
    }
}
