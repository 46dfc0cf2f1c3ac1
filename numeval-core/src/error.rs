//! Error types for matrix view construction.

use thiserror::Error;

/// Errors raised when a view cannot address the memory it was given.
///
/// Evaluation itself has no recoverable failure mode; everything that can go
/// wrong at runtime is caught here, once, when a view is built from a slice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The slice is shorter than the extent implied by shape and strides.
    #[error("buffer too small: view needs {needed} elements, slice has {len}")]
    BufferTooSmall { needed: usize, len: usize },

    /// Columns would overlap: the lead dimension is smaller than the row count.
    #[error("lead dimension {lead_dim} is smaller than the row count {rows}")]
    LeadDimTooSmall { lead_dim: usize, rows: usize },

    /// Strides under which two indices of a mutable grid share an address.
    #[error("row step {row_step} and lead dimension {lead_dim} alias a {rows}x{cols} grid")]
    StridesAlias {
        rows: usize,
        cols: usize,
        row_step: usize,
        lead_dim: usize,
    },

    /// A grid view was given a zero row step.
    #[error("row step must be at least 1")]
    ZeroStep,

    /// `rows * cols` (or the strided extent) overflows `usize`.
    #[error("shape {rows}x{cols} overflows the index type")]
    ShapeOverflow { rows: usize, cols: usize },

    /// A sub-view reaches outside its parent.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Result type for view construction.
pub type Result<T> = std::result::Result<T, ViewError>;
