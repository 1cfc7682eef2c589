//! Error types for grid construction.
//!
//! Queries against a built grid never fail: out-of-range lookups return `None`
//! and world-to-cell conversion clamps. Only construction from an invalid
//! configuration or a malformed layout is reported as an error.

/// Errors raised while building a [`Grid`](crate::Grid).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("cell radius must be positive, got {0}")]
    InvalidCellRadius(f32),

    #[error("world size must be positive, got {width} x {height}")]
    InvalidWorldSize { width: f32, height: f32 },

    #[error("grid would have no cells ({width} x {height})")]
    EmptyGrid { width: u32, height: u32 },

    #[error("obstacle spacing must be a finite non-negative distance, got {0}")]
    InvalidSpacing(f32),

    #[error("layout is empty")]
    EmptyLayout,

    #[error("layout row {row} has {found} cells, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown layout glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        glyph: char,
        row: usize,
        column: usize,
    },
}
