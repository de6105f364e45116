//! Error types for vera-index.

use thiserror::Error;

/// Result type for vera-index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vera-index operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Dimension mismatch between a vector and the index.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions.
        expected: usize,
        /// Actual dimensions provided.
        actual: usize,
    },

    /// Invalid index parameters (e.g. zero dimensions).
    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    /// Persistence error (serialization, corrupt snapshot).
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
