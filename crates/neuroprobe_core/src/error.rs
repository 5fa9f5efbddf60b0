//! Error types for neuroprobe_core.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the attribution and similarity engine.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A vector or matrix had the wrong length.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// An operation that needs at least one element received none.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A hidden-unit, class or corpus index was out of bounds.
    #[error("Index {index} out of range for length {length}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the indexed collection.
        length: usize,
    },

    /// Configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CoreError {
    /// Shorthand for a length check failure.
    pub fn dimension(expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { expected, got }
    }

    /// Shorthand for an out-of-range index.
    pub fn out_of_range(index: usize, length: usize) -> Self {
        Self::IndexOutOfRange { index, length }
    }
}
