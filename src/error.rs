//! Error types for proxima.

use thiserror::Error;

/// Errors that can occur during indexing/search operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// `insert` called with an id that is already present (or with the
    /// reserved sentinel id `u64::MAX`).
    #[error("duplicate id: {0}")]
    DuplicateId(u64),

    /// An operation referenced an id that is not in the index.
    #[error("unknown id: {0}")]
    UnknownId(u64),

    /// Input vector length does not match the index dimension.
    #[error("dimension mismatch: index expects {expected} dimensions, input has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `search` on an index that contains only the sentinel.
    #[error("index is empty")]
    EmptyIndex,

    /// `insert` received an empty payload.
    #[error("payload is empty")]
    NullData,
}

/// Result type alias for proxima operations.
pub type Result<T> = std::result::Result<T, IndexError>;
