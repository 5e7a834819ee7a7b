//! Storage error types.

use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A transaction could not be started, committed or aborted.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A write was attempted through a read-only transaction.
    #[error("write operation on a read-only transaction")]
    ReadOnly,

    /// A stored value could not be decoded.
    #[error("corrupted entry: {0}")]
    Corrupted(String),

    /// The operation is not supported by this backend.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// An internal backend error occurred.
    #[error("internal storage error: {0}")]
    Internal(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Returns `true` if this error indicates damaged data rather than a
    /// failed operation.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupted(_))
    }
}
