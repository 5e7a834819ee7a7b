//! Error types for `SessionKV`.
//!
//! This module provides the [`enum@Error`] type returned by every connector
//! and registry operation. A key that is simply absent is never an error;
//! reads report it as `Ok(None)`.

use thiserror::Error;

use sessionkv_storage::StorageError;

/// Errors that can occur when using a session connector.
#[derive(Debug, Error)]
pub enum Error {
    /// A data operation was attempted before `open` succeeded or after `close`.
    #[error("session connection is not initialized")]
    ConnectionNotReady,

    /// The connector configuration is unusable.
    #[error("invalid session configuration: {0}")]
    InvalidConfiguration(String),

    /// A write was attempted with a payload that encodes to nothing.
    #[error("empty session data")]
    EmptyPayload,

    /// A stored value could not be decoded back into bytes.
    #[error("session data encoding error: {0}")]
    Encoding(String),

    /// The underlying storage engine failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// An empty key was supplied.
    #[error("session key must not be empty")]
    InvalidKey,

    /// Adding the step to the stored sequence value overflowed `i64`.
    #[error("sequence overflow for key {key}: {current} + {step}")]
    SequenceOverflow {
        /// The sequence key.
        key: String,
        /// The value the increment started from.
        current: i64,
        /// The requested step.
        step: i64,
    },

    /// A driver is already registered under this name.
    #[error("session driver already registered: {0}")]
    DriverExists(String),

    /// No driver is registered under this name.
    #[error("unknown session driver: {0}")]
    UnknownDriver(String),

    /// An internal lock was poisoned (a thread panicked while holding it).
    #[error("internal lock poisoned: {0}")]
    LockPoisoned(String),
}

impl Error {
    /// Returns `true` if the connector has not been opened or was closed.
    #[must_use]
    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::ConnectionNotReady)
    }

    /// Returns `true` if this is a storage engine error.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a lock poisoned error.
    #[must_use]
    pub fn lock_poisoned(msg: impl Into<String>) -> Self {
        Self::LockPoisoned(msg.into())
    }
}

/// A specialized `Result` type for session connector operations.
pub type Result<T> = std::result::Result<T, Error>;
