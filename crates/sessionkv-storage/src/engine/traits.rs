//! Core storage engine traits.
//!
//! This module defines the fundamental traits for storage backends:
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`OpenStore`] - Opening an engine from a [`StoreLocation`]
//! - [`Transaction`] - Transactional read/write operations
//! - [`Cursor`] - Ordered iteration over key-value pairs
//!
//! Engines are expected to follow a single-writer, multi-reader discipline:
//! write transactions are serialized, read transactions see a consistent
//! snapshot and may run concurrently.

use std::ops::Bound;
use std::sync::Arc;

use super::{EngineOptions, Expiry, StorageError, StoreLocation};

/// A key-value pair returned by cursor operations.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Result type for cursor operations that return a key-value pair.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// A storage engine that provides transactional key-value operations.
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use sessionkv_storage::{StorageEngine, StorageError, Transaction};
///
/// fn example<E: StorageEngine>(engine: &E) -> Result<(), StorageError> {
///     let mut tx = engine.begin_write()?;
///     tx.put("my_table", b"key", b"value")?;
///     tx.commit()?;
///
///     let tx = engine.begin_read()?;
///     let value = tx.get("my_table", b"key")?;
///     Ok(())
/// }
/// ```
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    ///
    /// Read transactions provide a consistent snapshot of the database.
    /// Multiple read transactions can run concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Begin a read-write transaction.
    ///
    /// Write transactions are serialized: a second writer blocks until the
    /// first one commits or rolls back.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Flush any buffered data to durable storage.
    ///
    /// The default implementation does nothing, as most backends handle
    /// durability on commit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the flush fails.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// An engine that can be opened from a configured location.
pub trait OpenStore: StorageEngine + Sized {
    /// Open or create the store at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the store cannot be opened, or
    /// [`StorageError::Unsupported`] if the backend cannot use `location`.
    fn open_store(location: &StoreLocation, options: EngineOptions) -> Result<Self, StorageError>;
}

/// A transaction that provides ACID key-value operations.
///
/// Write transactions must be explicitly committed; dropping one without
/// committing discards its changes.
///
/// Expired entries are invisible: [`Transaction::get`] reports them as absent
/// and cursors skip them, whether or not they have been purged yet.
///
/// An entry whose expiry header is unreadable makes [`Transaction::get`] fail
/// with [`StorageError::Corrupted`], while cursors yield it with its raw
/// stored bytes so it can still be listed and deleted.
pub trait Transaction {
    /// The cursor type for iteration.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Get a live value by key from a table.
    ///
    /// Returns `Ok(None)` if the key does not exist or has expired.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupted`] if the stored entry cannot be decoded,
    /// or [`StorageError::Internal`] if the backend read fails.
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a key-value pair that never expires.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or if this is a read-only transaction.
    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.put_with_expiry(table, key, value, Expiry::Never)
    }

    /// Put a key-value pair with the given expiry, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or if this is a read-only transaction.
    fn put_with_expiry(
        &mut self,
        table: &str,
        key: &[u8],
        value: &[u8],
        expiry: Expiry,
    ) -> Result<(), StorageError>;

    /// Delete a key from a table.
    ///
    /// Returns `Ok(true)` if a live entry was deleted, `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails or if this is a read-only transaction.
    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError>;

    /// Create a cursor over all live key-value pairs in a table.
    ///
    /// The cursor starts unpositioned; call [`Cursor::seek`],
    /// [`Cursor::seek_first`] or [`Cursor::next`] to move it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot open the table.
    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError>;

    /// Create a cursor over a range of keys in a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot open the table.
    fn range(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
    ) -> Result<Self::Cursor<'_>, StorageError>;

    /// Physically remove every expired entry in a table.
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep fails or if this is a read-only transaction.
    fn purge_expired(&mut self, table: &str) -> Result<usize, StorageError>;

    /// Commit the transaction, making all changes durable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(self) -> Result<(), StorageError>;

    /// Rollback the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    fn rollback(self) -> Result<(), StorageError>;

    /// Check if this is a read-only transaction.
    fn is_read_only(&self) -> bool;
}

/// A cursor for ordered forward iteration over key-value pairs.
///
/// # Iteration Pattern
///
/// ```ignore
/// let mut cursor = tx.cursor("my_table")?;
///
/// // Position at first key >= "prefix"
/// let mut entry = cursor.seek(b"prefix")?;
/// while let Some((key, value)) = entry {
///     if !key.starts_with(b"prefix") {
///         break;
///     }
///     entry = cursor.next()?;
/// }
/// ```
pub trait Cursor {
    /// Seek to the first key greater than or equal to `key`.
    ///
    /// Returns the entry at the new position, or `None` if no such key exists.
    fn seek(&mut self, key: &[u8]) -> CursorResult;

    /// Seek to the first key-value pair.
    fn seek_first(&mut self) -> CursorResult;

    /// Move to the next key-value pair.
    ///
    /// An unpositioned cursor moves to the first entry.
    fn next(&mut self) -> CursorResult;

    /// Get the current key-value pair without advancing.
    fn current(&self) -> Option<(&[u8], &[u8])>;
}

// ============================================================================
// Blanket Implementations
// ============================================================================

/// Implement `StorageEngine` for `Arc<E>` to allow shared ownership of engines.
impl<E: StorageEngine> StorageEngine for Arc<E> {
    type Transaction<'a>
        = E::Transaction<'a>
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_read()
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_write()
    }

    fn flush(&self) -> Result<(), StorageError> {
        (**self).flush()
    }
}
