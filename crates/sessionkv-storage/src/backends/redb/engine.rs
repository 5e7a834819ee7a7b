//! Redb storage engine implementation.
//!
//! This module provides the `RedbEngine` type which implements the
//! `StorageEngine` trait using the Redb embedded database.

use std::path::Path;

use redb::Database;
use tracing::debug;

use crate::engine::{EngineOptions, OpenStore, StorageEngine, StorageError, StoreLocation};

use super::transaction::RedbTransaction;

/// A storage engine backed by Redb.
///
/// Redb serializes write transactions and lets any number of read
/// transactions run against consistent snapshots, which is the isolation
/// model the session connector relies on.
///
/// # Example
///
/// ```ignore
/// use sessionkv_storage::backends::RedbEngine;
///
/// let engine = RedbEngine::open("sessions.redb")?;
///
/// let mut tx = engine.begin_write()?;
/// tx.put("sessions", b"sess:1", b"payload")?;
/// tx.commit()?;
/// ```
pub struct RedbEngine {
    /// The underlying Redb database.
    db: Database,
}

impl RedbEngine {
    /// Open or create a database at the given path with default options.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_options(path, EngineOptions::default())
    }

    /// Open or create a database at the given path with custom options.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the parent directory cannot be created,
    /// or [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: EngineOptions,
    ) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut builder = Database::builder();
        if let Some(cache_size) = options.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path).map_err(|e| StorageError::Open(e.to_string()))?;
        debug!(path = %path.display(), "opened redb database");

        Ok(Self { db })
    }

    /// Create an in-memory database.
    ///
    /// The database will be lost when the engine is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::in_memory_with_options(EngineOptions::default())
    }

    /// Create an in-memory database with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory_with_options(options: EngineOptions) -> Result<Self, StorageError> {
        let mut builder = Database::builder();
        if let Some(cache_size) = options.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db })
    }

    /// Get the underlying Redb database.
    pub const fn inner(&self) -> &Database {
        &self.db
    }
}

impl OpenStore for RedbEngine {
    fn open_store(location: &StoreLocation, options: EngineOptions) -> Result<Self, StorageError> {
        match location {
            StoreLocation::Memory => Self::in_memory_with_options(options),
            StoreLocation::File(path) => Self::open_with_options(path, options),
        }
    }
}

impl StorageEngine for RedbEngine {
    type Transaction<'a> = RedbTransaction;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_read(tx))
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_write(tx))
    }
}
