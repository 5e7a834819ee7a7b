//! `SessionKV` Storage
//!
//! This crate provides the storage engine abstraction and backend implementations
//! used by the `sessionkv` connector.
//!
//! # Overview
//!
//! The storage layer exposes an ordered, transactional key-value interface with
//! optional per-entry expiry. Backends implement the traits in [`engine`] so the
//! connector can run against a real embedded database or an in-memory fake
//! without changing its logic.
//!
//! # Core Traits
//!
//! - [`StorageEngine`] - Entry point for beginning transactions
//! - [`OpenStore`] - Opens an engine from a [`StoreLocation`]
//! - [`Transaction`] - Read/write operations, expiry-aware puts and sweeps
//! - [`Cursor`] - Ordered forward iteration over key-value pairs
//!
//! # Error Handling
//!
//! All storage operations return [`StorageResult<T>`], an alias for
//! `Result<T, StorageError>`. A missing key is `Ok(None)`, never an error.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use sessionkv_storage::{Expiry, StorageEngine, Transaction};
//! use sessionkv_storage::backends::RedbEngine;
//!
//! let engine = RedbEngine::in_memory()?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.put_with_expiry("sessions", b"sess:1", b"payload", Expiry::from_ttl(Duration::from_secs(60)))?;
//! tx.commit()?;
//!
//! let tx = engine.begin_read()?;
//! assert_eq!(tx.get("sessions", b"sess:1")?, Some(b"payload".to_vec()));
//! ```
//!
//! # Modules
//!
//! - [`engine`] - Storage engine traits, errors and expiry handling
//! - [`backends`] - Concrete storage backend implementations

pub mod backends;
pub mod engine;

pub use engine::{
    Cursor, CursorResult, EngineOptions, Expiry, KeyValue, OpenStore, StorageEngine,
    StorageError, StorageResult, StoreLocation, Transaction, MEMORY_LOCATION,
};
