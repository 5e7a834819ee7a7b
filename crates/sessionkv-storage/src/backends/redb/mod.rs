//! Redb storage backend.
//!
//! This module provides a storage backend implementation using Redb,
//! a pure-Rust embedded database with ACID transactions and a
//! single-writer, multi-reader concurrency model.
//!
//! Redb has no native expiry, so every value is stored behind the
//! [`Expiry`](crate::Expiry) header and expired entries are filtered on read.
//!
//! # Example
//!
//! ```ignore
//! use sessionkv_storage::backends::RedbEngine;
//! use sessionkv_storage::{StorageEngine, Transaction};
//!
//! // Open a database (creates if it doesn't exist)
//! let engine = RedbEngine::open("sessions.redb")?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.put("sessions", b"sess:1", b"payload")?;
//! tx.commit()?;
//! ```
//!
//! # In-Memory Databases
//!
//! ```ignore
//! let engine = RedbEngine::in_memory()?;
//! ```

mod engine;
pub mod tables;
mod transaction;

pub use engine::RedbEngine;
pub use transaction::{RedbCursor, RedbTransaction};
