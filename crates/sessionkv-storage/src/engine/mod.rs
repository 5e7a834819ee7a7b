//! Storage engine traits and abstractions.
//!
//! This module defines the core traits that storage backends must implement:
//!
//! - [`StorageEngine`] - Main entry point for creating transactions
//! - [`OpenStore`] - Construction of an engine from a configured location
//! - [`Transaction`] - Get/put/delete/range operations with expiry support
//! - [`Cursor`] - Ordered iteration over key-value pairs
//!
//! Expiry is stored alongside each value by the backend; see [`Expiry`].

mod error;
mod expiry;
mod location;
mod traits;

pub use error::{StorageError, StorageResult};
pub use expiry::{decode_entry, encode_entry, now_millis, Expiry, EXPIRY_HEADER_LEN};
pub use location::{EngineOptions, StoreLocation, MEMORY_LOCATION};
pub use traits::{Cursor, CursorResult, KeyValue, OpenStore, StorageEngine, Transaction};
