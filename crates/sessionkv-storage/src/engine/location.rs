//! Store locations and engine options.

use std::fmt;
use std::path::PathBuf;

use super::{StorageError, StorageResult};

/// The store string that selects an ephemeral in-process database.
pub const MEMORY_LOCATION: &str = ":memory:";

/// Where an engine keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Ephemeral, in-process storage; everything is lost when the engine is dropped.
    Memory,
    /// A database file on disk.
    File(PathBuf),
}

impl StoreLocation {
    /// Parse a configured store string.
    ///
    /// [`MEMORY_LOCATION`] selects [`StoreLocation::Memory`]; any other
    /// non-blank string is treated as a file path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the string is empty or blank.
    pub fn parse(store: &str) -> StorageResult<Self> {
        let trimmed = store.trim();
        if trimmed.is_empty() {
            return Err(StorageError::Open("store location is empty".to_string()));
        }
        if trimmed == MEMORY_LOCATION {
            Ok(Self::Memory)
        } else {
            Ok(Self::File(PathBuf::from(trimmed)))
        }
    }

    /// Returns `true` for ephemeral storage.
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str(MEMORY_LOCATION),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Tuning options passed to a backend when it is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Cache size in bytes. If not set, the backend default is used.
    pub cache_size: Option<usize>,
}

impl EngineOptions {
    /// Create options with backend defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}
