//! Connector configuration.

use serde::{Deserialize, Serialize};

use sessionkv_storage::{EngineOptions, StoreLocation, MEMORY_LOCATION};

use crate::error::{Error, Result};

/// Configuration for a session connector.
///
/// Deserializes from any serde format; missing fields take their defaults,
/// so an empty table yields an ephemeral in-memory store.
///
/// # Example
///
/// ```ignore
/// use sessionkv::ConnectorConfig;
///
/// let config = ConnectorConfig::default()
///     .with_store("/var/lib/app/sessions.redb")
///     .with_cache_size(16 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Store location: a file path, or `":memory:"` for a store that lives
    /// only as long as the connector.
    pub store: String,

    /// Engine cache size in bytes. If not set, the engine default is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<usize>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self { store: MEMORY_LOCATION.to_string(), cache_size: None }
    }
}

impl ConnectorConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for an ephemeral in-memory store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Set the store location.
    #[must_use]
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = store.into();
        self
    }

    /// Set the engine cache size.
    #[must_use]
    pub const fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Validate and parse the store location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the store location is empty.
    pub fn location(&self) -> Result<StoreLocation> {
        StoreLocation::parse(&self.store)
            .map_err(|_| Error::config("store location must not be empty"))
    }

    /// Engine options derived from this configuration.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions { cache_size: self.cache_size }
    }
}
