//! Drivers and the driver registry.
//!
//! A host framework keeps one [`DriverRegistry`], registers the drivers it
//! wants at start-up, and asks the registry for a connector per configured
//! session instance.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use sessionkv_storage::backends::RedbEngine;

use crate::config::ConnectorConfig;
use crate::connector::{Connect, Connector};
use crate::error::{Error, Result};

/// The name the built-in driver registers under.
pub const MEMORY_DRIVER: &str = "memory";

/// A configured session instance, as described by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instance {
    /// Instance name, used for diagnostics.
    pub name: String,
    /// Connector configuration for this instance.
    pub config: ConnectorConfig,
}

impl Instance {
    /// Create an instance descriptor.
    pub fn new(name: impl Into<String>, config: ConnectorConfig) -> Self {
        Self { name: name.into(), config }
    }
}

/// A factory for session connectors.
pub trait Driver: Send + Sync {
    /// Build a closed connector for `instance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot serve this instance.
    fn connect(&self, instance: &Instance) -> Result<Box<dyn Connect>>;
}

/// The built-in driver: connectors over the embedded redb engine.
///
/// With the default `":memory:"` store the data lives only as long as the
/// connector; a file path makes it persistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryDriver;

impl Driver for MemoryDriver {
    fn connect(&self, instance: &Instance) -> Result<Box<dyn Connect>> {
        debug!(instance = %instance.name, store = %instance.config.store, "creating session connector");
        Ok(Box::new(Connector::<RedbEngine>::new(instance.config.clone())))
    }
}

/// Named drivers available to a host.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<String, Box<dyn Driver>>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `driver` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DriverExists`] if the name is taken; the existing
    /// driver is kept.
    pub fn register(&mut self, name: impl Into<String>, driver: impl Driver + 'static) -> Result<()> {
        let name = name.into();
        if self.drivers.contains_key(&name) {
            return Err(Error::DriverExists(name));
        }
        debug!(driver = %name, "registered session driver");
        self.drivers.insert(name, Box::new(driver));
        Ok(())
    }

    /// Look up a driver by name.
    pub fn get(&self, name: &str) -> Option<&dyn Driver> {
        self.drivers.get(name).map(|driver| &**driver)
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.drivers.keys().map(String::as_str).collect()
    }

    /// Build a connector for `instance` with the driver named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDriver`] if no driver has that name.
    pub fn connect(&self, name: &str, instance: &Instance) -> Result<Box<dyn Connect>> {
        let driver = self.get(name).ok_or_else(|| Error::UnknownDriver(name.to_string()))?;
        driver.connect(instance)
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry").field("drivers", &self.names()).finish()
    }
}
