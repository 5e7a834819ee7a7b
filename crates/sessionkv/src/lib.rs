//! `SessionKV` - a session storage connector over an embedded key-value store.
//!
//! # Overview
//!
//! `sessionkv` lets a web host persist session payloads in an ordered,
//! transactional key-value engine. Payloads are opaque bytes stored as
//! base64 text, optionally with a time-to-live after which they become
//! invisible. Counters can be kept alongside sessions with
//! [`Connect::sequence`].
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use sessionkv::{register_builtin, DriverRegistry, Instance, MEMORY_DRIVER};
//!
//! let mut registry = DriverRegistry::new();
//! register_builtin(&mut registry)?;
//!
//! let connector = registry.connect(MEMORY_DRIVER, &Instance::default())?;
//! connector.open()?;
//!
//! connector.write("sess:42", b"user=alice", Duration::from_secs(1800))?;
//! assert_eq!(connector.read("sess:42")?, Some(b"user=alice".to_vec()));
//! assert_eq!(connector.keys("sess:")?, vec!["sess:42".to_string()]);
//!
//! connector.close()?;
//! ```
//!
//! # Modules
//!
//! - [`connector`] - The [`Connect`] trait and the [`Connector`] implementation
//! - [`driver`] - Drivers and the [`DriverRegistry`]
//! - [`config`] - [`ConnectorConfig`]
//! - [`codec`] - Payload and counter encoding
//! - [`error`] - The crate [`enum@Error`] type

pub mod codec;
pub mod config;
pub mod connector;
pub mod driver;
pub mod error;

pub use config::ConnectorConfig;
pub use connector::{Connect, Connector};
pub use driver::{Driver, DriverRegistry, Instance, MemoryDriver, MEMORY_DRIVER};
pub use error::{Error, Result};

pub use sessionkv_storage::backends::{MemoryEngine, RedbEngine};

/// The logical table every session entry lives in.
pub const SESSIONS_TABLE: &str = "sessions";

/// Register the drivers this crate provides.
///
/// Hosts call this once while building their registry.
///
/// # Errors
///
/// Returns [`Error::DriverExists`] if a built-in name is already taken.
pub fn register_builtin(registry: &mut DriverRegistry) -> Result<()> {
    registry.register(MEMORY_DRIVER, MemoryDriver)
}
