//! The session connector.
//!
//! A [`Connector`] owns one storage engine handle and exposes the session
//! operations the host framework calls: read, write, exists, delete, clear,
//! keys and sequence. Every operation runs in its own engine transaction.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, info, warn};

use sessionkv_storage::backends::RedbEngine;
use sessionkv_storage::{Cursor, Expiry, OpenStore, StorageEngine, StorageError, Transaction};

use crate::codec;
use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::SESSIONS_TABLE;

/// The session operations a host framework drives through a connector.
///
/// This trait is object-safe so drivers can hand out `Box<dyn Connect>`.
pub trait Connect: Send + Sync {
    /// Validate the configuration and open the underlying store.
    ///
    /// Opening an already open connector is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an empty store location,
    /// or [`Error::Storage`] if the store cannot be opened.
    fn open(&self) -> Result<()>;

    /// Release the store handle.
    ///
    /// Safe to call repeatedly and on a connector that was never opened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if flushing the store fails. The handle is
    /// released either way.
    fn close(&self) -> Result<()>;

    /// Read the payload stored under `key`.
    ///
    /// Returns `Ok(None)` if the key was never written, was deleted, or has
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the stored value is corrupted, whether
    /// its payload or its expiry header is damaged.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `data` under `key`, replacing any previous value.
    ///
    /// A zero `ttl` stores the entry without expiry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPayload`] if `data` is empty; nothing is written.
    fn write(&self, key: &str, data: &[u8], ttl: Duration) -> Result<()>;

    /// Check whether a live entry is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the entry's expiry header is damaged.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Remove `key`. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> Result<()>;

    /// Remove every key starting with `prefix`.
    fn clear(&self, prefix: &str) -> Result<()>;

    /// List every live key starting with `prefix`, in ascending byte order.
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Advance the counter stored under `key` by `step` and return the new value.
    ///
    /// An absent, undecodable or non-numeric counter is treated as `start`.
    /// The read and the write happen in one write transaction, so concurrent
    /// callers never lose an increment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceOverflow`] if the result does not fit in `i64`.
    /// Engine failures while reading the counter are returned as
    /// [`Error::Storage`] rather than treated as a fresh counter.
    fn sequence(&self, key: &str, start: i64, step: i64, ttl: Duration) -> Result<i64>;
}

/// A session connector backed by a transactional key-value engine.
///
/// The connector is created closed; call [`Connect::open`] before any data
/// operation. It is `Send + Sync` and meant to be shared across threads.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use sessionkv::{Connect, Connector, ConnectorConfig};
///
/// let connector: Connector = Connector::new(ConnectorConfig::in_memory());
/// connector.open()?;
/// connector.write("sess:1", b"payload", Duration::from_secs(60))?;
/// assert_eq!(connector.read("sess:1")?, Some(b"payload".to_vec()));
/// connector.close()?;
/// ```
pub struct Connector<E: OpenStore = RedbEngine> {
    config: ConnectorConfig,
    engine: RwLock<Option<Arc<E>>>,
}

impl<E: OpenStore> Connector<E> {
    /// Create a closed connector with the given configuration.
    ///
    /// No I/O happens until [`Connect::open`].
    pub fn new(config: ConnectorConfig) -> Self {
        Self { config, engine: RwLock::new(None) }
    }

    /// Create an open connector around an existing engine.
    ///
    /// The configuration is the in-memory default, so reopening after a
    /// [`Connect::close`] yields a fresh, empty store.
    pub fn from_engine(engine: Arc<E>) -> Self {
        Self { config: ConnectorConfig::default(), engine: RwLock::new(Some(engine)) }
    }

    /// The configuration this connector was created with.
    pub const fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Returns `true` if the connector currently holds an open store.
    pub fn is_open(&self) -> bool {
        self.engine.read().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Physically remove every expired session entry.
    ///
    /// Expired entries are already invisible to reads; this reclaims their
    /// space. Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionNotReady`] if the connector is not open.
    pub fn purge_expired(&self) -> Result<usize> {
        let engine = self.engine()?;
        let mut tx = engine.begin_write()?;
        let purged = tx.purge_expired(SESSIONS_TABLE)?;
        tx.commit()?;

        debug!(purged, "purged expired sessions");
        Ok(purged)
    }

    /// Clone the engine handle, releasing the lock before any engine work.
    fn engine(&self) -> Result<Arc<E>> {
        let guard = self.engine.read().map_err(|e| Error::lock_poisoned(e.to_string()))?;
        guard.as_ref().map(Arc::clone).ok_or(Error::ConnectionNotReady)
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidKey);
    }
    Ok(())
}

/// Fetch a stored value, reporting a damaged expiry header as an encoding error.
fn fetch<T: Transaction>(tx: &T, key: &str) -> Result<Option<Vec<u8>>> {
    match tx.get(SESSIONS_TABLE, key.as_bytes()) {
        Ok(stored) => Ok(stored),
        Err(StorageError::Corrupted(reason)) => Err(Error::Encoding(reason)),
        Err(e) => Err(e.into()),
    }
}

/// Decode a stored counter, or `None` if the entry holds something else.
fn stored_counter(stored: &[u8]) -> Option<i64> {
    let decoded = codec::decode_payload(stored).ok()?;
    codec::parse_counter(&decoded)
}

impl<E: OpenStore> Connect for Connector<E> {
    fn open(&self) -> Result<()> {
        let location = self.config.location()?;

        let mut guard = self.engine.write().map_err(|e| Error::lock_poisoned(e.to_string()))?;
        if guard.is_some() {
            debug!(%location, "session store already open");
            return Ok(());
        }

        let engine = E::open_store(&location, self.config.engine_options())?;
        *guard = Some(Arc::new(engine));

        info!(%location, "opened session store");
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let taken = self.engine.write().map_err(|e| Error::lock_poisoned(e.to_string()))?.take();

        let Some(engine) = taken else {
            return Ok(());
        };

        // In-flight operations keep their own clone; the store is released
        // when the last one finishes.
        engine.flush()?;
        info!(store = %self.config.store, "closed session store");
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let engine = self.engine()?;
        validate_key(key)?;

        let tx = engine.begin_read()?;
        let stored = fetch(&tx, key)?;
        match stored {
            Some(stored) => Ok(Some(codec::decode_payload(&stored)?)),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, data: &[u8], ttl: Duration) -> Result<()> {
        let engine = self.engine()?;
        validate_key(key)?;
        let encoded = codec::encode_payload(data)?;

        let mut tx = engine.begin_write()?;
        tx.put_with_expiry(SESSIONS_TABLE, key.as_bytes(), encoded.as_bytes(), Expiry::from_ttl(ttl))?;
        tx.commit()?;
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let engine = self.engine()?;
        validate_key(key)?;

        let tx = engine.begin_read()?;
        let stored = fetch(&tx, key)?;
        Ok(stored.is_some())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let engine = self.engine()?;
        validate_key(key)?;

        let mut tx = engine.begin_write()?;
        tx.delete(SESSIONS_TABLE, key.as_bytes())?;
        tx.commit()?;
        Ok(())
    }

    fn clear(&self, prefix: &str) -> Result<()> {
        let keys = self.keys(prefix)?;
        if keys.is_empty() {
            return Ok(());
        }

        let engine = self.engine()?;
        let mut tx = engine.begin_write()?;
        let mut removed = 0usize;
        for key in &keys {
            if tx.delete(SESSIONS_TABLE, key.as_bytes())? {
                removed += 1;
            }
        }
        tx.commit()?;

        debug!(prefix, removed, "cleared sessions");
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let engine = self.engine()?;
        let tx = engine.begin_read()?;
        let mut cursor = tx.cursor(SESSIONS_TABLE)?;

        let mut keys = Vec::new();
        let mut entry = cursor.seek(prefix.as_bytes())?;
        while let Some((key, _)) = entry {
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let key = String::from_utf8(key).map_err(|e| Error::Encoding(e.to_string()))?;
            keys.push(key);
            entry = cursor.next()?;
        }
        Ok(keys)
    }

    fn sequence(&self, key: &str, start: i64, step: i64, ttl: Duration) -> Result<i64> {
        let engine = self.engine()?;
        validate_key(key)?;

        let mut tx = engine.begin_write()?;
        let current = match tx.get(SESSIONS_TABLE, key.as_bytes()) {
            Ok(None) => start,
            Ok(Some(stored)) => stored_counter(&stored).unwrap_or_else(|| {
                warn!(key, start, "sequence value is not a number, restarting");
                start
            }),
            Err(StorageError::Corrupted(reason)) => {
                warn!(key, start, %reason, "sequence entry is corrupted, restarting");
                start
            }
            Err(e) => return Err(e.into()),
        };

        let next = current.checked_add(step).ok_or_else(|| Error::SequenceOverflow {
            key: key.to_string(),
            current,
            step,
        })?;

        let encoded = codec::encode_payload(&codec::format_counter(next))?;
        tx.put_with_expiry(SESSIONS_TABLE, key.as_bytes(), encoded.as_bytes(), Expiry::from_ttl(ttl))?;
        tx.commit()?;
        Ok(next)
    }
}

impl<E: OpenStore> fmt::Debug for Connector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("config", &self.config)
            .field("open", &self.is_open())
            .finish()
    }
}
