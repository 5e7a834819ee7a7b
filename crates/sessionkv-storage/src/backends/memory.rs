//! In-memory storage backend.
//!
//! `MemoryEngine` keeps every logical table in a `BTreeMap` and publishes
//! committed state as an immutable snapshot:
//!
//! - read transactions clone the current snapshot `Arc` and never block
//! - write transactions are serialized by a writer lock, mutate a private
//!   copy, and swap it in on commit
//!
//! This mirrors the single-writer, multi-reader model of the Redb backend
//! closely enough to test connector logic without touching disk.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::debug;

use crate::backends::{bound_as_slice, bound_to_owned, max_lower_bound, range_is_empty};
use crate::engine::{
    now_millis, Cursor, CursorResult, EngineOptions, Expiry, KeyValue, OpenStore, StorageEngine,
    StorageError, StoreLocation, Transaction,
};

#[derive(Debug, Clone)]
struct StoredValue {
    value: Vec<u8>,
    expiry: Expiry,
}

type Table = BTreeMap<Vec<u8>, StoredValue>;
type Tables = BTreeMap<String, Table>;

fn poisoned(what: &str) -> StorageError {
    StorageError::Internal(format!("{what} lock poisoned"))
}

/// An ephemeral storage engine backed by ordered in-process maps.
///
/// Every write transaction starts from a full copy of the committed tables,
/// so a write costs time proportional to the total number of entries. Use it
/// for tests and small stores; [`RedbEngine`](crate::backends::RedbEngine)
/// serves the in-memory case without that cost.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    /// The last committed state.
    committed: RwLock<Arc<Tables>>,
    /// Held by the single active write transaction.
    writer: Mutex<()>,
}

impl MemoryEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Result<Arc<Tables>, StorageError> {
        let committed = self.committed.read().map_err(|_| poisoned("snapshot"))?;
        Ok(Arc::clone(&committed))
    }
}

impl OpenStore for MemoryEngine {
    fn open_store(location: &StoreLocation, _options: EngineOptions) -> Result<Self, StorageError> {
        match location {
            StoreLocation::Memory => Ok(Self::new()),
            StoreLocation::File(path) => Err(StorageError::Unsupported(format!(
                "memory engine cannot open file store {}",
                path.display()
            ))),
        }
    }
}

impl StorageEngine for MemoryEngine {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        Ok(MemoryTransaction { state: TxState::Read(self.snapshot()?) })
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let guard = self.writer.lock().map_err(|_| poisoned("writer"))?;
        let working = (*self.snapshot()?).clone();
        Ok(MemoryTransaction { state: TxState::Write { engine: self, _guard: guard, working } })
    }
}

/// A transaction for the in-memory engine.
pub struct MemoryTransaction<'a> {
    state: TxState<'a>,
}

enum TxState<'a> {
    /// A read-only view of a committed snapshot.
    Read(Arc<Tables>),
    /// Holds the writer lock and a private working copy.
    Write { engine: &'a MemoryEngine, _guard: MutexGuard<'a, ()>, working: Tables },
}

impl MemoryTransaction<'_> {
    fn tables(&self) -> &Tables {
        match &self.state {
            TxState::Read(snapshot) => snapshot,
            TxState::Write { working, .. } => working,
        }
    }

    fn table(&self, name: &str) -> Option<&Table> {
        self.tables().get(name)
    }

    fn working_mut(&mut self) -> Result<&mut Tables, StorageError> {
        match &mut self.state {
            TxState::Read(_) => Err(StorageError::ReadOnly),
            TxState::Write { working, .. } => Ok(working),
        }
    }
}

impl Transaction for MemoryTransaction<'_> {
    type Cursor<'c>
        = MemoryCursor<'c>
    where
        Self: 'c;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let now = now_millis();
        Ok(self
            .table(table)
            .and_then(|t| t.get(key))
            .filter(|stored| !stored.expiry.is_expired_at(now))
            .map(|stored| stored.value.clone()))
    }

    fn put_with_expiry(
        &mut self,
        table: &str,
        key: &[u8],
        value: &[u8],
        expiry: Expiry,
    ) -> Result<(), StorageError> {
        self.working_mut()?
            .entry(table.to_string())
            .or_default()
            .insert(key.to_vec(), StoredValue { value: value.to_vec(), expiry });
        Ok(())
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        let now = now_millis();
        let removed = self.working_mut()?.get_mut(table).and_then(|t| t.remove(key));
        Ok(removed.is_some_and(|stored| !stored.expiry.is_expired_at(now)))
    }

    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        self.range(table, Bound::Unbounded, Bound::Unbounded)
    }

    fn range(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
    ) -> Result<Self::Cursor<'_>, StorageError> {
        Ok(MemoryCursor::new(self.table(table), start, end))
    }

    fn purge_expired(&mut self, table: &str) -> Result<usize, StorageError> {
        let now = now_millis();
        let Some(t) = self.working_mut()?.get_mut(table) else {
            return Ok(0);
        };
        let before = t.len();
        t.retain(|_, stored| !stored.expiry.is_expired_at(now));
        let purged = before - t.len();
        debug!(table, purged, "purged expired entries");
        Ok(purged)
    }

    fn commit(self) -> Result<(), StorageError> {
        match self.state {
            TxState::Read(_) => Ok(()),
            TxState::Write { engine, _guard, working } => {
                let mut committed = engine.committed.write().map_err(|_| poisoned("snapshot"))?;
                *committed = Arc::new(working);
                Ok(())
            }
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        matches!(self.state, TxState::Read(_))
    }
}

/// A forward cursor over live entries of one in-memory table.
pub struct MemoryCursor<'a> {
    table: Option<&'a Table>,
    start_bound: Bound<Vec<u8>>,
    end_bound: Bound<Vec<u8>>,
    current: Option<(&'a [u8], &'a [u8])>,
    started: bool,
}

impl<'a> MemoryCursor<'a> {
    fn new(table: Option<&'a Table>, start: Bound<&[u8]>, end: Bound<&[u8]>) -> Self {
        Self {
            table,
            start_bound: bound_to_owned(start),
            end_bound: bound_to_owned(end),
            current: None,
            started: false,
        }
    }

    /// Position on the first live entry at or after `lower`.
    fn position_from(&mut self, lower: Bound<&[u8]>) -> CursorResult {
        self.started = true;
        let lower = max_lower_bound(bound_as_slice(&self.start_bound), lower);
        let upper = bound_as_slice(&self.end_bound);

        self.current = match self.table {
            Some(table) if !range_is_empty(lower, upper) => {
                let now = now_millis();
                table
                    .range::<[u8], _>((lower, upper))
                    .find(|(_, stored)| !stored.expiry.is_expired_at(now))
                    .map(|(k, stored)| (k.as_slice(), stored.value.as_slice()))
            }
            _ => None,
        };
        Ok(self.current.map(|(k, v)| (k.to_vec(), v.to_vec())))
    }
}

impl Cursor for MemoryCursor<'_> {
    fn seek(&mut self, key: &[u8]) -> CursorResult {
        self.position_from(Bound::Included(key))
    }

    fn seek_first(&mut self) -> CursorResult {
        self.position_from(Bound::Unbounded)
    }

    fn next(&mut self) -> CursorResult {
        match (self.started, self.current) {
            (false, _) => self.seek_first(),
            (true, None) => Ok(None),
            (true, Some((key, _))) => self.position_from(Bound::Excluded(key)),
        }
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.current
    }
}
