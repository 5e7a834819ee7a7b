//! Redb transaction implementation.
//!
//! This module provides the `RedbTransaction` type which implements the
//! `Transaction` trait for both read-only and read-write transactions.
//!
//! # Memory-Efficient Cursors
//!
//! The cursor loads entries in batches (default 1000 entries), fetching the
//! next batch on demand as it advances, so scanning a large table never
//! materializes it in memory. Expired entries are dropped while a batch is
//! filled and never reach the caller.

use std::fmt::Display;
use std::ops::Bound;

use redb::{ReadTransaction, ReadableTable, WriteTransaction};
use tracing::{debug, warn};

use crate::backends::{bound_as_slice, bound_to_owned, max_lower_bound, range_is_empty};
use crate::engine::{
    decode_entry, encode_entry, now_millis, Cursor, CursorResult, Expiry, KeyValue, StorageError,
    Transaction,
};

use super::tables::{definition, physical_name};

/// Default batch size for cursor operations.
const DEFAULT_BATCH_SIZE: usize = 1000;

fn internal(err: impl Display) -> StorageError {
    StorageError::Internal(err.to_string())
}

/// Look up a live value in an opened table.
fn lookup<T>(table: &T, key: &[u8], now: u64) -> Result<Option<Vec<u8>>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    match table.get(key).map_err(internal)? {
        Some(stored) => {
            let (expiry, value) = decode_entry(stored.value())?;
            if expiry.is_expired_at(now) {
                Ok(None)
            } else {
                Ok(Some(value.to_vec()))
            }
        }
        None => Ok(None),
    }
}

/// Collect up to `batch_size` live entries between two bounds.
///
/// An entry whose expiry header cannot be read is kept with its raw stored
/// bytes, so a scan still lists it and callers can remove it.
fn scan_batch<T>(
    table: &T,
    start: Bound<&[u8]>,
    end: Bound<&[u8]>,
    batch_size: usize,
    now: u64,
) -> Result<Vec<KeyValue>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let mut entries = Vec::with_capacity(batch_size.min(1024));
    if range_is_empty(start, end) {
        return Ok(entries);
    }

    let range = table.range::<&[u8]>((start, end)).map_err(internal)?;
    for result in range {
        if entries.len() >= batch_size {
            break;
        }

        let (k, v) = result.map_err(internal)?;
        match decode_entry(v.value()) {
            Ok((expiry, _)) if expiry.is_expired_at(now) => {}
            Ok((_, value)) => entries.push((k.value().to_vec(), value.to_vec())),
            Err(err) => {
                warn!(key = %String::from_utf8_lossy(k.value()), %err, "entry has an unreadable expiry header");
                entries.push((k.value().to_vec(), v.value().to_vec()));
            }
        }
    }
    Ok(entries)
}

/// A transaction for the Redb storage engine.
///
/// This type wraps both read-only and read-write Redb transactions,
/// providing a unified interface through the `Transaction` trait.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }

    /// Create a range cursor that loads `batch_size` entries at a time.
    ///
    /// # Errors
    ///
    /// Currently infallible; the signature matches [`Transaction::range`].
    pub fn range_with_batch_size(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
        batch_size: usize,
    ) -> Result<RedbCursor<'_>, StorageError> {
        Ok(RedbCursor::new(self, table, start, end, batch_size.max(1)))
    }

    /// Fetch a batch of live entries from `table` within logical bounds.
    fn fetch_batch(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
        batch_size: usize,
    ) -> Result<Vec<KeyValue>, StorageError> {
        let name = physical_name(table);
        let now = now_millis();

        match self {
            Self::Read(tx) => match tx.open_table(definition(&name)) {
                Ok(t) => scan_batch(&t, start, end, batch_size, now),
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    // Nothing has been written yet
                    Ok(Vec::new())
                }
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                let t = tx.open_table(definition(&name)).map_err(internal)?;
                scan_batch(&t, start, end, batch_size, now)
            }
        }
    }
}

impl Transaction for RedbTransaction {
    type Cursor<'a>
        = RedbCursor<'a>
    where
        Self: 'a;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let name = physical_name(table);
        let now = now_millis();

        match self {
            Self::Read(tx) => match tx.open_table(definition(&name)) {
                Ok(t) => lookup(&t, key, now),
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    // A table that was never written holds no data
                    Ok(None)
                }
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                let t = tx.open_table(definition(&name)).map_err(internal)?;
                lookup(&t, key, now)
            }
        }
    }

    fn put_with_expiry(
        &mut self,
        table: &str,
        key: &[u8],
        value: &[u8],
        expiry: Expiry,
    ) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let name = physical_name(table);
                let stored = encode_entry(value, expiry);
                let mut t = tx.open_table(definition(&name)).map_err(internal)?;
                t.insert(key, stored.as_slice()).map_err(internal)?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let name = physical_name(table);
                let now = now_millis();
                let mut t = tx.open_table(definition(&name)).map_err(internal)?;
                let removed = t.remove(key).map_err(internal)?;
                Ok(match removed {
                    Some(old) => match decode_entry(old.value()) {
                        Ok((expiry, _)) => !expiry.is_expired_at(now),
                        Err(_) => true,
                    },
                    None => false,
                })
            }
        }
    }

    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        self.range_with_batch_size(table, Bound::Unbounded, Bound::Unbounded, DEFAULT_BATCH_SIZE)
    }

    fn range(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
    ) -> Result<Self::Cursor<'_>, StorageError> {
        self.range_with_batch_size(table, start, end, DEFAULT_BATCH_SIZE)
    }

    fn purge_expired(&mut self, table: &str) -> Result<usize, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let now = now_millis();
                let name = physical_name(table);
                let mut t = tx.open_table(definition(&name)).map_err(internal)?;

                let mut expired = Vec::new();
                for result in t.iter().map_err(internal)? {
                    let (k, v) = result.map_err(internal)?;
                    // Corrupted entries are left for a reader to report
                    if let Ok((expiry, _)) = decode_entry(v.value()) {
                        if expiry.is_expired_at(now) {
                            expired.push(k.value().to_vec());
                        }
                    }
                }

                for key in &expired {
                    t.remove(key.as_slice()).map_err(internal)?;
                }
                debug!(table, purged = expired.len(), "purged expired entries");
                Ok(expired.len())
            }
        }
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.abort().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Unpositioned,
    At(usize),
    Exhausted,
}

/// A batched forward cursor over live key-value pairs in Redb.
///
/// At any time the cursor holds at most `batch_size` entries in memory.
pub struct RedbCursor<'a> {
    /// Reference to the transaction for fetching additional batches.
    tx: &'a RedbTransaction,
    /// The logical table name.
    table: String,
    /// Lower bound of the cursor's range.
    start_bound: Bound<Vec<u8>>,
    /// Upper bound of the cursor's range.
    end_bound: Bound<Vec<u8>>,
    /// Current batch of entries.
    batch: Vec<KeyValue>,
    position: Position,
    /// Maximum entries per batch.
    batch_size: usize,
    /// Whether there may be entries after the current batch.
    has_more: bool,
}

impl<'a> RedbCursor<'a> {
    fn new(
        tx: &'a RedbTransaction,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
        batch_size: usize,
    ) -> Self {
        Self {
            tx,
            table: table.to_string(),
            start_bound: bound_to_owned(start),
            end_bound: bound_to_owned(end),
            batch: Vec::new(),
            position: Position::Unpositioned,
            batch_size,
            has_more: false,
        }
    }

    /// Replace the current batch with entries at or after `lower`.
    fn load_from(&mut self, lower: Bound<&[u8]>) -> Result<(), StorageError> {
        let lower = max_lower_bound(bound_as_slice(&self.start_bound), lower);
        self.batch =
            self.tx.fetch_batch(&self.table, lower, bound_as_slice(&self.end_bound), self.batch_size)?;
        self.has_more = self.batch.len() >= self.batch_size;
        self.position =
            if self.batch.is_empty() { Position::Exhausted } else { Position::At(0) };
        Ok(())
    }

    fn current_owned(&self) -> Option<KeyValue> {
        match self.position {
            Position::At(pos) => self.batch.get(pos).cloned(),
            Position::Unpositioned | Position::Exhausted => None,
        }
    }
}

impl Cursor for RedbCursor<'_> {
    fn seek(&mut self, key: &[u8]) -> CursorResult {
        self.load_from(Bound::Included(key))?;
        Ok(self.current_owned())
    }

    fn seek_first(&mut self) -> CursorResult {
        self.load_from(Bound::Unbounded)?;
        Ok(self.current_owned())
    }

    fn next(&mut self) -> CursorResult {
        match self.position {
            Position::Unpositioned => self.seek_first(),
            Position::Exhausted => Ok(None),
            Position::At(pos) if pos + 1 < self.batch.len() => {
                self.position = Position::At(pos + 1);
                Ok(self.current_owned())
            }
            Position::At(_) => {
                if !self.has_more {
                    self.position = Position::Exhausted;
                    return Ok(None);
                }
                let after = self.batch.last().map(|(k, _)| k.clone()).unwrap_or_default();
                self.load_from(Bound::Excluded(&after))?;
                Ok(self.current_owned())
            }
        }
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        match self.position {
            Position::At(pos) => self.batch.get(pos).map(|(k, v)| (k.as_slice(), v.as_slice())),
            Position::Unpositioned | Position::Exhausted => None,
        }
    }
}
