//! Storage backend implementations.
//!
//! This module contains concrete implementations of the storage engine traits.
//!
//! # Available Backends
//!
//! - [`redb`] - Pure-Rust embedded database with ACID transactions
//! - [`memory`] - Copy-on-write `BTreeMap` store for tests and embedding

pub mod memory;
pub mod redb;

use std::ops::Bound;

pub use self::memory::{MemoryCursor, MemoryEngine, MemoryTransaction};
pub use self::redb::{RedbCursor, RedbEngine, RedbTransaction};

/// Returns `true` if no key can satisfy both bounds.
///
/// Ordered maps panic or misbehave when handed an inverted range, so cursors
/// check this before scanning.
pub(crate) fn range_is_empty(start: Bound<&[u8]>, end: Bound<&[u8]>) -> bool {
    match (start, end) {
        (Bound::Included(s), Bound::Included(e)) => s > e,
        (Bound::Included(s) | Bound::Excluded(s), Bound::Excluded(e))
        | (Bound::Excluded(s), Bound::Included(e)) => s >= e,
        _ => false,
    }
}

/// Convert a `Bound<&[u8]>` to `Bound<Vec<u8>>`.
pub(crate) fn bound_to_owned(bound: Bound<&[u8]>) -> Bound<Vec<u8>> {
    match bound {
        Bound::Included(b) => Bound::Included(b.to_vec()),
        Bound::Excluded(b) => Bound::Excluded(b.to_vec()),
        Bound::Unbounded => Bound::Unbounded,
    }
}

/// Borrow a `Bound<Vec<u8>>` as a `Bound<&[u8]>`.
pub(crate) fn bound_as_slice(bound: &Bound<Vec<u8>>) -> Bound<&[u8]> {
    match bound {
        Bound::Included(b) => Bound::Included(b.as_slice()),
        Bound::Excluded(b) => Bound::Excluded(b.as_slice()),
        Bound::Unbounded => Bound::Unbounded,
    }
}

/// The tighter of two lower bounds.
pub(crate) fn max_lower_bound<'a>(a: Bound<&'a [u8]>, b: Bound<&'a [u8]>) -> Bound<&'a [u8]> {
    match (a, b) {
        (Bound::Unbounded, other) | (other, Bound::Unbounded) => other,
        (Bound::Included(x), Bound::Included(y)) => Bound::Included(x.max(y)),
        (Bound::Excluded(x), Bound::Excluded(y)) => Bound::Excluded(x.max(y)),
        (Bound::Included(i), Bound::Excluded(e)) | (Bound::Excluded(e), Bound::Included(i)) => {
            if i > e {
                Bound::Included(i)
            } else {
                Bound::Excluded(e)
            }
        }
    }
}
