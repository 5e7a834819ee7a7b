//! Per-entry expiry.
//!
//! Backends persist an [`Expiry`] in front of every stored value as a fixed
//! 8-byte big-endian deadline in Unix milliseconds, where `0` means the entry
//! never expires. Deadlines are absolute so file-backed stores keep honoring
//! them across restarts.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{StorageError, StorageResult};

/// Length of the expiry header that prefixes every stored value.
pub const EXPIRY_HEADER_LEN: usize = 8;

/// When a stored entry stops being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// The entry persists until deleted.
    #[default]
    Never,
    /// The entry expires at the given Unix timestamp in milliseconds.
    At(u64),
}

impl Expiry {
    /// Build an expiry from a time-to-live measured from now.
    ///
    /// A zero TTL means the entry never expires. Sub-millisecond TTLs are
    /// rounded up so a positive TTL always yields a deadline.
    #[must_use]
    pub fn from_ttl(ttl: Duration) -> Self {
        Self::from_ttl_at(ttl, now_millis())
    }

    /// Build an expiry from a time-to-live measured from `now` (Unix millis).
    #[must_use]
    pub fn from_ttl_at(ttl: Duration, now: u64) -> Self {
        if ttl.is_zero() {
            return Self::Never;
        }
        let millis = u64::try_from(ttl.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX);
        Self::At(now.saturating_add(millis).max(1))
    }

    /// Returns `true` if the entry is no longer visible at `now` (Unix millis).
    #[must_use]
    pub const fn is_expired_at(&self, now: u64) -> bool {
        match self {
            Self::Never => false,
            Self::At(deadline) => now >= *deadline,
        }
    }

    /// The deadline in Unix milliseconds, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<u64> {
        match self {
            Self::Never => None,
            Self::At(deadline) => Some(*deadline),
        }
    }

    const fn to_header(self) -> u64 {
        match self {
            Self::Never => 0,
            Self::At(deadline) => deadline,
        }
    }

    const fn from_header(raw: u64) -> Self {
        if raw == 0 {
            Self::Never
        } else {
            Self::At(raw)
        }
    }
}

/// Current wall-clock time in Unix milliseconds.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// Prefix `value` with its expiry header.
#[must_use]
pub fn encode_entry(value: &[u8], expiry: Expiry) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(EXPIRY_HEADER_LEN + value.len());
    encoded.extend_from_slice(&expiry.to_header().to_be_bytes());
    encoded.extend_from_slice(value);
    encoded
}

/// Split a stored entry into its expiry and value.
///
/// # Errors
///
/// Returns [`StorageError::Corrupted`] if the entry is shorter than the header.
pub fn decode_entry(stored: &[u8]) -> StorageResult<(Expiry, &[u8])> {
    if stored.len() < EXPIRY_HEADER_LEN {
        return Err(StorageError::Corrupted(format!(
            "entry of {} bytes is shorter than the {EXPIRY_HEADER_LEN}-byte expiry header",
            stored.len()
        )));
    }
    let (header, value) = stored.split_at(EXPIRY_HEADER_LEN);
    let mut raw = [0u8; EXPIRY_HEADER_LEN];
    raw.copy_from_slice(header);
    Ok((Expiry::from_header(u64::from_be_bytes(raw)), value))
}
