//! Payload encoding.
//!
//! Session payloads are opaque bytes persisted as standard padded base64 so
//! stored values stay text-safe. Sequence counters use decimal text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{Error, Result};

/// Encode a payload for storage.
///
/// # Errors
///
/// Returns [`Error::EmptyPayload`] if the encoded form is empty.
pub fn encode_payload(data: &[u8]) -> Result<String> {
    let encoded = STANDARD.encode(data);
    if encoded.is_empty() {
        return Err(Error::EmptyPayload);
    }
    Ok(encoded)
}

/// Decode a stored value back into the original payload.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the stored value is not valid base64.
pub fn decode_payload(stored: &[u8]) -> Result<Vec<u8>> {
    STANDARD.decode(stored).map_err(|e| Error::Encoding(e.to_string()))
}

/// Parse a decoded sequence value, returning `None` if it is not a decimal `i64`.
pub fn parse_counter(data: &[u8]) -> Option<i64> {
    std::str::from_utf8(data).ok()?.parse().ok()
}

/// Render a sequence value as decimal text.
pub fn format_counter(value: i64) -> Vec<u8> {
    value.to_string().into_bytes()
}
