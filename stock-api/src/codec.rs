//! JSON byte codec for stream records.
//!
//! Payloads are plain JSON objects with camelCase field names. Decoding is
//! tolerant: fields the entity does not know about are skipped, so producers
//! can add fields without breaking older readers.

use crate::traits::record::Record;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// A floating point field holds NaN or an infinity.
    #[error("field '{field}' is not a finite number")]
    NonFinite { field: &'static str },

    /// The encoder failed or the input was not a valid record.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encodes a record as JSON bytes.
///
/// # Errors
///
/// * `CodecError::NonFinite` if a numeric field has no JSON representation.
/// * `CodecError::Json` if the encoder itself fails.
pub fn to_json_bytes<R: Record>(record: &R) -> Result<Vec<u8>, CodecError> {
    if let Some(field) = record.non_finite_field() {
        return Err(CodecError::NonFinite { field });
    }
    Ok(serde_json::to_vec(record)?)
}

/// Decodes a record from JSON bytes, ignoring unknown fields.
///
/// # Errors
///
/// * `CodecError::Json` on malformed input, missing fields or bad enum values.
pub fn from_json_bytes<R: Record>(bytes: &[u8]) -> Result<R, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}
