//! Canonical structured-value codec.
//!
//! Every typed record in every table goes through this adapter: one
//! canonical byte encoding, one round-trip law. Decoding a zero-length
//! input is defined as "record absent" — callers treat it exactly like a
//! missing key, never as corruption.

use std::error::Error;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Codec failure, split by direction.
#[derive(Debug, Clone)]
pub enum CodecError {
    /// The value's shape is unsupported by the encoding.
    Encode { detail: String },
    /// Non-empty bytes that do not parse as the target shape.
    Decode { detail: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Encode { detail } => write!(f, "encode failed: {}", detail),
            CodecError::Decode { detail } => write!(f, "decode failed: {}", detail),
        }
    }
}

impl Error for CodecError {}

/// Encode a value into its canonical byte form.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| CodecError::Encode { detail: e.to_string() })
}

/// Decode canonical bytes back into a value.
///
/// Empty input is `Ok(None)` ("record absent"). Non-empty input must
/// parse completely; trailing bytes are corruption.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<T>, CodecError> {
    if bytes.is_empty() {
        return Ok(None);
    }

    let (value, consumed) =
        bincode::serde::decode_from_slice::<T, _>(bytes, bincode::config::standard())
            .map_err(|e| CodecError::Decode { detail: e.to_string() })?;

    if consumed != bytes.len() {
        return Err(CodecError::Decode {
            detail: format!("{} trailing bytes after record", bytes.len() - consumed),
        });
    }

    Ok(Some(value))
}
