use base64ct::{Base64, Encoding};

use crate::error::{EvidenceError, Result};

pub mod replay;
pub mod validator;

/// A module for serializing and deserializing base64 encoded byte strings.
///
/// A JSON `null` is read as an empty buffer.
pub mod base64_bytes {
    use base64ct::{Base64, Encoding};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => Base64::decode_vec(&s).map_err(de::Error::custom),
            None => Ok(Vec::new()),
        }
    }

    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64::encode_string(value))
    }
}

/// Reads a `T` out of `bytes` at `offset`.
///
/// The width read is exactly `size_of::<T>()`. Fails with
/// [`EvidenceError::TruncatedInput`] naming `field` if the window does not fit.
pub fn read_fixed<T: zerocopy::FromBytes>(
    bytes: &[u8],
    offset: usize,
    field: &'static str,
) -> Result<T> {
    let window = read_slice(bytes, offset, std::mem::size_of::<T>(), field)?;
    T::read_from(window).ok_or(EvidenceError::TruncatedInput {
        field,
        offset,
        needed: std::mem::size_of::<T>(),
        available: window.len(),
    })
}

/// Borrows `len` bytes of `bytes` starting at `offset`.
pub fn read_slice<'a>(
    bytes: &'a [u8],
    offset: usize,
    len: usize,
    field: &'static str,
) -> Result<&'a [u8]> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(EvidenceError::TruncatedInput {
            field,
            offset,
            needed: len,
            available: bytes.len().saturating_sub(offset),
        })
}

/// Decodes a standard base64 blob as handed out by the evidence daemon.
pub fn decode_base64(blob: &str) -> Result<Vec<u8>> {
    Base64::decode_vec(blob.trim()).map_err(|e| EvidenceError::InvalidBase64(e.to_string()))
}
