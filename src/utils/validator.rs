//! Post-decode sanity checks shared by the codecs.

use crate::{
    constants::known_digest_size,
    error::{EvidenceError, Result},
    types::eventlog::{EventLogEntry, EventLogHeader, NormalizedEvent},
};

/// Requires `bytes` to be exactly `expected` bytes long.
///
/// A short buffer is reported as truncated, a long one as an invalid length.
/// Neither is padded nor cut to fit.
pub fn check_exact_len(field: &'static str, bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() < expected {
        return Err(EvidenceError::TruncatedInput {
            field,
            offset: 0,
            needed: expected,
            available: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(EvidenceError::InvalidLength {
            field,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Checks the header's algorithm table against the known digest sizes.
pub fn check_digest_sizes(header: &EventLogHeader) -> Result<()> {
    if header.digest_sizes.len() != header.digest_count as usize {
        return Err(EvidenceError::MalformedEventLog(format!(
            "header declares {} digest algorithms but lists {}",
            header.digest_count,
            header.digest_sizes.len()
        )));
    }

    for (&algorithm_id, &size) in &header.digest_sizes {
        let expected = known_digest_size(algorithm_id).ok_or(EvidenceError::UnknownAlgorithm(algorithm_id))?;
        if size != expected {
            return Err(EvidenceError::DigestSizeMismatch {
                algorithm_id,
                expected: expected.into(),
                actual: size.into(),
            });
        }
    }
    Ok(())
}

/// Checks a raw entry before any digest is selected from it.
///
/// Every digest must be non-empty hex and the event bytes, when present, must
/// be exactly `event_size` long.
pub fn check_entry(index: usize, entry: &EventLogEntry) -> Result<()> {
    for digest in &entry.digests {
        if digest.is_empty() {
            return Err(EvidenceError::EmptyDigest { index });
        }
        if hex::decode(digest).is_err() {
            return Err(EvidenceError::MalformedEventLog(format!(
                "event {index} digest {digest:?} is not hex"
            )));
        }
    }

    if !entry.event.is_empty() && entry.event.len() != entry.event_size as usize {
        return Err(EvidenceError::InvalidLength {
            field: "event",
            expected: entry.event_size as usize,
            actual: entry.event.len(),
        });
    }
    Ok(())
}

/// Checks a normalized event's digest.
///
/// When the header carries an algorithm table the event's algorithm must be
/// listed and its digest must decode to the declared size.
pub fn check_event(index: usize, event: &NormalizedEvent, header: &EventLogHeader) -> Result<()> {
    if event.digest.is_empty() {
        return Err(EvidenceError::EmptyDigest { index });
    }
    if header.digest_sizes.is_empty() {
        return Ok(());
    }

    let expected = *header
        .digest_sizes
        .get(&event.algorithm_id)
        .ok_or(EvidenceError::UnknownAlgorithm(event.algorithm_id))?;
    let digest = event.digest_bytes()?;
    if digest.len() != usize::from(expected) {
        log::warn!("event {index} digest is {} bytes, header declares {expected}", digest.len());
        return Err(EvidenceError::DigestSizeMismatch {
            algorithm_id: event.algorithm_id,
            expected: expected.into(),
            actual: digest.len(),
        });
    }
    Ok(())
}
