use sha2::{Digest, Sha384};

use crate::{
    constants::{RTMR_COUNT, RTMR_LEN, TPM_ALG_SHA384},
    error::{EvidenceError, Result},
    types::eventlog::NormalizedEvent,
};

/// Replays SHA384 events into the four runtime measurement registers.
///
/// Every register starts zeroed and is extended as
/// `rtmr = SHA384(rtmr || digest)` in event order. Events recorded with any
/// other algorithm cannot extend a 48 byte register and are skipped.
pub fn replay_rtmrs(events: &[NormalizedEvent]) -> Result<[[u8; RTMR_LEN]; RTMR_COUNT]> {
    let mut rtmrs = [[0u8; RTMR_LEN]; RTMR_COUNT];

    for event in events {
        if event.algorithm_id != TPM_ALG_SHA384 {
            log::warn!(
                "skipping event of type {:#x}: algorithm {:#06x} cannot extend an RTMR",
                event.event_type,
                event.algorithm_id
            );
            continue;
        }

        let rtmr = rtmrs.get_mut(event.register_index as usize).ok_or_else(|| {
            EvidenceError::MalformedEventLog(format!("register index {} out of range", event.register_index))
        })?;

        let digest = event.digest_bytes()?;
        if digest.len() != RTMR_LEN {
            return Err(EvidenceError::DigestSizeMismatch {
                algorithm_id: TPM_ALG_SHA384,
                expected: RTMR_LEN,
                actual: digest.len(),
            });
        }

        let mut hasher = Sha384::new();
        hasher.update(&rtmr[..]);
        hasher.update(&digest);
        rtmr.copy_from_slice(&hasher.finalize());
    }

    Ok(rtmrs)
}
