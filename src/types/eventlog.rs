use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{EvidenceError, Result},
    utils::{base64_bytes, validator},
};

/// Spec id header of a TDX event log.
///
/// `digest_sizes` maps a TCG algorithm id to the digest size in bytes for
/// every algorithm the log records, `digest_count` of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogHeader {
    #[serde(default, alias = "Address")]
    pub address: u64,

    #[serde(default, alias = "Length")]
    pub length: u64,

    #[serde(default, alias = "HeaderData", with = "base64_bytes")]
    pub header_data: Vec<u8>,

    #[serde(alias = "Rtmr")]
    pub rtmr: u32,

    #[serde(alias = "Etype")]
    pub event_type: u32,

    #[serde(alias = "DigestCount")]
    pub digest_count: u32,

    #[serde(default, alias = "DigestSizes", deserialize_with = "null_as_default")]
    pub digest_sizes: BTreeMap<u16, u16>,
}

/// A single measured event as recorded by the producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    #[serde(alias = "Rtmr")]
    pub rtmr: u32,

    #[serde(alias = "Etype")]
    pub event_type: u32,

    #[serde(alias = "DigestCount")]
    pub digest_count: u32,

    /// One digest per recorded algorithm, in the order the producer wrote them.
    #[serde(default, alias = "Digests", deserialize_with = "null_as_default")]
    pub digests: Vec<String>,

    #[serde(default, alias = "Data", with = "base64_bytes")]
    pub data: Vec<u8>,

    #[serde(default, alias = "Event", with = "base64_bytes")]
    pub event: Vec<u8>,

    #[serde(default, alias = "Length")]
    pub length: u64,

    #[serde(default, alias = "EventSize")]
    pub event_size: u32,

    /// Algorithm of the last digest in `digests`.
    #[serde(default, alias = "AlgorithmId")]
    pub algorithm_id: u16,
}

/// Event log container: the spec id header followed by the events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(alias = "Header")]
    pub header: EventLogHeader,

    #[serde(alias = "EventLogs", deserialize_with = "null_as_default")]
    pub event_logs: Vec<EventLogEntry>,
}

/// An event reduced to the one digest a verifier replays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEvent {
    pub register_index: u32,
    pub event_type: u32,
    pub algorithm_id: u16,
    pub event_size: u32,
    #[serde(with = "base64_bytes")]
    pub event: Vec<u8>,
    pub digest: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl EventLog {
    /// Parses the JSON container, checks the header's digest table and every
    /// entry's digests and event size.
    pub fn parse(text: &str) -> Result<Self> {
        let event_log: EventLog = serde_json::from_str(text)
            .map_err(|e| EvidenceError::MalformedEventLog(e.to_string()))?;
        validator::check_digest_sizes(&event_log.header)?;
        for (index, entry) in event_log.event_logs.iter().enumerate() {
            validator::check_entry(index, entry)?;
        }
        Ok(event_log)
    }

    /// Reduces every event to its selected digest, keeping measurement order.
    ///
    /// Events without any digest are dropped.
    pub fn normalize(&self) -> Result<Vec<NormalizedEvent>> {
        let mut events = Vec::with_capacity(self.event_logs.len());
        for (index, entry) in self.event_logs.iter().enumerate() {
            let Some(event) = entry.normalize(index)? else {
                log::debug!("dropping event {index} of type {:#x}: no digest", entry.event_type);
                continue;
            };
            validator::check_event(index, &event, &self.header)?;
            events.push(event);
        }
        log::debug!(
            "normalized {} of {} event log entries",
            events.len(),
            self.event_logs.len()
        );
        Ok(events)
    }
}

impl EventLogEntry {
    /// Selects the last digest of the entry, or `None` if it records none.
    pub fn normalize(&self, index: usize) -> Result<Option<NormalizedEvent>> {
        if self.digest_count < 1 {
            return Ok(None);
        }
        if self.digests.len() != self.digest_count as usize {
            return Err(EvidenceError::MalformedEventLog(format!(
                "event {index} declares {} digests but carries {}",
                self.digest_count,
                self.digests.len()
            )));
        }
        let Some(digest) = self.digests.last() else {
            return Ok(None);
        };

        Ok(Some(NormalizedEvent {
            register_index: self.rtmr,
            event_type: self.event_type,
            algorithm_id: self.algorithm_id,
            event_size: self.event_size,
            event: self.event.clone(),
            digest: digest.clone(),
        }))
    }
}

impl NormalizedEvent {
    /// The selected digest as raw bytes.
    pub fn digest_bytes(&self) -> Result<Vec<u8>> {
        hex::decode(&self.digest).map_err(|e| {
            EvidenceError::MalformedEventLog(format!("digest {:?} is not hex: {e}", self.digest))
        })
    }
}

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha384};

    use crate::constants::{TPM_ALG_SHA256, TPM_ALG_SHA384};

    use super::*;

    const SHA256_HEX: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn sha384_hex(data: &[u8]) -> String {
        hex::encode(Sha384::digest(data))
    }

    #[test]
    fn parse_tdx_eventlog_fixture() {
        let text = include_str!("../../data/eventlog_tdx.json");
        let event_log = EventLog::parse(text).unwrap();

        assert_eq!(event_log.header.digest_count, 1);
        assert_eq!(event_log.header.digest_sizes.get(&TPM_ALG_SHA384), Some(&48));
        assert_eq!(event_log.header.header_data, b"Spec ID Event03\0");
        assert_eq!(event_log.event_logs.len(), 7);

        let events = event_log.normalize().unwrap();
        assert_eq!(events.len(), 6);
        assert!(events.iter().all(|e| e.event_type != 0x3));

        assert_eq!(events[0].register_index, 0);
        assert_eq!(events[0].event_type, 0x8000000A);
        assert_eq!(events[0].algorithm_id, TPM_ALG_SHA384);
        assert_eq!(events[0].event, b"OVMF firmware volume");
        assert_eq!(events[0].event_size, 20);
        assert_eq!(events[0].digest, sha384_hex(b"OVMF firmware volume"));
        assert_eq!(events[0].digest_bytes().unwrap().len(), 48);

        let registers: Vec<u32> = events.iter().map(|e| e.register_index).collect();
        assert_eq!(registers, [0, 0, 0, 1, 2, 2]);
    }

    #[test]
    fn fixture_event_sizes_match_payloads() {
        let event_log = EventLog::parse(include_str!("../../data/eventlog_tdx.json")).unwrap();
        for entry in &event_log.event_logs {
            assert!(!entry.event.is_empty());
            assert_eq!(entry.event.len(), entry.event_size as usize);
        }
    }

    #[test]
    fn event_shorter_than_declared_size_is_rejected() {
        let text = format!(
            r#"{{
                "header": {{ "rtmr": 0, "event_type": 3, "digest_count": 1, "digest_sizes": {{ "11": 32 }} }},
                "event_logs": [
                    {{ "rtmr": 1, "event_type": 13, "digest_count": 1, "digests": ["{SHA256_HEX}"],
                       "event": "aGk=", "event_size": 4000, "algorithm_id": 11 }}
                ]
            }}"#
        );
        assert_eq!(
            EventLog::parse(&text),
            Err(EvidenceError::InvalidLength {
                field: "event",
                expected: 4000,
                actual: 2,
            })
        );
    }

    #[test]
    fn garbage_in_earlier_digests_is_rejected() {
        let text = format!(
            r#"{{
                "header": {{ "rtmr": 0, "event_type": 3, "digest_count": 2,
                             "digest_sizes": {{ "11": 32, "12": 48 }} }},
                "event_logs": [
                    {{ "rtmr": 1, "event_type": 13, "digest_count": 2,
                       "digests": ["not a digest", "{}"], "algorithm_id": 12 }}
                ]
            }}"#,
            sha384_hex(b"cmdline")
        );
        assert!(matches!(
            EventLog::parse(&text),
            Err(EvidenceError::MalformedEventLog(_))
        ));
    }

    #[test]
    fn last_digest_is_selected() {
        let text = format!(
            r#"{{
                "header": {{ "rtmr": 0, "event_type": 3, "digest_count": 2,
                             "digest_sizes": {{ "11": 32, "12": 48 }} }},
                "event_logs": [
                    {{ "rtmr": 1, "event_type": 13, "digest_count": 2,
                       "digests": ["{SHA256_HEX}", "{}"], "algorithm_id": 12 }}
                ]
            }}"#,
            sha384_hex(b"cmdline")
        );
        let events = EventLog::parse(&text).unwrap().normalize().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].digest, sha384_hex(b"cmdline"));
        assert_eq!(events[0].algorithm_id, TPM_ALG_SHA384);
        assert!(events[0].event.is_empty());
    }

    #[test]
    fn go_style_field_names_are_accepted() {
        let text = format!(
            r#"{{
                "Header": {{ "Address": 1, "Length": 2, "HeaderData": null, "Rtmr": 0,
                             "Etype": 3, "DigestCount": 1, "DigestSizes": {{ "11": 32 }} }},
                "EventLogs": [
                    {{ "Rtmr": 0, "Etype": 3, "DigestCount": 0, "Digests": null,
                       "Data": null, "Event": null, "Length": 0, "EventSize": 0, "AlgorithmId": 0 }},
                    {{ "Rtmr": 2, "Etype": 13, "DigestCount": 1, "Digests": ["{SHA256_HEX}"],
                       "Data": "AA==", "Event": "aGk=", "Length": 1, "EventSize": 2, "AlgorithmId": 11 }}
                ]
            }}"#
        );
        let event_log = EventLog::parse(&text).unwrap();
        assert_eq!(event_log.header.address, 1);
        assert!(event_log.header.header_data.is_empty());

        let events = event_log.normalize().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].register_index, 2);
        assert_eq!(events[0].event, b"hi");
        assert_eq!(events[0].algorithm_id, TPM_ALG_SHA256);
    }

    #[test]
    fn empty_event_list_yields_nothing() {
        let text = r#"{ "header": { "rtmr": 0, "event_type": 3, "digest_count": 0 }, "event_logs": [] }"#;
        assert!(EventLog::parse(text).unwrap().normalize().unwrap().is_empty());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        for text in [
            "",
            "[]",
            "{}",
            r#"{ "header": {} , "event_logs": [] }"#,
            r#"{ "header": { "rtmr": 0, "event_type": 3, "digest_count": 0 } }"#,
            r#"{ "header": { "rtmr": 0, "event_type": 3, "digest_count": 0 }, "event_logs": {} }"#,
            r#"{ "header": { "rtmr": 0, "event_type": 3, "digest_count": 0 },
                 "event_logs": [ { "rtmr": 0, "event_type": 1, "digest_count": 0, "event": "%%%" } ] }"#,
        ] {
            assert!(
                matches!(EventLog::parse(text), Err(EvidenceError::MalformedEventLog(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn digest_count_must_match_digest_list() {
        let text = format!(
            r#"{{
                "header": {{ "rtmr": 0, "event_type": 3, "digest_count": 1, "digest_sizes": {{ "11": 32 }} }},
                "event_logs": [
                    {{ "rtmr": 0, "event_type": 13, "digest_count": 2, "digests": ["{SHA256_HEX}"], "algorithm_id": 11 }}
                ]
            }}"#
        );
        let event_log = EventLog::parse(&text).unwrap();
        assert!(matches!(
            event_log.normalize(),
            Err(EvidenceError::MalformedEventLog(_))
        ));
    }
}
