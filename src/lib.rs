pub mod client;
pub mod constants;
pub mod error;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use error::{EvidenceError, Result};
pub use types::{
    eventlog::{EventLog, EventLogEntry, EventLogHeader, NormalizedEvent},
    quote::{Quote, QuoteAuthData, QuoteHeader},
    report::TdReport,
    request::{Category, EvidenceRequest},
    Evidence, EventLogEvidence, RtmrEvidence, TdReportEvidence,
};
pub use utils::replay::replay_rtmrs;

/// Decodes a TDX quote: header, embedded TD report and authentication block.
pub fn decode_quote(bytes: &[u8]) -> Result<Quote> {
    Quote::decode(bytes)
}

/// Decodes a standalone 584 byte TD report.
pub fn decode_td_report(bytes: &[u8]) -> Result<TdReport> {
    TdReport::decode(bytes)
}

/// Decodes a JSON event log into its normalized events, in measurement order.
///
/// Events that carry no digest are dropped. For every other event the last
/// digest of its list is selected.
pub fn decode_event_log(text: &str) -> Result<Vec<NormalizedEvent>> {
    EventLog::parse(text)?.normalize()
}
