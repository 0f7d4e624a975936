use crate::{
    constants::RTMR_LEN,
    error::Result,
    utils::validator,
};

use self::{
    eventlog::{EventLog, EventLogHeader, NormalizedEvent},
    report::TdReport,
};

pub mod eventlog;
pub mod quote;
pub mod report;
pub mod request;

/// A TD report together with the bytes it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TdReportEvidence {
    pub raw: Vec<u8>,
    pub report: TdReport,
}

impl TdReportEvidence {
    pub fn decode(raw: Vec<u8>) -> Result<Self> {
        let report = TdReport::decode(&raw)?;
        Ok(TdReportEvidence { raw, report })
    }
}

/// Current value of one runtime measurement register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtmrEvidence {
    pub register_index: u32,
    pub rtmr: [u8; RTMR_LEN],
}

impl RtmrEvidence {
    pub fn decode(register_index: u32, raw: &[u8]) -> Result<Self> {
        validator::check_exact_len("rtmr", raw, RTMR_LEN)?;
        let mut rtmr = [0; RTMR_LEN];
        rtmr.copy_from_slice(raw);
        Ok(RtmrEvidence { register_index, rtmr })
    }
}

/// Event log header and the normalized events, in measurement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLogEvidence {
    pub header: EventLogHeader,
    pub events: Vec<NormalizedEvent>,
}

impl EventLogEvidence {
    pub fn decode(text: &str) -> Result<Self> {
        let event_log = EventLog::parse(text)?;
        let events = event_log.normalize()?;
        Ok(EventLogEvidence {
            header: event_log.header,
            events,
        })
    }
}

/// Evidence returned for a request, one variant per supported category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    TdReport(TdReportEvidence),
    Rtmr(RtmrEvidence),
    EventLog(EventLogEvidence),
}
