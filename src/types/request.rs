use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{MAX_REGISTER_INDEX, MAX_REPORT_DATA_LEN},
    error::{EvidenceError, Result},
};

/// Kind of evidence requested from the evidence daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    TeeReport,
    TdxRtmr,
    TdxEventLog,
    Tpm,
    TpmEventLog,
}

impl Category {
    pub fn is_event_log(&self) -> bool {
        matches!(self, Category::TdxEventLog | Category::TpmEventLog)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Category::Tpm | Category::TpmEventLog)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::TeeReport => "tee report",
            Category::TdxRtmr => "tdx rtmr",
            Category::TdxEventLog => "tdx event log",
            Category::Tpm => "tpm",
            Category::TpmEventLog => "tpm event log",
        };
        f.write_str(name)
    }
}

/// Parameters of an evidence request.
///
/// Missing fields take their defaults when deserialized, so a request can be
/// loaded from a partial JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceRequest {
    pub category: Category,

    /// First event to return, event log categories only.
    pub start_position: i32,

    /// Number of events to return, event log categories only.
    pub count: i32,

    /// Caller data bound into the TD report, up to 64 bytes.
    pub report_data: Option<String>,

    /// Measurement register to read, 0 through 16.
    pub register_index: i32,
}

impl Default for EvidenceRequest {
    fn default() -> Self {
        Self {
            category: Category::TeeReport,
            start_position: 0,
            count: 0,
            report_data: None,
            register_index: 0,
        }
    }
}

impl EvidenceRequest {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.category.is_supported() {
            return Err(EvidenceError::UnsupportedCategory(self.category.to_string()));
        }

        if let Some(report_data) = &self.report_data {
            if report_data.len() > MAX_REPORT_DATA_LEN {
                return Err(EvidenceError::InvalidRequest(format!(
                    "report data is {} bytes, at most {MAX_REPORT_DATA_LEN} allowed",
                    report_data.len()
                )));
            }
        }

        if !(0..=MAX_REGISTER_INDEX).contains(&self.register_index) {
            return Err(EvidenceError::InvalidRequest(format!(
                "register index {} outside 0..={MAX_REGISTER_INDEX}",
                self.register_index
            )));
        }

        if self.category.is_event_log() {
            if self.start_position < 0 {
                return Err(EvidenceError::InvalidRequest(format!(
                    "negative start position {}",
                    self.start_position
                )));
            }
            if self.count <= 0 {
                return Err(EvidenceError::InvalidRequest(format!(
                    "event count must be positive, got {}",
                    self.count
                )));
            }
        }

        Ok(())
    }
}
