mod auth_data;
mod header;

pub use auth_data::*;
pub use header::*;

use crate::{
    constants::{QUOTE_AUTH_DATA_SIZE_OFFSET, QUOTE_HEADER_OFFSET, QUOTE_TD_REPORT_OFFSET, TDX_TEE_TYPE},
    error::{EvidenceError, Result},
    utils,
};

use super::report::TdReport;

/// A TDX quote, decoded.
///
/// Owns a verbatim copy of the input buffer next to the fields decoded from
/// it, so nothing borrows from the caller once `decode` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    raw: Vec<u8>,

    /// Header of the quote data structure.
    pub header: QuoteHeader,

    /// TD report the quote was generated over.
    pub td_report: TdReport,

    /// Signature, attestation key and certification data.
    pub auth_data: QuoteAuthData,
}

impl Quote {
    /// Decodes a quote buffer.
    ///
    /// The fixed regions are read in wire order, header, TD report and then
    /// the authentication block whose cert data extent comes from the
    /// declared auth data size. Any buffer shorter than the auth data size
    /// field fails with [`EvidenceError::TruncatedInput`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = utils::read_fixed::<QuoteHeader>(bytes, QUOTE_HEADER_OFFSET, "quote header")?;
        let td_report = TdReport::read_at(bytes, QUOTE_TD_REPORT_OFFSET)?;
        let auth_data = QuoteAuthData::read(bytes)?;

        if header.tee_type.get() != TDX_TEE_TYPE {
            return Err(EvidenceError::UnsupportedCategory(format!(
                "quote for tee type {:#x} ({})",
                header.tee_type.get(),
                header.tee_name()
            )));
        }

        log::debug!(
            "decoded {} quote v{}: {} bytes, {} bytes of cert data",
            header.tee_name(),
            header.version.get(),
            bytes.len(),
            auth_data.cert_data.len()
        );

        Ok(Quote {
            raw: bytes.to_vec(),
            header,
            td_report,
            auth_data,
        })
    }

    /// The quote exactly as it was decoded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Header and TD report, the region covered by the quote signature.
    pub fn signed_bytes(&self) -> &[u8] {
        &self.raw[..QUOTE_AUTH_DATA_SIZE_OFFSET]
    }

    pub fn td_report_bytes(&self) -> &[u8] {
        &self.raw[QUOTE_TD_REPORT_OFFSET..QUOTE_AUTH_DATA_SIZE_OFFSET]
    }
}
