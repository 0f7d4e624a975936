use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::{
    error::EvidenceError,
    types::{
        quote::Quote,
        request::{Category, EvidenceRequest},
        Evidence, EventLogEvidence, RtmrEvidence, TdReportEvidence,
    },
    utils,
};

pub const QUOTE_TYPE_TDX: &str = "TDX";
pub const QUOTE_TYPE_TPM: &str = "TPM";

/// Reply of the evidence daemon to an [`EvidenceRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceReply {
    /// Base64 encoded report or register value.
    Blob(String),

    /// Location of the JSON event log written by the daemon.
    EventLogPath(PathBuf),
}

/// Reply of the quote server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteReply {
    /// Base64 encoded quote, possibly wrapped in double quotes.
    pub quote: String,

    /// Kind of quote, `TDX` or `TPM`.
    pub quote_type: String,
}

/// Transport to the daemons that produce evidence.
///
/// Implementations own connection handling, timeouts and retries. Everything
/// handed back is treated as untrusted and goes through the codecs.
pub trait EvidenceSource {
    fn fetch(&self, request: &EvidenceRequest) -> anyhow::Result<EvidenceReply>;

    fn fetch_quote(&self, user_data: &str, nonce: &str) -> anyhow::Result<QuoteReply>;
}

/// Validates `request`, fetches the evidence and decodes it.
pub fn get_platform_evidence<S: EvidenceSource + ?Sized>(
    source: &S,
    request: &EvidenceRequest,
) -> anyhow::Result<Evidence> {
    request.validate().context("invalid evidence request")?;

    let reply = source
        .fetch(request)
        .with_context(|| format!("failed to fetch {}", request.category))?;
    log::debug!("fetched {} evidence", request.category);

    match (request.category, reply) {
        (Category::TeeReport, EvidenceReply::Blob(blob)) => {
            let raw = utils::decode_base64(&blob).context("failed to decode td report payload")?;
            let evidence = TdReportEvidence::decode(raw).context("failed to decode td report")?;
            Ok(Evidence::TdReport(evidence))
        }
        (Category::TdxRtmr, EvidenceReply::Blob(blob)) => {
            let raw = utils::decode_base64(&blob).context("failed to decode rtmr payload")?;
            let evidence = RtmrEvidence::decode(request.register_index as u32, &raw)
                .context("failed to decode rtmr")?;
            Ok(Evidence::Rtmr(evidence))
        }
        (Category::TdxEventLog, EvidenceReply::EventLogPath(path)) => {
            if path.as_os_str().is_empty() {
                bail!("evidence daemon returned no event log location");
            }
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read event log from {}", path.display()))?;
            let evidence = EventLogEvidence::decode(&text)
                .with_context(|| format!("failed to decode event log {}", path.display()))?;
            Ok(Evidence::EventLog(evidence))
        }
        (category, reply) => bail!("unexpected {} reply for {category}", reply.kind()),
    }
}

/// Fetches a quote for `user_data` and `nonce` and decodes it.
pub fn get_quote<S: EvidenceSource + ?Sized>(
    source: &S,
    user_data: &str,
    nonce: &str,
) -> anyhow::Result<Quote> {
    let reply = source
        .fetch_quote(user_data, nonce)
        .context("failed to fetch quote")?;

    match reply.quote_type.as_str() {
        QUOTE_TYPE_TDX => {
            let raw = utils::decode_base64(reply.quote.trim_matches('"'))
                .context("failed to decode quote payload")?;
            Quote::decode(&raw).context("failed to decode tdx quote")
        }
        other => Err(EvidenceError::UnsupportedCategory(format!("{other} quote")).into()),
    }
}

impl EvidenceReply {
    fn kind(&self) -> &'static str {
        match self {
            EvidenceReply::Blob(_) => "blob",
            EvidenceReply::EventLogPath(_) => "event log path",
        }
    }
}
