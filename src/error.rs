/// Errors returned while decoding or validating evidence.
///
/// Every variant is terminal for the decode call that produced it. A decoder
/// never hands back a partially filled record alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvidenceError {
    #[error("truncated input reading {field}: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedInput {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid auth data size {declared}: {available} bytes available after the size field")]
    InvalidAuthSize { declared: u32, available: usize },

    #[error("malformed event log: {0}")]
    MalformedEventLog(String),

    #[error("unknown digest algorithm id {0:#06x}")]
    UnknownAlgorithm(u16),

    #[error("digest size mismatch for algorithm {algorithm_id:#06x}: expected {expected} bytes, got {actual}")]
    DigestSizeMismatch {
        algorithm_id: u16,
        expected: usize,
        actual: usize,
    },

    #[error("event {index} has an empty digest")]
    EmptyDigest { index: usize },

    #[error("unsupported evidence category: {0}")]
    UnsupportedCategory(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

pub type Result<T> = std::result::Result<T, EvidenceError>;
