// https://github.com/intel/SGXDataCenterAttestationPrimitives/blob/6882afad8644c27db162b40994402c8ad2a7fb32/QuoteGeneration/quote_wrapper/common/inc/sgx_quote_4.h

pub const SGX_TEE_TYPE: u32 = 0x00000000;
pub const TDX_TEE_TYPE: u32 = 0x00000081;

pub const ECDSA_256_WITH_P256_CURVE: u16 = 2;

pub const INTEL_QE_VENDOR_ID: [u8; 16] = [0x93, 0x9A, 0x72, 0x33, 0xF7, 0x9C, 0x4C, 0xA9, 0x94, 0x0A, 0x0D, 0xB3, 0x95, 0x7F, 0x06, 0x07];

pub const HEADER_LEN: usize = 48;
pub const TD_REPORT_LEN: usize = 584;
pub const RTMR_LEN: usize = 48;
pub const RTMR_COUNT: usize = 4;

// Quote layout:
// [48 - header] [584 - td report] [4 - auth data size] [64 - signature] [64 - attestation key]
// [2 - cert type] [4 - cert data size] [auth data size - 134 - cert data]
pub const QUOTE_HEADER_OFFSET: usize = 0;
pub const QUOTE_TD_REPORT_OFFSET: usize = 48;
pub const QUOTE_AUTH_DATA_SIZE_OFFSET: usize = 632;
pub const QUOTE_SIGNATURE_OFFSET: usize = 636;
pub const QUOTE_ATTESTATION_KEY_OFFSET: usize = 700;
pub const QUOTE_CERT_HEADER_OFFSET: usize = 764;
pub const QUOTE_CERT_DATA_OFFSET: usize = 770;

pub const SIGNATURE_LEN: usize = 64;
pub const ATTESTATION_KEY_LEN: usize = 64;
pub const CERT_HEADER_LEN: usize = 6;

/// Smallest auth data size that leaves a non-negative cert data length.
pub const MIN_AUTH_DATA_SIZE: u32 = (SIGNATURE_LEN + ATTESTATION_KEY_LEN + CERT_HEADER_LEN) as u32;

pub const MAX_REPORT_DATA_LEN: usize = 64;
pub const MAX_REGISTER_INDEX: i32 = 16;

// TCG algorithm registry ids used in the event log spec id header.
pub const TPM_ALG_SHA1: u16 = 0x0004;
pub const TPM_ALG_SHA256: u16 = 0x000B;
pub const TPM_ALG_SHA384: u16 = 0x000C;
pub const TPM_ALG_SHA512: u16 = 0x000D;
pub const TPM_ALG_SM3_256: u16 = 0x0012;

/// Digest size in bytes for every algorithm id the codec accepts.
pub fn known_digest_size(algorithm_id: u16) -> Option<u16> {
    match algorithm_id {
        TPM_ALG_SHA1 => Some(20),
        TPM_ALG_SHA256 => Some(32),
        TPM_ALG_SHA384 => Some(48),
        TPM_ALG_SHA512 => Some(64),
        TPM_ALG_SM3_256 => Some(32),
        _ => None,
    }
}
