use zerocopy::little_endian;

use crate::{
    constants::{
        ATTESTATION_KEY_LEN, MIN_AUTH_DATA_SIZE, QUOTE_ATTESTATION_KEY_OFFSET,
        QUOTE_AUTH_DATA_SIZE_OFFSET, QUOTE_CERT_DATA_OFFSET, QUOTE_CERT_HEADER_OFFSET,
        QUOTE_SIGNATURE_OFFSET, SIGNATURE_LEN,
    },
    error::{EvidenceError, Result},
    utils,
};

/// Authentication block trailing the TD report of a quote.
///
/// Nothing in here is verified. The signature, attestation key and
/// certification data are extracted for a downstream verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteAuthData {
    /// Size of the authentication block in bytes, as declared by the quote.
    pub auth_data_size: u32,

    /// ECDSA signature over the header and TD report, r followed by s.
    pub signature: [u8; SIGNATURE_LEN],

    /// Public part of the attestation key, x followed by y.
    pub attestation_key: [u8; ATTESTATION_KEY_LEN],

    /// Certification data type from the cert sub-header.
    pub cert_type: u16,

    /// Certification data size from the cert sub-header. Kept raw; the
    /// extent of `cert_data` is derived from `auth_data_size` instead.
    pub cert_data_size: u32,

    /// Certification data, `auth_data_size - 134` bytes.
    pub cert_data: Vec<u8>,
}

#[derive(Debug, zerocopy::FromBytes, zerocopy::FromZeroes)]
#[repr(C)]
struct CertDataHeader {
    cert_type: little_endian::U16,
    cert_data_size: little_endian::U32,
}

impl QuoteAuthData {
    /// Reads the authentication block out of a complete quote buffer.
    pub(crate) fn read(bytes: &[u8]) -> Result<Self> {
        let auth_data_size = utils::read_fixed::<little_endian::U32>(
            bytes,
            QUOTE_AUTH_DATA_SIZE_OFFSET,
            "auth data size",
        )?
        .get();

        let available = bytes.len().saturating_sub(QUOTE_SIGNATURE_OFFSET);
        if auth_data_size < MIN_AUTH_DATA_SIZE || u64::from(auth_data_size) > available as u64 {
            return Err(EvidenceError::InvalidAuthSize {
                declared: auth_data_size,
                available,
            });
        }
        let cert_len = (auth_data_size - MIN_AUTH_DATA_SIZE) as usize;

        let signature = utils::read_fixed::<[u8; SIGNATURE_LEN]>(
            bytes,
            QUOTE_SIGNATURE_OFFSET,
            "signature",
        )?;
        let attestation_key = utils::read_fixed::<[u8; ATTESTATION_KEY_LEN]>(
            bytes,
            QUOTE_ATTESTATION_KEY_OFFSET,
            "attestation key",
        )?;
        let cert_header =
            utils::read_fixed::<CertDataHeader>(bytes, QUOTE_CERT_HEADER_OFFSET, "cert data header")?;
        let cert_data =
            utils::read_slice(bytes, QUOTE_CERT_DATA_OFFSET, cert_len, "cert data")?.to_vec();

        Ok(QuoteAuthData {
            auth_data_size,
            signature,
            attestation_key,
            cert_type: cert_header.cert_type.get(),
            cert_data_size: cert_header.cert_data_size.get(),
            cert_data,
        })
    }
}
