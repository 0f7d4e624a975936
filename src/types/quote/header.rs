use zerocopy::little_endian;

use crate::constants::{SGX_TEE_TYPE, TDX_TEE_TYPE};

/// Header of the quote data structure.
///
/// Field-for-field identical to the 48 byte wire layout; every multi-byte
/// integer is little endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, zerocopy::FromBytes, zerocopy::FromZeroes, zerocopy::AsBytes)]
#[repr(C)]
pub struct QuoteHeader {
    /// Version of the quote data structure.
    pub version: little_endian::U16,

    /// Type of the attestation key used by the quoting enclave.
    pub att_key_type: little_endian::U16,

    /// TEE the quote was generated for: 0 (SGX) or 0x81 (TDX).
    pub tee_type: little_endian::U32,

    pub reserved: [u8; 4],

    /// Unique identifier of the QE vendor.
    pub vendor_id: [u8; 16],

    /// Custom attestation key owner data.
    pub user_data: [u8; 20],
}

impl QuoteHeader {
    pub fn tee_name(&self) -> &'static str {
        match self.tee_type.get() {
            SGX_TEE_TYPE => "SGX",
            TDX_TEE_TYPE => "TDX",
            _ => "unknown",
        }
    }
}
