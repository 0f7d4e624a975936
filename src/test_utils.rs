//! Builders for synthetic evidence used across the unit tests.

use crate::constants::{
    ECDSA_256_WITH_P256_CURVE, INTEL_QE_VENDOR_ID, MIN_AUTH_DATA_SIZE, TDX_TEE_TYPE, TD_REPORT_LEN,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// TD report whose byte `i` is `i % 251`.
pub fn patterned_report() -> Vec<u8> {
    (0..TD_REPORT_LEN).map(|i| (i % 251) as u8).collect()
}

/// TDX quote with `auth_data_size` bytes of well-formed auth data.
pub fn sample_quote(auth_data_size: u32) -> Vec<u8> {
    QuoteBuilder::new()
        .cert_len((auth_data_size - MIN_AUTH_DATA_SIZE) as usize)
        .build()
}

pub struct QuoteBuilder {
    tee_type: u32,
    auth_data_size: Option<u32>,
    cert_len: usize,
    report: Vec<u8>,
}

impl QuoteBuilder {
    pub fn new() -> Self {
        QuoteBuilder {
            tee_type: TDX_TEE_TYPE,
            auth_data_size: None,
            cert_len: 128,
            report: patterned_report(),
        }
    }

    pub fn tee_type(mut self, tee_type: u32) -> Self {
        self.tee_type = tee_type;
        self
    }

    /// Overrides the declared size. By default it matches `cert_len`.
    pub fn auth_data_size(mut self, size: u32) -> Self {
        self.auth_data_size = Some(size);
        self
    }

    pub fn cert_len(mut self, len: usize) -> Self {
        self.cert_len = len;
        self
    }

    pub fn report_fill(mut self, value: u8) -> Self {
        self.report = vec![value; TD_REPORT_LEN];
        self
    }

    pub fn build(self) -> Vec<u8> {
        let auth_data_size = self
            .auth_data_size
            .unwrap_or(MIN_AUTH_DATA_SIZE + self.cert_len as u32);

        let mut quote = Vec::new();
        quote.extend_from_slice(&0u16.to_le_bytes());
        quote.extend_from_slice(&ECDSA_256_WITH_P256_CURVE.to_le_bytes());
        quote.extend_from_slice(&self.tee_type.to_le_bytes());
        quote.extend_from_slice(&[0; 4]);
        quote.extend_from_slice(&INTEL_QE_VENDOR_ID);
        quote.extend_from_slice(&[0xAB; 20]);
        quote.extend_from_slice(&self.report);
        quote.extend_from_slice(&auth_data_size.to_le_bytes());
        quote.extend_from_slice(&[0x11; 64]);
        quote.extend_from_slice(&[0x22; 64]);
        quote.extend_from_slice(&6u16.to_le_bytes());
        quote.extend_from_slice(&(self.cert_len as u32).to_le_bytes());
        quote.extend(std::iter::repeat(0x33).take(self.cert_len));
        quote
    }
}
