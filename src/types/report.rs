use zerocopy::AsBytes;

use crate::{
    constants::{RTMR_COUNT, RTMR_LEN, TD_REPORT_LEN},
    error::Result,
    utils::{self, validator},
};

// TEE_TCB_SVN:
// [bytes]  : [Name]            : [description]
// [0]      : Tdxtcbcomp01      : TDX module ISV SVN
// [1]      : Tdxtcbcomp02      : TDX module major version
// [2..16]  : Tdxtcbcomp03..16  : remaining TCB components
//
// TD Attributes:
// [bits]   : [description]
// [0]      : (DEBUG) TD runs in debug mode, the host VMM can read its private memory.
// [28]     : (SEPT_VE_DISABLE) Disable EPT violation conversion to #VE.
// [30]     : (PKS) TD is allowed to use Supervisor Protection Keys.
// [31]     : (KL) TD is allowed to use Key Locker.
// [63]     : (PERFMON) TD is allowed to use Perfmon and PERF_METRICS.

/// TD report body, as found standalone or embedded in a TDX quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, zerocopy::FromBytes, zerocopy::FromZeroes, zerocopy::AsBytes)]
#[repr(C)]
pub struct TdReport {
    pub tee_tcb_svn: [u8; 16],          // [16 bytes]
                                        // Describes the TCB of TDX.
    pub mrseam: [u8; 48],               // [48 bytes]
                                        // Measurement of the TDX Module.
    pub mrsignerseam: [u8; 48],         // [48 bytes]
                                        // Zero for Intel TDX Module.
    pub seam_attributes: [u8; 8],       // [8 bytes]
                                        // Must be zero for TDX 1.0
    pub td_attributes: [u8; 8],         // [8 bytes]
                                        // TD Attributes (Refer to above)
    pub xfam: [u8; 8],                  // [8 bytes]
                                        // XFAM (eXtended Features Available Mask) is defined as a 64b bitmap.
    pub mrtd: [u8; 48],                 // [48 bytes]
                                        // Measurement of the initial contents of the TD.
    pub mrconfigid: [u8; 48],           // [48 bytes]
                                        // Software-defined ID for non-owner-defined configuration of the TD.
    pub mrowner: [u8; 48],              // [48 bytes]
                                        // Software-defined ID for the TD's owner.
    pub mrownerconfig: [u8; 48],        // [48 bytes]
                                        // Software-defined ID for owner-defined configuration of the TD.
    pub rtmrs: [u8; 192],               // [192 bytes]
                                        // Four runtime extendable measurement registers, 48 bytes each.
    pub report_data: [u8; 64],          // [64 bytes]
                                        // Additional report data supplied by the TD.
}

const _: () = assert!(std::mem::size_of::<TdReport>() == TD_REPORT_LEN);

impl TdReport {
    /// Decodes a standalone TD report. The buffer must be exactly 584 bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        validator::check_exact_len("td report", bytes, TD_REPORT_LEN)?;
        Self::read_at(bytes, 0)
    }

    /// Decodes the 584 byte window at `offset` of a larger buffer.
    pub(crate) fn read_at(bytes: &[u8], offset: usize) -> Result<Self> {
        utils::read_fixed::<TdReport>(bytes, offset, "td report")
    }

    pub fn to_bytes(&self) -> [u8; TD_REPORT_LEN] {
        let mut raw_bytes = [0; TD_REPORT_LEN];
        raw_bytes.copy_from_slice(self.as_bytes());
        raw_bytes
    }

    /// Returns runtime measurement register `index`, or `None` past RTMR3.
    pub fn rtmr(&self, index: usize) -> Option<[u8; RTMR_LEN]> {
        if index >= RTMR_COUNT {
            return None;
        }
        let mut rtmr = [0; RTMR_LEN];
        rtmr.copy_from_slice(&self.rtmrs[index * RTMR_LEN..(index + 1) * RTMR_LEN]);
        Some(rtmr)
    }

    pub fn is_debug(&self) -> bool {
        self.td_attributes[0] & 0x01 != 0
    }
}
