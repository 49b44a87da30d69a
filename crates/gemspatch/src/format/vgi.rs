//! VGM Music Maker instrument (43 bytes).
//!
//! Byte 0 is the algorithm, byte 1 the feedback and byte 2 packs
//! `AMS << 4 | FMS`. Four ten-byte operators follow in register order:
//! MUL, DT, TL, RS, AR, `AM << 7 | DR`, SDR, RR, SL, SSG-EG.
//!
//! Unlike TFI, DT is stored as the raw register value.

use crate::binutil::{PatchError, ensure_len};
use crate::fm::GemsFmOperator;
use crate::raw::{REGISTER_ORDER, RawFmOperator, RawInstrument};

/// Size of a VGI instrument.
pub const VGI_SIZE: usize = 43;

const OPERATORS_OFFSET: usize = 3;
const OPERATOR_SIZE: usize = 10;

impl RawInstrument {
    /// Import a VGI instrument.
    pub fn import_vgi(data: &[u8]) -> Result<Self, PatchError> {
        ensure_len(data, VGI_SIZE, "VGI")?;
        let mut inst = RawInstrument::default();
        inst.set_alg_fb(data[0], data[1]);
        inst.set_ams_fms(data[2] >> 4, data[2]);
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            let b = &data[OPERATORS_OFFSET + disk * OPERATOR_SIZE..];
            let op = GemsFmOperator {
                mul: b[0],
                dt: b[1],
                tl: b[2],
                rs: b[3],
                ar: b[4],
                am: b[5] >> 7,
                dr: b[5],
                sdr: b[6],
                rr: b[7],
                sl: b[8],
                ..Default::default()
            };
            inst.op[slot] = RawFmOperator::from_fields(&op, b[9]);
        }
        Ok(inst)
    }

    /// Export as a VGI instrument.
    pub fn export_vgi(&self) -> [u8; VGI_SIZE] {
        let mut out = [0u8; VGI_SIZE];
        out[0] = self.alg();
        out[1] = self.fb();
        out[2] = (self.ams() << 4) | self.fms();
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            let raw = &self.op[slot];
            let f = raw.fields();
            let off = OPERATORS_OFFSET + disk * OPERATOR_SIZE;
            out[off..off + OPERATOR_SIZE].copy_from_slice(&[
                f.mul,
                f.dt,
                f.tl,
                f.rs,
                f.ar,
                (f.am << 7) | f.dr,
                f.sdr,
                f.rr,
                f.sl,
                raw.ssg(),
            ]);
        }
        out
    }
}
