//! TFM Music Maker instrument (42 bytes).
//!
//! Byte 0 is the algorithm, byte 1 the feedback, followed by four
//! ten-byte operators in register order: MUL, DT, TL, RS, AR, DR, SDR, RR,
//! SL, SSG-EG. DT is centered (3 = no detune).
//!
//! TFI has no AM flags, output enables, LFO, key mask or channel 3 data.

use super::{dt_from_centered, dt_to_centered};
use crate::binutil::{PatchError, ensure_len};
use crate::fm::GemsFmOperator;
use crate::raw::{REGISTER_ORDER, RawFmOperator, RawInstrument};

/// Size of a TFI instrument.
pub const TFI_SIZE: usize = 42;

const OPERATORS_OFFSET: usize = 2;
const OPERATOR_SIZE: usize = 10;

impl RawInstrument {
    /// Import a TFI instrument.
    pub fn import_tfi(data: &[u8]) -> Result<Self, PatchError> {
        ensure_len(data, TFI_SIZE, "TFI")?;
        let mut inst = RawInstrument::default();
        inst.set_alg_fb(data[0], data[1]);
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            let b = &data[OPERATORS_OFFSET + disk * OPERATOR_SIZE..];
            let op = GemsFmOperator {
                mul: b[0],
                dt: dt_from_centered(b[1]),
                tl: b[2],
                rs: b[3],
                ar: b[4],
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

    /// Export as a TFI instrument.
    pub fn export_tfi(&self) -> [u8; TFI_SIZE] {
        let mut out = [0u8; TFI_SIZE];
        out[0] = self.alg();
        out[1] = self.fb();
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            let raw = &self.op[slot];
            let f = raw.fields();
            let off = OPERATORS_OFFSET + disk * OPERATOR_SIZE;
            out[off..off + OPERATOR_SIZE].copy_from_slice(&[
                f.mul,
                dt_to_centered(f.dt),
                f.tl,
                f.rs,
                f.ar,
                f.dr,
                f.sdr,
                f.rr,
                f.sl,
                raw.ssg(),
            ]);
        }
        out
    }
}
