//! Gens KMod register dump (128 bytes).
//!
//! | Offset | Content |
//! |---|---|
//! | 0..64 | operators, 16 bytes each in register order: 30H..90H, then padding |
//! | 64 | algorithm |
//! | 65 | feedback |
//! | 66..80 | padding |
//! | 80..96 | instrument name |
//! | 96..112 | dumper name |
//! | 112..128 | game name |
//!
//! Padding and the three strings are ignored on import and zeroed on export.

use crate::binutil::{PatchError, ensure_len};
use crate::raw::{RAW_OPERATOR_SIZE, REGISTER_ORDER, RawFmOperator, RawInstrument};

/// Size of a Y12 dump.
pub const Y12_SIZE: usize = 128;

const OPERATOR_SIZE: usize = 16;
const ALG_OFFSET: usize = 64;
const FB_OFFSET: usize = 65;

impl RawInstrument {
    /// Import a Y12 dump.
    pub fn import_y12(data: &[u8]) -> Result<Self, PatchError> {
        ensure_len(data, Y12_SIZE, "Y12")?;
        let mut inst = RawInstrument::default();
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            let off = disk * OPERATOR_SIZE;
            inst.op[slot] = RawFmOperator::from_registers(std::array::from_fn(|i| data[off + i]));
        }
        inst.set_alg_fb(data[ALG_OFFSET], data[FB_OFFSET]);
        Ok(inst)
    }

    /// Export as a Y12 dump.
    pub fn export_y12(&self) -> [u8; Y12_SIZE] {
        let mut out = [0u8; Y12_SIZE];
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            let off = disk * OPERATOR_SIZE;
            out[off..off + RAW_OPERATOR_SIZE].copy_from_slice(&self.op[slot].registers());
        }
        out[ALG_OFFSET] = self.alg();
        out[FB_OFFSET] = self.fb();
        out
    }
}
