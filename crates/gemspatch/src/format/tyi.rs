//! TYI instrument (32 bytes).
//!
//! | Offset | Content |
//! |---|---|
//! | 0..24 | 30H, 40H, 50H, 60H, 70H, 80H; four bytes each, register order |
//! | 24..28 | reserved |
//! | 28 | B0H |
//! | 29 | B4H |
//! | 30..32 | `"YI"` |
//!
//! SSG-EG is not carried. The signature is written on export but not
//! checked on import.

use super::{read_register_groups, write_register_groups};
use crate::binutil::{PatchError, ensure_len};
use crate::raw::RawInstrument;

/// Size of a TYI instrument.
pub const TYI_SIZE: usize = 32;

/// Trailing signature.
pub const TYI_SIGNATURE: [u8; 2] = *b"YI";

const GROUPS: [Option<usize>; 7] = [Some(0), Some(1), Some(2), Some(3), Some(4), Some(5), None];

impl RawInstrument {
    /// Import a TYI instrument.
    pub fn import_tyi(data: &[u8]) -> Result<Self, PatchError> {
        ensure_len(data, TYI_SIZE, "TYI")?;
        let mut inst = RawInstrument::default();
        read_register_groups(data, 0, &GROUPS, &mut inst);
        inst.reg_b0 = data[28];
        inst.reg_b4 = data[29];
        Ok(inst)
    }

    /// Export as a TYI instrument.
    pub fn export_tyi(&self) -> [u8; TYI_SIZE] {
        let mut out = [0u8; TYI_SIZE];
        write_register_groups(&mut out, 0, &GROUPS, self);
        out[28] = self.reg_b0;
        out[29] = self.reg_b4;
        out[30..32].copy_from_slice(&TYI_SIGNATURE);
        out
    }
}
