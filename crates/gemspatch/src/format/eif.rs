//! Echo instrument (29 bytes).
//!
//! Byte 0 is B0H, followed by seven four-byte groups for registers 30H
//! through 90H in register order. Every byte maps to a canonical register,
//! so any 29-byte buffer survives a round trip unchanged.

use super::{read_register_groups, write_register_groups};
use crate::binutil::{PatchError, ensure_len};
use crate::raw::RawInstrument;

/// Size of an EIF instrument.
pub const EIF_SIZE: usize = 29;

const GROUPS: [Option<usize>; 7] = [Some(0), Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)];

impl RawInstrument {
    /// Import an EIF instrument.
    pub fn import_eif(data: &[u8]) -> Result<Self, PatchError> {
        ensure_len(data, EIF_SIZE, "EIF")?;
        let mut inst = RawInstrument {
            reg_b0: data[0],
            ..Default::default()
        };
        read_register_groups(data, 1, &GROUPS, &mut inst);
        Ok(inst)
    }

    /// Export as an EIF instrument.
    pub fn export_eif(&self) -> [u8; EIF_SIZE] {
        let mut out = [0u8; EIF_SIZE];
        out[0] = self.reg_b0;
        write_register_groups(&mut out, 1, &GROUPS, self);
        out
    }
}
