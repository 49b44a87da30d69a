//! SMPS voice (25 bytes), as used by the Sonic sound drivers.
//!
//! Byte 0 is B0H. Five four-byte register groups follow in register order,
//! with TL last so a driver can scale it for volume:
//!
//! | Offset | Register |
//! |---|---|
//! | 1 | 30H |
//! | 5 | 50H |
//! | 9 | 60H |
//! | 13 | reserved (0) |
//! | 17 | 80H |
//! | 21 | 40H |
//!
//! SMPS does not carry the sustain decay rate, SSG-EG, B4H, LFO, key mask
//! or channel 3 data; those come back as defaults.

use super::{read_register_groups, write_register_groups};
use crate::binutil::{PatchError, ensure_len};
use crate::raw::RawInstrument;

/// Size of an SMPS voice.
pub const SMPS_SIZE: usize = 25;

const GROUPS: [Option<usize>; 6] = [Some(0), Some(2), Some(3), None, Some(5), Some(1)];

impl RawInstrument {
    /// Import an SMPS voice.
    pub fn import_smps(data: &[u8]) -> Result<Self, PatchError> {
        ensure_len(data, SMPS_SIZE, "SMPS")?;
        let mut inst = RawInstrument {
            reg_b0: data[0],
            ..Default::default()
        };
        read_register_groups(data, 1, &GROUPS, &mut inst);
        Ok(inst)
    }

    /// Export as an SMPS voice.
    pub fn export_smps(&self) -> [u8; SMPS_SIZE] {
        let mut out = [0u8; SMPS_SIZE];
        out[0] = self.reg_b0;
        write_register_groups(&mut out, 1, &GROUPS, self);
        out
    }
}
