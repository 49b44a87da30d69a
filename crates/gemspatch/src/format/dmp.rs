//! DefleMask FM preset, versions 0 and 5.
//!
//! Both versions start with a version byte and end with the same four
//! eleven-byte operator blocks in register order: MUL, TL, AR, DR, SL, RR,
//! AM, RS, DT (centered), SDR, SSG-EG.
//!
//! | Version | Size | Header |
//! |---|---|---|
//! | 5 | 51 | version, system (Genesis), mode (FM), FMS, FB, ALG, AMS |
//! | 0 | 49 | version, mode (FM), FMS, FB, ALG |
//!
//! Import looks at the version byte and accepts either layout. The system
//! and mode bytes are not checked.

use super::{dt_from_centered, dt_to_centered};
use crate::binutil::{PatchError, ensure_len, read_u8_at};
use crate::fm::GemsFmOperator;
use crate::raw::{REGISTER_ORDER, RawFmOperator, RawInstrument};

/// Size of a version 5 preset.
pub const DMP_SIZE: usize = 51;
/// Size of a version 0 preset.
pub const DMP_V0_SIZE: usize = 49;

pub const DMP_VERSION_5: u8 = 0x05;
pub const DMP_VERSION_0: u8 = 0x00;
pub const DMP_SYSTEM_GENESIS: u8 = 0x02;
pub const DMP_MODE_FM: u8 = 0x01;

const OPERATOR_SIZE: usize = 11;
const V5_OPERATORS_OFFSET: usize = 7;
const V0_OPERATORS_OFFSET: usize = 5;

fn read_operators(data: &[u8], off: usize, inst: &mut RawInstrument) {
    for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
        let b = &data[off + disk * OPERATOR_SIZE..];
        let op = GemsFmOperator {
            mul: b[0],
            tl: b[1],
            ar: b[2],
            dr: b[3],
            sl: b[4],
            rr: b[5],
            am: b[6],
            rs: b[7],
            dt: dt_from_centered(b[8]),
            sdr: b[9],
            ..Default::default()
        };
        inst.op[slot] = RawFmOperator::from_fields(&op, b[10]);
    }
}

fn write_operators(out: &mut [u8], off: usize, inst: &RawInstrument) {
    for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
        let raw = &inst.op[slot];
        let f = raw.fields();
        let start = off + disk * OPERATOR_SIZE;
        out[start..start + OPERATOR_SIZE].copy_from_slice(&[
            f.mul,
            f.tl,
            f.ar,
            f.dr,
            f.sl,
            f.rr,
            f.am,
            f.rs,
            dt_to_centered(f.dt),
            f.sdr,
            raw.ssg(),
        ]);
    }
}

impl RawInstrument {
    /// Import a DMP preset of either version.
    ///
    /// Returns [`PatchError::UnsupportedVersion`] for any version byte other
    /// than 0 or 5.
    pub fn import_dmp(data: &[u8]) -> Result<Self, PatchError> {
        let version = read_u8_at(data, 0, "DMP")?;
        let mut inst = RawInstrument::default();
        match version {
            DMP_VERSION_5 => {
                ensure_len(data, DMP_SIZE, "DMP")?;
                log::trace!("DMP v5, system 0x{:02X}", data[1]);
                inst.set_alg_fb(data[5], data[4]);
                inst.set_ams_fms(data[6], data[3]);
                read_operators(data, V5_OPERATORS_OFFSET, &mut inst);
            }
            DMP_VERSION_0 => {
                ensure_len(data, DMP_V0_SIZE, "DMP0")?;
                log::trace!("DMP v0");
                inst.set_alg_fb(data[4], data[3]);
                inst.set_ams_fms(0, data[2]);
                read_operators(data, V0_OPERATORS_OFFSET, &mut inst);
            }
            other => {
                log::debug!("rejecting DMP version 0x{:02X}", other);
                return Err(PatchError::UnsupportedVersion(other));
            }
        }
        Ok(inst)
    }

    /// Export as a version 5 preset (51 bytes).
    pub fn export_dmp(&self) -> [u8; DMP_SIZE] {
        let mut out = [0u8; DMP_SIZE];
        out[..V5_OPERATORS_OFFSET].copy_from_slice(&[
            DMP_VERSION_5,
            DMP_SYSTEM_GENESIS,
            DMP_MODE_FM,
            self.fms(),
            self.fb(),
            self.alg(),
            self.ams(),
        ]);
        write_operators(&mut out, V5_OPERATORS_OFFSET, self);
        out
    }

    /// Export as a version 0 preset (49 bytes). AMS is not stored.
    pub fn export_dmp_v0(&self) -> [u8; DMP_V0_SIZE] {
        let mut out = [0u8; DMP_V0_SIZE];
        out[..V0_OPERATORS_OFFSET].copy_from_slice(&[
            DMP_VERSION_0,
            DMP_MODE_FM,
            self.fms(),
            self.fb(),
            self.alg(),
        ]);
        write_operators(&mut out, V0_OPERATORS_OFFSET, self);
        out
    }
}
