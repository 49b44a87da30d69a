//! Canonical register-level instrument representation.
//!
//! [`RawInstrument`] is the pivot every format converter reads from or
//! writes into: raw YM2612 register bytes for the four operators and the
//! channel, plus the channel 3 special-mode frequencies. Operators are held
//! in slot order OP1, OP2, OP3, OP4.

use crate::binutil::{PatchError, ensure_len, read_u16_le_at, write_u16_le};
use crate::bitfield::{REG_B0, REG_B4, REG22, REG27, REG28, REG90};
use crate::fm::{GemsFm, GemsFmOperator};

/// Register order of the four operators.
///
/// The YM2612 lays out operator registers as OP1, OP3, OP2, OP4; most file
/// formats copy that order. Disk position `d` holds slot `REGISTER_ORDER[d]`.
pub const REGISTER_ORDER: [usize; 4] = [0, 2, 1, 3];

/// Size of the native dump written by [`RawInstrument::write`].
pub const RAW_SIZE: usize = 41;

/// Size of one operator in the native dump.
pub const RAW_OPERATOR_SIZE: usize = 7;

/// Raw registers of one FM operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RawFmOperator {
    /// DT/MUL
    pub reg30: u8,
    /// TL
    pub reg40: u8,
    /// RS/AR
    pub reg50: u8,
    /// AM/DR
    pub reg60: u8,
    /// SDR
    pub reg70: u8,
    /// SL/RR
    pub reg80: u8,
    /// SSG-EG
    pub reg90: u8,
}

impl RawFmOperator {
    /// Registers in address order 30H..90H.
    pub fn registers(&self) -> [u8; RAW_OPERATOR_SIZE] {
        [
            self.reg30, self.reg40, self.reg50, self.reg60, self.reg70, self.reg80, self.reg90,
        ]
    }

    /// Build an operator from registers in address order 30H..90H.
    pub fn from_registers(regs: [u8; RAW_OPERATOR_SIZE]) -> Self {
        let [reg30, reg40, reg50, reg60, reg70, reg80, reg90] = regs;
        Self {
            reg30,
            reg40,
            reg50,
            reg60,
            reg70,
            reg80,
            reg90,
        }
    }

    /// Split the 30H..80H registers into fields.
    pub fn fields(&self) -> GemsFmOperator {
        GemsFmOperator::decode(&[
            self.reg30, self.reg40, self.reg50, self.reg60, self.reg70, self.reg80,
        ])
    }

    /// Assemble an operator from fields and an SSG-EG value (low nibble).
    pub fn from_fields(op: &GemsFmOperator, ssg: u8) -> Self {
        let [reg30, reg40, reg50, reg60, reg70, reg80] = op.encode();
        Self {
            reg30,
            reg40,
            reg50,
            reg60,
            reg70,
            reg80,
            reg90: REG90.pack([0, ssg]),
        }
    }

    /// SSG-EG mode (enable bit and shape, 4 bits).
    pub fn ssg(&self) -> u8 {
        let [_, ssg] = REG90.unpack(self.reg90);
        ssg
    }
}

impl From<&GemsFmOperator> for RawFmOperator {
    fn from(op: &GemsFmOperator) -> Self {
        RawFmOperator::from_fields(op, 0)
    }
}

impl From<&RawFmOperator> for GemsFmOperator {
    fn from(op: &RawFmOperator) -> Self {
        op.fields()
    }
}

/// Canonical instrument: the registers a driver writes to key one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawInstrument {
    /// Operators in slot order OP1, OP2, OP3, OP4.
    pub op: [RawFmOperator; 4],
    /// FB/ALG
    pub reg_b0: u8,
    /// L/R/AMS/FMS
    pub reg_b4: u8,
    /// LFO
    pub reg22: u8,
    /// Key-on mask in bits 7..4
    pub reg28: u8,
    /// Channel 3 mode in bits 7..6
    pub reg27: u8,
    /// Channel 3 frequencies in slot order (A9, AA, A8, A2).
    pub ch3_freq: [u16; 4],
}

impl Default for RawInstrument {
    /// Both outputs enabled and all four operators keyed; everything else 0.
    ///
    /// Importers start from this value, so fields a format does not carry
    /// come out as these defaults.
    fn default() -> Self {
        Self {
            op: [RawFmOperator::default(); 4],
            reg_b0: 0x00,
            reg_b4: 0xC0,
            reg22: 0x00,
            reg28: 0xF0,
            reg27: 0x00,
            ch3_freq: [0; 4],
        }
    }
}

impl RawInstrument {
    /// Read the native dump written by [`RawInstrument::write`].
    pub fn read(bytes: &[u8]) -> Result<Self, PatchError> {
        ensure_len(bytes, RAW_SIZE, "raw")?;
        let mut inst = RawInstrument::default();
        for (slot, op) in inst.op.iter_mut().enumerate() {
            let off = slot * RAW_OPERATOR_SIZE;
            *op = RawFmOperator::from_registers(std::array::from_fn(|i| bytes[off + i]));
        }
        inst.reg_b0 = bytes[28];
        inst.reg_b4 = bytes[29];
        inst.reg22 = bytes[30];
        inst.reg28 = bytes[31];
        inst.reg27 = bytes[32];
        for (slot, freq) in inst.ch3_freq.iter_mut().enumerate() {
            *freq = read_u16_le_at(bytes, 33 + slot * 2);
        }
        Ok(inst)
    }

    /// Serialize the canonical form itself: operators in slot order, then
    /// B0, B4, 22, 28, 27, then channel 3 frequencies (little-endian).
    pub fn write(&self) -> [u8; RAW_SIZE] {
        let mut out = [0u8; RAW_SIZE];
        for (slot, op) in self.op.iter().enumerate() {
            let off = slot * RAW_OPERATOR_SIZE;
            out[off..off + RAW_OPERATOR_SIZE].copy_from_slice(&op.registers());
        }
        out[28] = self.reg_b0;
        out[29] = self.reg_b4;
        out[30] = self.reg22;
        out[31] = self.reg28;
        out[32] = self.reg27;
        for (slot, freq) in self.ch3_freq.iter().enumerate() {
            write_u16_le(&mut out, 33 + slot * 2, *freq);
        }
        out
    }

    /// Algorithm (0..7).
    pub fn alg(&self) -> u8 {
        let [_, _, alg] = REG_B0.unpack(self.reg_b0);
        alg
    }

    /// Feedback (0..7).
    pub fn fb(&self) -> u8 {
        let [_, fb, _] = REG_B0.unpack(self.reg_b0);
        fb
    }

    /// Replace algorithm and feedback, keeping the reserved bits of B0H.
    pub fn set_alg_fb(&mut self, alg: u8, fb: u8) {
        let [unk, _, _] = REG_B0.unpack(self.reg_b0);
        self.reg_b0 = REG_B0.pack([unk, fb, alg]);
    }

    /// Amplitude modulation sensitivity (0..3).
    pub fn ams(&self) -> u8 {
        let [_, _, ams, _, _] = REG_B4.unpack(self.reg_b4);
        ams
    }

    /// Frequency modulation sensitivity (0..7).
    pub fn fms(&self) -> u8 {
        let [_, _, _, _, fms] = REG_B4.unpack(self.reg_b4);
        fms
    }

    /// Replace AMS and FMS, keeping the output enables of B4H.
    pub fn set_ams_fms(&mut self, ams: u8, fms: u8) {
        let [l, r, _, unk, _] = REG_B4.unpack(self.reg_b4);
        self.reg_b4 = REG_B4.pack([l, r, ams, unk, fms]);
    }

    /// Key-on mask, bit 0 = OP1.
    pub fn key_mask(&self) -> u8 {
        let [key, _] = REG28.unpack(self.reg28);
        key
    }
}

impl From<&GemsFm> for RawInstrument {
    fn from(fm: &GemsFm) -> Self {
        Self {
            op: fm.op.map(|op| RawFmOperator::from(&op)),
            reg_b0: REG_B0.pack([fm.unk3, fm.fb, fm.alg]),
            reg_b4: REG_B4.pack([fm.l, fm.r, fm.ams, fm.unk4, fm.fms]),
            reg22: REG22.pack([fm.unk1, fm.lfo_on, fm.lfo_val]),
            reg28: REG28.pack([fm.key, fm.unk6]),
            reg27: REG27.pack([fm.ch3, fm.unk2]),
            ch3_freq: fm.ch3_freq,
        }
    }
}

impl From<&RawInstrument> for GemsFm {
    /// The SSG-EG registers have no place in the typed view and are dropped.
    fn from(inst: &RawInstrument) -> Self {
        let [unk1, lfo_on, lfo_val] = REG22.unpack(inst.reg22);
        let [ch3, unk2] = REG27.unpack(inst.reg27);
        let [unk3, fb, alg] = REG_B0.unpack(inst.reg_b0);
        let [l, r, ams, unk4, fms] = REG_B4.unpack(inst.reg_b4);
        let [key, unk6] = REG28.unpack(inst.reg28);
        Self {
            unk1,
            lfo_on,
            lfo_val,
            ch3,
            unk2,
            unk3,
            fb,
            alg,
            l,
            r,
            ams,
            unk4,
            fms,
            op: inst.op.map(|op| op.fields()),
            ch3_freq: inst.ch3_freq,
            unk6,
            key,
            unk7: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawInstrument {
        let mut inst = RawInstrument::default();
        for (slot, op) in inst.op.iter_mut().enumerate() {
            let n = slot as u8;
            *op = RawFmOperator::from_registers([
                0x10 + n,
                0x20 + n,
                0x30 + n,
                0x40 + n,
                0x50 + n,
                0x60 + n,
                0x08 + n,
            ]);
        }
        inst.reg_b0 = 0x32;
        inst.reg_b4 = 0x92;
        inst.reg22 = 0x0C;
        inst.reg28 = 0xA0;
        inst.reg27 = 0x40;
        inst.ch3_freq = [0x1234, 0x2345, 0x3456, 0x0567];
        inst
    }

    #[test]
    fn test_default_values() {
        let inst = RawInstrument::default();
        assert_eq!(inst.reg_b4, 0xC0);
        assert_eq!(inst.key_mask(), 0x0F);
        assert_eq!(inst.alg(), 0);
    }

    #[test]
    fn test_native_dump_round_trip() {
        let inst = sample();
        let bytes = inst.write();
        assert_eq!(bytes[0], 0x10);
        assert_eq!(bytes[7], 0x11);
        assert_eq!(bytes[27], 0x0B);
        assert_eq!(&bytes[28..33], &[0x32, 0x92, 0x0C, 0xA0, 0x40]);
        assert_eq!(&bytes[33..35], &[0x34, 0x12]);
        assert_eq!(RawInstrument::read(&bytes), Ok(inst));
        assert!(RawInstrument::read(&bytes[..40]).is_err());
    }

    #[test]
    fn test_channel_accessors() {
        let mut inst = sample();
        assert_eq!(inst.alg(), 2);
        assert_eq!(inst.fb(), 6);
        assert_eq!(inst.ams(), 1);
        assert_eq!(inst.fms(), 2);
        assert_eq!(inst.key_mask(), 0x0A);

        inst.reg_b0 |= 0xC0;
        inst.set_alg_fb(7, 1);
        assert_eq!(inst.reg_b0, 0xCF);

        inst.set_ams_fms(3, 7);
        assert_eq!(inst.reg_b4, 0xB7);
    }

    #[test]
    fn test_gems_typed_bridge() {
        let inst = sample();
        let fm = GemsFm::from(&inst);
        assert_eq!(fm.alg, 2);
        assert_eq!(fm.fb, 6);
        assert_eq!(fm.key, 0x0A);
        assert_eq!(fm.lfo_on, 1);
        assert_eq!(fm.lfo_val, 4);
        assert_eq!(fm.ch3, 1);
        assert_eq!(fm.op[1].mul, 1);

        // SSG is the only thing the typed view cannot hold
        let mut expected = inst;
        for op in expected.op.iter_mut() {
            op.reg90 = 0;
        }
        assert_eq!(RawInstrument::from(&fm), expected);
    }

    #[test]
    fn test_operator_fields_and_ssg() {
        let op = RawFmOperator::from_registers([0x71, 0x7F, 0xDF, 0x9F, 0x1F, 0xFF, 0x0D]);
        let fields = op.fields();
        assert_eq!((fields.dt, fields.mul), (7, 1));
        assert_eq!(fields.tl, 0x7F);
        assert_eq!((fields.rs, fields.ar), (3, 0x1F));
        assert_eq!((fields.am, fields.dr), (1, 0x1F));
        assert_eq!(fields.sdr, 0x1F);
        assert_eq!((fields.sl, fields.rr), (15, 15));
        assert_eq!(op.ssg(), 0x0D);
        assert_eq!(RawFmOperator::from_fields(&fields, op.ssg()), op);
    }
}
