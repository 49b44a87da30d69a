//! Typed view of a GEMS FM patch.
//!
//! [`GemsFm`] and [`GemsFmOperator`] expose every register bitfield as a
//! named `u8`, including the reserved bits, so decoding and re-encoding a
//! patch reproduces it byte for byte.
//!
//! GEMS FM patch layout (39 bytes):
//!
//! | Offset | Content |
//! |---|---|
//! | 0 | patch type (0 = FM) |
//! | 1 | 22H: LFO enable / value |
//! | 2 | 27H: channel 3 mode |
//! | 3 | B0H: feedback / algorithm |
//! | 4 | B4H: L / R / AMS / FMS |
//! | 5..29 | operators, 6 bytes each (30H..80H), order OP1, OP3, OP2, OP4 |
//! | 29..37 | channel 3 frequencies, big-endian, order OP4, OP3, OP1, OP2 |
//! | 37 | key-on mask (low nibble, bit 0 = OP1) |
//! | 38 | reserved |

use crate::binutil::{PatchError, ensure_len, read_u16_be_at, write_u16_be};
use crate::bitfield::{
    GEMS_KEY, REG_B0, REG_B4, REG22, REG27, REG30, REG40, REG50, REG60, REG70, REG80,
};
use crate::raw::REGISTER_ORDER;

/// Size of a GEMS FM patch in bytes.
pub const GEMS_FM_SIZE: usize = 39;

/// Size of one operator block inside a GEMS patch.
pub const GEMS_OPERATOR_SIZE: usize = 6;

/// GEMS patch type byte values.
pub const GEMSI_FM: u8 = 0;
pub const GEMSI_DAC: u8 = 1;
pub const GEMSI_PSG: u8 = 2;
pub const GEMSI_NOISE: u8 = 3;

const OPERATORS_OFFSET: usize = 5;
const CH3_OFFSET: usize = 29;
const KEY_OFFSET: usize = 37;

/// Disk position `d` of a channel 3 frequency holds slot `GEMS_CH3_ORDER[d]`.
///
/// On disk: OP4 (A2), OP3 (A8), OP1 (A9), OP2 (AA).
pub const GEMS_CH3_ORDER: [usize; 4] = [3, 2, 0, 1];

/// Operators that drive the output level, per algorithm (bit 0 = OP1).
const CARRIERS: [u8; 8] = [
    0b1000, 0b1000, 0b1000, 0b1000, 0b1010, 0b1110, 0b1110, 0b1111,
];

/// One FM operator, split into register fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GemsFmOperator {
    // 30H
    pub unk1: u8,
    /// Detune (3 bits, register encoding: 4..7 are negative).
    pub dt: u8,
    /// Multiply (4 bits).
    pub mul: u8,

    // 40H
    pub unk2: u8,
    /// Total level (7 bits).
    pub tl: u8,

    // 50H
    /// Rate scale (2 bits).
    pub rs: u8,
    pub unk3: u8,
    /// Attack rate (5 bits).
    pub ar: u8,

    // 60H
    /// Amplitude modulation enable (1 bit).
    pub am: u8,
    pub unk4: u8,
    /// Decay rate (5 bits).
    pub dr: u8,

    // 70H
    pub unk5: u8,
    /// Sustain decay rate (5 bits).
    pub sdr: u8,

    // 80H
    /// Sustain level (4 bits).
    pub sl: u8,
    /// Release rate (4 bits).
    pub rr: u8,
}

impl GemsFmOperator {
    /// Decode the six register bytes 30H, 40H, 50H, 60H, 70H, 80H.
    pub fn decode(regs: &[u8; GEMS_OPERATOR_SIZE]) -> Self {
        let [unk1, dt, mul] = REG30.unpack(regs[0]);
        let [unk2, tl] = REG40.unpack(regs[1]);
        let [rs, unk3, ar] = REG50.unpack(regs[2]);
        let [am, unk4, dr] = REG60.unpack(regs[3]);
        let [unk5, sdr] = REG70.unpack(regs[4]);
        let [sl, rr] = REG80.unpack(regs[5]);
        Self {
            unk1,
            dt,
            mul,
            unk2,
            tl,
            rs,
            unk3,
            ar,
            am,
            unk4,
            dr,
            unk5,
            sdr,
            sl,
            rr,
        }
    }

    /// Encode back to the six register bytes. Out-of-range values are masked.
    pub fn encode(&self) -> [u8; GEMS_OPERATOR_SIZE] {
        [
            REG30.pack([self.unk1, self.dt, self.mul]),
            REG40.pack([self.unk2, self.tl]),
            REG50.pack([self.rs, self.unk3, self.ar]),
            REG60.pack([self.am, self.unk4, self.dr]),
            REG70.pack([self.unk5, self.sdr]),
            REG80.pack([self.sl, self.rr]),
        ]
    }
}

/// A GEMS FM patch, split into register fields.
///
/// Operators and channel 3 frequencies are held in slot order OP1..OP4
/// regardless of their order on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GemsFm {
    // Offset 1 (22H)
    pub unk1: u8,
    /// LFO enable (1 bit).
    pub lfo_on: u8,
    /// LFO frequency (3 bits).
    pub lfo_val: u8,

    // Offset 2 (27H)
    /// Channel 3 mode (2 bits).
    pub ch3: u8,
    pub unk2: u8,

    // Offset 3 (B0H)
    pub unk3: u8,
    /// Feedback (3 bits).
    pub fb: u8,
    /// Algorithm (3 bits).
    pub alg: u8,

    // Offset 4 (B4H)
    /// Left output enable (1 bit).
    pub l: u8,
    /// Right output enable (1 bit).
    pub r: u8,
    /// Amplitude modulation sensitivity (2 bits).
    pub ams: u8,
    pub unk4: u8,
    /// Frequency modulation sensitivity (3 bits).
    pub fms: u8,

    pub op: [GemsFmOperator; 4],

    /// Channel 3 special-mode frequencies (A9, AA, A8, A2).
    pub ch3_freq: [u16; 4],

    // Offset 37
    pub unk6: u8,
    /// Key-on mask (4 bits, bit 0 = OP1).
    pub key: u8,

    // Offset 38
    pub unk7: u8,
}

impl GemsFm {
    /// Decode a GEMS FM patch. The type byte at offset 0 is not inspected;
    /// use [`crate::GemsPatch`] to dispatch on it.
    pub fn decode(bytes: &[u8]) -> Result<Self, PatchError> {
        ensure_len(bytes, GEMS_FM_SIZE, "GEMS")?;

        let [unk1, lfo_on, lfo_val] = REG22.unpack(bytes[1]);
        let [ch3, unk2] = REG27.unpack(bytes[2]);
        let [unk3, fb, alg] = REG_B0.unpack(bytes[3]);
        let [l, r, ams, unk4, fms] = REG_B4.unpack(bytes[4]);

        let mut op = [GemsFmOperator::default(); 4];
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            let off = OPERATORS_OFFSET + disk * GEMS_OPERATOR_SIZE;
            let regs: [u8; GEMS_OPERATOR_SIZE] = std::array::from_fn(|i| bytes[off + i]);
            op[slot] = GemsFmOperator::decode(&regs);
        }

        let mut ch3_freq = [0u16; 4];
        for (disk, &slot) in GEMS_CH3_ORDER.iter().enumerate() {
            ch3_freq[slot] = read_u16_be_at(bytes, CH3_OFFSET + disk * 2);
        }

        let [unk6, key] = GEMS_KEY.unpack(bytes[KEY_OFFSET]);

        Ok(Self {
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
            op,
            ch3_freq,
            unk6,
            key,
            unk7: bytes[KEY_OFFSET + 1],
        })
    }

    /// Encode the patch, writing [`GEMSI_FM`] as the type byte.
    pub fn encode(&self) -> [u8; GEMS_FM_SIZE] {
        let mut out = [0u8; GEMS_FM_SIZE];
        out[0] = GEMSI_FM;
        out[1] = REG22.pack([self.unk1, self.lfo_on, self.lfo_val]);
        out[2] = REG27.pack([self.ch3, self.unk2]);
        out[3] = REG_B0.pack([self.unk3, self.fb, self.alg]);
        out[4] = REG_B4.pack([self.l, self.r, self.ams, self.unk4, self.fms]);

        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            let off = OPERATORS_OFFSET + disk * GEMS_OPERATOR_SIZE;
            out[off..off + GEMS_OPERATOR_SIZE].copy_from_slice(&self.op[slot].encode());
        }
        for (disk, &slot) in GEMS_CH3_ORDER.iter().enumerate() {
            write_u16_be(&mut out, CH3_OFFSET + disk * 2, self.ch3_freq[slot]);
        }

        out[KEY_OFFSET] = GEMS_KEY.pack([self.unk6, self.key]);
        out[KEY_OFFSET + 1] = self.unk7;
        out
    }

    /// Whether operator `op` (slot index 0..=3, OP1..OP4) is keyed on.
    pub fn is_on(&self, op: usize) -> bool {
        op < 4 && (self.key >> op) & 1 != 0
    }

    /// Whether operator `op` (slot index 0..=3) is a carrier under the
    /// current algorithm, i.e. its TL controls the output volume.
    pub fn is_carrier(&self, op: usize) -> bool {
        op < 4 && (CARRIERS[(self.alg & 7) as usize] >> op) & 1 != 0
    }
}
