//! Width-tagged bitfield tables for YM2612 register bytes.
//!
//! Every register byte that the converters split into parameters is
//! described by a [`Layout`]: an ordered list of [`Field`]s, each naming a
//! bit offset and width inside the byte. Decoding and encoding are generic
//! over the table, so no converter hand-codes shifts.
//!
//! Reserved bits are listed as ordinary fields (named `unk*`) so that
//! `pack(unpack(b)) == b` holds for every byte.
//!
//! Values wider than their field are masked on encode, never reported as
//! errors.
//!
//! ```
//! use gemspatch::bitfield::REG30;
//!
//! let [unk, dt, mul] = REG30.unpack(0x71);
//! assert_eq!((unk, dt, mul), (0, 7, 1));
//! assert_eq!(REG30.pack([unk, dt, mul]), 0x71);
//! ```

/// One bitfield inside a register byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Parameter name, as printed by the tools.
    pub name: &'static str,
    /// Position of the least significant bit.
    pub shift: u8,
    /// Number of bits.
    pub width: u8,
}

impl Field {
    pub const fn new(name: &'static str, shift: u8, width: u8) -> Self {
        Self { name, shift, width }
    }

    /// Value mask, right-aligned (`0b111` for a 3-bit field).
    pub const fn mask(&self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Maximum value the field can hold.
    pub const fn max(&self) -> u8 {
        self.mask()
    }

    /// Extract this field from `byte`.
    pub const fn get(&self, byte: u8) -> u8 {
        (byte >> self.shift) & self.mask()
    }

    /// Return `byte` with this field replaced by `value` (masked to width).
    pub const fn put(&self, byte: u8, value: u8) -> u8 {
        let in_place = self.mask() << self.shift;
        (byte & !in_place) | ((value & self.mask()) << self.shift)
    }
}

/// Field table for one register byte, most significant field first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout<const N: usize> {
    /// Register name (`"30"`, `"B4"`, ...).
    pub name: &'static str,
    pub fields: [Field; N],
}

impl<const N: usize> Layout<N> {
    /// Split `byte` into its field values, in table order.
    pub fn unpack(&self, byte: u8) -> [u8; N] {
        self.fields.map(|field| field.get(byte))
    }

    /// Assemble a byte from field values given in table order.
    pub fn pack(&self, values: [u8; N]) -> u8 {
        self.fields
            .iter()
            .zip(values)
            .fold(0, |byte, (field, value)| field.put(byte, value))
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True when the fields tile all eight bits exactly once.
    pub fn is_complete(&self) -> bool {
        let mut covered: u16 = 0;
        let mut total = 0u8;
        for field in &self.fields {
            let bits = (field.mask() as u16) << field.shift;
            if covered & bits != 0 || bits > 0xFF {
                return false;
            }
            covered |= bits;
            total += field.width;
        }
        covered == 0xFF && total == 8
    }
}

/// 30H: detune / multiply.
pub const REG30: Layout<3> = Layout {
    name: "30",
    fields: [
        Field::new("unk1", 7, 1),
        Field::new("DT", 4, 3),
        Field::new("MUL", 0, 4),
    ],
};

/// 40H: total level.
pub const REG40: Layout<2> = Layout {
    name: "40",
    fields: [Field::new("unk2", 7, 1), Field::new("TL", 0, 7)],
};

/// 50H: rate scale / attack rate.
pub const REG50: Layout<3> = Layout {
    name: "50",
    fields: [
        Field::new("RS", 6, 2),
        Field::new("unk3", 5, 1),
        Field::new("AR", 0, 5),
    ],
};

/// 60H: amplitude modulation / decay rate.
pub const REG60: Layout<3> = Layout {
    name: "60",
    fields: [
        Field::new("AM", 7, 1),
        Field::new("unk4", 5, 2),
        Field::new("DR", 0, 5),
    ],
};

/// 70H: sustain decay rate.
pub const REG70: Layout<2> = Layout {
    name: "70",
    fields: [Field::new("unk5", 5, 3), Field::new("SDR", 0, 5)],
};

/// 80H: sustain level / release rate.
pub const REG80: Layout<2> = Layout {
    name: "80",
    fields: [Field::new("SL", 4, 4), Field::new("RR", 0, 4)],
};

/// 90H: SSG-EG (enable bit + 3-bit shape in the low nibble).
pub const REG90: Layout<2> = Layout {
    name: "90",
    fields: [Field::new("unk", 4, 4), Field::new("SSG", 0, 4)],
};

/// B0H: feedback / algorithm.
pub const REG_B0: Layout<3> = Layout {
    name: "B0",
    fields: [
        Field::new("unk3", 6, 2),
        Field::new("FB", 3, 3),
        Field::new("ALG", 0, 3),
    ],
};

/// B4H: output enables / AMS / FMS.
pub const REG_B4: Layout<5> = Layout {
    name: "B4",
    fields: [
        Field::new("L", 7, 1),
        Field::new("R", 6, 1),
        Field::new("AMS", 4, 2),
        Field::new("unk4", 3, 1),
        Field::new("FMS", 0, 3),
    ],
};

/// 22H: LFO enable / LFO frequency.
pub const REG22: Layout<3> = Layout {
    name: "22",
    fields: [
        Field::new("unk1", 4, 4),
        Field::new("LFO_on", 3, 1),
        Field::new("LFO_val", 0, 3),
    ],
};

/// 27H: channel 3 mode (upper two bits; the rest are timer controls).
pub const REG27: Layout<2> = Layout {
    name: "27",
    fields: [Field::new("CH3", 6, 2), Field::new("unk2", 0, 6)],
};

/// 28H: key-on operator mask (bit 4 = OP1) / channel select.
pub const REG28: Layout<2> = Layout {
    name: "28",
    fields: [Field::new("KEY", 4, 4), Field::new("CH", 0, 4)],
};

/// Key-on byte of a GEMS patch: operator mask in the low nibble, bit 0 = OP1.
pub const GEMS_KEY: Layout<2> = Layout {
    name: "KEY",
    fields: [Field::new("unk6", 4, 4), Field::new("KEY", 0, 4)],
};
