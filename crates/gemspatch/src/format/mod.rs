//! Instrument file formats and the registry that dispatches to them.
//!
//! Each submodule adds an `import_*`/`export_*` pair to [`RawInstrument`]
//! for one external layout. [`Format`] is the closed set of those layouts;
//! its id, name, size and converter functions live in a single static table.
//!
//! ```
//! use gemspatch::{Format, RawInstrument};
//!
//! let mut inst = RawInstrument::default();
//! inst.set_alg_fb(4, 6);
//!
//! let tfi = inst.export(Format::Tfi);
//! assert_eq!(tfi.len(), Format::Tfi.size());
//! assert_eq!(&tfi[..2], &[4, 6]);
//!
//! let back = RawInstrument::import(Format::Tfi, &tfi).unwrap();
//! assert_eq!(back.alg(), 4);
//! assert_eq!(Format::by_name("tfi"), Some(Format::Tfi));
//! ```

pub mod dmp;
pub mod eif;
pub mod gems;
pub mod smps;
pub mod tfi;
pub mod tyi;
pub mod vgi;
pub mod y12;

use std::fmt;
use std::str::FromStr;

use crate::binutil::PatchError;
use crate::raw::{REGISTER_ORDER, RawFmOperator, RawInstrument};

pub use dmp::{DMP_SIZE, DMP_V0_SIZE};
pub use eif::EIF_SIZE;
pub use gems::GEMS_SIZE;
pub use smps::SMPS_SIZE;
pub use tfi::TFI_SIZE;
pub use tyi::TYI_SIZE;
pub use vgi::VGI_SIZE;
pub use y12::Y12_SIZE;

/// Supported instrument formats. The discriminant is the numeric format id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Format {
    /// GEMS FM patch (39 bytes).
    Gems = 0,
    /// Tiido's YM instrument (32 bytes).
    Tyi = 1,
    /// TFM Music Maker instrument (42 bytes).
    Tfi = 2,
    /// Echo instrument (29 bytes).
    Eif = 3,
    /// Gens KMod register dump (128 bytes).
    Y12 = 4,
    /// VGM Music Maker instrument (43 bytes).
    Vgi = 5,
    /// DefleMask preset, version 5 (51 bytes).
    Dmp = 6,
    /// DefleMask preset, version 0 (49 bytes).
    Dmp0 = 7,
    /// SMPS voice (25 bytes).
    Smps = 8,
}

type ImportFn = fn(&[u8]) -> Result<RawInstrument, PatchError>;
type ExportFn = fn(&RawInstrument) -> Vec<u8>;

struct FormatEntry {
    name: &'static str,
    size: usize,
    import: ImportFn,
    export: ExportFn,
}

/// Registry table, indexed by format id.
static FORMATS: [FormatEntry; 9] = [
    FormatEntry {
        name: "GEMS",
        size: GEMS_SIZE,
        import: RawInstrument::import_gems,
        export: |inst| inst.export_gems().to_vec(),
    },
    FormatEntry {
        name: "TYI",
        size: TYI_SIZE,
        import: RawInstrument::import_tyi,
        export: |inst| inst.export_tyi().to_vec(),
    },
    FormatEntry {
        name: "TFI",
        size: TFI_SIZE,
        import: RawInstrument::import_tfi,
        export: |inst| inst.export_tfi().to_vec(),
    },
    FormatEntry {
        name: "EIF",
        size: EIF_SIZE,
        import: RawInstrument::import_eif,
        export: |inst| inst.export_eif().to_vec(),
    },
    FormatEntry {
        name: "Y12",
        size: Y12_SIZE,
        import: RawInstrument::import_y12,
        export: |inst| inst.export_y12().to_vec(),
    },
    FormatEntry {
        name: "VGI",
        size: VGI_SIZE,
        import: RawInstrument::import_vgi,
        export: |inst| inst.export_vgi().to_vec(),
    },
    FormatEntry {
        name: "DMP",
        size: DMP_SIZE,
        import: RawInstrument::import_dmp,
        export: |inst| inst.export_dmp().to_vec(),
    },
    FormatEntry {
        name: "DMP0",
        size: DMP_V0_SIZE,
        import: RawInstrument::import_dmp,
        export: |inst| inst.export_dmp_v0().to_vec(),
    },
    FormatEntry {
        name: "SMPS",
        size: SMPS_SIZE,
        import: RawInstrument::import_smps,
        export: |inst| inst.export_smps().to_vec(),
    },
];

impl Format {
    /// Every format, in id order.
    pub const ALL: [Format; 9] = [
        Format::Gems,
        Format::Tyi,
        Format::Tfi,
        Format::Eif,
        Format::Y12,
        Format::Vgi,
        Format::Dmp,
        Format::Dmp0,
        Format::Smps,
    ];

    fn entry(self) -> &'static FormatEntry {
        &FORMATS[self as usize]
    }

    /// Numeric format id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Canonical upper-case name (`"GEMS"`, `"TFI"`, ...).
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Exact byte size of a buffer in this format.
    pub fn size(self) -> usize {
        self.entry().size
    }

    /// Look a format up by name, ignoring ASCII case.
    ///
    /// Returns `None` when no format matches.
    pub fn by_name(name: &str) -> Option<Format> {
        Format::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Identify a format from a buffer length. All sizes are distinct.
    pub fn from_size(len: usize) -> Option<Format> {
        Format::ALL.into_iter().find(|f| f.size() == len)
    }
}

impl TryFrom<u8> for Format {
    type Error = PatchError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Format::ALL
            .get(id as usize)
            .copied()
            .ok_or(PatchError::UnknownFormatId(id))
    }
}

impl FromStr for Format {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::by_name(s).ok_or_else(|| PatchError::UnknownFormatName(s.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte size of format `id`, or `None` for an unknown id.
pub fn format_size(id: u8) -> Option<usize> {
    Format::try_from(id).ok().map(Format::size)
}

/// Name of format `id`, or `None` for an unknown id.
pub fn format_name(id: u8) -> Option<&'static str> {
    Format::try_from(id).ok().map(Format::name)
}

/// Id of the format called `name` (ASCII case-insensitive), or `None`.
pub fn format_by_name(name: &str) -> Option<u8> {
    Format::by_name(name).map(Format::id)
}

impl RawInstrument {
    /// Import `data` as `format`.
    ///
    /// Both [`Format::Dmp`] and [`Format::Dmp0`] inspect the version byte
    /// and accept either sub-version.
    pub fn import(format: Format, data: &[u8]) -> Result<Self, PatchError> {
        log::debug!("import {} ({} bytes)", format, data.len());
        (format.entry().import)(data)
    }

    /// Import `data` as the format with numeric id `id`.
    pub fn import_by_id(id: u8, data: &[u8]) -> Result<Self, PatchError> {
        RawInstrument::import(Format::try_from(id)?, data)
    }

    /// Export to `format`; the result is exactly `format.size()` bytes.
    pub fn export(&self, format: Format) -> Vec<u8> {
        log::debug!("export {}", format);
        (format.entry().export)(self)
    }

    /// Export to the format with numeric id `id`.
    pub fn export_by_id(&self, id: u8) -> Result<Vec<u8>, PatchError> {
        Ok(self.export(Format::try_from(id)?))
    }
}

/// Convert a buffer from one format to another through [`RawInstrument`].
pub fn convert(from: Format, to: Format, data: &[u8]) -> Result<Vec<u8>, PatchError> {
    Ok(RawInstrument::import(from, data)?.export(to))
}

/// Centered detune (0..7, 3 = none) to the register encoding.
const DT_CENTERED_TO_REG: [u8; 8] = [7, 6, 5, 0, 1, 2, 3, 4];
/// Register detune to the centered encoding.
const DT_REG_TO_CENTERED: [u8; 8] = [3, 4, 5, 6, 7, 2, 1, 0];

/// Convert a centered detune value (TFI, DMP) to the 30H register field.
pub fn dt_from_centered(value: u8) -> u8 {
    DT_CENTERED_TO_REG[(value & 7) as usize]
}

/// Convert a 30H detune field to the centered encoding (TFI, DMP).
pub fn dt_to_centered(reg: u8) -> u8 {
    DT_REG_TO_CENTERED[(reg & 7) as usize]
}

/// Read four-byte register groups in register operator order.
///
/// Group `g` starts at `off + 4 * g` and fills operator register
/// `groups[g]` (0 = 30H .. 6 = 90H); `None` groups are skipped. The caller
/// has checked the buffer length.
fn read_register_groups(
    data: &[u8],
    off: usize,
    groups: &[Option<usize>],
    inst: &mut RawInstrument,
) {
    let mut regs = inst.op.map(|op| op.registers());
    for (g, reg) in groups.iter().enumerate() {
        let Some(reg) = *reg else { continue };
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            regs[slot][reg] = data[off + g * 4 + disk];
        }
    }
    inst.op = regs.map(RawFmOperator::from_registers);
}

/// Inverse of [`read_register_groups`]; `None` groups are left as they are.
fn write_register_groups(
    out: &mut [u8],
    off: usize,
    groups: &[Option<usize>],
    inst: &RawInstrument,
) {
    let regs = inst.op.map(|op| op.registers());
    for (g, reg) in groups.iter().enumerate() {
        let Some(reg) = *reg else { continue };
        for (disk, &slot) in REGISTER_ORDER.iter().enumerate() {
            out[off + g * 4 + disk] = regs[slot][reg];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_table() {
        let expected = [
            (Format::Gems, "GEMS", 39),
            (Format::Tyi, "TYI", 32),
            (Format::Tfi, "TFI", 42),
            (Format::Eif, "EIF", 29),
            (Format::Y12, "Y12", 128),
            (Format::Vgi, "VGI", 43),
            (Format::Dmp, "DMP", 51),
            (Format::Dmp0, "DMP0", 49),
            (Format::Smps, "SMPS", 25),
        ];
        for (id, (format, name, size)) in expected.iter().enumerate() {
            assert_eq!(format.id() as usize, id);
            assert_eq!(format.name(), *name);
            assert_eq!(format.size(), *size);
            assert_eq!(Format::ALL[id], *format);
        }
    }

    #[test]
    fn test_name_lookup() {
        for format in Format::ALL {
            assert_eq!(Format::by_name(format.name()), Some(format));
            assert_eq!(format_by_name(format_name(format.id()).unwrap()), Some(format.id()));
        }
        assert_eq!(Format::by_name("smps"), Some(Format::Smps));
        assert_eq!(Format::by_name("Dmp0"), Some(Format::Dmp0));
        assert_eq!(Format::by_name("OPM"), None);
        assert_eq!(Format::by_name(""), None);
        assert_eq!(Format::by_name("TFI "), None);
        assert_eq!(
            "wopn".parse::<Format>(),
            Err(PatchError::UnknownFormatName("wopn".to_string()))
        );
        assert_eq!("vgi".parse::<Format>(), Ok(Format::Vgi));
    }

    #[test]
    fn test_unknown_ids() {
        assert_eq!(Format::try_from(8), Ok(Format::Smps));
        assert_eq!(Format::try_from(9), Err(PatchError::UnknownFormatId(9)));
        assert_eq!(format_size(200), None);
        assert_eq!(format_name(9), None);
        assert_eq!(
            RawInstrument::import_by_id(42, &[0u8; 64]),
            Err(PatchError::UnknownFormatId(42))
        );
        assert_eq!(
            RawInstrument::default().export_by_id(255),
            Err(PatchError::UnknownFormatId(255))
        );
    }

    #[test]
    fn test_sizes_identify_formats() {
        for format in Format::ALL {
            assert_eq!(Format::from_size(format.size()), Some(format));
        }
        assert_eq!(Format::from_size(40), None);
    }

    #[test]
    fn test_export_lengths() {
        let inst = RawInstrument::default();
        for format in Format::ALL {
            assert_eq!(inst.export(format).len(), format.size(), "{}", format);
        }
    }

    #[test]
    fn test_detune_tables_are_inverse() {
        for v in 0..8u8 {
            assert_eq!(dt_to_centered(dt_from_centered(v)), v);
            assert_eq!(dt_from_centered(dt_to_centered(v)), v);
        }
        assert_eq!(dt_from_centered(3), 0);
        assert_eq!(dt_from_centered(0), 7);
        assert_eq!(dt_from_centered(6), 3);
        assert_eq!(dt_to_centered(5), 2);
    }

    #[test]
    fn test_register_groups() {
        let mut data = [0u8; 8];
        data[..4].copy_from_slice(&[1, 3, 2, 4]);
        data[4..].copy_from_slice(&[0x11, 0x33, 0x22, 0x44]);
        let mut inst = RawInstrument::default();
        read_register_groups(&data, 0, &[Some(2), Some(6)], &mut inst);
        assert_eq!(inst.op.map(|op| op.reg50), [1, 2, 3, 4]);
        assert_eq!(inst.op.map(|op| op.reg90), [0x11, 0x22, 0x33, 0x44]);

        let mut out = [0xEEu8; 12];
        write_register_groups(&mut out, 0, &[Some(2), None, Some(6)], &inst);
        assert_eq!(&out[..4], &[1, 3, 2, 4]);
        assert_eq!(&out[4..8], &[0xEE; 4]);
        assert_eq!(&out[8..], &[0x11, 0x33, 0x22, 0x44]);
    }

    #[test]
    fn test_convert() {
        let mut inst = RawInstrument::default();
        inst.set_alg_fb(5, 3);
        let eif = inst.export_eif();
        let smps = convert(Format::Eif, Format::Smps, &eif).unwrap();
        assert_eq!(smps[0], eif[0]);
        assert!(convert(Format::Tfi, Format::Eif, &[0u8; 4]).is_err());
    }
}
