#![doc = include_str!("../README.md")]
//! gemspatch: bit-exact converter for YM2612 instrument patches
//!
//! Every supported file format is converted to and from one canonical
//! register-level form, [`RawInstrument`]. Adding a format means writing one
//! import/export pair against that form rather than one converter per pair
//! of formats.
//!
//! Layers, bottom up:
//! - [`bitfield`]: width-tagged field tables for each YM2612 register byte.
//!   All packing and unpacking goes through these tables.
//! - [`fm`], [`psg`], [`patch`]: typed views of GEMS patches, with every
//!   reserved bit kept so decode/encode is lossless.
//! - [`raw`]: the canonical [`RawInstrument`] and its operator registers.
//! - [`format`]: one module per file layout plus the [`Format`] registry.
//!
//! Example: convert a TFI instrument to a DefleMask preset
//!
//! ```rust
//! use gemspatch::{Format, RawInstrument, convert};
//!
//! let mut inst = RawInstrument::default();
//! inst.set_alg_fb(7, 0);
//! let tfi = inst.export_tfi();
//!
//! let dmp = convert(Format::Tfi, Format::Dmp, &tfi).unwrap();
//! assert_eq!(dmp.len(), 51);
//! assert_eq!(dmp[0], 0x05);
//!
//! let back = RawInstrument::import(Format::Dmp, &dmp).unwrap();
//! assert_eq!(back.alg(), 7);
//! ```
//!
//! Example: inspect a GEMS patch through the typed view
//!
//! ```rust
//! use gemspatch::{GemsPatch, RawInstrument};
//!
//! let bytes = RawInstrument::default().export_gems();
//! match GemsPatch::decode(&bytes).unwrap() {
//!     GemsPatch::Fm(fm) => assert_eq!(fm.key, 0x0F),
//!     GemsPatch::Psg { .. } => unreachable!(),
//! }
//! ```

mod binutil;
pub mod bitfield;
pub mod fm;
pub mod format;
pub mod patch;
pub mod psg;
pub mod raw;

pub use binutil::PatchError;
pub use fm::{GEMS_FM_SIZE, GemsFm, GemsFmOperator};
pub use format::{
    DMP_SIZE, DMP_V0_SIZE, EIF_SIZE, Format, GEMS_SIZE, SMPS_SIZE, TFI_SIZE, TYI_SIZE, VGI_SIZE,
    Y12_SIZE, convert, format_by_name, format_name, format_size,
};
pub use patch::GemsPatch;
pub use psg::{GEMS_PSG_SIZE, GemsPsg};
pub use raw::{RAW_SIZE, REGISTER_ORDER, RawFmOperator, RawInstrument};
