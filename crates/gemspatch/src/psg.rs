//! Typed view of a GEMS PSG patch.
//!
//! PSG envelopes are plain bytes: unlike FM operators there is no sub-byte
//! packing, so every field round-trips trivially.

use crate::binutil::{PatchError, ensure_len};

/// Size of a GEMS PSG patch in bytes, including the type byte.
pub const GEMS_PSG_SIZE: usize = 7;

/// A GEMS PSG (tone or noise) envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GemsPsg {
    /// Noise data: `?????xxx`, feedback type and shift rate for noise patches.
    pub nd: u8,
    /// Attack rate.
    pub ar: u8,
    /// Sustain level (`0000xxxx`).
    pub sl: u8,
    /// Attack level (`0000xxxx`).
    pub al: u8,
    /// Decay rate.
    pub dr: u8,
    /// Release rate.
    pub rr: u8,
}

impl GemsPsg {
    /// Decode a PSG patch. The type byte at offset 0 is skipped.
    pub fn decode(bytes: &[u8]) -> Result<Self, PatchError> {
        ensure_len(bytes, GEMS_PSG_SIZE, "GEMS PSG")?;
        Ok(Self {
            nd: bytes[1],
            ar: bytes[2],
            sl: bytes[3],
            al: bytes[4],
            dr: bytes[5],
            rr: bytes[6],
        })
    }

    /// Encode the envelope with the given patch type byte.
    pub fn encode(&self, patch_type: u8) -> [u8; GEMS_PSG_SIZE] {
        [
            patch_type, self.nd, self.ar, self.sl, self.al, self.dr, self.rr,
        ]
    }
}
