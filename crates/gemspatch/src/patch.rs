//! GEMS patch sum type: FM or PSG, discriminated by the type byte.

use crate::binutil::{PatchError, read_u8_at};
use crate::fm::{GEMSI_DAC, GEMSI_FM, GEMSI_NOISE, GEMSI_PSG, GemsFm};
use crate::psg::GemsPsg;

/// A decoded GEMS patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemsPatch {
    /// FM patch (type 0).
    Fm(GemsFm),
    /// PSG patch: tone (type 2) or noise (type 3).
    Psg { noise: bool, psg: GemsPsg },
}

impl GemsPatch {
    /// Decode a patch, dispatching on the type byte at offset 0.
    ///
    /// DAC patches (type 1) carry sample references rather than an
    /// envelope and are rejected along with unknown types.
    pub fn decode(bytes: &[u8]) -> Result<Self, PatchError> {
        match read_u8_at(bytes, 0, "GEMS")? {
            GEMSI_FM => Ok(GemsPatch::Fm(GemsFm::decode(bytes)?)),
            GEMSI_PSG => Ok(GemsPatch::Psg {
                noise: false,
                psg: GemsPsg::decode(bytes)?,
            }),
            GEMSI_NOISE => Ok(GemsPatch::Psg {
                noise: true,
                psg: GemsPsg::decode(bytes)?,
            }),
            other => {
                if other == GEMSI_DAC {
                    log::debug!("GEMS DAC patch has no envelope to decode");
                }
                Err(PatchError::UnsupportedPatchType(other))
            }
        }
    }

    /// The GEMS type byte for this patch.
    pub fn patch_type(&self) -> u8 {
        match self {
            GemsPatch::Fm(_) => GEMSI_FM,
            GemsPatch::Psg { noise: false, .. } => GEMSI_PSG,
            GemsPatch::Psg { noise: true, .. } => GEMSI_NOISE,
        }
    }

    /// Encode the patch, type byte included.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            GemsPatch::Fm(fm) => fm.encode().to_vec(),
            GemsPatch::Psg { psg, .. } => psg.encode(self.patch_type()).to_vec(),
        }
    }
}

impl From<GemsFm> for GemsPatch {
    fn from(fm: GemsFm) -> Self {
        GemsPatch::Fm(fm)
    }
}
