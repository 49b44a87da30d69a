//! Utilities used by the converters: the error type and bounds-checked
//! byte readers/writers.
use std::fmt;

/// Error type returned by patch decoding and the format registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// The input buffer is shorter than the layout requires.
    ///
    /// - `format` names the layout being read (for example `"TFI"`).
    /// - `needed` is the number of bytes the layout occupies.
    /// - `available` is the length of the supplied buffer.
    BufferTooShort {
        format: &'static str,
        needed: usize,
        available: usize,
    },

    /// A DMP buffer carries a version marker this crate does not support.
    ///
    /// The contained `u8` is the raw version byte.
    UnsupportedVersion(u8),

    /// A numeric format id outside the registry.
    UnknownFormatId(u8),

    /// A format name that matches none of the registered formats.
    UnknownFormatName(String),

    /// A GEMS patch whose type byte is not FM, PSG tone or PSG noise.
    UnsupportedPatchType(u8),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::BufferTooShort {
                format,
                needed,
                available,
            } => write!(
                f,
                "{} buffer too short: needed {} bytes, available {}",
                format, needed, available
            ),
            PatchError::UnsupportedVersion(v) => {
                write!(f, "unsupported DMP version: 0x{:02X}", v)
            }
            PatchError::UnknownFormatId(id) => write!(f, "unknown format id: {}", id),
            PatchError::UnknownFormatName(name) => write!(f, "unknown format name: {:?}", name),
            PatchError::UnsupportedPatchType(t) => {
                write!(f, "unsupported GEMS patch type: {}", t)
            }
        }
    }
}

impl std::error::Error for PatchError {}

/// Check that `bytes` holds at least `needed` bytes for `format`.
///
/// Every importer calls this once up front; after it succeeds the importer
/// indexes the buffer directly.
pub fn ensure_len(bytes: &[u8], needed: usize, format: &'static str) -> Result<(), PatchError> {
    if bytes.len() < needed {
        return Err(PatchError::BufferTooShort {
            format,
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

/// Read a single byte from `bytes` at `off`.
///
/// Returns `Err(PatchError::BufferTooShort)` when `off` is out of bounds.
pub fn read_u8_at(bytes: &[u8], off: usize, format: &'static str) -> Result<u8, PatchError> {
    ensure_len(bytes, off + 1, format)?;
    Ok(bytes[off])
}

/// Read a 16-bit big-endian unsigned integer from `bytes` at `off`.
///
/// GEMS stores channel-3 frequencies high byte first (A6 before A2).
pub fn read_u16_be_at(bytes: &[u8], off: usize) -> u16 {
    u16::from_be_bytes([bytes[off], bytes[off + 1]])
}

/// Read a 16-bit little-endian unsigned integer from `bytes` at `off`.
pub fn read_u16_le_at(bytes: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([bytes[off], bytes[off + 1]])
}

/// Write a 16-bit big-endian unsigned integer `v` into `buf` at `off`.
///
/// This function does not perform bounds checking; callers must ensure the
/// destination range is valid.
pub fn write_u16_be(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_be_bytes());
}

/// Write a 16-bit little-endian unsigned integer `v` into `buf` at `off`.
///
/// This function does not perform bounds checking; callers must ensure the
/// destination range is valid.
pub fn write_u16_le(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}
