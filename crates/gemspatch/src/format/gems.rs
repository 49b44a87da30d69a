//! GEMS FM patch (39 bytes).
//!
//! The GEMS layout is register-shaped already, so conversion goes through
//! the typed [`GemsFm`] view. Bytes 0 (patch type) and 38 (reserved) have no
//! place in [`RawInstrument`]: export writes 0 to both. SSG-EG is not
//! carried.

use crate::binutil::PatchError;
use crate::fm::{GEMS_FM_SIZE, GemsFm};
use crate::raw::RawInstrument;

/// Size of a GEMS FM patch.
pub const GEMS_SIZE: usize = GEMS_FM_SIZE;

impl RawInstrument {
    /// Import a GEMS FM patch.
    pub fn import_gems(data: &[u8]) -> Result<Self, PatchError> {
        let fm = GemsFm::decode(data)?;
        Ok(RawInstrument::from(&fm))
    }

    /// Export as a GEMS FM patch.
    pub fn export_gems(&self) -> [u8; GEMS_SIZE] {
        GemsFm::from(self).encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawFmOperator;

    #[test]
    fn test_operator_order_on_disk() {
        let mut inst = RawInstrument::default();
        for (slot, op) in inst.op.iter_mut().enumerate() {
            op.reg50 = slot as u8 + 1;
        }
        let bytes = inst.export_gems();
        // AR of each 6-byte operator block, disk order
        let disk: Vec<u8> = (0..4).map(|d| bytes[5 + d * 6 + 2]).collect();
        assert_eq!(disk, vec![1, 3, 2, 4]);

        let back = RawInstrument::import_gems(&bytes).unwrap();
        assert_eq!(back.op.map(|op| op.reg50), [1, 2, 3, 4]);
    }

    #[test]
    fn test_channel_bytes() {
        let mut inst = RawInstrument {
            reg22: 0x0B,
            reg27: 0x80,
            reg_b0: 0x2D,
            reg_b4: 0x4A,
            reg28: 0x50,
            ch3_freq: [0x0A01, 0x0A02, 0x0A03, 0x0A04],
            ..Default::default()
        };
        inst.op[0] = RawFmOperator::from_registers([1, 2, 3, 4, 5, 6, 0x0F]);
        let bytes = inst.export_gems();
        assert_eq!(&bytes[..5], &[0, 0x0B, 0x80, 0x2D, 0x4A]);
        assert_eq!(&bytes[5..11], &[1, 2, 3, 4, 5, 6]);
        // OP4, OP3, OP1, OP2, high byte first
        assert_eq!(
            &bytes[29..37],
            &[0x0A, 0x04, 0x0A, 0x03, 0x0A, 0x01, 0x0A, 0x02]
        );
        assert_eq!(bytes[37], 0x05);
        assert_eq!(bytes[38], 0);

        let back = RawInstrument::import_gems(&bytes).unwrap();
        inst.op[0].reg90 = 0;
        assert_eq!(back, inst);
    }

    #[test]
    fn test_buffer_round_trip() {
        let mut bytes = [0u8; GEMS_SIZE];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(97).wrapping_add(13);
        }
        bytes[0] = 0;
        bytes[38] = 0;
        let inst = RawInstrument::import_gems(&bytes).unwrap();
        assert_eq!(inst.export_gems(), bytes);
    }

    #[test]
    fn test_short_buffer() {
        assert!(RawInstrument::import_gems(&[0u8; 38]).is_err());
    }
}
