//! Two-dimensional coding mode codes (ITU-T T.4 table 4).

use oxifax_core::bitstream::{BitCursor, BitWriter};

/// A 2D coding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `0001`: advance to b2 without a color change.
    Pass,
    /// `001`: two explicit runs follow.
    Horizontal,
    /// a1 lies within three pixels of b1; the offset is `a1 - b1`.
    Vertical(i8),
    /// `0000001`: an extension code follows in the next three bits.
    Extension,
}

/// Extension code value that enters uncompressed mode.
pub const EXTENSION_UNCOMPRESSED: u8 = 0b111;

const MODE_BITS: u8 = 7;

/// `(mode, code, length)` for every mode codeword.
const MODE_CODES: [(Mode, u8, u8); 10] = [
    (Mode::Vertical(0), 0b1, 1),
    (Mode::Vertical(1), 0b011, 3),
    (Mode::Vertical(-1), 0b010, 3),
    (Mode::Horizontal, 0b001, 3),
    (Mode::Pass, 0b0001, 4),
    (Mode::Vertical(2), 0b000011, 6),
    (Mode::Vertical(-2), 0b000010, 6),
    (Mode::Vertical(3), 0b0000011, 7),
    (Mode::Vertical(-3), 0b0000010, 7),
    (Mode::Extension, 0b0000001, 7),
];

const fn build_mode_table() -> [Option<(Mode, u8)>; 1 << MODE_BITS] {
    let mut table = [None; 1 << MODE_BITS];
    let mut i = 0;
    while i < MODE_CODES.len() {
        let (mode, code, len) = MODE_CODES[i];
        let shift = MODE_BITS - len;
        let start = (code as usize) << shift;
        let mut j = 0;
        while j < 1usize << shift {
            table[start + j] = Some((mode, len));
            j += 1;
        }
        i += 1;
    }
    table
}

static MODE_TABLE: [Option<(Mode, u8)>; 1 << MODE_BITS] = build_mode_table();

impl Mode {
    /// Numeric mode identifier: pass 0, horizontal 1, V0 2, VR1 3, VL1 4,
    /// VR2 5, VL2 6, VR3 7, VL3 8, extension 11.
    pub const fn value(self) -> u8 {
        match self {
            Mode::Pass => 0,
            Mode::Horizontal => 1,
            Mode::Vertical(0) => 2,
            Mode::Vertical(d) if d > 0 => 1 + 2 * d as u8,
            Mode::Vertical(d) => 2 + 2 * (-d) as u8,
            Mode::Extension => 11,
        }
    }

    /// Codeword and bit length of this mode, or `None` for an offset beyond ±3.
    pub fn code(self) -> Option<(u8, u8)> {
        MODE_CODES
            .iter()
            .find(|&&(mode, _, _)| mode == self)
            .map(|&(_, code, len)| (code, len))
    }

    /// Read the next mode codeword.
    ///
    /// Returns `None` without consuming anything when the next seven bits
    /// are all zero, which is either an EOL or garbage.
    pub fn read(cursor: &mut BitCursor<'_>) -> Option<Mode> {
        let index = cursor.read_bits(MODE_BITS) as usize;
        match MODE_TABLE[index] {
            Some((mode, len)) => {
                cursor.rewind(u64::from(MODE_BITS - len));
                Some(mode)
            }
            None => {
                cursor.rewind(u64::from(MODE_BITS));
                None
            }
        }
    }

    /// Emit this mode's codeword.
    ///
    /// Vertical offsets beyond ±3 have no codeword; the encoder never
    /// produces them.
    pub fn write(self, writer: &mut BitWriter) {
        let code = self.code();
        debug_assert!(code.is_some(), "{self:?} has no codeword");
        if let Some((code, len)) = code {
            writer.write_bits(u32::from(code), len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxifax_core::bitstream::FillOrder;

    #[test]
    fn test_every_mode_reads_back() {
        for &(mode, _, len) in &MODE_CODES {
            let mut writer = BitWriter::new();
            mode.write(&mut writer);
            writer.write_bits(0b1, 1);
            let data = writer.finish(FillOrder::MsbToLsb);
            let mut cursor = BitCursor::new(&data);
            assert_eq!(Mode::read(&mut cursor), Some(mode));
            assert_eq!(cursor.position(), u64::from(len));
        }
    }

    #[test]
    fn test_zero_prefix_is_not_a_mode() {
        let data = [0x00, 0x10];
        let mut cursor = BitCursor::new(&data);
        assert_eq!(Mode::read(&mut cursor), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_mode_values() {
        let values: Vec<u8> = MODE_CODES.iter().map(|&(m, _, _)| m.value()).collect();
        assert_eq!(values, vec![2, 3, 4, 1, 0, 5, 6, 7, 8, 11]);
    }

    #[test]
    fn test_out_of_range_offset_has_no_code() {
        assert_eq!(Mode::Vertical(4).code(), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "has no codeword")]
    fn test_writing_out_of_range_offset_panics() {
        let mut writer = BitWriter::new();
        Mode::Vertical(-4).write(&mut writer);
    }
}
