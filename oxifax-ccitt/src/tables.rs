//! Modified Huffman run-length codes (ITU-T T.4, tables 2 and 3).
//!
//! The code lists below are the single source of truth: the decoder's
//! lookup tables are expanded from them at compile time and the encoder
//! emits straight from them, so the two cannot disagree.
//!
//! Lookup is staged to keep the tables small:
//!
//! - white runs: a 10-bit table; prefixes with seven leading zeros redirect
//!   to the shared extension table (12 bits),
//! - black runs: a 4-bit probe covering the 2..4 bit codes; the `0000` and
//!   `0001` prefixes redirect to a 13-bit table of the long black codes,
//!   which in turn redirects seven leading zeros to the shared table.
//!
//! Every stage reads its full width speculatively and rewinds the bits that
//! did not belong to the code.

use oxifax_core::bitstream::{BitCursor, BitWriter};

use crate::color::Color;

/// A Huffman code: `len` bits, right aligned in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    /// Code bits, MSB-first, right aligned.
    pub bits: u16,
    /// Code length in bits.
    pub len: u8,
}

const fn c(bits: u16, len: u8) -> Code {
    Code { bits, len }
}

/// The EOL codeword `000000000001`.
pub const EOL: Code = c(0b0000_0000_0001, 12);

/// Longest run a single makeup code can carry.
pub const MAX_MAKEUP_RUN: usize = 2560;

/// White terminating codes, indexed by run length 0..=63.
pub const WHITE_TERMINATING: [Code; 64] = [
    c(0b00110101, 8),
    c(0b000111, 6),
    c(0b0111, 4),
    c(0b1000, 4),
    c(0b1011, 4),
    c(0b1100, 4),
    c(0b1110, 4),
    c(0b1111, 4),
    c(0b10011, 5),
    c(0b10100, 5),
    c(0b00111, 5),
    c(0b01000, 5),
    c(0b001000, 6),
    c(0b000011, 6),
    c(0b110100, 6),
    c(0b110101, 6),
    c(0b101010, 6),
    c(0b101011, 6),
    c(0b0100111, 7),
    c(0b0001100, 7),
    c(0b0001000, 7),
    c(0b0010111, 7),
    c(0b0000011, 7),
    c(0b0000100, 7),
    c(0b0101000, 7),
    c(0b0101011, 7),
    c(0b0010011, 7),
    c(0b0100100, 7),
    c(0b0011000, 7),
    c(0b00000010, 8),
    c(0b00000011, 8),
    c(0b00011010, 8),
    c(0b00011011, 8),
    c(0b00010010, 8),
    c(0b00010011, 8),
    c(0b00010100, 8),
    c(0b00010101, 8),
    c(0b00010110, 8),
    c(0b00010111, 8),
    c(0b00101000, 8),
    c(0b00101001, 8),
    c(0b00101010, 8),
    c(0b00101011, 8),
    c(0b00101100, 8),
    c(0b00101101, 8),
    c(0b00000100, 8),
    c(0b00000101, 8),
    c(0b00001010, 8),
    c(0b00001011, 8),
    c(0b01010010, 8),
    c(0b01010011, 8),
    c(0b01010100, 8),
    c(0b01010101, 8),
    c(0b00100100, 8),
    c(0b00100101, 8),
    c(0b01011000, 8),
    c(0b01011001, 8),
    c(0b01011010, 8),
    c(0b01011011, 8),
    c(0b01001010, 8),
    c(0b01001011, 8),
    c(0b00110010, 8),
    c(0b00110011, 8),
    c(0b00110100, 8),
];

/// White makeup codes for 64, 128, ..., 1728.
pub const WHITE_MAKEUP: [Code; 27] = [
    c(0b11011, 5),
    c(0b10010, 5),
    c(0b010111, 6),
    c(0b0110111, 7),
    c(0b00110110, 8),
    c(0b00110111, 8),
    c(0b01100100, 8),
    c(0b01100101, 8),
    c(0b01101000, 8),
    c(0b01100111, 8),
    c(0b011001100, 9),
    c(0b011001101, 9),
    c(0b011010010, 9),
    c(0b011010011, 9),
    c(0b011010100, 9),
    c(0b011010101, 9),
    c(0b011010110, 9),
    c(0b011010111, 9),
    c(0b011011000, 9),
    c(0b011011001, 9),
    c(0b011011010, 9),
    c(0b011011011, 9),
    c(0b010011000, 9),
    c(0b010011001, 9),
    c(0b010011010, 9),
    c(0b011000, 6),
    c(0b010011011, 9),
];

/// Black terminating codes, indexed by run length 0..=63.
pub const BLACK_TERMINATING: [Code; 64] = [
    c(0b0000110111, 10),
    c(0b010, 3),
    c(0b11, 2),
    c(0b10, 2),
    c(0b011, 3),
    c(0b0011, 4),
    c(0b0010, 4),
    c(0b00011, 5),
    c(0b000101, 6),
    c(0b000100, 6),
    c(0b0000100, 7),
    c(0b0000101, 7),
    c(0b0000111, 7),
    c(0b00000100, 8),
    c(0b00000111, 8),
    c(0b000011000, 9),
    c(0b0000010111, 10),
    c(0b0000011000, 10),
    c(0b0000001000, 10),
    c(0b00001100111, 11),
    c(0b00001101000, 11),
    c(0b00001101100, 11),
    c(0b00000110111, 11),
    c(0b00000101000, 11),
    c(0b00000010111, 11),
    c(0b00000011000, 11),
    c(0b000011001010, 12),
    c(0b000011001011, 12),
    c(0b000011001100, 12),
    c(0b000011001101, 12),
    c(0b000001101000, 12),
    c(0b000001101001, 12),
    c(0b000001101010, 12),
    c(0b000001101011, 12),
    c(0b000011010010, 12),
    c(0b000011010011, 12),
    c(0b000011010100, 12),
    c(0b000011010101, 12),
    c(0b000011010110, 12),
    c(0b000011010111, 12),
    c(0b000001101100, 12),
    c(0b000001101101, 12),
    c(0b000011011010, 12),
    c(0b000011011011, 12),
    c(0b000001010100, 12),
    c(0b000001010101, 12),
    c(0b000001010110, 12),
    c(0b000001010111, 12),
    c(0b000001100100, 12),
    c(0b000001100101, 12),
    c(0b000001010010, 12),
    c(0b000001010011, 12),
    c(0b000000100100, 12),
    c(0b000000110111, 12),
    c(0b000000111000, 12),
    c(0b000000100111, 12),
    c(0b000000101000, 12),
    c(0b000001011000, 12),
    c(0b000001011001, 12),
    c(0b000000101011, 12),
    c(0b000000101100, 12),
    c(0b000001011010, 12),
    c(0b000001100110, 12),
    c(0b000001100111, 12),
];

/// Black makeup codes for 64, 128, ..., 1728.
pub const BLACK_MAKEUP: [Code; 27] = [
    c(0b0000001111, 10),
    c(0b000011001000, 12),
    c(0b000011001001, 12),
    c(0b000001011011, 12),
    c(0b000000110011, 12),
    c(0b000000110100, 12),
    c(0b000000110101, 12),
    c(0b0000001101100, 13),
    c(0b0000001101101, 13),
    c(0b0000001001010, 13),
    c(0b0000001001011, 13),
    c(0b0000001001100, 13),
    c(0b0000001001101, 13),
    c(0b0000001110010, 13),
    c(0b0000001110011, 13),
    c(0b0000001110100, 13),
    c(0b0000001110101, 13),
    c(0b0000001110110, 13),
    c(0b0000001110111, 13),
    c(0b0000001010010, 13),
    c(0b0000001010011, 13),
    c(0b0000001010100, 13),
    c(0b0000001010101, 13),
    c(0b0000001011010, 13),
    c(0b0000001011011, 13),
    c(0b0000001100100, 13),
    c(0b0000001100101, 13),
];

/// Makeup codes shared by both colors, for 1792, 1856, ..., 2560.
pub const SHARED_MAKEUP: [Code; 13] = [
    c(0b00000001000, 11),
    c(0b00000001100, 11),
    c(0b00000001101, 11),
    c(0b000000010010, 12),
    c(0b000000010011, 12),
    c(0b000000010100, 12),
    c(0b000000010101, 12),
    c(0b000000010110, 12),
    c(0b000000010111, 12),
    c(0b000000011100, 12),
    c(0b000000011101, 12),
    c(0b000000011110, 12),
    c(0b000000011111, 12),
];

/// One decoded lookup entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCode {
    /// No code matches these bits.
    Invalid,
    /// The prefix continues in the next lookup stage.
    Redirect,
    /// The EOL codeword.
    Eol,
    /// A makeup code (run >= 64); the run continues in the same color.
    Makeup {
        /// Code length.
        bits: u8,
        /// Run length carried.
        run: u16,
    },
    /// A terminating code (run < 64); the run ends.
    Terminating {
        /// Code length.
        bits: u8,
        /// Run length carried.
        run: u16,
    },
}

impl RunCode {
    /// Number of bits the code occupies (zero for `Invalid`/`Redirect`).
    pub const fn bit_length(self) -> u8 {
        match self {
            RunCode::Invalid | RunCode::Redirect => 0,
            RunCode::Eol => EOL.len,
            RunCode::Makeup { bits, .. } | RunCode::Terminating { bits, .. } => bits,
        }
    }
}

const fn fill<const N: usize>(
    mut table: [RunCode; N],
    width: u8,
    min_len: u8,
    codes: &[Code],
    first_run: u16,
    step: u16,
    terminating: bool,
) -> [RunCode; N] {
    let mut i = 0;
    while i < codes.len() {
        let code = codes[i];
        if code.len >= min_len && code.len <= width {
            let shift = width - code.len;
            let start = (code.bits as usize) << shift;
            let count = 1usize << shift;
            let run = first_run + step * i as u16;
            let entry = if terminating {
                RunCode::Terminating {
                    bits: code.len,
                    run,
                }
            } else {
                RunCode::Makeup {
                    bits: code.len,
                    run,
                }
            };
            let mut j = 0;
            while j < count {
                table[start + j] = entry;
                j += 1;
            }
        }
        i += 1;
    }
    table
}

const fn redirect_below<const N: usize>(mut table: [RunCode; N], limit: usize) -> [RunCode; N] {
    let mut i = 0;
    while i < limit {
        table[i] = RunCode::Redirect;
        i += 1;
    }
    table
}

const WHITE_BITS: u8 = 10;
const BLACK_PROBE_BITS: u8 = 4;
const BLACK_LONG_BITS: u8 = 13;
const SHARED_BITS: u8 = 12;

const fn build_white() -> [RunCode; 1 << WHITE_BITS] {
    let table = [RunCode::Invalid; 1 << WHITE_BITS];
    let table = fill(table, WHITE_BITS, 1, &WHITE_TERMINATING, 0, 1, true);
    let table = fill(table, WHITE_BITS, 1, &WHITE_MAKEUP, 64, 64, false);
    // 0000000xxx
    redirect_below(table, 1 << 3)
}

const fn build_black_probe() -> [RunCode; 1 << BLACK_PROBE_BITS] {
    let table = [RunCode::Invalid; 1 << BLACK_PROBE_BITS];
    let table = fill(table, BLACK_PROBE_BITS, 1, &BLACK_TERMINATING, 0, 1, true);
    // 0000 and 0001
    redirect_below(table, 2)
}

/// Indexed by the 13-bit peek, whose top three bits are zero here.
const fn build_black_long() -> [RunCode; 1 << 10] {
    let table = [RunCode::Invalid; 1 << 10];
    let table = fill(table, BLACK_LONG_BITS, 5, &BLACK_TERMINATING, 0, 1, true);
    let table = fill(table, BLACK_LONG_BITS, 5, &BLACK_MAKEUP, 64, 64, false);
    // 0000000xxxxxx
    redirect_below(table, 1 << 6)
}

/// Indexed by the 12-bit peek, whose top seven bits are zero here.
const fn build_shared() -> [RunCode; 1 << 5] {
    let mut table = [RunCode::Invalid; 1 << 5];
    table = fill(table, SHARED_BITS, 1, &SHARED_MAKEUP, 1792, 64, false);
    table[EOL.bits as usize] = RunCode::Eol;
    table
}

static WHITE_TABLE: [RunCode; 1 << WHITE_BITS] = build_white();
static BLACK_PROBE_TABLE: [RunCode; 1 << BLACK_PROBE_BITS] = build_black_probe();
static BLACK_LONG_TABLE: [RunCode; 1 << 10] = build_black_long();
static SHARED_TABLE: [RunCode; 1 << 5] = build_shared();

/// Read `width` bits speculatively, look them up and give back the unused bits.
#[inline]
fn lookup(cursor: &mut BitCursor<'_>, width: u8, table: &[RunCode]) -> RunCode {
    let index = cursor.read_bits(width) as usize;
    let entry = table.get(index).copied().unwrap_or(RunCode::Invalid);
    cursor.rewind(u64::from(width - entry.bit_length()));
    entry
}

/// Decode the next run-length code of `color`, consuming exactly its bits.
///
/// `Invalid` and `Redirect` never escape: an unmatched prefix comes back as
/// [`RunCode::Invalid`] with the cursor unchanged.
pub fn read_run_code(cursor: &mut BitCursor<'_>, color: Color) -> RunCode {
    let entry = match color {
        Color::White => lookup(cursor, WHITE_BITS, &WHITE_TABLE),
        Color::Black => match lookup(cursor, BLACK_PROBE_BITS, &BLACK_PROBE_TABLE) {
            RunCode::Redirect => lookup(cursor, BLACK_LONG_BITS, &BLACK_LONG_TABLE),
            entry => entry,
        },
    };
    match entry {
        RunCode::Redirect => match lookup(cursor, SHARED_BITS, &SHARED_TABLE) {
            RunCode::Redirect => RunCode::Invalid,
            entry => entry,
        },
        entry => entry,
    }
}

/// Emit the codes for one run: makeup codes as needed, then a terminating code.
pub fn write_run(writer: &mut BitWriter, color: Color, mut run: usize) {
    let top = SHARED_MAKEUP[SHARED_MAKEUP.len() - 1];
    while run >= MAX_MAKEUP_RUN {
        writer.write_bits(u32::from(top.bits), top.len);
        run -= MAX_MAKEUP_RUN;
    }

    let makeup = run / 64;
    if makeup > 0 {
        let code = match (makeup, color) {
            (1..=27, Color::White) => WHITE_MAKEUP[makeup - 1],
            (1..=27, Color::Black) => BLACK_MAKEUP[makeup - 1],
            _ => SHARED_MAKEUP[makeup - 28],
        };
        writer.write_bits(u32::from(code.bits), code.len);
    }

    let code = match color {
        Color::White => WHITE_TERMINATING[run % 64],
        Color::Black => BLACK_TERMINATING[run % 64],
    };
    writer.write_bits(u32::from(code.bits), code.len);
}

/// Emit an EOL codeword.
pub fn write_eol(writer: &mut BitWriter) {
    writer.write_bits(u32::from(EOL.bits), EOL.len);
}
