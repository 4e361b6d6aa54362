//! Single-scanline decoders.
//!
//! These know nothing about EOLs between lines, strips or error policy;
//! they decode one line's codes into a [`CodingLine`] and its packed row,
//! reporting faults without a row number for the caller to attach.

use oxifax_core::bitstream::BitCursor;

use crate::color::Color;
use crate::error::FaxError;
use crate::line::CodingLine;
use crate::mode::{EXTENSION_UNCOMPRESSED, Mode};
use crate::tables::{self, RunCode};

/// Why a scanline could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineFault {
    Malformed { bit_position: u64 },
    PrematureEol { bit_position: u64 },
    Overrun { position: usize },
    Backwards { position: isize, a0: usize },
    UnsupportedExtension { code: u8 },
    /// An EOL where the line's first code was expected. For Group 4 this
    /// is the end-of-facsimile-block.
    EolAtStart { bit_position: u64 },
}

impl LineFault {
    pub(crate) fn into_error(self, row: usize, width: usize) -> FaxError {
        match self {
            LineFault::Malformed { bit_position } => FaxError::MalformedCode { row, bit_position },
            LineFault::PrematureEol { bit_position } | LineFault::EolAtStart { bit_position } => {
                FaxError::PrematureEol { row, bit_position }
            }
            LineFault::Overrun { position } => FaxError::Overrun {
                row,
                position,
                width,
            },
            LineFault::Backwards { position, a0 } => FaxError::Backwards { row, position, a0 },
            LineFault::UnsupportedExtension { code } => FaxError::UnsupportedExtension { row, code },
        }
    }
}

type LineResult<T> = std::result::Result<T, LineFault>;

/// Read one complete run (makeup codes plus a terminating code).
fn read_run(cursor: &mut BitCursor<'_>, color: Color, limit: usize) -> LineResult<usize> {
    let mut total = 0usize;
    loop {
        let bit_position = cursor.position();
        match tables::read_run_code(cursor, color) {
            RunCode::Terminating { run, .. } => return Ok(total + usize::from(run)),
            RunCode::Makeup { run, .. } => {
                total += usize::from(run);
                if total > limit {
                    return Err(LineFault::Overrun { position: total });
                }
            }
            RunCode::Eol => {
                // Leave the EOL for the caller's resync.
                cursor.rewind(cursor.position() - bit_position);
                return Err(LineFault::PrematureEol { bit_position });
            }
            RunCode::Invalid | RunCode::Redirect => return Err(LineFault::Malformed { bit_position }),
        }
    }
}

/// Decode a Modified Huffman line: alternating runs, white first, until
/// the runs add up to the width.
pub(crate) fn decode_1d(
    cursor: &mut BitCursor<'_>,
    line: &mut CodingLine,
    row: &mut [u8],
) -> LineResult<()> {
    let width = line.width();
    line.clear();
    let mut position = 0;
    let mut color = Color::White;
    loop {
        let run = read_run(cursor, color, width)?;
        position += run;
        if position > width {
            return Err(LineFault::Overrun { position });
        }
        line.add_run(row, position, color);
        if position == width {
            break;
        }
        color = !color;
    }
    line.finish();
    Ok(())
}

/// Decode a 2D-coded line against `reference`.
pub(crate) fn decode_2d(
    cursor: &mut BitCursor<'_>,
    reference: &CodingLine,
    line: &mut CodingLine,
    row: &mut [u8],
    allow_uncompressed: bool,
) -> LineResult<()> {
    let width = line.width();
    line.clear();
    let mut a0: Option<usize> = None;
    let mut color = Color::White;
    let mut hint = 0;

    loop {
        let start = a0.unwrap_or(0);
        if a0.is_some() && start >= width {
            break;
        }
        let (b1, b2) = reference.changes_after(a0, color, &mut hint);
        let bit_position = cursor.position();

        match Mode::read(cursor) {
            Some(Mode::Pass) => {
                line.add_run(row, b2, color);
                a0 = Some(b2);
            }
            Some(Mode::Horizontal) => {
                let first = read_run(cursor, color, width)?;
                let second = read_run(cursor, !color, width)?;
                let a1 = start + first;
                let a2 = a1 + second;
                if a2 > width {
                    return Err(LineFault::Overrun { position: a2 });
                }
                line.add_run(row, a1, color);
                line.add_run(row, a2, !color);
                a0 = Some(a2);
            }
            Some(Mode::Vertical(offset)) => {
                let a1 = b1 as isize + isize::from(offset);
                if a1 < start as isize {
                    return Err(LineFault::Backwards { position: a1, a0: start });
                }
                let a1 = a1 as usize;
                if a1 > width {
                    return Err(LineFault::Overrun { position: a1 });
                }
                line.add_run(row, a1, color);
                color = !color;
                a0 = Some(a1);
            }
            Some(Mode::Extension) => {
                let code = cursor.read_bits(3) as u8;
                if code != EXTENSION_UNCOMPRESSED || !allow_uncompressed {
                    return Err(LineFault::UnsupportedExtension { code });
                }
                let (end, next) = decode_uncompressed(cursor, line, row, start)?;
                color = next;
                a0 = Some(end);
            }
            None => {
                if cursor.peek_bits(tables::EOL.len) == u32::from(tables::EOL.bits) {
                    if a0.is_none() {
                        return Err(LineFault::EolAtStart { bit_position });
                    }
                    return Err(LineFault::PrematureEol { bit_position });
                }
                return Err(LineFault::Malformed { bit_position });
            }
        }
    }

    line.finish();
    Ok(())
}

/// Decode uncompressed-mode codes starting at `position` (T.4 table 5).
///
/// Returns the position reached and the color of the run that follows the
/// exit code.
fn decode_uncompressed(
    cursor: &mut BitCursor<'_>,
    line: &mut CodingLine,
    row: &mut [u8],
    mut position: usize,
) -> LineResult<(usize, Color)> {
    let width = line.width();
    loop {
        let bit_position = cursor.position();
        let mut zeros = 0usize;
        while !cursor.read_bit() {
            zeros += 1;
            if zeros > 10 {
                return Err(LineFault::Malformed { bit_position });
            }
        }

        let (whites, black) = match zeros {
            0..=4 => (zeros, true),
            5 => (5, false),
            _ => (zeros - 6, false),
        };
        let end = position + whites + usize::from(black);
        if end > width {
            return Err(LineFault::Overrun { position: end });
        }
        line.add_run(row, position + whites, Color::White);
        if black {
            line.add_run(row, end, Color::Black);
        }
        position = end;

        if zeros >= 6 {
            // Exit code; the tag bit gives the color of the next run.
            let next = Color::from(cursor.read_bit());
            return Ok((position, next));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxifax_core::bitstream::{BitWriter, FillOrder};

    fn bits(pattern: &str) -> Vec<u8> {
        let mut writer = BitWriter::new();
        for c in pattern.chars().filter(|c| !c.is_whitespace()) {
            writer.write_bit(c == '1');
        }
        writer.finish(FillOrder::MsbToLsb)
    }

    fn decode_line_1d(data: &[u8], width: usize) -> LineResult<(Vec<usize>, Vec<u8>, u64)> {
        let mut cursor = BitCursor::new(data);
        let mut line = CodingLine::white(width);
        let mut row = vec![0u8; width.div_ceil(8)];
        decode_1d(&mut cursor, &mut line, &mut row)?;
        Ok((line.ends().to_vec(), row, cursor.position()))
    }

    fn decode_line_2d(
        data: &[u8],
        reference: &CodingLine,
        uncompressed: bool,
    ) -> LineResult<(Vec<usize>, Vec<u8>, u64)> {
        let width = reference.width();
        let mut cursor = BitCursor::new(data);
        let mut line = CodingLine::white(width);
        let mut row = vec![0u8; width.div_ceil(8)];
        decode_2d(&mut cursor, reference, &mut line, &mut row, uncompressed)?;
        Ok((line.ends().to_vec(), row, cursor.position()))
    }

    #[test]
    fn test_1d_all_white_1728() {
        // Makeup 1728 then terminating white 0.
        let data = bits("010011011 00110101");
        let (ends, row, consumed) = decode_line_1d(&data, 1728).unwrap();
        assert_eq!(ends, vec![1728]);
        assert!(row.iter().all(|&b| b == 0));
        assert_eq!(consumed, 17);
    }

    #[test]
    fn test_1d_mixed_runs() {
        // White 2, black 3, white 3.
        let data = bits("0111 10 1000");
        let (ends, row, _) = decode_line_1d(&data, 8).unwrap();
        assert_eq!(ends, vec![2, 5, 8]);
        assert_eq!(row, vec![0b0011_1000]);
    }

    #[test]
    fn test_1d_black_run_ends_line() {
        // White 0, black 8: the line ends without a trailing white code.
        let data = bits("00110101 000101");
        let (ends, row, consumed) = decode_line_1d(&data, 8).unwrap();
        assert_eq!(ends, vec![0, 8]);
        assert_eq!(row, vec![0xFF]);
        assert_eq!(consumed, 14);
    }

    #[test]
    fn test_1d_overrun() {
        // White 7 on a 4 pixel line.
        let data = bits("1111");
        assert_eq!(decode_line_1d(&data, 4), Err(LineFault::Overrun { position: 7 }));
    }

    #[test]
    fn test_1d_premature_eol() {
        let data = bits("0111 000000000001");
        assert_eq!(
            decode_line_1d(&data, 8),
            Err(LineFault::PrematureEol { bit_position: 4 })
        );
    }

    #[test]
    fn test_premature_eol_is_left_unread() {
        // White 2, then an EOL where the black run should be.
        let data = bits("0111 000000000001 1");
        let mut cursor = BitCursor::new(&data);
        let mut line = CodingLine::white(8);
        let mut row = [0u8];
        assert!(decode_1d(&mut cursor, &mut line, &mut row).is_err());
        assert_eq!(cursor.position(), 4);

        // Same inside a horizontal-mode pair.
        let data = bits("001 0111 000000000001 1");
        let mut cursor = BitCursor::new(&data);
        let reference = CodingLine::white(8);
        assert_eq!(
            decode_2d(&mut cursor, &reference, &mut line, &mut row, false),
            Err(LineFault::PrematureEol { bit_position: 7 })
        );
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn test_1d_invalid_code() {
        let data = bits("000000000100");
        assert_eq!(
            decode_line_1d(&data, 8),
            Err(LineFault::Malformed { bit_position: 0 })
        );
    }

    #[test]
    fn test_2d_all_v0_copies_reference() {
        let reference = CodingLine::from_row(&[0b0011_1100, 0x0F], 16);
        // One V0 per changing element.
        let data = bits("1 1 1 1");
        let (ends, row, consumed) = decode_line_2d(&data, &reference, false).unwrap();
        assert_eq!(ends, reference.ends());
        assert_eq!(row, vec![0b0011_1100, 0x0F]);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_2d_pass_then_vertical() {
        let mut reference = CodingLine::white(16);
        let mut scratch = vec![0u8; 2];
        reference.clear();
        reference.add_run(&mut scratch, 10, Color::White);
        reference.add_run(&mut scratch, 12, Color::Black);
        reference.finish();
        assert_eq!(reference.ends(), &[10, 12, 16]);

        // Pass to b2 = 12, then V0 onto b1 = width.
        let data = bits("0001 1");
        let (ends, row, consumed) = decode_line_2d(&data, &reference, false).unwrap();
        assert_eq!(ends, vec![16]);
        assert_eq!(row, vec![0, 0]);
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_2d_horizontal() {
        let reference = CodingLine::white(8);
        // H, white 2, black 3, then V0 to the width.
        let data = bits("001 0111 10 1");
        let (ends, row, _) = decode_line_2d(&data, &reference, false).unwrap();
        assert_eq!(ends, vec![2, 5, 8]);
        assert_eq!(row, vec![0b0011_1000]);
    }

    #[test]
    fn test_2d_vertical_left_of_a0() {
        let reference = CodingLine::from_row(&[0b0000_0011], 8);
        // V0 to 6, then VL3 from b1 = 8 gives 5 < a0 = 6.
        let data = bits("1 0000010");
        assert_eq!(
            decode_line_2d(&data, &reference, false),
            Err(LineFault::Backwards { position: 5, a0: 6 })
        );
    }

    #[test]
    fn test_2d_eol_at_start() {
        let reference = CodingLine::white(8);
        let data = bits("000000000001 000000000001");
        assert_eq!(
            decode_line_2d(&data, &reference, false),
            Err(LineFault::EolAtStart { bit_position: 0 })
        );
    }

    #[test]
    fn test_2d_extension_needs_uncompressed() {
        let reference = CodingLine::white(8);
        let data = bits("0000001 111 1");
        assert_eq!(
            decode_line_2d(&data, &reference, false),
            Err(LineFault::UnsupportedExtension { code: 0b111 })
        );
        let data = bits("0000001 010");
        assert_eq!(
            decode_line_2d(&data, &reference, true),
            Err(LineFault::UnsupportedExtension { code: 0b010 })
        );
    }

    #[test]
    fn test_2d_uncompressed_mode() {
        let reference = CodingLine::white(12);
        // Enter, "01" (white, black), "000001" (five white),
        // exit "00000001" (one white) with tag 1 (next run black),
        // then V0 with b1 at the width ends the line black.
        let data = bits("0000001 111 01 000001 00000001 1 1");
        let (ends, row, _) = decode_line_2d(&data, &reference, true).unwrap();
        assert_eq!(ends, vec![1, 2, 8, 12]);
        assert_eq!(row, vec![0b0100_0000, 0b1111_0000]);
    }
}
