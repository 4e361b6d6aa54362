//! Group 3 / Group 4 encoder.

use log::debug;
use oxifax_core::bitstream::BitWriter;

use crate::color::Color;
use crate::error::{FaxError, Result};
use crate::line::CodingLine;
use crate::mode::Mode;
use crate::options::{Coding, EncodeOptions, G3Options};
use crate::tables::{self, write_eol, write_run};

/// Number of EOLs in a Group 3 return-to-control sequence.
const RTC_EOLS: usize = 6;

/// Row-at-a-time CCITT encoder.
#[derive(Debug)]
pub struct FaxEncoder {
    options: EncodeOptions,
    reference: CodingLine,
    writer: BitWriter,
    rows: usize,
    strip_rows: usize,
}

impl FaxEncoder {
    /// Create an encoder.
    pub fn new(options: EncodeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            reference: CodingLine::white(options.width),
            writer: BitWriter::with_capacity(options.stride() * 8),
            rows: 0,
            strip_rows: 0,
        })
    }

    /// Rows encoded so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Encode one packed row of exactly `ceil(width / 8)` bytes.
    pub fn encode_row(&mut self, row: &[u8]) -> Result<()> {
        let stride = self.options.stride();
        if row.len() != stride {
            return Err(FaxError::invalid_input(format!(
                "row has {} bytes, expected {}",
                row.len(),
                stride
            )));
        }

        let current = CodingLine::from_row(row, self.options.width);
        if self.options.byte_aligned {
            self.writer.align_to_byte();
        }

        match self.options.coding {
            Coding::Group4 => encode_2d(&mut self.writer, &self.reference, &current),
            Coding::Group3OneD => {
                self.begin_g3_line();
                encode_1d(&mut self.writer, &current);
            }
            Coding::Group3TwoD => {
                self.begin_g3_line();
                let one_d = self.strip_rows % self.options.k as usize == 0;
                self.writer.write_bit(one_d);
                if one_d {
                    encode_1d(&mut self.writer, &current);
                } else {
                    encode_2d(&mut self.writer, &self.reference, &current);
                }
            }
        }

        self.reference = current;
        self.rows += 1;
        self.strip_rows += 1;
        Ok(())
    }

    /// Return the bytes coded so far as one strip and start a new one.
    ///
    /// Group 4 keeps the reference line, so the next strip continues the
    /// same stream. Group 3 strips restart with a 1D line.
    pub fn take_strip(&mut self) -> Vec<u8> {
        self.strip_rows = 0;
        std::mem::take(&mut self.writer).finish(self.options.fill_order)
    }

    /// Encode every row of a packed image.
    pub fn encode_rows(&mut self, data: &[u8]) -> Result<()> {
        let stride = self.options.stride();
        if data.len() % stride != 0 {
            return Err(FaxError::invalid_input(format!(
                "image data of {} bytes is not a whole number of {}-byte rows",
                data.len(),
                stride
            )));
        }
        for row in data.chunks_exact(stride) {
            self.encode_row(row)?;
        }
        Ok(())
    }

    /// Write the end marker (if enabled) and return the coded bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.options.end_marker && (self.options.eol || self.options.coding != Coding::Group3OneD) {
            match self.options.coding {
                Coding::Group4 => {
                    write_eol(&mut self.writer);
                    write_eol(&mut self.writer);
                }
                Coding::Group3OneD => {
                    for _ in 0..RTC_EOLS {
                        write_eol(&mut self.writer);
                    }
                }
                Coding::Group3TwoD => {
                    for _ in 0..RTC_EOLS {
                        write_eol(&mut self.writer);
                        self.writer.write_bit(true);
                    }
                }
            }
        }
        debug!(
            "Encoded {} rows into {} bits",
            self.rows,
            self.writer.bit_len()
        );
        self.writer.finish(self.options.fill_order)
    }

    fn begin_g3_line(&mut self) {
        if self.options.g3.contains(G3Options::FILL_BITS) && self.options.eol {
            // Pad so that the EOL ends on a byte boundary.
            let used = (self.writer.bit_len() % 8) as usize;
            let pad = (8 + 8 - (used + tables::EOL.len as usize) % 8) % 8;
            self.writer.write_zeros(pad);
        }
        if self.options.eol || self.options.coding == Coding::Group3TwoD {
            write_eol(&mut self.writer);
        }
    }
}

/// Emit a line as alternating runs, white first.
fn encode_1d(writer: &mut BitWriter, line: &CodingLine) {
    let mut color = Color::White;
    for run in line.runs() {
        write_run(writer, color, run);
        color = !color;
    }
}

/// Emit a line relative to `reference` using pass, vertical and horizontal
/// modes.
fn encode_2d(writer: &mut BitWriter, reference: &CodingLine, current: &CodingLine) {
    let width = current.width();
    let mut a0: Option<usize> = None;
    let mut color = Color::White;
    let mut ref_hint = 0;
    let mut cur_index = 0;

    loop {
        let start = a0.unwrap_or(0);
        if a0.is_some() && start >= width {
            break;
        }
        let (a1, a2) = current.next_changes(a0, &mut cur_index);
        let (b1, b2) = reference.changes_after(a0, color, &mut ref_hint);

        if b2 < a1 {
            Mode::Pass.write(writer);
            a0 = Some(b2);
            continue;
        }

        let offset = a1 as isize - b1 as isize;
        if offset.abs() <= 3 {
            Mode::Vertical(offset as i8).write(writer);
            color = !color;
            a0 = Some(a1);
        } else {
            Mode::Horizontal.write(writer);
            write_run(writer, color, a1 - start);
            write_run(writer, !color, a2 - a1);
            a0 = Some(a2);
        }
    }
}

/// Encode a whole packed image in one call.
pub fn encode(data: &[u8], options: EncodeOptions) -> Result<Vec<u8>> {
    let mut encoder = FaxEncoder::new(options)?;
    encoder.encode_rows(data)?;
    Ok(encoder.finish())
}
