//! Group 3 / Group 4 image decoder.
//!
//! One decoder handles every [`Coding`]; the error policy decides whether
//! a malformed line aborts the image or is blanked and skipped.
//!
//! A decoder instance keeps its reference line between [`FaxDecoder::decode_into`]
//! calls, so Group 4 strips can be fed one after another as if they were one
//! stream. Group 3 strips start afresh because each begins with a 1D line.

use log::{debug, trace, warn};
use oxifax_core::bitstream::BitCursor;
use oxifax_core::error::CoreError;
use oxifax_core::policy::{DecodeReport, StopReason};

use crate::error::{FaxError, Result};
use crate::line::CodingLine;
use crate::options::{Coding, FaxOptions, G3Options};
use crate::scanline::{self, LineFault};

/// Minimum number of zero bits in front of the `1` that ends an EOL.
const EOL_ZEROS: u32 = 11;

/// How the next row is coded.
enum RowStart {
    OneD,
    TwoD,
    Stop(StopReason),
}

/// Streaming CCITT decoder.
#[derive(Debug, Clone)]
pub struct FaxDecoder {
    options: FaxOptions,
    reference: CodingLine,
    current: CodingLine,
    /// Whether `reference` holds a successfully decoded line.
    reference_valid: bool,
}

impl FaxDecoder {
    /// Create a decoder.
    pub fn new(options: FaxOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            reference: CodingLine::white(options.width),
            current: CodingLine::white(options.width),
            reference_valid: true,
        })
    }

    /// The decoder's options.
    pub fn options(&self) -> &FaxOptions {
        &self.options
    }

    /// Forget the reference line, as at the top of a new image.
    pub fn reset(&mut self) {
        self.reference.reset();
        self.reference_valid = true;
    }

    /// Decode up to `rows` rows into a new buffer.
    pub fn decode(&mut self, data: &[u8], rows: usize) -> Result<(Vec<u8>, DecodeReport)> {
        let mut out = vec![0u8; rows * self.options.stride()];
        let report = self.decode_into(data, &mut out, rows)?;
        Ok((out, report))
    }

    /// Decode up to `rows` rows of one strip into `out`.
    ///
    /// Rows that are never reached (end of data, RTC, EOFB) are left white
    /// and reported through [`DecodeReport::stopped`].
    pub fn decode_into(&mut self, data: &[u8], out: &mut [u8], rows: usize) -> Result<DecodeReport> {
        let stride = self.options.stride();
        let needed = rows * stride;
        if out.len() < needed {
            return Err(CoreError::buffer_too_small(needed, out.len()).into());
        }
        out[..needed].fill(0);

        if self.options.coding.is_group3() {
            self.reset();
            // The first line of a Group 3 strip must not be 2D-coded.
            self.reference_valid = false;
        }

        let mut cursor = BitCursor::with_fill_order(data, self.options.fill_order);
        let mut report = DecodeReport::default();
        let mut eol_consumed = false;

        for (index, row) in out[..needed].chunks_exact_mut(stride).enumerate() {
            let outcome = self.decode_row(&mut cursor, row, index, &mut eol_consumed);
            match outcome {
                Ok(None) => {
                    report.rows_decoded += 1;
                    std::mem::swap(&mut self.reference, &mut self.current);
                    self.reference_valid = true;
                }
                Ok(Some(reason)) => {
                    debug!("Decoding stopped before row {}: {:?}", index, reason);
                    report.stopped = Some(reason);
                    break;
                }
                Err(err) if ran_out_of_data(&cursor, &err) => {
                    debug!("Data ends inside row {}: {}", index, err);
                    report.stopped = Some(StopReason::Exhausted);
                    break;
                }
                Err(err) => {
                    let fatal_missing_eol =
                        index == 0 && matches!(err, FaxError::MissingEol { .. });
                    if !self.options.policy.is_tolerant() || !err.is_data_error() || fatal_missing_eol {
                        return Err(err);
                    }

                    warn!("Skipping row {}: {}", index, err);
                    row.fill(0);
                    report.failed_rows.push(index);
                    self.reference.reset();
                    self.reference_valid = false;

                    if !self.options.coding.is_group3() || !resync(&mut cursor) {
                        report.stopped = Some(StopReason::Unrecoverable);
                        break;
                    }
                    eol_consumed = true;
                }
            }
        }

        Ok(report)
    }

    /// Decode one row. `Ok(Some(_))` means the data ended before this row.
    fn decode_row(
        &mut self,
        cursor: &mut BitCursor<'_>,
        row: &mut [u8],
        index: usize,
        eol_consumed: &mut bool,
    ) -> Result<Option<StopReason>> {
        let width = self.options.width;
        let start = match self.begin_row(cursor, index, eol_consumed)? {
            RowStart::Stop(reason) => return Ok(Some(reason)),
            start => start,
        };

        let uncompressed = self.options.g3.contains(G3Options::UNCOMPRESSED);
        let result = match start {
            RowStart::OneD => scanline::decode_1d(cursor, &mut self.current, row),
            _ => {
                if !self.reference_valid {
                    return Err(FaxError::MissingReferenceLine { row: index });
                }
                scanline::decode_2d(cursor, &self.reference, &mut self.current, row, uncompressed)
            }
        };

        match result {
            Ok(()) => {
                trace!("Row {} ends at bit {}", index, cursor.position());
                Ok(None)
            }
            Err(LineFault::EolAtStart { .. }) if self.options.coding == Coding::Group4 => {
                Ok(Some(StopReason::EndOfBlock))
            }
            Err(fault) => Err(fault.into_error(index, width)),
        }
    }

    /// Consume whatever precedes the row's codes and classify the row.
    fn begin_row(
        &self,
        cursor: &mut BitCursor<'_>,
        index: usize,
        eol_consumed: &mut bool,
    ) -> Result<RowStart> {
        if self.options.byte_aligned {
            cursor.align_to_byte();
        }

        if self.options.coding == Coding::Group4 {
            if only_padding_left(cursor) {
                return Ok(RowStart::Stop(StopReason::Exhausted));
            }
            return Ok(RowStart::TwoD);
        }

        let bit_position = cursor.position();
        let had_eol = std::mem::take(eol_consumed) || skip_eol(cursor);
        let two_dimensional = self.options.coding == Coding::Group3TwoD;

        if !had_eol {
            if only_padding_left(cursor) {
                return Ok(RowStart::Stop(StopReason::Exhausted));
            }
            if two_dimensional {
                return Err(FaxError::MissingEol {
                    row: index,
                    bit_position,
                });
            }
            return Ok(RowStart::OneD);
        }

        let one_d = !two_dimensional || cursor.read_bit();
        if peek_eol(cursor) {
            return Ok(RowStart::Stop(StopReason::ReturnToControl));
        }
        if only_padding_left(cursor) {
            return Ok(RowStart::Stop(StopReason::Exhausted));
        }
        Ok(if one_d { RowStart::OneD } else { RowStart::TwoD })
    }
}

/// Whether nothing but zero fill remains in the data.
fn only_padding_left(cursor: &BitCursor<'_>) -> bool {
    let remaining = cursor.remaining_bits();
    remaining < 8 && cursor.peek_bits(remaining as u8) == 0
}

/// Whether `err` comes from the data being cut short rather than corrupted.
///
/// Either a code was completed with bits from past the end, or a code was
/// due where nothing but zero padding remains.
fn ran_out_of_data(cursor: &BitCursor<'_>, err: &FaxError) -> bool {
    if !err.is_data_error() {
        return false;
    }
    if cursor.position() > cursor.len_bits() {
        return true;
    }
    matches!(err, FaxError::MalformedCode { .. } | FaxError::MissingEol { .. })
        && only_zeros_left(cursor)
}

/// Whether every real bit from the cursor onward is zero.
fn only_zeros_left(cursor: &BitCursor<'_>) -> bool {
    let mut probe = cursor.clone();
    while !probe.is_exhausted() {
        let count = probe.remaining_bits().min(24) as u8;
        if probe.read_bits(count) != 0 {
            return false;
        }
    }
    true
}

/// Consume an EOL (with any leading fill zeros) if one comes next.
fn skip_eol(cursor: &mut BitCursor<'_>) -> bool {
    let start = cursor.position();
    let mut zeros = 0u32;
    while !cursor.is_exhausted() {
        if cursor.read_bit() {
            if zeros >= EOL_ZEROS {
                return true;
            }
            break;
        }
        zeros += 1;
    }
    cursor.rewind(cursor.position() - start);
    false
}

/// Whether an EOL comes next, without consuming it.
fn peek_eol(cursor: &mut BitCursor<'_>) -> bool {
    let start = cursor.position();
    let found = skip_eol(cursor);
    cursor.rewind(cursor.position() - start);
    found
}

/// Scan forward to just past the next EOL. Returns `false` at end of data.
fn resync(cursor: &mut BitCursor<'_>) -> bool {
    let mut zeros = 0u32;
    while !cursor.is_exhausted() {
        if cursor.read_bit() {
            if zeros >= EOL_ZEROS {
                return true;
            }
            zeros = 0;
        } else {
            zeros += 1;
        }
    }
    false
}

/// Decode a whole image in one call.
pub fn decode(data: &[u8], options: FaxOptions, rows: usize) -> Result<(Vec<u8>, DecodeReport)> {
    FaxDecoder::new(options)?.decode(data, rows)
}
