//! Strip decoding and reassembly.
//!
//! Every strip decodes into its own slice of one image buffer sized for the
//! full height. Group 4 strips run in order through a single decoder so each
//! strip sees the last line of the one before; Group 3, LZW and
//! uncompressed strips are independent and, with the `parallel` feature,
//! are decoded on the rayon thread pool.

use log::{debug, warn};
use oxifax_ccitt::{FaxDecoder, FaxOptions};
use oxifax_core::bitstream::FillOrder;
use oxifax_core::policy::{DecodeReport, StopReason};
use oxifax_core::raster::Bitmap;
use oxifax_lzw::{LzwConfig, LzwDecoder, Predictor, reverse_horizontal_differencing};

use crate::compression::Compression;
use crate::error::{ImageError, Result};
use crate::params::DecodeParams;

/// A decoded image and the diagnostics gathered on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Pixels per row.
    pub width: usize,
    /// Rows in the image.
    pub height: usize,
    /// Bytes per row.
    pub stride: usize,
    /// Packed rows; rows that could not be decoded are zero.
    pub data: Vec<u8>,
    /// Rows decoded, rows abandoned and why decoding stopped early.
    pub report: DecodeReport,
}

impl DecodedImage {
    /// Convert a bi-level image into a [`Bitmap`].
    pub fn into_bitmap(self) -> Result<Bitmap> {
        if self.stride != self.width.div_ceil(8) {
            return Err(ImageError::invalid_geometry(
                "only one-bit-per-pixel images convert to a bitmap",
            ));
        }
        Ok(Bitmap::from_packed(self.width, self.height, self.data)?)
    }
}

/// Decode an image stored as a single strip.
pub fn decode(data: &[u8], compression: Compression, params: &DecodeParams) -> Result<DecodedImage> {
    let params = DecodeParams {
        rows_per_strip: None,
        ..*params
    };
    decode_strips(&[data], compression, &params)
}

/// Decode an image stored as `params.strip_count()` strips.
pub fn decode_strips(
    strips: &[&[u8]],
    compression: Compression,
    params: &DecodeParams,
) -> Result<DecodedImage> {
    params.validate()?;
    compression.check_params(params)?;
    let expected = params.strip_count();
    if strips.len() != expected {
        return Err(ImageError::StripCount {
            expected,
            actual: strips.len(),
        });
    }

    let stride = params.stride();
    let strip_len = params.strip_rows() * stride;
    let mut data = vec![0u8; stride * params.height];

    let report = match compression.fax_options(params) {
        Some(options) => {
            if compression.strips_are_sequential() {
                decode_sequential(strips, &mut data, options, params)?
            } else {
                let reports = decode_independent(strips, &mut data, strip_len, |strip, out| {
                    let mut decoder = FaxDecoder::new(options)?;
                    Ok(decoder.decode_into(strip, out, out.len() / stride)?)
                })?;
                combine(reports, params.strip_rows())
            }
        }
        None => {
            let reports = match compression {
                Compression::Lzw(predictor) => {
                    decode_independent(strips, &mut data, strip_len, |strip, out| {
                        decode_lzw_strip(strip, out, predictor, params)
                    })?
                }
                _ => decode_independent(strips, &mut data, strip_len, |strip, out| {
                    Ok(copy_raw_strip(strip, out, params))
                })?,
            };
            combine(reports, params.strip_rows())
        }
    };

    if params.invert {
        invert_rows(&mut data, stride, params.row_bits());
    }

    Ok(DecodedImage {
        width: params.width,
        height: params.height,
        stride,
        data,
        report,
    })
}

/// Decode strips that do not depend on each other.
fn decode_independent<F>(
    strips: &[&[u8]],
    data: &mut [u8],
    strip_len: usize,
    decode_one: F,
) -> Result<Vec<DecodeReport>>
where
    F: Fn(&[u8], &mut [u8]) -> Result<DecodeReport> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        data.par_chunks_mut(strip_len)
            .zip(strips.par_iter())
            .map(|(out, strip)| decode_one(*strip, out))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        data.chunks_mut(strip_len)
            .zip(strips)
            .map(|(out, strip)| decode_one(*strip, out))
            .collect()
    }
}

fn combine(reports: Vec<DecodeReport>, strip_rows: usize) -> DecodeReport {
    let mut report = DecodeReport::default();
    for (index, strip) in reports.into_iter().enumerate() {
        report.merge(strip, index * strip_rows);
    }
    report
}

/// Group 4: one decoder, strips in order.
fn decode_sequential(
    strips: &[&[u8]],
    data: &mut Vec<u8>,
    options: FaxOptions,
    params: &DecodeParams,
) -> Result<DecodeReport> {
    let stride = params.stride();
    let strip_rows = params.strip_rows();
    let mut decoder = FaxDecoder::new(options)?;
    let mut report = DecodeReport::default();
    let mut unrecoverable = false;

    for (index, (strip, out)) in strips
        .iter()
        .zip(data.chunks_mut(strip_rows * stride))
        .enumerate()
    {
        let strip_report = decoder.decode_into(strip, out, out.len() / stride)?;
        unrecoverable |= strip_report.needs_fallback();
        report.merge(strip_report, index * strip_rows);
    }

    if unrecoverable && strips.len() > 1 {
        warn!(
            "Group 4 strips failed after {} of {} rows; retrying with other strip layouts",
            report.rows_decoded, params.height
        );
        for (name, attempt) in [
            ("joined", retry_joined(strips, options, params)),
            ("restarted", retry_restarted(strips, options, params)),
        ] {
            match attempt {
                Ok((candidate, candidate_report)) if better(&candidate_report, &report) => {
                    debug!(
                        "Keeping {} strip layout: {} rows decoded",
                        name, candidate_report.rows_decoded
                    );
                    *data = candidate;
                    report = candidate_report;
                }
                Ok(_) => {}
                Err(err) => debug!("{} strip layout failed: {}", name, err),
            }
        }
    }
    Ok(report)
}

/// All strips concatenated and decoded as one.
fn retry_joined(
    strips: &[&[u8]],
    options: FaxOptions,
    params: &DecodeParams,
) -> Result<(Vec<u8>, DecodeReport)> {
    let joined = strips.concat();
    let mut decoder = FaxDecoder::new(options)?;
    Ok(decoder.decode(&joined, params.height)?)
}

/// Every strip starting from an all-white reference line, the way most
/// TIFF writers code Group 4 strips.
fn retry_restarted(
    strips: &[&[u8]],
    options: FaxOptions,
    params: &DecodeParams,
) -> Result<(Vec<u8>, DecodeReport)> {
    let stride = params.stride();
    let strip_rows = params.strip_rows();
    let mut decoder = FaxDecoder::new(options)?;
    let mut data = vec![0u8; stride * params.height];
    let mut report = DecodeReport::default();
    for (index, (strip, out)) in strips
        .iter()
        .zip(data.chunks_mut(strip_rows * stride))
        .enumerate()
    {
        decoder.reset();
        let strip_report = decoder.decode_into(strip, out, out.len() / stride)?;
        report.merge(strip_report, index * strip_rows);
    }
    Ok((data, report))
}

/// More rows decoded wins; on a tie, fewer abandoned rows.
fn better(candidate: &DecodeReport, current: &DecodeReport) -> bool {
    (candidate.rows_decoded, current.failure_count())
        > (current.rows_decoded, candidate.failure_count())
}

fn decode_lzw_strip(
    strip: &[u8],
    out: &mut [u8],
    predictor: Predictor,
    params: &DecodeParams,
) -> Result<DecodeReport> {
    let stride = params.stride();
    let rows = out.len() / stride;
    let normalized;
    let strip = match params.fill_order {
        FillOrder::MsbToLsb => strip,
        FillOrder::LsbToMsb => {
            normalized = strip.iter().map(|b| b.reverse_bits()).collect::<Vec<u8>>();
            &normalized[..]
        }
    };

    let mut decoder = LzwDecoder::new(LzwConfig::TIFF)?;
    let mut samples = decoder.decode(strip, out.len())?;
    if predictor == Predictor::Horizontal {
        reverse_horizontal_differencing(&mut samples, params.sample_layout())?;
    }
    out[..samples.len()].copy_from_slice(&samples);

    let rows_decoded = samples.len() / stride;
    Ok(DecodeReport {
        rows_decoded,
        failed_rows: Vec::new(),
        stopped: (rows_decoded < rows).then_some(StopReason::Exhausted),
    })
}

fn copy_raw_strip(strip: &[u8], out: &mut [u8], params: &DecodeParams) -> DecodeReport {
    let stride = params.stride();
    let rows = out.len() / stride;
    let len = strip.len().min(out.len());
    out[..len].copy_from_slice(&strip[..len]);
    if params.is_bilevel() && params.fill_order == FillOrder::LsbToMsb {
        for byte in &mut out[..len] {
            *byte = byte.reverse_bits();
        }
    }

    let rows_decoded = len / stride;
    if rows_decoded < rows {
        debug!("Uncompressed strip holds {} of {} rows", rows_decoded, rows);
    }
    DecodeReport {
        rows_decoded,
        failed_rows: Vec::new(),
        stopped: (rows_decoded < rows).then_some(StopReason::Exhausted),
    }
}

/// Invert every sample bit, keeping row padding clear.
pub(crate) fn invert_rows(data: &mut [u8], stride: usize, row_bits: usize) {
    let pad = stride * 8 - row_bits;
    let last_mask = 0xFFu8 << pad;
    for row in data.chunks_exact_mut(stride) {
        for byte in row.iter_mut() {
            *byte = !*byte;
        }
        if let Some(last) = row.last_mut() {
            *last &= last_mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_rows_clears_padding() {
        let mut data = vec![0b1010_0000, 0x0F, 0b0110_0000];
        invert_rows(&mut data[..2], 2, 13);
        assert_eq!(&data[..2], &[0b0101_1111, 0xF0]);
        invert_rows(&mut data[2..], 1, 8);
        assert_eq!(data[2], 0b1001_1111);
    }

    #[test]
    fn test_copy_raw_reverses_bilevel() {
        let params = DecodeParams::new(8, 3).with_fill_order(FillOrder::LsbToMsb);
        let mut out = vec![0u8; 3];
        let report = copy_raw_strip(&[0x01, 0x80], &mut out, &params);
        assert_eq!(out, vec![0x80, 0x01, 0x00]);
        assert_eq!(report.rows_decoded, 2);
        assert_eq!(report.stopped, Some(StopReason::Exhausted));

        // Multi-bit samples are bytes, not bit strings.
        let params = DecodeParams::new(1, 3)
            .with_samples(1, 8)
            .with_fill_order(FillOrder::LsbToMsb);
        let report = copy_raw_strip(&[0x01; 8], &mut out, &params);
        assert_eq!(out, vec![0x01; 3]);
        assert_eq!(report.stopped, None);
    }

    #[test]
    fn test_better_prefers_more_rows() {
        let worse = DecodeReport {
            rows_decoded: 4,
            failed_rows: vec![4],
            stopped: Some(StopReason::Unrecoverable),
        };
        let good = DecodeReport {
            rows_decoded: 10,
            failed_rows: Vec::new(),
            stopped: None,
        };
        assert!(better(&good, &worse));
        assert!(!better(&worse, &good));
        assert!(!better(&good, &good));
    }
}
