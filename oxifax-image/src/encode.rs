//! Strip encoding, the inverse of [`crate::decode`].

use std::borrow::Cow;

use oxifax_ccitt::FaxEncoder;
use oxifax_core::bitstream::FillOrder;
use oxifax_lzw::{LzwConfig, LzwEncoder, Predictor, apply_horizontal_differencing};

use crate::compression::Compression;
use crate::decode::invert_rows;
use crate::error::{ImageError, Result};
use crate::params::DecodeParams;

/// Encode packed rows as a single strip.
pub fn encode(data: &[u8], compression: Compression, params: &DecodeParams) -> Result<Vec<u8>> {
    let params = DecodeParams {
        rows_per_strip: None,
        ..*params
    };
    let mut strips = encode_strips(data, compression, &params)?;
    Ok(strips.pop().unwrap_or_default())
}

/// Encode packed rows as `params.strip_count()` strips.
///
/// Group 4 strips continue each other's reference line, matching
/// [`crate::decode_strips`].
pub fn encode_strips(
    data: &[u8],
    compression: Compression,
    params: &DecodeParams,
) -> Result<Vec<Vec<u8>>> {
    params.validate()?;
    compression.check_params(params)?;
    let stride = params.stride();
    let needed = stride * params.height;
    if data.len() != needed {
        return Err(ImageError::invalid_geometry(format!(
            "{} rows of {} bytes need {} bytes, got {}",
            params.height,
            stride,
            needed,
            data.len()
        )));
    }

    let source = if params.invert {
        let mut inverted = data.to_vec();
        invert_rows(&mut inverted, stride, params.row_bits());
        Cow::Owned(inverted)
    } else {
        Cow::Borrowed(data)
    };
    let strip_len = params.strip_rows() * stride;
    let chunks = source.chunks(strip_len);

    if let Some(options) = compression.encode_options(params) {
        let count = chunks.len();
        let mut strips = Vec::with_capacity(count);
        if compression.strips_are_sequential() {
            let mut encoder = FaxEncoder::new(options)?;
            for (index, chunk) in chunks.enumerate() {
                encoder.encode_rows(chunk)?;
                if index + 1 < count {
                    strips.push(encoder.take_strip());
                }
            }
            if count > 0 {
                strips.push(encoder.finish());
            }
        } else {
            for chunk in chunks {
                strips.push(oxifax_ccitt::encode(chunk, options)?);
            }
        }
        return Ok(strips);
    }

    chunks
        .map(|chunk| match compression {
            Compression::Lzw(predictor) => encode_lzw_strip(chunk, predictor, params),
            _ => Ok(reorder_bits(chunk.to_vec(), params, params.is_bilevel())),
        })
        .collect()
}

fn encode_lzw_strip(chunk: &[u8], predictor: Predictor, params: &DecodeParams) -> Result<Vec<u8>> {
    let mut samples = chunk.to_vec();
    if predictor == Predictor::Horizontal {
        apply_horizontal_differencing(&mut samples, params.sample_layout())?;
    }
    let mut encoder = LzwEncoder::new(LzwConfig::TIFF)?;
    let compressed = encoder.encode(&samples)?;
    Ok(reorder_bits(compressed, params, true))
}

fn reorder_bits(mut bytes: Vec<u8>, params: &DecodeParams, applies: bool) -> Vec<u8> {
    if applies && params.fill_order == FillOrder::LsbToMsb {
        for byte in &mut bytes {
            *byte = byte.reverse_bits();
        }
    }
    bytes
}
