//! Encode command implementation.

use std::fs;
use std::path::Path;

use log::info;
use oxifax_image::DecodeParams;

use super::CodingArgs;
use crate::pbm;

pub fn cmd_encode(
    input: &Path,
    output: &Path,
    coding: &CodingArgs,
    invert: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height, rows) = pbm::read(&fs::read(input)?)?;
    let params = DecodeParams::new(width, height)
        .with_fill_order(coding.fill_order())
        .with_invert(invert);
    let coded = oxifax_image::encode(&rows, coding.compression(), &params)?;

    info!(
        "{}x{} -> {} bytes ({:.1}% of {} raw bytes)",
        width,
        height,
        coded.len(),
        coded.len() as f64 * 100.0 / rows.len().max(1) as f64,
        rows.len()
    );
    fs::write(output, coded)?;
    Ok(())
}
