//! Decode command implementation.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use log::{info, warn};

use super::{CodingArgs, GeometryArgs};
use crate::pbm;

pub fn cmd_decode(
    input: &Path,
    output: &Path,
    coding: &CodingArgs,
    geometry: &GeometryArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let params = geometry.params(coding);
    let image = oxifax_image::decode(&data, coding.compression(), &params)?;

    if !image.report.failed_rows.is_empty() {
        warn!(
            "{} rows could not be decoded: {:?}",
            image.report.failure_count(),
            image.report.failed_rows
        );
    }
    if let Some(reason) = image.report.stopped {
        info!(
            "Stopped after {} of {} rows: {:?}",
            image.report.rows_decoded, image.height, reason
        );
    }

    if params.is_bilevel() {
        let writer = BufWriter::new(File::create(output)?);
        pbm::write(writer, image.width, image.height, &image.data)?;
    } else {
        info!(
            "Writing {} bytes of raw rows ({} bytes per row)",
            image.data.len(),
            image.stride
        );
        fs::write(output, &image.data)?;
    }
    Ok(())
}
