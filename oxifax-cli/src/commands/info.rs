//! Info command implementation.

use std::fs;
use std::path::Path;

use oxifax_image::{Compression, DecodeParams, DecodeReport};
use serde::Serialize;

use super::{CodingArgs, GeometryArgs};

#[derive(Serialize)]
struct InfoOutput<'a> {
    file: String,
    size: usize,
    compression: Compression,
    params: &'a DecodeParams,
    report: &'a DecodeReport,
}

pub fn cmd_info(
    input: &Path,
    coding: &CodingArgs,
    geometry: &GeometryArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let params = geometry.params(coding);
    let compression = coding.compression();
    let image = oxifax_image::decode(&data, compression, &params)?;
    let report = &image.report;

    if json {
        let output = InfoOutput {
            file: input.display().to_string(),
            size: data.len(),
            compression,
            params: &params,
            report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Strip Information");
    println!("=================");
    println!("File: {}", input.display());
    println!("Size: {} bytes", data.len());
    println!("Compression: {:?}", compression);
    println!("Geometry: {}x{}, {} bytes per row", params.width, params.height, image.stride);
    println!();
    println!("Decode:");
    println!("  Rows decoded: {}", report.rows_decoded);
    println!("  Rows failed: {}", report.failure_count());
    if !report.failed_rows.is_empty() {
        println!("  Failed rows: {:?}", report.failed_rows);
    }
    match report.stopped {
        Some(reason) => println!("  Stopped early: {:?}", reason),
        None => println!("  Stopped early: no"),
    }
    let raw = image.data.len();
    if raw > 0 {
        println!(
            "  Compression ratio: {:.1}%",
            (1.0 - data.len() as f64 / raw as f64) * 100.0
        );
    }
    Ok(())
}
