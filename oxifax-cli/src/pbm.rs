//! Binary PBM (`P4`) reading and writing.
//!
//! P4 rows are packed MSB-first with 1 meaning black, the same layout the
//! fax decoder produces.

use std::io::{self, Write};

/// Parse a P4 file into `(width, height, rows)`.
pub fn read(bytes: &[u8]) -> io::Result<(usize, usize, Vec<u8>)> {
    let mut pos = 0;
    let magic = token(bytes, &mut pos)?;
    if magic != b"P4" {
        return Err(invalid("not a binary PBM (P4) file"));
    }
    let width = number(bytes, &mut pos)?;
    let height = number(bytes, &mut pos)?;
    // Exactly one whitespace byte separates the header from the raster.
    pos += 1;

    let needed = width
        .div_ceil(8)
        .checked_mul(height)
        .ok_or_else(|| invalid(format!("{}x{} raster is too large", width, height)))?;
    let raster = pos
        .checked_add(needed)
        .and_then(|end| bytes.get(pos..end))
        .ok_or_else(|| invalid(format!("raster needs {} bytes", needed)))?;
    Ok((width, height, raster.to_vec()))
}

/// Write packed rows as a P4 file.
pub fn write<W: Write>(mut out: W, width: usize, height: usize, rows: &[u8]) -> io::Result<()> {
    write!(out, "P4\n{} {}\n", width, height)?;
    out.write_all(rows)?;
    out.flush()
}

fn token<'a>(bytes: &'a [u8], pos: &mut usize) -> io::Result<&'a [u8]> {
    loop {
        match bytes.get(*pos) {
            Some(b'#') => {
                while bytes.get(*pos).is_some_and(|&b| b != b'\n') {
                    *pos += 1;
                }
            }
            Some(b) if b.is_ascii_whitespace() => *pos += 1,
            Some(_) => break,
            None => return Err(invalid("truncated PBM header")),
        }
    }
    let start = *pos;
    while bytes.get(*pos).is_some_and(|b| !b.is_ascii_whitespace()) {
        *pos += 1;
    }
    Ok(&bytes[start..*pos])
}

fn number(bytes: &[u8], pos: &mut usize) -> io::Result<usize> {
    let text = token(bytes, pos)?;
    std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n: &usize| n > 0)
        .ok_or_else(|| invalid("bad PBM dimension"))
}

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}
