//! Compression support for document files.
//!
//! `.dae` files are often shipped gzip-compressed (`.dae.gz`). Compressed
//! input is recognized by its magic bytes, not by file name.

use std::io::{Read, Write};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::util::Result;

/// gzip member header: ID1, ID2, CM (deflate).
const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Compress data with gzip.
///
/// # Arguments
/// * `data` - Data to compress
/// * `level` - Compression level (1-9); 0 or less returns the data unchanged
pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>> {
    if level <= 0 {
        return Ok(data.to_vec());
    }

    let compression_level = match level {
        1 => Compression::fast(),
        2..=5 => Compression::default(),
        _ => Compression::best(),
    };

    let mut encoder = GzEncoder::new(Vec::new(), compression_level);
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate gzip data. Data without the gzip header is returned as-is.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !is_compressed(data) {
        return Ok(data.to_vec());
    }

    let mut decoder = GzDecoder::new(data);
    // Text documents compress well; start with a generous guess.
    let mut inflated = Vec::with_capacity(data.len().saturating_mul(4));
    decoder.read_to_end(&mut inflated)?;
    Ok(inflated)
}

/// Check if data starts with a gzip header.
pub fn is_compressed(data: &[u8]) -> bool {
    data.len() >= GZIP_MAGIC.len() && data[..GZIP_MAGIC.len()] == GZIP_MAGIC
}
