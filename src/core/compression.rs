//! Compression support for binary layers.
//!
//! Binary layers store their body zlib-compressed behind an 8-byte header that
//! carries the uncompressed size.

use std::io::{Read, Write};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::util::{Error, Result};

/// Largest body we are willing to inflate.
const MAX_UNCOMPRESSED_SIZE: usize = 1024 * 1024 * 1024;

/// Compress data using zlib.
///
/// # Arguments
/// * `data` - Data to compress
/// * `level` - Compression level (0-9, where 0 stores the data deflated without compression)
///
/// Returns `[uncompressed_size: u64 LE][zlib stream]`.
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let compression_level = match level {
        0 => Compression::none(),
        1 => Compression::fast(),
        2..=5 => Compression::default(),
        _ => Compression::best(),
    };

    let mut encoder = ZlibEncoder::new(Vec::new(), compression_level);
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;

    let mut result = Vec::with_capacity(8 + compressed.len());
    result.extend_from_slice(&(data.len() as u64).to_le_bytes());
    result.extend_from_slice(&compressed);
    Ok(result)
}

/// Decompress data produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 8 {
        return Err(Error::other("compressed block is shorter than its header"));
    }

    let mut size = [0u8; 8];
    size.copy_from_slice(&data[0..8]);
    let uncompressed_size = u64::from_le_bytes(size) as usize;
    if uncompressed_size > MAX_UNCOMPRESSED_SIZE {
        return Err(Error::other(format!(
            "compressed block claims {} bytes",
            uncompressed_size
        )));
    }

    let mut decoder = ZlibDecoder::new(&data[8..]);
    let mut decompressed = Vec::with_capacity(uncompressed_size.min(data.len() * 16));
    decoder.read_to_end(&mut decompressed)?;

    if decompressed.len() != uncompressed_size {
        return Err(Error::other(format!(
            "decompressed {} bytes, header says {}",
            decompressed.len(),
            uncompressed_size
        )));
    }
    Ok(decompressed)
}
