//! Compression support for the game's `SLID` blocks.
//!
//! `.sli` members of STM containers are LZSS-compressed with a 4 KiB
//! history window. See [`slid`] for the block layout.

pub mod slid;

use crate::error::Result;

/// Trait for compressing data.
pub trait Compressor {
    /// Compress `source`, returning the raw payload (no block header).
    fn compress(&self, source: &[u8]) -> Result<Vec<u8>>;
}

/// Trait for decompressing data.
pub trait Decompressor {
    /// Decompress a raw payload, returning a buffer of `decompressed_size` bytes.
    fn decompress(&self, source: &[u8], decompressed_size: usize) -> Result<Vec<u8>>;
}
