//! `SLID` block compression and decompression.
//!
//! Block layout (little-endian):
//!
//! | offset | size | field                      |
//! |--------|------|----------------------------|
//! | 0      | 4    | magic `"SLID"`             |
//! | 4      | 4    | total file size            |
//! | 8      | 4    | decompressed size          |
//! | 12     | 4    | compressed payload size    |
//! | 16     | ..   | payload                    |
//!
//! The payload is an LZSS stream: a control byte supplies eight flags (LSB
//! first); a set flag is a literal byte, a clear flag a two-byte
//! back-reference `(b1, b2)` into a 4096-byte history window whose write
//! cursor starts at `0xFEE`. The reference offset is
//! `b1 | ((b2 & 0xF0) << 4)` and the copy runs inclusively over
//! `0..=(b2 & 0x0F) + 2`, so a back-reference yields 3 to 18 bytes.

use std::io::Cursor;

use crate::error::{GhsError, Result};
use crate::io::stream;

/// Block magic.
pub const SLID_MAGIC: &[u8; 4] = b"SLID";

/// Size of the block header preceding the payload.
pub const SLID_HEADER_SIZE: usize = 16;

const HISTORY_SIZE: usize = 0x1000;
const HISTORY_MASK: usize = HISTORY_SIZE - 1;
const HISTORY_START: usize = 0xFEE;

/// Added to the 4-bit length field to get the inclusive upper bound of a run.
const RUN_BIAS: usize = 2;
const MIN_MATCH: usize = RUN_BIAS + 1;
const MAX_MATCH: usize = 0x0F + RUN_BIAS + 1;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Header of a compressed `SLID` block.
///
/// Sizes are trusted as given; the payload is read up to
/// `compressed_size` bytes or the end of the buffer, whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidHeader {
    /// Declared size of the whole `.sli` file.
    pub file_size: u32,
    /// Number of bytes the payload expands to.
    pub decompressed_size: u32,
    /// Number of payload bytes following the header.
    pub compressed_size: u32,
}

impl SlidHeader {
    /// Parse the 16-byte block header.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 4 || &data[..4] != SLID_MAGIC {
            let magic = &data[..data.len().min(4)];
            return Err(GhsError::Format(format!(
                "Not a valid SLID file, magic is {:02X?}",
                magic
            )));
        }
        let mut cursor = Cursor::new(data);
        cursor.set_position(4);
        Ok(Self {
            file_size: stream::read_u32(&mut cursor, "SLID file size")?,
            decompressed_size: stream::read_u32(&mut cursor, "SLID decompressed size")?,
            compressed_size: stream::read_u32(&mut cursor, "SLID compressed size")?,
        })
    }

    /// Serialize the header, magic included.
    pub fn to_bytes(&self) -> [u8; SLID_HEADER_SIZE] {
        let mut out = [0u8; SLID_HEADER_SIZE];
        out[..4].copy_from_slice(SLID_MAGIC);
        out[4..8].copy_from_slice(&self.file_size.to_le_bytes());
        out[8..12].copy_from_slice(&self.decompressed_size.to_le_bytes());
        out[12..16].copy_from_slice(&self.compressed_size.to_le_bytes());
        out
    }
}

/// Decompress a complete `SLID` block (header + payload).
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let header = SlidHeader::parse(data)?;
    let payload_end = SLID_HEADER_SIZE
        .saturating_add(header.compressed_size as usize)
        .min(data.len());
    let payload = &data[SLID_HEADER_SIZE..payload_end];
    Ok(decompress_payload(payload, header.decompressed_size as usize))
}

/// Compress `data` into a complete `SLID` block.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let payload = SlidCompressor::new().compress_impl(data);
    let header = SlidHeader {
        file_size: (SLID_HEADER_SIZE + payload.len()) as u32,
        decompressed_size: data.len() as u32,
        compressed_size: payload.len() as u32,
    };
    let mut out = Vec::with_capacity(SLID_HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Decompressor
// ---------------------------------------------------------------------------

/// Decompressor for raw `SLID` payloads.
pub struct SlidDecompressor;

impl super::Decompressor for SlidDecompressor {
    fn decompress(&self, source: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
        Ok(decompress_payload(source, decompressed_size))
    }
}

/// Output sink that mirrors every byte into the history window.
struct Window {
    history: [u8; HISTORY_SIZE],
    cursor: usize,
    out: Vec<u8>,
    written: usize,
}

impl Window {
    fn new(decompressed_size: usize) -> Self {
        Self {
            history: [0u8; HISTORY_SIZE],
            cursor: HISTORY_START,
            out: vec![0u8; decompressed_size],
            written: 0,
        }
    }

    fn put(&mut self, byte: u8) {
        // Bytes past the declared size are dropped; the window still advances.
        if let Some(slot) = self.out.get_mut(self.written) {
            *slot = byte;
        }
        self.written += 1;
        self.history[self.cursor] = byte;
        self.cursor = (self.cursor + 1) & HISTORY_MASK;
    }
}

/// Decode an LZSS payload into exactly `decompressed_size` bytes.
///
/// Malformed input never panics: running out of payload stops decoding and
/// leaves the rest of the output zeroed.
pub fn decompress_payload(source: &[u8], decompressed_size: usize) -> Vec<u8> {
    let mut window = Window::new(decompressed_size);
    let mut src = 0usize;
    let mut flags: u32 = 0;

    while src < source.len() {
        flags >>= 1;
        // Bit 8 drops out after eight shifts of `byte | 0xFF00`.
        if flags & 0x100 == 0 {
            flags = source[src] as u32 | 0xFF00;
            src += 1;
        }

        if flags & 1 != 0 {
            let Some(&byte) = source.get(src) else {
                break;
            };
            src += 1;
            window.put(byte);
            continue;
        }

        let (Some(&b1), Some(&b2)) = (source.get(src), source.get(src + 1)) else {
            break;
        };
        src += 2;

        let offset = b1 as usize | ((b2 as usize & 0xF0) << 4);
        let run = (b2 as usize & 0x0F) + RUN_BIAS;
        for k in 0..=run {
            let byte = window.history[(offset + k) & HISTORY_MASK];
            window.put(byte);
        }
    }

    window.out
}

// ---------------------------------------------------------------------------
// Compressor
// ---------------------------------------------------------------------------

/// Greedy longest-match encoder producing payloads [`decompress_payload`]
/// reads back. Used to repack modified assets and in tests.
pub struct SlidCompressor {
    history: Vec<u8>,
    cursor: usize,
}

impl Default for SlidCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Compressor for SlidCompressor {
    fn compress(&self, source: &[u8]) -> Result<Vec<u8>> {
        Ok(SlidCompressor::new().compress_impl(source))
    }
}

impl SlidCompressor {
    pub fn new() -> Self {
        Self {
            history: vec![0u8; HISTORY_SIZE],
            cursor: HISTORY_START,
        }
    }

    /// Encode `source` as a raw payload.
    pub fn compress_impl(&mut self, source: &[u8]) -> Vec<u8> {
        let mut dest = Vec::with_capacity(source.len() + source.len() / 8 + 1);
        let mut pos = 0usize;

        while pos < source.len() {
            let control_index = dest.len();
            dest.push(0u8);

            for bit in 0..8 {
                if pos >= source.len() {
                    break;
                }
                let (offset, mut len) = self.find_match(source, pos);
                if len >= MIN_MATCH {
                    dest.push((offset & 0xFF) as u8);
                    dest.push((((offset >> 4) & 0xF0) | (len - MIN_MATCH)) as u8);
                } else {
                    dest[control_index] |= 1 << bit;
                    dest.push(source[pos]);
                    len = 1;
                }
                self.advance(&source[pos..pos + len]);
                pos += len;
            }
        }

        dest
    }

    /// Longest history match for `source[pos..]`, honouring the
    /// self-referential copy the decoder performs.
    fn find_match(&self, source: &[u8], pos: usize) -> (usize, usize) {
        let limit = MAX_MATCH.min(source.len() - pos);
        if limit < MIN_MATCH {
            return (0, 0);
        }

        let mut best = (0usize, 0usize);
        for candidate in 0..HISTORY_SIZE {
            let mut len = 0usize;
            while len < limit {
                let index = (candidate + len) & HISTORY_MASK;
                // Distance from the write cursor: bytes already emitted by
                // this run shadow the stale history contents.
                let ahead = index.wrapping_sub(self.cursor) & HISTORY_MASK;
                let byte = if ahead < len {
                    source[pos + ahead]
                } else {
                    self.history[index]
                };
                if byte != source[pos + len] {
                    break;
                }
                len += 1;
            }
            if len > best.1 {
                best = (candidate, len);
                if len == limit {
                    break;
                }
            }
        }
        best
    }

    fn advance(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.history[self.cursor] = b;
            self.cursor = (self.cursor + 1) & HISTORY_MASK;
        }
    }
}
