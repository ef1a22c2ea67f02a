//! PS2 GS memory swizzle reversal for 4-bit textures and 8-bit palettes.
//!
//! The pixel mapping covers exactly one 256x256 4-bit page. It was worked
//! out empirically from textures that only look right when deswizzled
//! (e.g. `FILE.STM` `28.stm/03.dat`) and is kept bit-for-bit, including the
//! two correction branches.

use once_cell::sync::Lazy;

use crate::error::{GhsError, Result};

/// Number of indices in a swizzled 256x256 page.
pub const SWIZZLED_PAGE_LEN: usize = 256 * 256;

/// Column of a pixel within its 32-pixel block, by `i % 64`.
const XBASE: [u8; 64] = [
    0x00, 0x04, 0x08, 0x0C, 0x10, 0x14, 0x18, 0x1C, //
    0x01, 0x05, 0x09, 0x0D, 0x11, 0x15, 0x19, 0x1D, //
    0x02, 0x06, 0x0A, 0x0E, 0x12, 0x16, 0x1A, 0x1E, //
    0x03, 0x07, 0x0B, 0x0F, 0x13, 0x17, 0x1B, 0x1F, //
    0x04, 0x00, 0x0C, 0x08, 0x14, 0x10, 0x1C, 0x18, //
    0x05, 0x01, 0x0D, 0x09, 0x15, 0x11, 0x1D, 0x19, //
    0x06, 0x02, 0x0E, 0x0A, 0x16, 0x12, 0x1E, 0x1A, //
    0x07, 0x03, 0x0F, 0x0B, 0x17, 0x13, 0x1F, 0x1B, //
];

/// `XBASE` with its halves exchanged, used on line groups 2, 3, 6 and 7.
const XBASE_ALT: [u8; 64] = [
    0x04, 0x00, 0x0C, 0x08, 0x14, 0x10, 0x1C, 0x18, //
    0x05, 0x01, 0x0D, 0x09, 0x15, 0x11, 0x1D, 0x19, //
    0x06, 0x02, 0x0E, 0x0A, 0x16, 0x12, 0x1E, 0x1A, //
    0x07, 0x03, 0x0F, 0x0B, 0x17, 0x13, 0x1F, 0x1B, //
    0x00, 0x04, 0x08, 0x0C, 0x10, 0x14, 0x18, 0x1C, //
    0x01, 0x05, 0x09, 0x0D, 0x11, 0x15, 0x19, 0x1D, //
    0x02, 0x06, 0x0A, 0x0E, 0x12, 0x16, 0x1A, 0x1E, //
    0x03, 0x07, 0x0B, 0x0F, 0x13, 0x17, 0x1B, 0x1F, //
];

const LINEBASE: [usize; 8] = [0, 1, 4, 5, 8, 9, 0xC, 0xD];

fn is_corrected_line(line: usize) -> bool {
    matches!(line, 0..=3 | 8..=11)
}

fn is_corrected_xbase(xbase: usize) -> bool {
    // 4..=7, 12..=15, 20..=23, 28..=31
    xbase < 32 && xbase & 0b100 != 0
}

/// Destination index of swizzled source index `i`.
pub fn deswizzle_index(i: usize) -> usize {
    let half128 = usize::from(i >= 32768);
    let column32 = (i / 8192) % 4 + (i / 512) % 2 * 4;
    let row16 = (i / 64) % 8;

    let linebasei = (i / 1024) % 8;
    let linebase = LINEBASE[linebasei];
    let mut lineadd = (i / 32) % 2 * 2;

    let xbase = if matches!(linebasei, 2 | 3 | 6 | 7) {
        XBASE_ALT[i % 64]
    } else {
        XBASE[i % 64]
    } as usize;

    // Some tile lines come out with their line pairs exchanged.
    let line = linebase + lineadd;
    if is_corrected_xbase(xbase) == is_corrected_line(line) {
        lineadd ^= 2;
    }

    let x = column32 * 32 + xbase;
    let y = half128 * 128 + row16 * 16 + linebase + lineadd;
    y * 256 + x
}

/// Destination of every source index, computed once.
static DESWIZZLE_TABLE: Lazy<Vec<u16>> = Lazy::new(|| {
    (0..SWIZZLED_PAGE_LEN)
        .map(|i| deswizzle_index(i) as u16)
        .collect()
});

/// Restore row-major order of a swizzled 256x256 page of 4-bit indices.
pub fn deswizzle_pixels(pixels: &[u8]) -> Result<Vec<u8>> {
    if pixels.len() != SWIZZLED_PAGE_LEN {
        return Err(GhsError::Format(format!(
            "Can only deswizzle pixels of length 65536 (256x256), got {}",
            pixels.len()
        )));
    }
    let mut out = vec![0u8; SWIZZLED_PAGE_LEN];
    for (&dest, &pixel) in DESWIZZLE_TABLE.iter().zip(pixels) {
        out[dest as usize] = pixel;
    }
    Ok(out)
}

/// Palette index an entry of a swizzled (CSM1) palette belongs at.
///
/// Within each 32-entry block, entries 8..16 and 16..24 trade places.
pub const fn palette_index(i: usize) -> usize {
    match i & 0x18 {
        0x08 => i + 8,
        0x10 => i - 8,
        _ => i,
    }
}

/// Restore linear order of a swizzled 8-bit palette.
///
/// Only complete 32-entry blocks are touched.
pub fn deswizzle_palette<T: Copy>(palette: &mut [T]) {
    let full = palette.len() / 32 * 32;
    let swizzled = palette[..full].to_vec();
    for (i, entry) in swizzled.into_iter().enumerate() {
        palette[palette_index(i)] = entry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_destinations() {
        let known = [
            (0, 0),
            (1, 516),
            (2, 8),
            (3, 524),
            (7, 540),
            (8, 1),
            (31, 543),
            (32, 4),
            (33, 512),
            (63, 539),
            (64, 4096),
            (512, 128),
            (1024, 256),
            (2048, 1028),
            (3072, 1284),
            (8192, 32),
            (12345, 2595),
            (32768, 32768),
            (65535, 65535),
        ];
        for (src, dest) in known {
            assert_eq!(deswizzle_index(src), dest, "source index {src}");
        }
    }

    #[test]
    fn test_mapping_is_permutation() {
        let mut seen = vec![false; SWIZZLED_PAGE_LEN];
        for i in 0..SWIZZLED_PAGE_LEN {
            let d = deswizzle_index(i);
            assert!(d < SWIZZLED_PAGE_LEN);
            assert!(!seen[d], "destination {d} hit twice");
            seen[d] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_deswizzle_pixels_moves_values() {
        let mut pixels = vec![0u8; SWIZZLED_PAGE_LEN];
        pixels[1] = 7;
        let out = deswizzle_pixels(&pixels).unwrap();
        assert_eq!(out[516], 7);
        assert_eq!(out.iter().filter(|p| **p != 0).count(), 1);
    }

    #[test]
    fn test_deswizzle_pixels_wrong_length() {
        assert!(deswizzle_pixels(&[0u8; 128]).is_err());
    }

    #[test]
    fn test_palette_index() {
        assert_eq!(palette_index(0), 0);
        assert_eq!(palette_index(8), 16);
        assert_eq!(palette_index(16), 8);
        assert_eq!(palette_index(24), 24);
        assert_eq!(palette_index(40), 48);
        assert_eq!(palette_index(255), 255);
    }

    #[test]
    fn test_deswizzle_palette_matches_index_map() {
        let original: Vec<usize> = (0..256).collect();
        let mut palette = original.clone();
        deswizzle_palette(&mut palette);
        for (i, entry) in palette.iter().enumerate() {
            assert_eq!(palette_index(*entry), i);
        }
    }

    #[test]
    fn test_deswizzle_palette_partial_block_untouched() {
        let mut palette: Vec<u8> = (0..20).collect();
        deswizzle_palette(&mut palette);
        assert_eq!(palette, (0..20).collect::<Vec<u8>>());
    }
}
