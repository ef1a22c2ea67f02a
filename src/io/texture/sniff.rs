//! Structural detection of texture streams.
//!
//! Both sniffers walk the record headers and skip over palette and pixel
//! data using the declared sizes; a buffer is accepted only if the records
//! tile it exactly.

use nom::branch::alt;
use nom::bytes::complete::{tag, take};
use nom::combinator::verify;
use nom::number::complete::le_u32;
use nom::IResult;

const TAG_I4: &[u8] = &[0x08, 0x00, 0x00, 0x00];
const TAG_I8: &[u8] = &[0x09, 0x00, 0x00, 0x00];

/// Trailer found after the last texture of a few v1 streams.
const SENTINEL: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];
const SENTINEL_TAIL: usize = 12;

/// Bytes between the fixed header fields and the data blocks.
#[derive(Debug, Clone, Copy)]
struct Padding {
    before_palette: usize,
    after_palette: usize,
    before_pixels: usize,
    after_pixels: usize,
}

const V1_PADDING: Padding = Padding {
    before_palette: 0,
    after_palette: 0,
    before_pixels: 0,
    after_pixels: 0,
};

const V2_PADDING: Padding = Padding {
    before_palette: 128,
    after_palette: 32,
    before_pixels: 128,
    after_pixels: 32,
};

fn pixel_format_tag(input: &[u8]) -> IResult<&[u8], &[u8]> {
    alt((tag(TAG_I4), tag(TAG_I8)))(input)
}

fn sentinel(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(SENTINEL)(input)
}

fn nonzero_u32(input: &[u8]) -> IResult<&[u8], u32> {
    verify(le_u32, |v: &u32| *v != 0)(input)
}

/// Skip one texture record.
fn record(input: &[u8], padding: Padding) -> IResult<&[u8], ()> {
    let (input, _) = pixel_format_tag(input)?;
    let (input, palette_size) = le_u32(input)?;
    let palette_span = (palette_size as usize)
        .saturating_add(8 + padding.before_palette + padding.after_palette);
    let (input, _) = take(palette_span)(input)?;
    let (input, _) = take(4usize)(input)?;
    let (input, pixels_size) = nonzero_u32(input)?;
    let pixels_span = (pixels_size as usize)
        .saturating_add(8 + padding.before_pixels + padding.after_pixels);
    let (input, _) = take(pixels_span)(input)?;
    Ok((input, ()))
}

/// Quickly check whether `data` is (very likely) a v1 texture stream.
///
/// A `FF FF FF FF` tag followed by at most 12 bytes is accepted as a trailer,
/// provided at least two textures came before it. A short tail is not an
/// error: the game's own check skips the 12 bytes without checking them.
pub fn quickcheck_tex(data: &[u8]) -> bool {
    let mut input = data;
    let mut count = 0usize;
    loop {
        if let Ok((rest, _)) = sentinel(input) {
            return rest.len() <= SENTINEL_TAIL && count > 1;
        }
        match record(input, V1_PADDING) {
            Ok(([], ())) => return true,
            Ok((rest, ())) => {
                count += 1;
                input = rest;
            }
            Err(_) => return false,
        }
    }
}

/// Quickly check whether `data` is (very likely) a v2 texture stream.
pub fn quickcheck_tex2(data: &[u8]) -> bool {
    let mut input = data;
    loop {
        match record(input, V2_PADDING) {
            Ok(([], ())) => return true,
            Ok((rest, ())) => input = rest,
            Err(_) => return false,
        }
    }
}
