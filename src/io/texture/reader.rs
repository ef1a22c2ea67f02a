//! Texture record decoding.
//!
//! Records are read from a `Cursor<&[u8]>`; each read leaves the cursor at
//! the first byte of the next record so a whole stream can be walked with
//! [`read_all`].

use std::io::Cursor;

use crate::error::{GhsError, Result};
use crate::io::stream::{is_eof, read_u16, read_u32, read_u8, read_vec, skip};
use crate::texture::{unpack_nibbles, PixelFormat, TextureImage};
use crate::types::Rgba;

use super::swizzle::{deswizzle_palette, deswizzle_pixels};

/// Length of the all-`0xFF` trailer ending a few v1 streams.
const EXTRA_DATA_LEN: usize = 16;

/// Palette length, in colors, that the palette swizzle applies to.
const SWIZZLED_PALETTE_COLORS: usize = 256;

/// On-disk texture record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureVariant {
    /// Compact records as found in `.tex` files.
    V1,
    /// Padded records with a swizzle flag, as found in `.tex2` files.
    V2,
}

impl TextureVariant {
    /// Directory extension used for streams of this variant.
    pub fn extension(self) -> &'static str {
        match self {
            Self::V1 => "tex",
            Self::V2 => "tex2",
        }
    }
}

/// Options for texture decoding.
#[derive(Debug, Clone, Default)]
pub struct TextureReadOptions {
    /// Restore linear order of 256-color palettes in v2 8-bit textures.
    pub deswizzle_palette: bool,
}

/// Textures decoded from one stream.
#[derive(Debug, Clone, Default)]
pub struct TextureStream {
    pub textures: Vec<TextureImage>,
    /// Raw pixel format tag that stopped decoding early, if any.
    pub unknown_format: Option<u32>,
}

fn read_palette(cursor: &mut Cursor<&[u8]>, size: u32) -> Result<Option<Vec<Rgba>>> {
    if size == 0 {
        return Ok(None);
    }
    if size % 4 != 0 {
        return Err(GhsError::Format(format!(
            "palette size {size} is not a multiple of 4"
        )));
    }
    let bytes = read_vec(cursor, size as usize)?;
    Ok(Some(
        bytes
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect(),
    ))
}

fn read_pixels(cursor: &mut Cursor<&[u8]>, size: u32, format: PixelFormat) -> Result<Vec<u8>> {
    let raw = read_vec(cursor, size as usize)?;
    Ok(match format {
        PixelFormat::I4 => unpack_nibbles(&raw),
        PixelFormat::I8 => raw,
    })
}

/// Returns `true` if the cursor sits on the 16-byte `0xFF` trailer.
fn at_extra_data(cursor: &Cursor<&[u8]>) -> bool {
    let pos = cursor.position() as usize;
    let rest = cursor.get_ref().get(pos..).unwrap_or_default();
    rest.len() == EXTRA_DATA_LEN && rest.iter().all(|b| *b == 0xFF)
}

/// Read one v1 record.
///
/// Returns [`GhsError::ExtraData`] after consuming the 16-byte `0xFF`
/// trailer some streams end with.
pub fn read_texture_v1(cursor: &mut Cursor<&[u8]>) -> Result<TextureImage> {
    if at_extra_data(cursor) {
        skip(cursor, EXTRA_DATA_LEN)?;
        return Err(GhsError::ExtraData);
    }

    let pixel_format = PixelFormat::from_raw(read_u32(cursor, "pixel format")?)?;
    let palette_size = read_u32(cursor, "palette size")?;
    let _tex_index = read_u32(cursor, "texture index")?;
    let _unk1 = read_u16(cursor, "texture header")?;
    let _unk2 = read_u16(cursor, "texture header")?;

    let palette = read_palette(cursor, palette_size)?;

    let _unk3 = read_u16(cursor, "texture header")?;
    let _unk4 = read_u16(cursor, "texture header")?;
    let pixels_size = read_u32(cursor, "pixel data size")?;
    let tex_offset = read_u32(cursor, "texture offset")?;
    let width = read_u16(cursor, "width")?;
    let height = read_u16(cursor, "height")?;

    let pixels = read_pixels(cursor, pixels_size, pixel_format)?;

    TextureImage::new(
        width,
        height,
        pixels,
        palette,
        Some(pixel_format),
        tex_offset,
        true,
    )
}

/// Read one v2 record, deswizzling where the record asks for it.
pub fn read_texture_v2(
    cursor: &mut Cursor<&[u8]>,
    options: &TextureReadOptions,
) -> Result<TextureImage> {
    let pixel_format = PixelFormat::from_raw(read_u32(cursor, "pixel format")?)?;
    let palette_size = read_u32(cursor, "palette size")?;
    let _tex_index = read_u32(cursor, "texture index")?;
    let _unk1 = read_u16(cursor, "texture header")?;
    let _unk2 = read_u16(cursor, "texture header")?;
    skip(cursor, 128)?;

    let mut palette = read_palette(cursor, palette_size)?;
    skip(cursor, 32)?;

    let _last = read_u16(cursor, "texture header")?;
    let swizzled = read_u8(cursor, "swizzle flag")? != 0;
    let _unk3 = read_u8(cursor, "texture header")?;
    let pixels_size = read_u32(cursor, "pixel data size")?;
    let tex_offset = read_u32(cursor, "texture offset")?;
    let width = read_u16(cursor, "width")?;
    let height = read_u16(cursor, "height")?;
    skip(cursor, 128)?;

    let mut pixels = read_pixels(cursor, pixels_size, pixel_format)?;
    skip(cursor, 32)?;

    match pixel_format {
        PixelFormat::I4 if swizzled => pixels = deswizzle_pixels(&pixels)?,
        PixelFormat::I8 if options.deswizzle_palette => {
            if let Some(colors) = palette
                .as_mut()
                .filter(|p| p.len() == SWIZZLED_PALETTE_COLORS)
            {
                deswizzle_palette(colors);
            }
        }
        _ => {}
    }

    TextureImage::new(
        width,
        height,
        pixels,
        palette,
        Some(pixel_format),
        tex_offset,
        true,
    )
}

/// Read one record of the given layout.
pub fn read_texture(
    cursor: &mut Cursor<&[u8]>,
    variant: TextureVariant,
    options: &TextureReadOptions,
) -> Result<TextureImage> {
    match variant {
        TextureVariant::V1 => read_texture_v1(cursor),
        TextureVariant::V2 => read_texture_v2(cursor, options),
    }
}

/// Read records until the end of `data`.
///
/// An unknown pixel format ends the stream early and is reported in
/// [`TextureStream::unknown_format`]; the `0xFF` trailer ends it silently.
/// Any other decoding error is returned.
pub fn read_all(
    data: &[u8],
    variant: TextureVariant,
    options: &TextureReadOptions,
) -> Result<TextureStream> {
    let mut cursor = Cursor::new(data);
    let mut stream = TextureStream::default();
    while !is_eof(&cursor) {
        match read_texture(&mut cursor, variant, options) {
            Ok(texture) => stream.textures.push(texture),
            Err(GhsError::ExtraData) => break,
            Err(GhsError::UnknownPixelFormat(raw)) => {
                stream.unknown_format = Some(raw);
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(stream)
}
