//! Decoded texture images.
//!
//! Stores one indexed-color texture read from a texture stream, and renders
//! it to an RGBA buffer or PNG file.

use std::io::{Cursor, Seek, Write};

use image::{ImageFormat, RgbaImage};

use crate::error::{GhsError, Result};
use crate::types::Rgba;

/// Pixel storage format of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8 bits per pixel, one palette index each.
    I8,
    /// 4 bits per pixel, two palette indices per byte (low nibble first).
    I4,
}

impl PixelFormat {
    /// Raw on-disk tag for 4-bit indexed textures.
    pub const RAW_I4: u32 = 8;
    /// Raw on-disk tag for 8-bit indexed textures.
    pub const RAW_I8: u32 = 9;

    /// Map a raw on-disk tag to a format.
    pub fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            Self::RAW_I4 => Ok(Self::I4),
            Self::RAW_I8 => Ok(Self::I8),
            _ => Err(GhsError::UnknownPixelFormat(raw)),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::I4 => Self::RAW_I4,
            Self::I8 => Self::RAW_I8,
        }
    }

    /// Pick a format for a palette of `palette_len` colors: up to 16 colors
    /// (with an even width) fit in 4 bits, anything else needs 8.
    pub fn infer(palette_len: usize, width: u16) -> Self {
        if palette_len <= 16 && width % 2 == 0 {
            Self::I4
        } else {
            Self::I8
        }
    }
}

/// Unpack 4-bit indices, low nibble first: `0x21` yields `1, 2`.
pub fn unpack_nibbles(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|b| [b & 0x0F, b >> 4]).collect()
}

/// One decoded texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u16,
    pub height: u16,
    /// Palette as stored, alpha in the range described by `alpha128`.
    pub palette: Option<Vec<Rgba>>,
    /// One palette index per pixel, row-major.
    pub pixels: Vec<u8>,
    pub pixel_format: PixelFormat,
    /// Source offset field from the texture header, kept for naming output.
    pub tex_offset: u32,
    /// `true` if alpha values are stored in the PS2 0-128 range.
    pub alpha128: bool,
}

impl TextureImage {
    /// Create a texture, inferring the pixel format from the palette when
    /// `pixel_format` is `None`.
    pub fn new(
        width: u16,
        height: u16,
        pixels: Vec<u8>,
        palette: Option<Vec<Rgba>>,
        pixel_format: Option<PixelFormat>,
        tex_offset: u32,
        alpha128: bool,
    ) -> Result<Self> {
        let pixel_format = pixel_format.unwrap_or_else(|| {
            PixelFormat::infer(palette.as_ref().map_or(usize::MAX, Vec::len), width)
        });
        if pixel_format == PixelFormat::I4 && width % 2 != 0 {
            return Err(GhsError::Format(format!(
                "Pixel format i4 requires an even-numbered width, width={width}"
            )));
        }
        Ok(Self {
            width,
            height,
            palette,
            pixels,
            pixel_format,
            tex_offset,
            alpha128,
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Palette with 255-based alpha.
    pub fn palette255(&self) -> Option<Vec<Rgba>> {
        let palette = self.palette.as_ref()?;
        if self.alpha128 {
            Some(palette.iter().map(|c| c.to_alpha255()).collect())
        } else {
            Some(palette.clone())
        }
    }

    /// Render to a row-major RGBA8 buffer of `width * height * 4` bytes.
    ///
    /// Extra pixels beyond `width * height` are ignored.
    pub fn to_rgba8(&self) -> Result<Vec<u8>> {
        let count = self.pixel_count();
        if self.pixels.len() < count {
            return Err(GhsError::SizeMismatch {
                expected: count as u64,
                actual: self.pixels.len() as u64,
            });
        }

        let mut out = Vec::with_capacity(count * 4);
        match self.palette255() {
            Some(palette) => {
                for &index in &self.pixels[..count] {
                    let color = palette.get(index as usize).ok_or_else(|| {
                        GhsError::Format(format!(
                            "palette index {index} out of range ({} colors)",
                            palette.len()
                        ))
                    })?;
                    out.extend_from_slice(&color.to_array());
                }
            }
            None => {
                let scale = match self.pixel_format {
                    PixelFormat::I4 => 17,
                    PixelFormat::I8 => 1,
                };
                for &index in &self.pixels[..count] {
                    out.extend_from_slice(&Rgba::grey(index.saturating_mul(scale)).to_array());
                }
            }
        }
        Ok(out)
    }

    /// Render to an [`RgbaImage`].
    pub fn to_image(&self) -> Result<RgbaImage> {
        let rgba = self.to_rgba8()?;
        RgbaImage::from_raw(self.width as u32, self.height as u32, rgba)
            .ok_or_else(|| GhsError::Encode("RGBA buffer does not match image size".into()))
    }

    /// Encode as PNG into `writer`.
    pub fn write_png<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        self.to_image()?.write_to(writer, ImageFormat::Png)?;
        Ok(())
    }

    /// Encode as PNG into a new buffer.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_png(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_color_palette() -> Vec<Rgba> {
        vec![Rgba::new(0, 0, 0, 0), Rgba::new(255, 0, 0, 0x80)]
    }

    #[test]
    fn test_pixel_format_from_raw() {
        assert_eq!(PixelFormat::from_raw(8).unwrap(), PixelFormat::I4);
        assert_eq!(PixelFormat::from_raw(9).unwrap(), PixelFormat::I8);
        assert!(matches!(
            PixelFormat::from_raw(0x13),
            Err(GhsError::UnknownPixelFormat(0x13))
        ));
        assert_eq!(PixelFormat::I8.raw(), 9);
    }

    #[test]
    fn test_unpack_nibbles_low_first() {
        assert_eq!(unpack_nibbles(&[0x21]), vec![1, 2]);
        assert_eq!(unpack_nibbles(&[0x21, 0x43, 0x65]), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_infer_format() {
        let t = TextureImage::new(2, 1, vec![0, 1], Some(two_color_palette()), None, 0, true)
            .unwrap();
        assert_eq!(t.pixel_format, PixelFormat::I4);

        let t = TextureImage::new(3, 1, vec![0, 1, 1], Some(two_color_palette()), None, 0, true)
            .unwrap();
        assert_eq!(t.pixel_format, PixelFormat::I8);

        let big = vec![Rgba::default(); 17];
        let t = TextureImage::new(2, 1, vec![0, 1], Some(big), None, 0, true).unwrap();
        assert_eq!(t.pixel_format, PixelFormat::I8);
    }

    #[test]
    fn test_i4_requires_even_width() {
        let err = TextureImage::new(3, 1, vec![0; 3], None, Some(PixelFormat::I4), 0, true);
        assert!(matches!(err, Err(GhsError::Format(_))));
    }

    #[test]
    fn test_render_rescales_alpha() {
        let t = TextureImage::new(
            2,
            1,
            vec![1, 0],
            Some(two_color_palette()),
            Some(PixelFormat::I4),
            0,
            true,
        )
        .unwrap();
        assert_eq!(t.to_rgba8().unwrap(), vec![255, 0, 0, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_render_full_range_alpha_passthrough() {
        let t = TextureImage::new(
            1,
            1,
            vec![1],
            Some(two_color_palette()),
            Some(PixelFormat::I8),
            0,
            false,
        )
        .unwrap();
        assert_eq!(t.to_rgba8().unwrap(), vec![255, 0, 0, 0x80]);
    }

    #[test]
    fn test_render_errors() {
        let t = TextureImage::new(2, 2, vec![0, 1], Some(two_color_palette()), None, 0, true)
            .unwrap();
        assert!(matches!(t.to_rgba8(), Err(GhsError::SizeMismatch { .. })));

        let t = TextureImage::new(1, 1, vec![5], Some(two_color_palette()), Some(PixelFormat::I8), 0, true)
            .unwrap();
        assert!(matches!(t.to_rgba8(), Err(GhsError::Format(_))));
    }

    #[test]
    fn test_render_without_palette_is_grey() {
        let t = TextureImage::new(2, 1, vec![0, 15], None, Some(PixelFormat::I4), 0, true).unwrap();
        assert_eq!(t.to_rgba8().unwrap(), vec![0, 0, 0, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_png_signature() {
        let t = TextureImage::new(2, 1, vec![1, 0], Some(two_color_palette()), None, 0x40, true)
            .unwrap();
        let png = t.to_png_bytes().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
