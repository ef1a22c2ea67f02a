//! Palette color representation

use std::fmt;

/// Full-range alpha value an opaque half-range alpha (`0x80`) maps to.
pub const ALPHA_OPAQUE: u8 = 0xFF;

/// Opaque value of the PS2 half-range alpha channel.
pub const ALPHA128_OPAQUE: u8 = 0x80;

/// Rescale a half-range (0-128) alpha to full range (0-255).
///
/// Computes `floor(a / 128 * 255)`; values above 128 saturate at 255.
pub const fn alpha128_to_255(alpha: u8) -> u8 {
    let scaled = alpha as u32 * ALPHA_OPAQUE as u32 / ALPHA128_OPAQUE as u32;
    if scaled > ALPHA_OPAQUE as u32 {
        ALPHA_OPAQUE
    } else {
        scaled as u8
    }
}

/// An RGBA palette entry as stored on disk.
///
/// Whether `a` is half-range or full-range is a property of the texture
/// that owns the palette, not of the entry itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey level, used for indices rendered without a palette.
    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level, ALPHA_OPAQUE)
    }

    /// Same color with its alpha rescaled from half range.
    pub const fn to_alpha255(self) -> Self {
        Self::new(self.r, self.g, self.b, alpha128_to_255(self.a))
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}
