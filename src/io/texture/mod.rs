//! Texture streams (`.tex` and `.tex2`).
//!
//! | Variant | Header padding | Swizzle |
//! |---------|----------------|---------|
//! | v1      | none           | never   |
//! | v2      | 128/32 bytes around palette and pixels | 4-bit pixels, flagged per record |

pub mod reader;
pub mod sniff;
pub mod swizzle;

pub use reader::{
    read_all, read_texture, read_texture_v1, read_texture_v2, TextureReadOptions, TextureStream,
    TextureVariant,
};
pub use sniff::{quickcheck_tex, quickcheck_tex2};
pub use swizzle::{deswizzle_palette, deswizzle_pixels};
