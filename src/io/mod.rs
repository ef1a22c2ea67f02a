//! Readers for the game's binary formats.
//!
//! Decoders take `&[u8]` or `Cursor<&[u8]>` input and never touch the
//! filesystem; sniffers take slices and return `bool`.

pub mod compression;
pub mod container;
pub mod mpr;
pub mod stream;
pub mod texture;

pub use compression::{Compressor, Decompressor};
pub use container::{MapContainer, StmContainer};
pub use texture::{TextureReadOptions, TextureVariant};
