//! Small value types shared across the decoders.

pub mod color;

pub use color::{alpha128_to_255, Rgba};
