//! # ghstools
//!
//! Readers for the asset archives of the PlayStation 2 game
//! *Gregory Horror Show*.
//!
//! The game keeps nearly all of its data in one `FILE.STM` container whose
//! members are further containers, `SLID`-compressed blocks, texture
//! streams and model blobs. This crate decodes all of them and can unpack
//! the whole tree into a directory of plain files and PNG images.
//!
//! ## Features
//!
//! - `SLID` LZSS decompression (and a matching compressor)
//! - STM, MAP and MAPX container decoding
//! - Texture decoding (4-bit and 8-bit indexed, PS2 swizzle reversal) to PNG
//! - Format sniffers for every member type
//! - Model metadata extraction from the EU executable to JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ghstools::unpack::{write_result, Unpacker};
//!
//! let data = std::fs::read("FILE.STM")?;
//! let result = Unpacker::new().unpack(&data)?;
//! for n in result.notifications.iter() {
//!     eprintln!("{n}");
//! }
//! write_result(&result, std::path::Path::new(&result.root.name))?;
//! # Ok::<(), ghstools::GhsError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`io`] - format decoders over in-memory buffers; no filesystem access
//! - [`texture`] - decoded texture model and PNG rendering
//! - [`unpack`] - member classification and the recursive unpack driver
//! - [`modelmeta`] - executable table reader and `.ghs` JSON writer

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod io;
pub mod modelmeta;
pub mod notification;
pub mod texture;
pub mod types;
pub mod unpack;

// Re-export commonly used types
pub use error::{GhsError, Result};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use texture::{PixelFormat, TextureImage};
pub use types::Rgba;
pub use unpack::{UnpackConfiguration, UnpackNode, UnpackResult, Unpacker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
