//! Recursive unpacking of `FILE.STM`.
//!
//! The [`Unpacker`] walks a top-level STM container, classifies every member
//! (see [`classify`]) and descends into nested containers, compressed
//! members and texture streams. The result is an in-memory [`UnpackNode`]
//! tree that [`writer`] puts on disk.
//!
//! | Member                    | Output                                  |
//! |---------------------------|-----------------------------------------|
//! | nested STM                | `{i}.stm/`, `{i}.sli.stm/`              |
//! | MAP / MAPX                | `{i}.map/`, `{i}.mapx/`                 |
//! | texture stream            | `{i}[.sli].tex[2]/{j}_{offset}.png`     |
//! | PM2 / ATR / SDW / MPR     | `{i}.pm2`, `{i}.atr`, `{i}.sdw`, `{i}.mpr` |
//! | anything else             | `{i}[.sli].000`, `.fff` or `.dat`       |
//!
//! Indices are 3-digit lowercase hex.

pub mod classify;
pub mod node;
pub mod writer;

use std::fmt;

use crate::error::{GhsError, Result};
use crate::io::compression::slid;
use crate::io::container::{stm, MapContainer, StmContainer};
use crate::io::texture::{read_all, TextureReadOptions, TextureVariant};
use crate::notification::{NotificationCollection, NotificationType};

pub use classify::{
    classify_decompressed, classify_map_member, classify_member, classify_member_forced_float,
    fallback_kind, BlobKind, MemberKind,
};
pub use node::{NodeKind, UnpackNode};
pub use writer::{write_result, write_tree};

/// Number of members in the EU release's `FILE.STM`.
pub const EU_ENTRY_COUNT: usize = 300;
/// Number of members in the JP release's `FILE.STM`.
pub const JP_ENTRY_COUNT: usize = 212;

/// Output directory name for a `FILE.STM` with `entry_count` members.
pub fn default_root_dir(entry_count: usize) -> &'static str {
    match entry_count {
        EU_ENTRY_COUNT => "GHS_EU_FILE_STM",
        JP_ENTRY_COUNT => "GHS_JP_FILE_STM",
        _ => "GHS_UNK_FILE_STM",
    }
}

fn sli_suffix(from_sli: bool) -> &'static str {
    if from_sli {
        ".sli"
    } else {
        ""
    }
}

/// Output name of a raw member.
pub fn blob_name(index: usize, from_sli: bool, kind: BlobKind) -> String {
    format!("{index:03x}{}.{}", sli_suffix(from_sli), kind.extension())
}

/// Output name of one texture of a texture stream.
pub fn texture_file_name(index: usize, tex_offset: u32) -> String {
    format!("{index:03x}_{tex_offset:#05x}.png")
}

/// Stage of the walk a failed branch was in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compression,
    Container,
    Texture,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compression => write!(f, "compression"),
            Self::Container => write!(f, "container"),
            Self::Texture => write!(f, "texture"),
        }
    }
}

/// Configuration options for the unpacker.
#[derive(Debug, Clone)]
pub struct UnpackConfiguration {
    /// When `true`, a member that fails to decode is reported as an error
    /// notification and skipped; otherwise the first failure aborts.
    ///
    /// Default: `true`.
    pub failsafe: bool,

    /// Restore linear palette order in 8-bit v2 textures.
    ///
    /// Default: `false`.
    pub deswizzle_palette: bool,

    /// Write unrecognized members that parse as MPR with 24-byte frames
    /// behind a clear float flag as `.mpr`, with a warning.
    ///
    /// Default: `false`.
    pub forced_float_mpr: bool,
}

impl Default for UnpackConfiguration {
    fn default() -> Self {
        Self {
            failsafe: true,
            deswizzle_palette: false,
            forced_float_mpr: false,
        }
    }
}

/// Output of [`Unpacker::unpack`].
#[derive(Debug, Clone)]
pub struct UnpackResult {
    /// Root directory, named after the detected game version.
    pub root: UnpackNode,
    /// Number of members in the top-level container.
    pub entry_count: usize,
    pub notifications: NotificationCollection,
}

/// Walks an STM container tree.
#[derive(Debug, Default)]
pub struct Unpacker {
    config: UnpackConfiguration,
    notifications: NotificationCollection,
    /// Names of the directories above the member being processed.
    path: Vec<String>,
}

impl Unpacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: UnpackConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &UnpackConfiguration {
        &self.config
    }

    /// Unpack a top-level STM container.
    pub fn unpack(mut self, data: &[u8]) -> Result<UnpackResult> {
        if !stm::quickcheck(data) {
            return Err(GhsError::Format("not a valid STM container".into()));
        }
        let container = StmContainer::from_bytes(data)?;
        let entry_count = container.len();
        let children = self.unpack_stm_members(&container)?;
        Ok(UnpackResult {
            root: UnpackNode::directory(default_root_dir(entry_count), children),
            entry_count,
            notifications: self.notifications,
        })
    }

    fn display_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path.join("/"), name)
        }
    }

    fn branch_failed(
        &mut self,
        stage: Stage,
        name: &str,
        err: GhsError,
    ) -> Result<Option<UnpackNode>> {
        if !self.config.failsafe {
            return Err(err);
        }
        let path = self.display_path(name);
        self.notifications.notify(
            NotificationType::Error,
            format!("{stage} failed at {path}: {err}"),
        );
        Ok(None)
    }

    fn unpack_stm_members(&mut self, container: &StmContainer) -> Result<Vec<UnpackNode>> {
        let mut nodes = Vec::with_capacity(container.len());
        for (index, data) in container.iter().enumerate() {
            let kind = if self.config.forced_float_mpr {
                classify_member_forced_float(data)
            } else {
                classify_member(data)
            };
            nodes.extend(self.unpack_member(index, data, kind, false)?);
        }
        Ok(nodes)
    }

    fn unpack_member(
        &mut self,
        index: usize,
        data: &[u8],
        kind: MemberKind,
        from_sli: bool,
    ) -> Result<Option<UnpackNode>> {
        match kind {
            MemberKind::Compressed => self.unpack_compressed(index, data),
            MemberKind::Map => self.unpack_map(index, data, false),
            MemberKind::Mapx => self.unpack_map(index, data, true),
            MemberKind::Stm => self.unpack_stm(index, data, from_sli),
            MemberKind::Texture(variant) => self.unpack_textures(index, data, variant, from_sli),
            MemberKind::MprForcedFloat => {
                let name = blob_name(index, from_sli, BlobKind::Mpr);
                let path = self.display_path(&name);
                self.notifications.notify(
                    NotificationType::Warning,
                    format!("{path}: MPR bones store float frames without the float flag"),
                );
                Ok(Some(UnpackNode::file(name, data.to_vec())))
            }
            MemberKind::Blob(kind) => Ok(Some(UnpackNode::file(
                blob_name(index, from_sli, kind),
                data.to_vec(),
            ))),
        }
    }

    fn unpack_compressed(&mut self, index: usize, data: &[u8]) -> Result<Option<UnpackNode>> {
        let decompressed = match slid::decompress(data) {
            Ok(d) => d,
            Err(e) => return self.branch_failed(Stage::Compression, &format!("{index:03x}.sli"), e),
        };
        let kind = classify_decompressed(&decompressed);
        self.unpack_member(index, &decompressed, kind, true)
    }

    fn unpack_stm(&mut self, index: usize, data: &[u8], from_sli: bool) -> Result<Option<UnpackNode>> {
        let name = format!("{index:03x}{}.stm", sli_suffix(from_sli));
        let container = match StmContainer::from_bytes(data) {
            Ok(c) => c,
            Err(e) => return self.branch_failed(Stage::Container, &name, e),
        };
        self.path.push(name.clone());
        let children = self.unpack_stm_members(&container);
        self.path.pop();
        Ok(Some(UnpackNode::directory(name, children?)))
    }

    fn unpack_map(&mut self, index: usize, data: &[u8], mapx: bool) -> Result<Option<UnpackNode>> {
        let (name, container) = if mapx {
            (format!("{index:03x}.mapx"), MapContainer::from_mapx_bytes(data))
        } else {
            (format!("{index:03x}.map"), MapContainer::from_bytes(data))
        };
        let container = match container {
            Ok(c) => c,
            Err(e) => return self.branch_failed(Stage::Container, &name, e),
        };
        let children = container
            .into_vec()
            .into_iter()
            .enumerate()
            .map(|(i, member)| {
                let kind = classify_map_member(&member, mapx);
                UnpackNode::file(blob_name(i, false, kind), member)
            })
            .collect();
        Ok(Some(UnpackNode::directory(name, children)))
    }

    fn unpack_textures(
        &mut self,
        index: usize,
        data: &[u8],
        variant: TextureVariant,
        from_sli: bool,
    ) -> Result<Option<UnpackNode>> {
        let name = format!("{index:03x}{}.{}", sli_suffix(from_sli), variant.extension());
        let options = TextureReadOptions {
            deswizzle_palette: self.config.deswizzle_palette,
        };
        let stream = match read_all(data, variant, &options) {
            Ok(s) => s,
            Err(e) => return self.branch_failed(Stage::Texture, &name, e),
        };
        if let Some(raw) = stream.unknown_format {
            let path = self.display_path(&name);
            self.notifications.notify(
                NotificationType::NotImplemented,
                format!(
                    "{path}: unknown pixel format {raw:#010x}, skipped the rest of the stream"
                ),
            );
        }

        let mut files = Vec::with_capacity(stream.textures.len());
        for (j, texture) in stream.textures.iter().enumerate() {
            match texture.to_png_bytes() {
                Ok(png) => files.push(UnpackNode::file(
                    texture_file_name(j, texture.tex_offset),
                    png,
                )),
                Err(e) => return self.branch_failed(Stage::Texture, &name, e),
            }
        }
        Ok(Some(UnpackNode::directory(name, files)))
    }
}
