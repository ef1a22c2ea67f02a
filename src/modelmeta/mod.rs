//! Model metadata extraction.
//!
//! Bone hierarchies, default body parts and animation keyframes are not in
//! `FILE.STM` but in tables inside the game executable. Each model's tables
//! are written out as a `.ghs` JSON file, next to the unpacked files of the
//! model they describe:
//!
//! ```json
//! {"bone_parenting_info": [{"parent": null, "unk1": 0, "unk2": 0.0, ...}],
//!  "default_body_parts": [{"pm2": 3, "unk": 0}],
//!  "animations": [{"anim_len": 30, "animation_data": [[{"keyframe_start": 0.0, ...}]]}]}
//! ```
//!
//! Only the EU executable is supported.

pub mod executable;
pub mod outloc;

use std::fs;
use std::io;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;

use crate::error::{GhsError, Result};

pub use executable::{Executable, MODELMETA_COUNT, MODELMETA_START};
pub use outloc::{output_location, OutputLocation, UNMATCHED_DIR};

/// EU executable file name.
pub const EU_EXECUTABLE: &str = "SLES_519.33";
/// JP executable file name.
pub const JP_EXECUTABLE: &str = "SLPM_653.24";

/// Release an executable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameVersion {
    Eu,
    Jp,
}

impl GameVersion {
    /// Identify the release from an executable's file name (case-insensitive).
    pub fn from_file_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            EU_EXECUTABLE => Ok(Self::Eu),
            JP_EXECUTABLE => Ok(Self::Jp),
            _ => Err(GhsError::UnsupportedExecutable(format!(
                "unknown executable filename {name:?}, expecting '{EU_EXECUTABLE}' or '{JP_EXECUTABLE}'"
            ))),
        }
    }

    /// Fail unless model metadata can be read from this release.
    pub fn ensure_supported(self) -> Result<()> {
        match self {
            Self::Eu => Ok(()),
            Self::Jp => Err(GhsError::UnsupportedExecutable(
                "the Japanese version is not supported yet, please use the European version"
                    .into(),
            )),
        }
    }

    /// Output directory shared with `unpack-stm`.
    pub fn default_dir(self) -> &'static str {
        match self {
            Self::Eu => "GHS_EU_FILE_STM",
            Self::Jp => "GHS_JP_FILE_STM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneParent {
    pub parent: Option<i16>,
    pub unk1: i16,
    pub unk2: f64,
    pub unk3: f64,
    pub unk4: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPart {
    pub pm2: Option<i16>,
    pub unk: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub keyframe_start: f64,
    pub boneidx_unused: u8,
    pub pm2: Option<i8>,
    pub interp_type: i8,
    pub unknown: u8,
    pub interp_start: f64,
    pub interp_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub anim_len: i32,
    /// One keyframe list per bone.
    pub animation_data: Vec<Vec<Keyframe>>,
}

/// Metadata of one model, as written to its `.ghs` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub bone_parenting_info: Vec<BoneParent>,
    pub default_body_parts: Vec<BodyPart>,
    pub animations: Vec<Animation>,
}

impl ModelMeta {
    pub fn num_bones(&self) -> usize {
        self.bone_parenting_info.len()
    }

    /// Single-line JSON with `", "` and `": "` separators.
    pub fn to_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        self.serialize(&mut ser)
            .map_err(|e| GhsError::Encode(e.to_string()))?;
        String::from_utf8(out).map_err(|e| GhsError::Encode(e.to_string()))
    }
}

/// Compact output with a space after every separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// One extracted `.ghs` file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetaFile {
    pub index: usize,
    pub stm_index: i32,
    pub location: OutputLocation,
    pub meta: ModelMeta,
}

/// Read the metadata of every model in an EU executable image.
pub fn extract_all(data: &[u8]) -> Result<Vec<ModelMetaFile>> {
    let exe = Executable::new(data);
    (0..MODELMETA_COUNT)
        .into_par_iter()
        .map(|index| {
            let stm_index = exe.stm_index(index)?;
            Ok(ModelMetaFile {
                index,
                stm_index,
                location: output_location(index, stm_index),
                meta: exe.model_meta(index)?,
            })
        })
        .collect()
}

/// Write extracted files below `dir`.
///
/// The unmatched directory is always created, even if it stays empty.
pub fn write_all(files: &[ModelMetaFile], dir: &Path) -> Result<()> {
    fs::create_dir_all(dir.join(UNMATCHED_DIR))?;
    for file in files {
        let out_dir = dir.join(file.location.dir());
        fs::create_dir_all(&out_dir)?;
        fs::write(out_dir.join(&file.location.file_name), file.meta.to_json()?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_version_from_file_name() {
        assert_eq!(GameVersion::from_file_name("SLES_519.33").unwrap(), GameVersion::Eu);
        assert_eq!(GameVersion::from_file_name("sles_519.33").unwrap(), GameVersion::Eu);
        assert_eq!(GameVersion::from_file_name("SLPM_653.24").unwrap(), GameVersion::Jp);
        assert!(matches!(
            GameVersion::from_file_name("main.elf"),
            Err(GhsError::UnsupportedExecutable(_))
        ));
        assert!(GameVersion::Eu.ensure_supported().is_ok());
        assert!(GameVersion::Jp.ensure_supported().is_err());
        assert_eq!(GameVersion::Eu.default_dir(), "GHS_EU_FILE_STM");
    }

    #[test]
    fn test_json_keys_and_nulls() {
        let meta = ModelMeta {
            bone_parenting_info: vec![BoneParent {
                parent: None,
                unk1: 2,
                unk2: 0.5,
                unk3: 0.0,
                unk4: -1.0,
            }],
            default_body_parts: vec![BodyPart { pm2: Some(4), unk: 0 }],
            animations: vec![Animation {
                anim_len: 30,
                animation_data: vec![vec![Keyframe {
                    keyframe_start: 999.0,
                    boneidx_unused: 0,
                    pm2: None,
                    interp_type: 1,
                    unknown: 0,
                    interp_start: 0.25,
                    interp_delta: 0.0,
                }]],
            }],
        };
        let json = meta.to_json().unwrap();
        assert!(json.starts_with(r#"{"bone_parenting_info": [{"parent": null, "unk1": 2, "unk2": 0.5"#));
        assert!(json.contains(r#", "default_body_parts": [{"pm2": 4, "unk": 0}], "#));
        assert!(json.contains(
            r#""animations": [{"anim_len": 30, "animation_data": [[{"keyframe_start": 999.0, "#
        ));
        assert!(!json.contains('\n'));

        let back: ModelMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
        assert_eq!(back.num_bones(), 1);
    }

    #[test]
    fn test_f32_values_widen_exactly() {
        let value = 0.1f32 as f64;
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "0.10000000149011612");
    }
}
