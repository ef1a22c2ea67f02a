//! Model metadata tables in the EU executable (`SLES_519.33`).
//!
//! The table at [`MODELMETA_START`] holds [`MODELMETA_COUNT`] records:
//!
//! | offset | type | field                          |
//! |--------|------|--------------------------------|
//! | 0x0    | u32  | pointer to bone parent records |
//! | 0x4    | u32  | pointer to default body parts  |
//! | 0x8    | u32  | pointer to animation list      |
//! | 0xC    | i32  | STM member index, or -1        |
//!
//! Pointers are PS2 addresses; a zero pointer means the list is absent.

use std::io::Cursor;

use crate::error::{GhsError, Result};
use crate::io::stream::{read_f32, read_i16, read_i32, read_i8, read_u32, read_u8};

use super::{Animation, BodyPart, BoneParent, Keyframe, ModelMeta};

/// File offset of the model metadata table.
pub const MODELMETA_START: usize = 0x1FF510;
/// Number of records in the model metadata table.
pub const MODELMETA_COUNT: usize = 0x45A;

const RECORD_SIZE: usize = 0x10;
const STM_INDEX_FIELD: usize = 0xC;

/// PS2 address of the first byte of the executable file.
const LOAD_DELTA: u32 = 0xFFF80;

/// Terminates the bone parent and animation lists.
const LIST_END: i32 = -1;

/// A keyframe starting at or after this frame is the last of its list.
const LAST_KEYFRAME_START: f32 = 999.0;

/// Convert a PS2 address to an offset into the executable file.
pub fn into_file_offset(pointer: u32) -> Result<usize> {
    pointer
        .checked_sub(LOAD_DELTA)
        .map(|offset| offset as usize)
        .ok_or_else(|| GhsError::Format(format!("pointer {pointer:#x} is below the load address")))
}

/// `-1` marks an absent index.
fn optional_index<T: PartialEq + From<i8>>(value: T) -> Option<T> {
    (value != T::from(-1)).then_some(value)
}

/// Read-only view of an executable image.
#[derive(Debug, Clone, Copy)]
pub struct Executable<'a> {
    data: &'a [u8],
}

impl<'a> Executable<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn cursor_at(&self, offset: usize) -> Result<Cursor<&'a [u8]>> {
        if offset > self.data.len() {
            return Err(GhsError::SizeMismatch {
                expected: offset as u64,
                actual: self.data.len() as u64,
            });
        }
        let mut cursor = Cursor::new(self.data);
        cursor.set_position(offset as u64);
        Ok(cursor)
    }

    fn record_field(&self, index: usize, field: usize) -> Result<Cursor<&'a [u8]>> {
        self.cursor_at(MODELMETA_START + RECORD_SIZE * index + field)
    }

    /// Follow the pointer stored in `field` of record `index`.
    fn follow(&self, index: usize, field: usize) -> Result<Option<Cursor<&'a [u8]>>> {
        let pointer = read_u32(&mut self.record_field(index, field)?, "model metadata pointer")?;
        self.follow_pointer(pointer)
    }

    fn follow_pointer(&self, pointer: u32) -> Result<Option<Cursor<&'a [u8]>>> {
        if pointer == 0 {
            return Ok(None);
        }
        self.cursor_at(into_file_offset(pointer)?).map(Some)
    }

    /// STM member index of model `index`, `-1` if none.
    pub fn stm_index(&self, index: usize) -> Result<i32> {
        read_i32(&mut self.record_field(index, STM_INDEX_FIELD)?, "STM index")
    }

    /// Bone parent records; their count is the model's bone count.
    pub fn bone_parents(&self, index: usize) -> Result<Vec<BoneParent>> {
        let Some(mut cursor) = self.follow(index, 0x0)? else {
            return Ok(Vec::new());
        };
        let mut bones = Vec::new();
        while read_i32(&mut cursor, "bone list sentinel")? != LIST_END {
            let parent = read_i16(&mut cursor, "bone parent")?;
            let unk1 = read_i16(&mut cursor, "bone parent")?;
            let unk2 = read_f32(&mut cursor, "bone parent")?;
            let unk3 = read_f32(&mut cursor, "bone parent")?;
            let unk4 = read_f32(&mut cursor, "bone parent")?;
            bones.push(BoneParent {
                parent: optional_index(parent),
                unk1,
                unk2: unk2 as f64,
                unk3: unk3 as f64,
                unk4: unk4 as f64,
            });
        }
        Ok(bones)
    }

    pub fn default_body_parts(&self, index: usize, num_bones: usize) -> Result<Vec<BodyPart>> {
        let Some(mut cursor) = self.follow(index, 0x4)? else {
            return Ok(Vec::new());
        };
        (0..num_bones)
            .map(|_| {
                let pm2 = read_i16(&mut cursor, "default body part")?;
                let unk = read_i16(&mut cursor, "default body part")?;
                Ok(BodyPart {
                    pm2: optional_index(pm2),
                    unk,
                })
            })
            .collect()
    }

    fn keyframes(&self, pointer: u32) -> Result<Vec<Keyframe>> {
        let Some(mut cursor) = self.follow_pointer(pointer)? else {
            return Ok(Vec::new());
        };
        let mut keyframes = Vec::new();
        loop {
            let keyframe_start = read_f32(&mut cursor, "keyframe")?;
            let boneidx_unused = read_u8(&mut cursor, "keyframe")?;
            let pm2 = read_i8(&mut cursor, "keyframe")?;
            let interp_type = read_i8(&mut cursor, "keyframe")?;
            let unknown = read_u8(&mut cursor, "keyframe")?;
            let interp_start = read_f32(&mut cursor, "keyframe")?;
            let interp_delta = read_f32(&mut cursor, "keyframe")?;
            keyframes.push(Keyframe {
                keyframe_start: keyframe_start as f64,
                boneidx_unused,
                pm2: optional_index(pm2),
                interp_type,
                unknown,
                interp_start: interp_start as f64,
                interp_delta: interp_delta as f64,
            });
            if keyframe_start >= LAST_KEYFRAME_START {
                return Ok(keyframes);
            }
        }
    }

    /// Animations; each holds one keyframe list per bone.
    pub fn animations(&self, index: usize, num_bones: usize) -> Result<Vec<Animation>> {
        let Some(mut cursor) = self.follow(index, 0x8)? else {
            return Ok(Vec::new());
        };
        let mut animations = Vec::new();
        loop {
            let anim_len = read_i32(&mut cursor, "animation length")?;
            if anim_len == LIST_END {
                return Ok(animations);
            }
            let bones_pointer = read_u32(&mut cursor, "animation body parts")?;
            let mut animation_data = Vec::new();
            if let Some(mut bones) = self.follow_pointer(bones_pointer)? {
                for _ in 0..num_bones {
                    let _unk = read_i32(&mut bones, "animation body part")?;
                    let keyframes_pointer = read_u32(&mut bones, "animation body part")?;
                    animation_data.push(self.keyframes(keyframes_pointer)?);
                }
            }
            animations.push(Animation {
                anim_len,
                animation_data,
            });
        }
    }

    /// All metadata of model `index`.
    pub fn model_meta(&self, index: usize) -> Result<ModelMeta> {
        let bone_parenting_info = self.bone_parents(index)?;
        let num_bones = bone_parenting_info.len();
        Ok(ModelMeta {
            default_body_parts: self.default_body_parts(index, num_bones)?,
            animations: self.animations(index, num_bones)?,
            bone_parenting_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_file_offset() {
        assert_eq!(into_file_offset(0xFFF80).unwrap(), 0);
        assert_eq!(into_file_offset(0x2FF490).unwrap(), 0x1FF510);
        assert!(into_file_offset(0x100).is_err());
    }

    #[test]
    fn test_optional_index() {
        assert_eq!(optional_index(-1i16), None);
        assert_eq!(optional_index(3i16), Some(3));
        assert_eq!(optional_index(-1i8), None);
        assert_eq!(optional_index(-2i8), Some(-2));
    }

    #[test]
    fn test_record_out_of_range() {
        let exe = Executable::new(&[0u8; 64]);
        assert!(exe.stm_index(0).is_err());
        assert!(exe.bone_parents(0).is_err());
    }
}
