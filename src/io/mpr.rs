//! `.MPR` mesh position/rotation animation files.
//!
//! Layout: `u32 bone_count`, one u32 offset per bone (unused here), then per
//! bone a `u16 frame_count, u8 pad, u8 is_float` header followed by
//! `frame_count` frame records of 24 bytes (float) or 12 bytes (fixed).
//!
//! Only detection is implemented; the files are dumped as-is.

use nom::bytes::complete::take;
use nom::number::complete::{le_u16, le_u32, le_u8};
use nom::IResult;

const FLOAT_FRAME_SIZE: usize = 24;
const FIXED_FRAME_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoneHeader {
    frame_count: u16,
    is_float: bool,
}

fn bone_header(input: &[u8]) -> IResult<&[u8], BoneHeader> {
    let (input, frame_count) = le_u16(input)?;
    let (input, _) = le_u8(input)?;
    let (input, is_float) = le_u8(input)?;
    Ok((
        input,
        BoneHeader {
            frame_count,
            is_float: is_float != 0,
        },
    ))
}

/// Walk the bone blocks, choosing each frame size with `frame_size`.
fn bones<'a>(
    data: &'a [u8],
    frame_size: &dyn Fn(BoneHeader) -> Option<usize>,
) -> IResult<&'a [u8], ()> {
    let (input, bone_count) = le_u32(data)?;
    let (mut input, _) = take((bone_count as usize).saturating_mul(4))(input)?;
    for _ in 0..bone_count {
        let (rest, bone) = bone_header(input)?;
        let Some(size) = frame_size(bone) else {
            return Err(nom::Err::Error(nom::error::Error::new(
                rest,
                nom::error::ErrorKind::Verify,
            )));
        };
        let (rest, _) = take((bone.frame_count as usize) * size)(rest)?;
        input = rest;
    }
    Ok((input, ()))
}

/// Returns `false` as soon as `frame_size` rejects a bone, data runs out,
/// or bytes are left over after the last bone.
fn walk(data: &[u8], frame_size: impl Fn(BoneHeader) -> Option<usize>) -> bool {
    matches!(bones(data, &frame_size), Ok((rest, ())) if rest.is_empty())
}

/// Quickly check whether `data` is (very likely) an MPR file.
pub fn quickcheck(data: &[u8]) -> bool {
    walk(data, |bone| {
        Some(if bone.is_float {
            FLOAT_FRAME_SIZE
        } else {
            FIXED_FRAME_SIZE
        })
    })
}

/// Detect MPR files whose bones leave `is_float` unset yet store 24-byte
/// float frames anyway.
pub fn quickcheck_forced_float(data: &[u8]) -> bool {
    walk(data, |bone| {
        if bone.is_float {
            None
        } else {
            Some(FLOAT_FRAME_SIZE)
        }
    })
}
