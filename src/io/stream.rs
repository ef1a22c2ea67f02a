//! Little-endian cursor helpers shared by the format decoders.
//!
//! Decoders read from a `Cursor<&[u8]>` and advance it past exactly what they
//! consume. Short reads are reported as [`GhsError::Format`] (for header and
//! table fields) or [`GhsError::SizeMismatch`] (for declared data blocks)
//! instead of surfacing as raw I/O errors.

use std::io::{self, Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{GhsError, Result};

/// Number of bytes left after the cursor position.
pub fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    let len = cursor.get_ref().len() as u64;
    len.saturating_sub(cursor.position()) as usize
}

/// Returns `true` if the cursor sits exactly at (or past) the end of its data.
pub fn is_eof(cursor: &Cursor<&[u8]>) -> bool {
    remaining(cursor) == 0
}

fn truncated(what: &'static str) -> impl Fn(io::Error) -> GhsError {
    move |_| GhsError::Format(format!("truncated {what}"))
}

pub fn read_u8(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<u8> {
    cursor.read_u8().map_err(truncated(what))
}

pub fn read_u16(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<u16> {
    cursor.read_u16::<LittleEndian>().map_err(truncated(what))
}

pub fn read_u32(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<u32> {
    cursor.read_u32::<LittleEndian>().map_err(truncated(what))
}

pub fn read_i8(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<i8> {
    cursor.read_i8().map_err(truncated(what))
}

pub fn read_i16(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<i16> {
    cursor.read_i16::<LittleEndian>().map_err(truncated(what))
}

pub fn read_i32(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<i32> {
    cursor.read_i32::<LittleEndian>().map_err(truncated(what))
}

pub fn read_f32(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<f32> {
    cursor.read_f32::<LittleEndian>().map_err(truncated(what))
}

/// Read exactly `len` bytes into a new buffer.
pub fn read_vec(cursor: &mut Cursor<&[u8]>, len: usize) -> Result<Vec<u8>> {
    let available = remaining(cursor);
    if available < len {
        return Err(GhsError::SizeMismatch {
            expected: len as u64,
            actual: available as u64,
        });
    }
    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf)?;
    Ok(buf)
}

/// Advance the cursor by `len` bytes without interpreting them.
pub fn skip(cursor: &mut Cursor<&[u8]>, len: usize) -> Result<()> {
    let available = remaining(cursor);
    if available < len {
        return Err(GhsError::SizeMismatch {
            expected: len as u64,
            actual: available as u64,
        });
    }
    cursor.set_position(cursor.position() + len as u64);
    Ok(())
}

/// Copy `data[offset .. offset + size]` into an owned buffer.
pub fn slice_owned(data: &[u8], offset: usize, size: usize) -> Result<Vec<u8>> {
    let end = offset
        .checked_add(size)
        .filter(|end| *end <= data.len())
        .ok_or(GhsError::SizeMismatch {
            expected: (offset as u64).saturating_add(size as u64),
            actual: data.len() as u64,
        })?;
    Ok(data[offset..end].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_and_eof() {
        let data = [1u8, 2, 3];
        let mut c = Cursor::new(&data[..]);
        assert_eq!(remaining(&c), 3);
        assert!(!is_eof(&c));
        c.set_position(3);
        assert!(is_eof(&c));
        c.set_position(10);
        assert_eq!(remaining(&c), 0);
    }

    #[test]
    fn test_read_u32_truncated_is_format_error() {
        let data = [1u8, 2];
        let mut c = Cursor::new(&data[..]);
        let err = read_u32(&mut c, "palette size").unwrap_err();
        assert!(matches!(err, GhsError::Format(ref m) if m.contains("palette size")));
    }

    #[test]
    fn test_signed_and_float_reads() {
        let mut data = Vec::new();
        data.push(0xFF);
        data.extend_from_slice(&(-2i16).to_le_bytes());
        data.extend_from_slice(&(-1i32).to_le_bytes());
        data.extend_from_slice(&999.0f32.to_le_bytes());
        let mut c = Cursor::new(data.as_slice());
        assert_eq!(read_i8(&mut c, "a").unwrap(), -1);
        assert_eq!(read_i16(&mut c, "b").unwrap(), -2);
        assert_eq!(read_i32(&mut c, "c").unwrap(), -1);
        assert_eq!(read_f32(&mut c, "d").unwrap(), 999.0);
        assert!(read_i8(&mut c, "e").is_err());
    }

    #[test]
    fn test_read_vec_and_skip() {
        let data = [0xAAu8, 0xBB, 0xCC, 0xDD];
        let mut c = Cursor::new(&data[..]);
        skip(&mut c, 1).unwrap();
        assert_eq!(read_vec(&mut c, 2).unwrap(), vec![0xBB, 0xCC]);
        assert!(matches!(
            read_vec(&mut c, 2),
            Err(GhsError::SizeMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_slice_owned_bounds() {
        let data = [0u8; 8];
        assert_eq!(slice_owned(&data, 4, 4).unwrap().len(), 4);
        assert!(slice_owned(&data, 4, 5).is_err());
        assert!(slice_owned(&data, usize::MAX, 2).is_err());
    }
}
