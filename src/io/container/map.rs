//! `.MAP` container and its `MAPX` index variant.
//!
//! Header layout (little-endian):
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 4    | tag (`"MAP"` + 1 byte for MAP files)    |
//! | 4      | 4    | declared total size                     |
//! | 8      | 2    | count factor 1                          |
//! | 10     | 2    | count factor 2                          |
//! | 12     | 4    | reserved                                |
//! | 16     | 4*n  | offset table, `n = factor1 * factor2`   |
//!
//! Only offsets are stored. Zero offsets are unused slots; the rest are
//! sorted and each member runs up to the next offset, the last one to the end
//! of the container. Table order is therefore not preserved.

use std::io::Cursor;

use crate::error::{GhsError, Result};
use crate::io::stream;

/// Magic at the start of a MAP container.
pub const MAP_MAGIC: &[u8; 3] = b"MAP";

/// Magic of the model files MAPX tables point at.
pub const PM2_MAGIC: &[u8; 3] = b"PM2";

/// Byte offset of the offset table.
pub const OFFSET_TABLE_START: usize = 16;

/// Fixed-size header preceding the offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub tag: [u8; 4],
    pub declared_size: u32,
    pub count1: u16,
    pub count2: u16,
}

impl MapHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let tag = stream::read_vec(&mut cursor, 4)
            .map_err(|_| GhsError::Format("truncated MAP header".into()))?;
        let declared_size = stream::read_u32(&mut cursor, "MAP header")?;
        let count1 = stream::read_u16(&mut cursor, "MAP header")?;
        let count2 = stream::read_u16(&mut cursor, "MAP header")?;
        stream::read_u32(&mut cursor, "MAP header")?;
        Ok(Self {
            tag: [tag[0], tag[1], tag[2], tag[3]],
            declared_size,
            count1,
            count2,
        })
    }

    /// Number of slots in the offset table.
    pub fn entry_count(&self) -> usize {
        self.count1 as usize * self.count2 as usize
    }
}

/// Read the raw offset table, zero slots included, in table order.
pub fn read_offsets(data: &[u8]) -> Result<Vec<u32>> {
    let header = MapHeader::parse(data)?;
    let count = header.entry_count();
    if count == 0 {
        return Err(GhsError::Format("MAP offset table has no entries".into()));
    }

    let mut cursor = Cursor::new(data);
    cursor.set_position(OFFSET_TABLE_START as u64);
    (0..count)
        .map(|_| stream::read_u32(&mut cursor, "MAP offset table"))
        .collect()
}

/// Decoded MAP/MAPX container: member buffers in ascending offset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapContainer {
    entries: Vec<Vec<u8>>,
}

impl MapContainer {
    /// Decode a MAP container, checking its `"MAP"` magic.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !data.starts_with(MAP_MAGIC) {
            let magic = &data[..data.len().min(3)];
            return Err(GhsError::Format(format!(
                "Not a valid MAP file (magic={:02X?})",
                magic
            )));
        }
        Self::from_offset_table(data)
    }

    /// Decode a MAPX index. Callers validate with [`quickcheck_mapx`] first.
    pub fn from_mapx_bytes(data: &[u8]) -> Result<Self> {
        Self::from_offset_table(data)
    }

    fn from_offset_table(data: &[u8]) -> Result<Self> {
        let mut offsets: Vec<usize> = read_offsets(data)?
            .into_iter()
            .filter(|o| *o > 0)
            .map(|o| o as usize)
            .collect();
        offsets.sort_unstable();

        let mut entries = Vec::with_capacity(offsets.len());
        for (i, &offset) in offsets.iter().enumerate() {
            let end = offsets.get(i + 1).copied().unwrap_or(data.len());
            if offset > data.len() {
                return Err(GhsError::SizeMismatch {
                    expected: offset as u64,
                    actual: data.len() as u64,
                });
            }
            entries.push(stream::slice_owned(data, offset, end - offset)?);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.entries.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<u8>> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Vec<u8>> {
        self.entries
    }
}

impl IntoIterator for MapContainer {
    type Item = Vec<u8>;
    type IntoIter = std::vec::IntoIter<Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Quickly check whether `data` is (very likely) a MAPX index.
///
/// The declared size must equal the buffer length, the table must be
/// non-empty and every slot must point inside the buffer at a `"PM2"` file.
pub fn quickcheck_mapx(data: &[u8]) -> bool {
    let Ok(header) = MapHeader::parse(data) else {
        return false;
    };
    if header.declared_size as usize != data.len() || header.entry_count() == 0 {
        return false;
    }
    let Ok(offsets) = read_offsets(data) else {
        return false;
    };
    offsets.iter().all(|&offset| {
        offset != 0
            && data
                .get(offset as usize..)
                .is_some_and(|rest| rest.starts_with(PM2_MAGIC))
    })
}
