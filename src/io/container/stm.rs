//! `.STM` container: a flat table of `(offset, size)` pairs.
//!
//! The table has no count prefix. Each size field carries a flag in its top
//! bit marking the final entry; the flag is masked off to get the size.
//! Offsets are absolute within the container and are multiples of 16 in
//! every file shipped with the game.

use std::io::Cursor;

use nom::number::complete::le_u32;
use nom::IResult;

use crate::error::Result;
use crate::io::stream;

/// Top bit of a size field: this is the last table entry.
pub const FINAL_ENTRY_FLAG: u32 = 0x8000_0000;

/// Largest accepted gap between one entry's end and the next entry's start.
const MAX_ENTRY_GAP: u64 = 15;

/// Largest accepted padding after the final entry.
///
/// EU `4d.stm` ends in 2 padding bytes.
const MAX_TRAILING_PADDING: u64 = 2;

/// One table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StmEntry {
    pub offset: u32,
    pub size: u32,
    pub is_final: bool,
}

impl StmEntry {
    fn from_raw(offset: u32, size_raw: u32) -> Self {
        Self {
            offset,
            size: size_raw & !FINAL_ENTRY_FLAG,
            is_final: size_raw & FINAL_ENTRY_FLAG != 0,
        }
    }

    /// Exclusive end offset of the entry's data.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

/// Read the entry table, stopping after the final-flagged entry.
pub fn read_table(data: &[u8]) -> Result<Vec<StmEntry>> {
    let mut cursor = Cursor::new(data);
    let mut entries = Vec::new();
    loop {
        let offset = stream::read_u32(&mut cursor, "STM entry offset")?;
        let size_raw = stream::read_u32(&mut cursor, "STM entry size")?;
        let entry = StmEntry::from_raw(offset, size_raw);
        entries.push(entry);
        if entry.is_final {
            return Ok(entries);
        }
    }
}

/// Count table entries without touching their data.
///
/// Returns `None` if the table runs off the end of `data`.
pub fn count_entries(data: &[u8]) -> Option<usize> {
    let mut input = data;
    let mut count = 0usize;
    loop {
        let (rest, entry) = table_entry(input).ok()?;
        count += 1;
        if entry.is_final {
            return Some(count);
        }
        input = rest;
    }
}

/// Decoded STM container: one owned buffer per table entry, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StmContainer {
    entries: Vec<Vec<u8>>,
}

impl StmContainer {
    /// Split `data` into its member files.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let table = read_table(data)?;
        let entries = table
            .iter()
            .map(|e| stream::slice_owned(data, e.offset as usize, e.size as usize))
            .collect::<Result<Vec<_>>>()?;
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

impl IntoIterator for StmContainer {
    type Item = Vec<u8>;
    type IntoIter = std::vec::IntoIter<Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn table_entry(input: &[u8]) -> IResult<&[u8], StmEntry> {
    let (input, offset) = le_u32(input)?;
    let (input, size_raw) = le_u32(input)?;
    Ok((input, StmEntry::from_raw(offset, size_raw)))
}

/// Quickly check whether `data` is (very likely) an STM container.
///
/// Accepts only if:
/// - every offset is a multiple of 0x10,
/// - no offset or size is 0,
/// - no entry extends past the end of `data`,
/// - each entry starts 0..=15 bytes after the previous one ends,
/// - the final entry ends at most 2 bytes before the end of `data`.
pub fn quickcheck(data: &[u8]) -> bool {
    let len = data.len() as u64;
    let mut input = data;
    let mut prev_end: Option<u64> = None;

    let last = loop {
        let Ok((rest, entry)) = table_entry(input) else {
            return false;
        };
        input = rest;

        if entry.offset & 0xF != 0 {
            return false;
        }
        if entry.offset == 0 || entry.size == 0 {
            return false;
        }
        if entry.end() > len {
            return false;
        }
        if let Some(prev_end) = prev_end {
            let gap = entry.offset as i64 - prev_end as i64;
            if !(0..=MAX_ENTRY_GAP as i64).contains(&gap) {
                return false;
            }
        }
        prev_end = Some(entry.end());

        if entry.is_final {
            break entry;
        }
    };

    len - last.end() <= MAX_TRAILING_PADDING
}
