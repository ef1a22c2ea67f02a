//! Builders for synthetic game data.

use ghstools::io::compression::slid::{SlidHeader, SLID_HEADER_SIZE};
use ghstools::io::container::stm::FINAL_ENTRY_FLAG;

fn align16(n: usize) -> usize {
    (n + 15) / 16 * 16
}

/// STM container with `members` laid out at 16-byte aligned offsets after
/// the table. The last member is not padded.
pub fn stm(members: &[&[u8]]) -> Vec<u8> {
    assert!(!members.is_empty());
    let table_len = align16(members.len() * 8);
    let mut out = vec![0u8; table_len];
    let mut offset = table_len;
    for (i, member) in members.iter().enumerate() {
        let mut size = member.len() as u32;
        if i + 1 == members.len() {
            size |= FINAL_ENTRY_FLAG;
        }
        out[i * 8..i * 8 + 4].copy_from_slice(&(offset as u32).to_le_bytes());
        out[i * 8 + 4..i * 8 + 8].copy_from_slice(&size.to_le_bytes());
        offset += align16(member.len());
    }
    for (i, member) in members.iter().enumerate() {
        out.extend_from_slice(member);
        if i + 1 != members.len() {
            out.resize(align16(out.len()), 0);
        }
    }
    out
}

/// MAP-style container: `tag`, declared size, counts, then `offsets`, zero
/// filled to `len`. Members are written with [`put`].
pub fn map(tag: &[u8; 4], counts: (u16, u16), offsets: &[u32], len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(tag);
    out.extend_from_slice(&(len as u32).to_le_bytes());
    out.extend_from_slice(&counts.0.to_le_bytes());
    out.extend_from_slice(&counts.1.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    for o in offsets {
        out.extend_from_slice(&o.to_le_bytes());
    }
    out.resize(len, 0);
    out
}

/// Copy `bytes` into `buf` at `offset`.
pub fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// `SLID` block around a raw LZSS payload.
pub fn slid_block(payload: &[u8], decompressed_size: u32) -> Vec<u8> {
    let header = SlidHeader {
        file_size: (SLID_HEADER_SIZE + payload.len()) as u32,
        decompressed_size,
        compressed_size: payload.len() as u32,
    };
    let mut out = header.to_bytes().to_vec();
    out.extend_from_slice(payload);
    out
}

/// `SLID` block storing `data` as literals only.
pub fn slid_literals(data: &[u8]) -> Vec<u8> {
    let mut payload = Vec::new();
    for chunk in data.chunks(8) {
        payload.push(((1u16 << chunk.len()) - 1) as u8);
        payload.extend_from_slice(chunk);
    }
    slid_block(&payload, data.len() as u32)
}

/// Palette of `colors` entries with half-range alpha; entry `i` is red `i`.
pub fn palette(colors: usize) -> Vec<u8> {
    (0..colors).flat_map(|i| [i as u8, 0x10, 0x20, 0x80]).collect()
}

/// One v1 texture record. `pixels` are the raw (packed) bytes.
pub fn tex_v1(pixfmt: u32, palette: &[u8], width: u16, height: u16, tex_offset: u32, pixels: &[u8]) -> Vec<u8> {
    let mut d = Vec::new();
    d.extend_from_slice(&pixfmt.to_le_bytes());
    d.extend_from_slice(&(palette.len() as u32).to_le_bytes());
    d.extend_from_slice(&0u32.to_le_bytes());
    d.extend_from_slice(&[0u8; 4]);
    d.extend_from_slice(palette);
    d.extend_from_slice(&[0u8; 4]);
    d.extend_from_slice(&(pixels.len() as u32).to_le_bytes());
    d.extend_from_slice(&tex_offset.to_le_bytes());
    d.extend_from_slice(&width.to_le_bytes());
    d.extend_from_slice(&height.to_le_bytes());
    d.extend_from_slice(pixels);
    d
}

/// One v2 texture record.
pub fn tex_v2(
    pixfmt: u32,
    palette: &[u8],
    swizzled: bool,
    width: u16,
    height: u16,
    tex_offset: u32,
    pixels: &[u8],
) -> Vec<u8> {
    let mut d = Vec::new();
    d.extend_from_slice(&pixfmt.to_le_bytes());
    d.extend_from_slice(&(palette.len() as u32).to_le_bytes());
    d.extend_from_slice(&0u32.to_le_bytes());
    d.extend_from_slice(&[0u8; 4]);
    d.extend_from_slice(&[0u8; 128]);
    d.extend_from_slice(palette);
    d.extend_from_slice(&[0u8; 32]);
    d.extend_from_slice(&0u16.to_le_bytes());
    d.push(swizzled as u8);
    d.push(0);
    d.extend_from_slice(&(pixels.len() as u32).to_le_bytes());
    d.extend_from_slice(&tex_offset.to_le_bytes());
    d.extend_from_slice(&width.to_le_bytes());
    d.extend_from_slice(&height.to_le_bytes());
    d.extend_from_slice(&[0u8; 128]);
    d.extend_from_slice(pixels);
    d.extend_from_slice(&[0u8; 32]);
    d
}

/// MPR file; `bones` are `(frame_count, is_float, frame_size)`.
pub fn mpr(bones: &[(u16, bool, usize)]) -> Vec<u8> {
    let mut d = Vec::new();
    d.extend_from_slice(&(bones.len() as u32).to_le_bytes());
    d.extend(std::iter::repeat(0u8).take(bones.len() * 4));
    for &(frames, is_float, frame_size) in bones {
        d.extend_from_slice(&frames.to_le_bytes());
        d.push(0);
        d.push(is_float as u8);
        d.extend(std::iter::repeat(0x3Fu8).take(frames as usize * frame_size));
    }
    d
}

/// MAPX index with `models` PM2 blobs, `n1 * n2 == models.len()`.
pub fn mapx(n1: u16, n2: u16, models: &[&[u8]]) -> Vec<u8> {
    let header_len = 16 + models.len() * 4;
    let mut offsets = Vec::new();
    let mut body = Vec::new();
    for m in models {
        offsets.push((header_len + body.len()) as u32);
        body.extend_from_slice(m);
    }
    let mut out = map(&[0u8; 4], (n1, n2), &offsets, header_len + body.len());
    put(&mut out, header_len, &body);
    out
}
