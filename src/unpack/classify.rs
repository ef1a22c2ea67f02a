//! Content classification of container members.
//!
//! Members carry no type information besides, sometimes, a 3-byte magic.
//! Everything else is recognized structurally by the sniffers, tried in a
//! fixed order because several formats can accept the same bytes.

use crate::io::container::{map, stm};
use crate::io::mpr;
use crate::io::texture::{quickcheck_tex, quickcheck_tex2, TextureVariant};

pub const SLI_MAGIC: &[u8] = b"SLI";
pub const MAP_MAGIC: &[u8] = b"MAP";
pub const PM2_MAGIC: &[u8] = b"PM2";
pub const ATR_MAGIC: &[u8] = b"ATR";
pub const SDW_MAGIC: &[u8] = b"SDW";

/// Length of the filler members recognized by [`fallback_kind`].
const FILLER_LEN: usize = 16;

/// Kinds of members that are written out as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
    Pm2,
    Atr,
    Sdw,
    Mpr,
    /// 16 zero bytes.
    Zeros,
    /// 16 `0xFF` bytes.
    Ones,
    /// Anything unrecognized.
    Dat,
}

impl BlobKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pm2 => "pm2",
            Self::Atr => "atr",
            Self::Sdw => "sdw",
            Self::Mpr => "mpr",
            Self::Zeros => "000",
            Self::Ones => "fff",
            Self::Dat => "dat",
        }
    }
}

/// What to do with an STM member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// `SLID`-compressed; classify again after decompression.
    Compressed,
    Map,
    Mapx,
    Stm,
    Texture(TextureVariant),
    /// MPR whose bones store float frames without setting the float flag.
    MprForcedFloat,
    Blob(BlobKind),
}

/// Classify filler and unknown data.
pub fn fallback_kind(data: &[u8]) -> BlobKind {
    if data.len() != FILLER_LEN {
        BlobKind::Dat
    } else if data.iter().all(|b| *b == 0x00) {
        BlobKind::Zeros
    } else if data.iter().all(|b| *b == 0xFF) {
        BlobKind::Ones
    } else {
        BlobKind::Dat
    }
}

/// Classify a member of an STM container.
pub fn classify_member(data: &[u8]) -> MemberKind {
    if data.starts_with(SLI_MAGIC) {
        MemberKind::Compressed
    } else if data.starts_with(MAP_MAGIC) {
        MemberKind::Map
    } else if data.starts_with(PM2_MAGIC) {
        MemberKind::Blob(BlobKind::Pm2)
    } else if data.starts_with(ATR_MAGIC) {
        MemberKind::Blob(BlobKind::Atr)
    } else if data.starts_with(SDW_MAGIC) {
        MemberKind::Blob(BlobKind::Sdw)
    } else if quickcheck_tex(data) {
        MemberKind::Texture(TextureVariant::V1)
    } else if quickcheck_tex2(data) {
        MemberKind::Texture(TextureVariant::V2)
    } else if stm::quickcheck(data) {
        MemberKind::Stm
    } else if mpr::quickcheck(data) {
        MemberKind::Blob(BlobKind::Mpr)
    } else if map::quickcheck_mapx(data) {
        MemberKind::Mapx
    } else {
        MemberKind::Blob(fallback_kind(data))
    }
}

/// Like [`classify_member`], but also recognizes MPR files whose bones store
/// float frames without the float flag. Only unrecognized data is retried.
pub fn classify_member_forced_float(data: &[u8]) -> MemberKind {
    match classify_member(data) {
        MemberKind::Blob(BlobKind::Dat) if mpr::quickcheck_forced_float(data) => {
            MemberKind::MprForcedFloat
        }
        kind => kind,
    }
}

/// Classify the output of decompressing an `SLI` member.
pub fn classify_decompressed(data: &[u8]) -> MemberKind {
    if quickcheck_tex(data) {
        MemberKind::Texture(TextureVariant::V1)
    } else if quickcheck_tex2(data) {
        MemberKind::Texture(TextureVariant::V2)
    } else if stm::quickcheck(data) {
        MemberKind::Stm
    } else {
        MemberKind::Blob(fallback_kind(data))
    }
}

/// Classify a member of a MAP (`mapx == false`) or MAPX container.
pub fn classify_map_member(data: &[u8], mapx: bool) -> BlobKind {
    if data.starts_with(PM2_MAGIC) {
        BlobKind::Pm2
    } else if !mapx && data.starts_with(ATR_MAGIC) {
        BlobKind::Atr
    } else {
        fallback_kind(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_kinds() {
        assert_eq!(fallback_kind(&[0u8; 16]), BlobKind::Zeros);
        assert_eq!(fallback_kind(&[0xFFu8; 16]), BlobKind::Ones);
        assert_eq!(fallback_kind(&[0u8; 15]), BlobKind::Dat);
        assert_eq!(fallback_kind(&[0u8; 17]), BlobKind::Dat);
        let mut mixed = [0u8; 16];
        mixed[15] = 0xFF;
        assert_eq!(fallback_kind(&mixed), BlobKind::Dat);
        assert_eq!(fallback_kind(&[]), BlobKind::Dat);
    }

    #[test]
    fn test_magic_precedence() {
        assert_eq!(classify_member(b"SLID\0\0\0\0"), MemberKind::Compressed);
        assert_eq!(classify_member(b"MAP\0\0"), MemberKind::Map);
        assert_eq!(classify_member(b"PM2\x01"), MemberKind::Blob(BlobKind::Pm2));
        assert_eq!(classify_member(b"ATR\x01"), MemberKind::Blob(BlobKind::Atr));
        assert_eq!(classify_member(b"SDW\x01"), MemberKind::Blob(BlobKind::Sdw));
    }

    #[test]
    fn test_filler_members() {
        assert_eq!(classify_member(&[0u8; 16]), MemberKind::Blob(BlobKind::Zeros));
        assert_eq!(classify_member(&[0xFFu8; 16]), MemberKind::Blob(BlobKind::Ones));
        assert_eq!(
            classify_decompressed(&[0u8; 16]),
            MemberKind::Blob(BlobKind::Zeros)
        );
    }

    #[test]
    fn test_decompressed_ignores_magics() {
        assert_eq!(
            classify_decompressed(b"PM2 model data"),
            MemberKind::Blob(BlobKind::Dat)
        );
    }

    #[test]
    fn test_forced_float_mpr_is_opt_in() {
        // one bone, 2 frames of 24 bytes, float flag clear
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&[0x3Fu8; 48]);
        assert!(mpr::quickcheck_forced_float(&data));

        assert_eq!(classify_member(&data), MemberKind::Blob(BlobKind::Dat));
        assert_eq!(classify_member_forced_float(&data), MemberKind::MprForcedFloat);
        assert_eq!(
            classify_member_forced_float(b"PM2 data"),
            MemberKind::Blob(BlobKind::Pm2)
        );
    }

    #[test]
    fn test_map_members() {
        assert_eq!(classify_map_member(b"PM2...", false), BlobKind::Pm2);
        assert_eq!(classify_map_member(b"ATR...", false), BlobKind::Atr);
        assert_eq!(classify_map_member(b"ATR...", true), BlobKind::Dat);
        assert_eq!(classify_map_member(&[0u8; 16], true), BlobKind::Zeros);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(BlobKind::Zeros.extension(), "000");
        assert_eq!(BlobKind::Ones.extension(), "fff");
        assert_eq!(BlobKind::Mpr.extension(), "mpr");
    }
}
