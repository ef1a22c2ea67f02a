//! Error types for ghstools

use std::io;
use thiserror::Error;

/// Main error type for ghstools operations
#[derive(Debug, Error)]
pub enum GhsError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or truncated header/table, or wrong magic
    #[error("Format error: {0}")]
    Format(String),

    /// Texture pixel format tag that has not been reverse-engineered
    #[error("Unknown pixel format value {0:#010x}")]
    UnknownPixelFormat(u32),

    /// A texture stream ended in its trailing 0xFF padding run.
    ///
    /// Not a failure: callers stop reading the stream when they see it.
    #[error("Extra data at end of texture stream")]
    ExtraData,

    /// Declared size fields disagree with the available data
    #[error("Size mismatch: expected {expected} bytes, {actual} available")]
    SizeMismatch { expected: u64, actual: u64 },

    /// Error while encoding an output image
    #[error("Encode error: {0}")]
    Encode(String),

    /// Executable that the metadata extractor cannot read
    #[error("Unsupported executable: {0}")]
    UnsupportedExecutable(String),
}

/// Result type alias for ghstools operations
pub type Result<T> = std::result::Result<T, GhsError>;

impl GhsError {
    /// Returns `true` for the clean end-of-stream signal.
    pub fn is_extra_data(&self) -> bool {
        matches!(self, GhsError::ExtraData)
    }
}

impl From<image::ImageError> for GhsError {
    fn from(e: image::ImageError) -> Self {
        GhsError::Encode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GhsError::Format("Not a valid SLID file".to_string());
        assert_eq!(err.to_string(), "Format error: Not a valid SLID file");
    }

    #[test]
    fn test_unknown_pixel_format_display() {
        let err = GhsError::UnknownPixelFormat(0x13);
        assert_eq!(err.to_string(), "Unknown pixel format value 0x00000013");
    }

    #[test]
    fn test_size_mismatch_error() {
        let err = GhsError::SizeMismatch {
            expected: 0x200,
            actual: 0x100,
        };
        assert!(err.to_string().contains("512"));
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn test_extra_data_is_signal() {
        assert!(GhsError::ExtraData.is_extra_data());
        assert!(!GhsError::Format(String::new()).is_extra_data());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: GhsError = io_err.into();
        assert!(matches!(err, GhsError::Io(_)));
    }
}
