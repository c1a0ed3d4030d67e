//! Error types for interleaving and composition

use std::path::PathBuf;
use thiserror::Error;

/// Result type for lenticular operations
pub type Result<T> = std::result::Result<T, LenticularError>;

#[derive(Error, Debug)]
pub enum LenticularError {
    /// Nothing to interleave
    #[error("no rendered images found in {0}")]
    EmptySourceSet(PathBuf),

    /// A source image differs in size from the first one
    #[error("view {index} is {found:?}, expected {expected:?}")]
    DimensionMismatch {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },

    /// A source image differs in colour type or file format from the first one
    #[error("view {index} is {found}, expected {expected}")]
    FormatMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// Two files claim the same camera index
    #[error("camera {index} has more than one frame: {first} and {second}")]
    DuplicateView {
        index: usize,
        first: PathBuf,
        second: PathBuf,
    },

    /// Stereo pair halves differ in size
    #[error("stereo pair size mismatch: left {left:?}, right {right:?}")]
    SizeMismatch { left: (u32, u32), right: (u32, u32) },

    /// Requested output is wider than the source views
    #[error("output width {width} exceeds source width {source_width}")]
    WidthExceedsSource { width: u32, source_width: u32 },

    #[error("invalid print settings: {0}")]
    InvalidSettings(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A rendered frame could not be decoded
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
