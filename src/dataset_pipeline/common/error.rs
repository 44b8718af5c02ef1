use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Image dimensions differ for {name}: expected {expected_width}x{expected_height}, got {width}x{height}")]
    DimensionMismatch {
        name: String,
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Required path does not exist: {0}")]
    MissingPath(PathBuf),

    #[error("Invalid camera file: {0}")]
    InvalidCameraFile(String),

    #[error("Error parsing camera {index}: {reason}")]
    CameraRecord { index: usize, reason: String },

    #[error("Number of cameras in file ({cameras}) does not match number of images ({images})")]
    CameraCountMismatch { cameras: usize, images: usize },

    #[error("Directory {directory} lists {found} files, expected {expected} to match the mask directory")]
    ListingMismatch {
        directory: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Dataset contains no views")]
    EmptyDataset,

    #[error("Failed to read camera archive: {0}")]
    ArchiveError(String),

    #[error("Degenerate projection matrix: {0}")]
    DegenerateProjection(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
