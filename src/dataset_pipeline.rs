//! Dataset conversion pipeline module
//!
//! This module turns a photometric-stereo capture (VisualSFM camera file,
//! mask/normal/albedo folders) into the packed RGBA layout and
//! `transform.json` manifest expected by NeuS2-style trainers. A separate
//! projection module converts `cameras.npz` archives into `cameras.json`.

pub mod assets;
pub mod cameras;
pub mod common;
pub mod config;
pub mod conversions;
pub mod layout;
pub mod manifest;
pub mod projection;

pub use common::{
    ConversionError,
    Result,
    PipelineTimings,
};

pub use config::{
    ConversionConfig,
    ConversionConfigBuilder,
    TiffCompression,
};

pub use cameras::{
    CameraRecord,
    CameraSet,
    read_cameras_file,
};

pub use assets::{
    AssetReader,
    ImageAssetReader,
    PackedAsset,
    PackedAssetWriter,
    StandardAssetWriter,
};

pub use layout::DatasetLayout;

pub use manifest::{Frame, Manifest};

pub use conversions::{
    ConversionReport,
    DatasetConverter,
};

pub use projection::{
    CameraJson,
    ProjectionDecomposition,
    cameras_npz_to_json,
    decompose_projection_matrix,
};
