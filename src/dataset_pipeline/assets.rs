//! Asset repacking module
//!
//! This module loads mask, confidence, normal and albedo images and packs
//! them into 16-bit RGBA assets whose alpha channel carries a binary mask.

mod mask;
mod packing;
mod reader;
mod standard_writer;
pub mod types;
mod writer;

pub use mask::{binarize_mask, source_bit_depth};
pub use packing::{rescale_to_16bit, to_rgb16, white_albedo};
pub use reader::{AssetReader, ImageAssetReader};
pub use standard_writer::StandardAssetWriter;
pub use types::{BitDepth, MASK_ON, Mask16Image, PackedAsset, Rgb16Image, Rgba16Image};
pub use writer::PackedAssetWriter;
