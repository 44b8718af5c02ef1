use std::path::Path;

use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::dataset_pipeline::common::error::{ConversionError, Result};

pub trait AssetReader {
    fn read_image(&self, path: &Path) -> Result<DynamicImage>;
}

/// Reads any format the `image` crate can decode, keeping the source depth.
pub struct ImageAssetReader;

impl AssetReader for ImageAssetReader {
    fn read_image(&self, path: &Path) -> Result<DynamicImage> {
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?;

        let image = reader
            .decode()
            .map_err(|e| ConversionError::DecodeError(format!("{}: {}", path.display(), e)))?;

        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded image"
        );
        Ok(image)
    }
}
