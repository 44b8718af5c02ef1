use std::io::Write;
use std::path::Path;

use image::ImageError;
use tracing::debug;

use crate::dataset_pipeline::assets::types::PackedAsset;
use crate::dataset_pipeline::assets::writer::PackedAssetWriter;
use crate::dataset_pipeline::common::error::{ConversionError, Result};
use crate::dataset_pipeline::config::{ConversionConfig, TiffCompression};

/// Writes packed assets in the format named by the output extension.
///
/// `.tif`/`.tiff` outputs go through the TIFF encoder so the configured
/// compression applies; everything else is handed to the `image` crate.
pub struct StandardAssetWriter;

impl PackedAssetWriter for StandardAssetWriter {
    fn write_packed(&self, asset: &PackedAsset, path: &Path, config: &ConversionConfig) -> Result<()> {
        debug!(
            path = %path.display(),
            width = asset.width(),
            height = asset.height(),
            "Writing packed asset"
        );

        if is_tiff(path) {
            let mut output = std::fs::File::create(path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", path.display(), e))
            })?;
            return encode_tiff(asset, &mut output, config.tiff_compression);
        }

        asset.image().save(path).map_err(|e| match e {
            ImageError::IoError(io) => {
                ConversionError::OutputWriteError(format!("{}: {}", path.display(), io))
            }
            other => ConversionError::EncodeError(format!("{}: {}", path.display(), other)),
        })
    }
}

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false)
}

fn encode_tiff(asset: &PackedAsset, output: &mut dyn Write, compression: TiffCompression) -> Result<()> {
    let mut buffer = Vec::new();

    {
        let compression = match compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::Deflate => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder.write_image::<tiff::encoder::colortype::RGBA16>(
            asset.width(),
            asset.height(),
            asset.image().as_raw(),
        ).map_err(|e| ConversionError::EncodeError(e.to_string()))?;
    }

    output.write_all(&buffer)?;

    debug!("TIFF encoding complete");
    Ok(())
}
