use std::path::Path;

use crate::dataset_pipeline::assets::types::PackedAsset;
use crate::dataset_pipeline::common::error::Result;
use crate::dataset_pipeline::config::ConversionConfig;

pub trait PackedAssetWriter {
    fn write_packed(&self, asset: &PackedAsset, path: &Path, config: &ConversionConfig) -> Result<()>;
}
