use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::dataset_pipeline::{
    assets::{
        AssetReader, ImageAssetReader, PackedAsset, PackedAssetWriter, StandardAssetWriter,
        binarize_mask, source_bit_depth, to_rgb16, white_albedo,
    },
    cameras::read_cameras_file,
    common::{
        error::{ConversionError, Result},
        timing::{PipelineTimings, Timer},
    },
    config::ConversionConfig,
    layout::{DatasetLayout, ViewAssets},
    manifest::{Frame, Manifest},
};

pub const ALBEDO_OUTPUT_DIR: &str = "albedos";
pub const NORMAL_OUTPUT_DIR: &str = "normals";
pub const MANIFEST_FILE_NAME: &str = "transform.json";

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub frames: usize,
    /// Size of the last packed view, as written to the manifest
    pub width: u32,
    pub height: u32,
    pub manifest_path: PathBuf,
    pub timings: PipelineTimings,
}

pub struct DatasetConverter<R: AssetReader, W: PackedAssetWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl DatasetConverter<ImageAssetReader, StandardAssetWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: ImageAssetReader,
            writer: StandardAssetWriter,
            config,
        }
    }
}

impl<R: AssetReader, W: PackedAssetWriter> DatasetConverter<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Converts the capture in `input` into `output`.
    ///
    /// Nothing is written until the camera file and all folder listings
    /// agree on the number of views. Existing outputs are overwritten.
    #[instrument(skip(self, input, output), fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<ConversionReport> {
        let input = input.as_ref();
        let output = output.as_ref();
        let mut timings = PipelineTimings::new();

        let timer = Timer::start("discover_layout");
        let layout = DatasetLayout::discover(input, &self.config)?;
        timings.record(timer);
        info!(
            views = layout.view_count(),
            albedo = layout.has_albedo(),
            "Capture layout discovered"
        );

        let timer = Timer::start("parse_cameras");
        let cameras = read_cameras_file(&layout.camera_file, layout.view_count())?;
        timings.record(timer);

        layout.validate()?;

        let albedo_dir = output.join(ALBEDO_OUTPUT_DIR);
        let normal_dir = output.join(NORMAL_OUTPUT_DIR);
        for dir in [&albedo_dir, &normal_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", dir.display(), e))
            })?;
        }

        let intrinsics = cameras.intrinsics();
        let poses = cameras.poses();
        let mut frames = Vec::with_capacity(layout.view_count());
        let mut size = (0, 0);

        for view in layout.views() {
            let timer = Timer::start("pack_view");
            size = self.pack_view(&view, &albedo_dir, &normal_dir)?;
            timings.record(timer);

            frames.push(Frame::new(
                &view.albedo_name,
                &view.normal_name,
                &poses[view.index],
                &intrinsics[view.index],
            ));
        }

        let timer = Timer::start("write_manifest");
        let manifest_path = output.join(MANIFEST_FILE_NAME);
        let manifest = Manifest::new(&self.config, size.0, size.1, frames);
        manifest.write(&manifest_path)?;
        timings.record(timer);

        timings.log_summary();
        info!(frames = manifest.frames.len(), width = size.0, height = size.1, "Conversion complete");

        Ok(ConversionReport {
            frames: manifest.frames.len(),
            width: size.0,
            height: size.1,
            manifest_path,
            timings,
        })
    }

    /// Packs and writes both assets of one view, returning its size.
    fn pack_view(&self, view: &ViewAssets, albedo_dir: &Path, normal_dir: &Path) -> Result<(u32, u32)> {
        let _span = tracing::info_span!("pack_view", index = view.index, normal = %view.normal_name).entered();

        let normal_image = self.reader.read_image(&view.normal)?;
        let normal = to_rgb16(&view.normal_name, &normal_image)?;

        let albedo = match &view.albedo {
            Some(path) => to_rgb16(&view.albedo_name, &self.reader.read_image(path)?)?,
            None => white_albedo(normal.width(), normal.height()),
        };

        let mask_image = self.reader.read_image(&view.mask)?;
        tracing::debug!(depth = ?source_bit_depth(&mask_image), "Binarizing mask");
        let mask = binarize_mask(&mask_image, self.config.threshold_8bit, self.config.threshold_16bit);
        let certainty = binarize_mask(
            &self.reader.read_image(&view.mask_certainty)?,
            self.config.threshold_8bit,
            self.config.threshold_16bit,
        );

        let packed_albedo = PackedAsset::pack(&view.albedo_name, &albedo, &certainty)?;
        self.writer.write_packed(&packed_albedo, &albedo_dir.join(&view.albedo_name), &self.config)?;

        let packed_normal = PackedAsset::pack(&view.normal_name, &normal, &mask)?;
        self.writer.write_packed(&packed_normal, &normal_dir.join(&view.normal_name), &self.config)?;

        Ok((packed_normal.width(), packed_normal.height()))
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}
