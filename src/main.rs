use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use rnb_prep_rs::dataset_pipeline::{ConversionConfig, DatasetConverter};
use rnb_prep_rs::logger;

/// Repack a photometric-stereo capture (VisualSFM cameras, masks, normals,
/// albedos) into the NeuS2 input layout.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Capture folder containing cameras_v2.txt, mask/, normal/ and optionally albedo/
    #[arg(long)]
    folder: PathBuf,

    /// Output subfolder created inside the capture folder
    #[arg(long, alias = "exp_name", default_value = "RNb-NeuS2")]
    exp_name: String,

    /// Folder holding mask confidence images, falls back to mask/ when absent
    #[arg(long, alias = "mask_certainty_name", default_value = "mask_normal_uncertainty")]
    mask_certainty_name: String,

    /// Log debug output unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_with_fallback(if args.verbose { "debug" } else { logger::DEFAULT_FILTER });

    let output = args.folder.join(&args.exp_name);
    info!(
        input = %args.folder.display(),
        output = %output.display(),
        "Starting dataset conversion"
    );

    let config = ConversionConfig::builder()
        .mask_certainty_name(args.mask_certainty_name)
        .build();
    let converter = DatasetConverter::new(config);
    info!(
        mask_certainty = %converter.config().mask_certainty_name,
        thresholds = ?(converter.config().threshold_8bit, converter.config().threshold_16bit),
        "Mask settings"
    );

    let report = converter
        .convert(&args.folder, &output)
        .with_context(|| format!("converting {}", args.folder.display()))?;

    info!(
        frames = report.frames,
        manifest = %report.manifest_path.display(),
        "-DONE-"
    );
    Ok(())
}
