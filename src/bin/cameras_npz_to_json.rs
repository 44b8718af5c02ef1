use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use rnb_prep_rs::dataset_pipeline::cameras_npz_to_json;
use rnb_prep_rs::logger;

/// Decompose the world matrices of a cameras.npz archive into K, R, T and
/// Euler angles, written to <folder>/cameras.json.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Output folder for cameras.json
    #[arg(long)]
    folder: PathBuf,

    /// Archive with world_mat_<i> entries, defaults to <folder>/cameras.npz
    #[arg(long)]
    camera_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init();

    let camera_file = args
        .camera_file
        .unwrap_or_else(|| args.folder.join("cameras.npz"));

    let (cameras, output) = cameras_npz_to_json(&args.folder, &camera_file)
        .with_context(|| format!("converting {}", camera_file.display()))?;

    info!(views = cameras.len(), output = %output.display(), "-DONE-");
    Ok(())
}
