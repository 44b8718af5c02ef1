use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::dataset_pipeline::common::error::{ConversionError, Result};
use crate::dataset_pipeline::common::matrix::matrix_rows;
use crate::dataset_pipeline::manifest::{to_pretty_json, write_json};
use crate::dataset_pipeline::projection::archive::read_world_matrices;
use crate::dataset_pipeline::projection::decompose::{
    ProjectionDecomposition, decompose_projection_matrix, flipped_euler_degrees,
};

pub const CAMERAS_JSON_FILE_NAME: &str = "cameras.json";

/// Parallel per-view arrays, in archive index order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraJson {
    #[serde(rename = "K")]
    pub k: Vec<[[f64; 3]; 3]>,
    /// World-to-camera rotations
    #[serde(rename = "R")]
    pub r: Vec<[[f64; 3]; 3]>,
    /// World-to-camera translations as 3x1 columns
    #[serde(rename = "T")]
    pub t: Vec<[[f64; 1]; 3]>,
    #[serde(rename = "R_euler")]
    pub r_euler: Vec<[f64; 3]>,
}

impl CameraJson {
    /// Appends one view.
    ///
    /// `R` is the transpose of the camera-to-world pose rotation and `T` is
    /// `-R C`, with `C` the camera center.
    pub fn push(&mut self, decomposition: &ProjectionDecomposition) {
        let pose = decomposition.pose();
        let rotation = pose.fixed_view::<3, 3>(0, 0).transpose();
        let translation = -rotation * pose.fixed_view::<3, 1>(0, 3);

        self.k.push(matrix_rows(&decomposition.k));
        self.r.push(matrix_rows(&rotation));
        self.t.push(matrix_rows(&translation));
        self.r_euler.push(flipped_euler_degrees(&rotation));
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }
}

/// Converts `camera_file` into `<folder>/cameras.json`.
///
/// Both paths are checked before anything is read.
#[instrument(skip(folder, camera_file), fields(folder = %folder.as_ref().display(), camera_file = %camera_file.as_ref().display()))]
pub fn cameras_npz_to_json<P: AsRef<Path>, Q: AsRef<Path>>(folder: P, camera_file: Q) -> Result<(CameraJson, PathBuf)> {
    let folder = folder.as_ref();
    let camera_file = camera_file.as_ref();
    if !folder.is_dir() {
        return Err(ConversionError::MissingPath(folder.to_path_buf()));
    }
    if !camera_file.is_file() {
        return Err(ConversionError::MissingPath(camera_file.to_path_buf()));
    }

    let matrices = read_world_matrices(camera_file)?;
    let mut cameras = CameraJson::default();
    for (index, p) in matrices.iter().enumerate() {
        let decomposition = decompose_projection_matrix(p).map_err(|e| match e {
            ConversionError::DegenerateProjection(reason) => {
                ConversionError::DegenerateProjection(format!("view {}: {}", index, reason))
            }
            other => other,
        })?;
        cameras.push(&decomposition);
    }

    let output = folder.join(CAMERAS_JSON_FILE_NAME);
    write_json(&output, &to_pretty_json(&cameras)?)?;
    info!(views = cameras.len(), output = %output.display(), "Camera JSON written");

    Ok((cameras, output))
}
