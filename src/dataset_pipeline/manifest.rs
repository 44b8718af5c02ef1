//! `transform.json` manifest types

use std::path::Path;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset_pipeline::common::error::{ConversionError, Result};
use crate::dataset_pipeline::common::matrix::matrix_rows;
use crate::dataset_pipeline::config::ConversionConfig;

/// One view of the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Relative to the manifest, e.g. `albedos/000.png`
    pub albedo_path: String,
    pub normal_path: String,
    /// World-to-camera pose
    pub transform_matrix: [[f64; 4]; 4],
    pub intrinsic_matrix: [[f64; 4]; 4],
}

impl Frame {
    pub fn new(albedo_name: &str, normal_name: &str, pose: &Matrix4<f64>, intrinsic: &Matrix4<f64>) -> Self {
        Self {
            albedo_path: format!("albedos/{}", albedo_name),
            normal_path: format!("normals/{}", normal_name),
            transform_matrix: matrix_rows(pose),
            intrinsic_matrix: matrix_rows(intrinsic),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub w: u32,
    pub h: u32,
    pub aabb_scale: f64,
    pub scale: f64,
    pub offset: [f64; 3],
    pub from_na: bool,
    /// Scene normalization, always identity for these captures
    pub n2w: [[f64; 4]; 4],
    pub frames: Vec<Frame>,
}

impl Manifest {
    pub fn new(config: &ConversionConfig, width: u32, height: u32, frames: Vec<Frame>) -> Self {
        Self {
            w: width,
            h: height,
            aabb_scale: config.aabb_scale,
            scale: config.scale,
            offset: config.offset,
            from_na: config.from_na,
            n2w: matrix_rows(&Matrix4::<f64>::identity()),
            frames,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        to_pretty_json(self)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        write_json(path, &self.to_json()?)?;
        info!(path = %path.display(), frames = self.frames.len(), "Manifest written");
        Ok(())
    }
}

/// Pretty JSON with a 4-space indent.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| ConversionError::EncodeError(e.to_string()))
}

pub(crate) fn write_json(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json)
        .map_err(|e| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e)))
}
