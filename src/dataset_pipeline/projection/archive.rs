use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::Path;

use ndarray::Array2;
use ndarray_npy::NpzReader;
use tracing::debug;

use crate::dataset_pipeline::common::error::{ConversionError, Result};
use crate::dataset_pipeline::projection::decompose::Mat34;

const WORLD_MAT_PREFIX: &str = "world_mat_";

/// Reads `world_mat_0 .. world_mat_{k-1}` from a `.npz` archive.
///
/// Other entries (`scale_mat_*`, inverses) are ignored. Each matrix may be
/// 3x4 or 4x4, stored as `f64` or `f32`; only the first three rows are kept.
pub fn read_world_matrices(path: &Path) -> Result<Vec<Mat34>> {
    let file = std::fs::File::open(path)
        .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?;
    let mut npz = NpzReader::new(file)
        .map_err(|e| ConversionError::ArchiveError(format!("{}: {}", path.display(), e)))?;

    let names = npz
        .names()
        .map_err(|e| ConversionError::ArchiveError(e.to_string()))?;

    let mut entries = BTreeMap::new();
    for name in names {
        let key = name.strip_suffix(".npy").unwrap_or(&name);
        if let Some(index) = key
            .strip_prefix(WORLD_MAT_PREFIX)
            .and_then(|i| i.parse::<usize>().ok())
        {
            entries.insert(index, name.clone());
        }
    }
    debug!(views = entries.len(), "World matrices found in archive");

    (0..entries.len())
        .map(|index| {
            let name = entries.get(&index).ok_or_else(|| {
                ConversionError::ArchiveError(format!("missing {}{}", WORLD_MAT_PREFIX, index))
            })?;
            let array = read_matrix(&mut npz, name)?;
            to_mat34(name, &array)
        })
        .collect()
}

fn read_matrix<R: Read + Seek>(npz: &mut NpzReader<R>, name: &str) -> Result<Array2<f64>> {
    let as_f64: std::result::Result<Array2<f64>, _> = npz.by_name(name);
    match as_f64 {
        Ok(array) => Ok(array),
        Err(f64_err) => {
            let as_f32: std::result::Result<Array2<f32>, _> = npz.by_name(name);
            as_f32
                .map(|array| array.mapv(f64::from))
                .map_err(|_| ConversionError::ArchiveError(format!("{}: {}", name, f64_err)))
        }
    }
}

fn to_mat34(name: &str, array: &Array2<f64>) -> Result<Mat34> {
    match array.dim() {
        (3, 4) | (4, 4) => Ok(Mat34::from_fn(|r, c| array[[r, c]])),
        (rows, cols) => Err(ConversionError::ArchiveError(format!(
            "{}: expected a 3x4 or 4x4 matrix, got {}x{}",
            name, rows, cols
        ))),
    }
}
