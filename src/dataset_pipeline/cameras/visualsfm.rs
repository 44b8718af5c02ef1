//! VisualSFM `cameras_v2.txt` reader.
//!
//! A record occupies a fixed window of lines starting at its first
//! non-blank, non-comment line:
//!
//! | index | field |
//! |-------|-------|
//! | 0     | file name |
//! | 1     | original file name |
//! | 2     | focal length |
//! | 3     | principal point (2) |
//! | 4     | translation T (3), read as the pose position |
//! | 5     | camera position C (3), unused |
//! | 6     | axis angle (3) |
//! | 7     | quaternion WXYZ (4) |
//! | 8-10  | rotation matrix rows (3x3) |
//! | 11-13 | distortion, geo position, EXIF |
//!
//! The pose position is the line seven lines above the end of the rotation
//! block, which is the translation line. Existing NeuS2 datasets were built
//! from that line, so `transform.json` stays comparable with them.
//!
//! The first record that fails to parse ends the scan: it is logged and the
//! records read so far are kept. The caller decides whether that count is
//! acceptable.

use std::path::Path;

use nalgebra::{Matrix3, Vector2, Vector3};
use tracing::{debug, error, info, instrument, warn};

use crate::dataset_pipeline::cameras::types::{CameraRecord, CameraSet};
use crate::dataset_pipeline::common::error::{ConversionError, Result};

/// Header line preceding the declared camera count (typo included).
pub const CAMERA_COUNT_MARKER: &str = "# The nubmer of cameras in this reconstruction";

const FOCAL: usize = 2;
const PRINCIPAL_POINT: usize = 3;
const ROTATION: usize = 8;
/// The position line read by the legacy converter: seven lines back from the
/// line following the rotation block.
const POSITION_LINE: usize = ROTATION + 3 - 7;
/// Lines that must be present; the trailing block may be cut off at EOF.
const REQUIRED_LINES: usize = ROTATION + 3;
const RECORD_LINES: usize = 14;

/// Reads `path` and checks that it yields exactly `expected_images` cameras.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn read_cameras_file<P: AsRef<Path>>(path: P, expected_images: usize) -> Result<CameraSet> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ConversionError::MissingPath(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        ConversionError::InputReadError(format!("{}: {}", path.display(), e))
    })?;

    let cameras = parse_cameras(&text)?;
    if cameras.is_empty() {
        return Err(ConversionError::EmptyDataset);
    }
    cameras.ensure_count(expected_images)?;

    info!(cameras = cameras.len(), "Camera file parsed");
    Ok(cameras)
}

/// Parses the content of a camera file.
pub fn parse_cameras(text: &str) -> Result<CameraSet> {
    let lines: Vec<&str> = text.lines().collect();
    let (declared_count, mut cursor) = find_header(&lines)?;

    let mut records = Vec::new();
    while cursor < lines.len() {
        let line = lines[cursor];
        if line.trim().is_empty() || line.starts_with('#') {
            cursor += 1;
            continue;
        }

        match parse_record(&lines[cursor..]) {
            Ok(record) => {
                debug!(index = records.len(), line = cursor + 1, "Parsed camera record");
                records.push(record);
                cursor += RECORD_LINES;
            }
            Err(reason) => {
                let err = ConversionError::CameraRecord {
                    index: records.len(),
                    reason,
                };
                error!("{}", err);
                break;
            }
        }
    }

    if let Some(declared) = declared_count {
        if declared != records.len() {
            warn!(declared, parsed = records.len(), "Camera count in header differs from records read");
        }
    }

    Ok(CameraSet::new(records, declared_count))
}

/// Returns the declared count and the line index where records start.
fn find_header(lines: &[&str]) -> Result<(Option<usize>, usize)> {
    let Some(marker) = lines.iter().position(|l| l.trim() == CAMERA_COUNT_MARKER) else {
        warn!("Camera count marker not found, scanning from the first line");
        return Ok((None, 0));
    };

    let count_line = lines.get(marker + 1).ok_or_else(|| {
        ConversionError::InvalidCameraFile("missing camera count after header".to_string())
    })?;
    let declared = count_line.trim().parse::<usize>().map_err(|e| {
        ConversionError::InvalidCameraFile(format!("camera count {:?}: {}", count_line.trim(), e))
    })?;

    Ok((Some(declared), marker + 2))
}

fn parse_record(window: &[&str]) -> std::result::Result<CameraRecord, String> {
    if window.len() < REQUIRED_LINES {
        return Err(format!(
            "record truncated: {} of {} required lines",
            window.len(),
            REQUIRED_LINES
        ));
    }

    let [focal] = parse_values::<1>(window[FOCAL], "focal length")?;
    let [px, py] = parse_values::<2>(window[PRINCIPAL_POINT], "principal point")?;

    let mut rotation = Matrix3::zeros();
    for row in 0..3 {
        let values = parse_values::<3>(window[ROTATION + row], "rotation row")?;
        for (col, value) in values.into_iter().enumerate() {
            rotation[(row, col)] = value;
        }
    }

    let position = parse_values::<3>(window[POSITION_LINE], "camera position")?;

    Ok(CameraRecord {
        focal,
        principal_point: Vector2::new(px, py),
        rotation,
        position: Vector3::from(position),
    })
}

/// Parses exactly `N` whitespace-separated floats.
fn parse_values<const N: usize>(line: &str, field: &str) -> std::result::Result<[f64; N], String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != N {
        return Err(format!(
            "{}: expected {} values, found {} in {:?}",
            field,
            N,
            tokens.len(),
            line.trim()
        ));
    }

    let mut values = [0.0; N];
    for (value, token) in values.iter_mut().zip(tokens) {
        *value = token
            .parse::<f64>()
            .map_err(|e| format!("{}: {:?}: {}", field, token, e))?;
    }
    Ok(values)
}
