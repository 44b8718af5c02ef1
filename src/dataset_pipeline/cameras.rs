//! Camera calibration module
//!
//! This module reads VisualSFM `cameras_v2.txt` files into per-view
//! intrinsic and world-to-camera pose matrices.

pub mod types;
mod visualsfm;

pub use types::{CameraRecord, CameraSet};
pub use visualsfm::{CAMERA_COUNT_MARKER, parse_cameras, read_cameras_file};
