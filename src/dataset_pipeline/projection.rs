//! Projection matrix module
//!
//! This module converts `cameras.npz` archives of `world_mat_<i>` projection
//! matrices into a `cameras.json` file of intrinsics, rotations,
//! translations and Euler angles.

mod archive;
mod camera_json;
mod decompose;

pub use archive::read_world_matrices;
pub use camera_json::{CAMERAS_JSON_FILE_NAME, CameraJson, cameras_npz_to_json};
pub use decompose::{
    Mat34, ProjectionDecomposition, axis_flip, decompose_projection_matrix, flipped_euler_degrees,
    rq_decompose,
};
