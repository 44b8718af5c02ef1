//! Camera record types

use nalgebra::{Matrix3, Matrix4, Vector2, Vector3};

use crate::dataset_pipeline::common::error::{ConversionError, Result};

/// One calibrated view as read from the camera file
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRecord {
    /// Focal length in pixels, shared by both axes
    pub focal: f64,
    /// Principal point in pixels
    pub principal_point: Vector2<f64>,
    /// World-to-camera rotation
    pub rotation: Matrix3<f64>,
    /// Position vector of the pose, `pose = [R | -R * position]`.
    /// VisualSFM files supply the record's translation line here.
    pub position: Vector3<f64>,
}

impl CameraRecord {
    /// `[[f,0,px],[0,f,py],[0,0,1]]` embedded in a 4x4 identity.
    pub fn intrinsic(&self) -> Matrix4<f64> {
        let mut intrinsic = Matrix4::identity();
        intrinsic[(0, 0)] = self.focal;
        intrinsic[(1, 1)] = self.focal;
        intrinsic[(0, 2)] = self.principal_point.x;
        intrinsic[(1, 2)] = self.principal_point.y;
        intrinsic
    }

    /// World-to-camera transform `[R | -R C]`.
    pub fn pose(&self) -> Matrix4<f64> {
        let mut pose = Matrix4::identity();
        pose.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        pose.fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&(-self.rotation * self.position));
        pose
    }
}

/// Cameras parsed from one file, in file order
#[derive(Debug, Clone, Default)]
pub struct CameraSet {
    records: Vec<CameraRecord>,
    declared_count: Option<usize>,
}

impl CameraSet {
    pub fn new(records: Vec<CameraRecord>, declared_count: Option<usize>) -> Self {
        Self {
            records,
            declared_count,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CameraRecord] {
        &self.records
    }

    /// Count announced in the file header, if the header was present.
    pub fn declared_count(&self) -> Option<usize> {
        self.declared_count
    }

    /// Focal length of the first camera.
    pub fn focal(&self) -> Option<f64> {
        self.records.first().map(|r| r.focal)
    }

    pub fn intrinsics(&self) -> Vec<Matrix4<f64>> {
        self.records.iter().map(CameraRecord::intrinsic).collect()
    }

    pub fn intrinsics_inv(&self) -> Option<Vec<Matrix4<f64>>> {
        self.records
            .iter()
            .map(|r| r.intrinsic().try_inverse())
            .collect()
    }

    pub fn poses(&self) -> Vec<Matrix4<f64>> {
        self.records.iter().map(CameraRecord::pose).collect()
    }

    /// Fails unless there is exactly one camera per image.
    pub fn ensure_count(&self, images: usize) -> Result<()> {
        if self.records.len() != images {
            return Err(ConversionError::CameraCountMismatch {
                cameras: self.records.len(),
                images,
            });
        }
        Ok(())
    }
}
