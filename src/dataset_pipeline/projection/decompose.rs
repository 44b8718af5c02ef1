//! Decomposition of `P = K [R | t]` into intrinsics and pose.

use nalgebra::{Matrix3, Matrix3x4, Matrix4, Rotation3, Vector3};

use crate::dataset_pipeline::common::error::{ConversionError, Result};

/// 3x4 camera projection matrix `P = K [R | t]`.
pub type Mat34 = Matrix3x4<f64>;

/// Flip of the camera Y and Z axes applied before Euler extraction.
pub fn axis_flip() -> Matrix3<f64> {
    Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, -1.0))
}

const SINGULAR_EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionDecomposition {
    /// Upper-triangular intrinsics, positive diagonal, `K[2,2] = 1`.
    pub k: Matrix3<f64>,
    /// World-to-camera rotation, `det = +1`.
    pub rotation: Matrix3<f64>,
    /// Camera center in world coordinates.
    pub center: Vector3<f64>,
}

impl ProjectionDecomposition {
    /// World-to-camera translation `t = -R C`.
    pub fn translation(&self) -> Vector3<f64> {
        -self.rotation * self.center
    }

    pub fn intrinsics(&self) -> Matrix4<f64> {
        let mut intrinsics = Matrix4::identity();
        intrinsics.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.k);
        intrinsics
    }

    /// Camera-to-world pose `[R^T | C]`.
    pub fn pose(&self) -> Matrix4<f64> {
        let mut pose = Matrix4::identity();
        pose.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation.transpose());
        pose.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.center);
        pose
    }

    /// `K [R | t]`, equal to the input matrix up to scale.
    pub fn projection(&self) -> Mat34 {
        let mut p = Mat34::zeros();
        p.fixed_view_mut::<3, 3>(0, 0).copy_from(&(self.k * self.rotation));
        p.set_column(3, &(self.k * self.translation()));
        p
    }
}

/// RQ decomposition of a 3x3 matrix.
///
/// Returns `(K, R)` with `K` upper-triangular with positive diagonal and `R`
/// orthonormal.
pub fn rq_decompose(m: &Matrix3<f64>) -> (Matrix3<f64>, Matrix3<f64>) {
    let j = Matrix3::new(0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0);

    let m1 = j * m.transpose() * j;
    let qr = m1.qr();

    let mut k = j * qr.r().transpose() * j;
    let mut r = j * qr.q().transpose() * j;

    let mut d = Matrix3::identity();
    for i in 0..3 {
        if k[(i, i)] < 0.0 {
            d[(i, i)] = -1.0;
        }
    }
    k *= d;
    r = d * r;

    (k, r)
}

/// Decomposes `P` into intrinsics, world-to-camera rotation and camera
/// center.
///
/// `P` is only defined up to scale: a negative overall scale is undone first
/// so that `R` is a proper rotation, then `K` is normalized to `K[2,2] = 1`.
pub fn decompose_projection_matrix(p: &Mat34) -> Result<ProjectionDecomposition> {
    let mut p = *p;
    let mut m = p.fixed_view::<3, 3>(0, 0).into_owned();

    let det = m.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPS {
        return Err(ConversionError::DegenerateProjection(format!(
            "left 3x3 block is singular (det = {:e})",
            det
        )));
    }
    if det < 0.0 {
        p = -p;
        m = -m;
    }

    let (mut k, rotation) = rq_decompose(&m);
    let m_inv = m.try_inverse().ok_or_else(|| {
        ConversionError::DegenerateProjection("left 3x3 block is not invertible".to_string())
    })?;
    let center = -(m_inv * p.column(3));

    let scale = k[(2, 2)];
    k /= scale;

    Ok(ProjectionDecomposition { k, rotation, center })
}

/// XYZ Euler angles in degrees of `R^T * axis_flip()`.
///
/// `R` is the world-to-camera rotation; the result describes the camera
/// orientation in world space with its Y and Z axes flipped.
pub fn flipped_euler_degrees(rotation: &Matrix3<f64>) -> [f64; 3] {
    let c2w = rotation.transpose() * axis_flip();
    let (roll, pitch, yaw) = Rotation3::from_matrix_unchecked(c2w).euler_angles();
    [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()]
}
