use nalgebra::SMatrix;

/// Row-major nested arrays, the layout JSON consumers expect.
pub fn matrix_rows<const R: usize, const C: usize>(m: &SMatrix<f64, R, C>) -> [[f64; C]; R] {
    std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix2x3;

    #[test]
    fn rows_follow_matrix_rows() {
        let m = Matrix2x3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(matrix_rows(&m), [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }
}
