//! Conversion between fundamental and essential matrices.
//!
//! The fundamental matrix relates pixel coordinates, the essential matrix
//! relates normalized coordinates `x_n = K⁻¹ x`. With calibrations `K1`
//! (first image) and `K2` (second image):
//!
//! `E = K2ᵀ F K1`, `F = K2⁻ᵀ E K1⁻¹`.

use nalgebra::DMatrix;
use twoview_core::{mat3_from_dmatrix, CameraMatrix, Mat3, Real, Result};

/// Essential matrix `E = K2ᵀ F K1`.
///
/// Pure matrix product: the scale of `F` carries over, no normalization is
/// applied.
pub fn essential_from_fundamental(f: &Mat3, k1: &CameraMatrix, k2: &CameraMatrix) -> Mat3 {
    k2.matrix().transpose() * f * k1.matrix()
}

/// [`essential_from_fundamental`] on dynamically sized inputs.
///
/// # Errors
///
/// [`EpipolarError::ShapeMismatch`](twoview_core::EpipolarError::ShapeMismatch)
/// if any argument is not 3×3, or
/// [`EpipolarError::InvalidIntrinsics`](twoview_core::EpipolarError::InvalidIntrinsics)
/// if a calibration matrix breaks the pinhole invariants.
pub fn essential_from_fundamental_dyn(
    f: &DMatrix<Real>,
    k1: &DMatrix<Real>,
    k2: &DMatrix<Real>,
) -> Result<Mat3> {
    let f = mat3_from_dmatrix("fundamental matrix", f)?;
    let k1 = CameraMatrix::from_dmatrix(k1)?;
    let k2 = CameraMatrix::from_dmatrix(k2)?;
    Ok(essential_from_fundamental(&f, &k1, &k2))
}

/// Fundamental matrix `F = K2⁻ᵀ E K1⁻¹`.
pub fn fundamental_from_essential(e: &Mat3, k1: &CameraMatrix, k2: &CameraMatrix) -> Mat3 {
    k2.inverse().transpose() * e * k1.inverse()
}
