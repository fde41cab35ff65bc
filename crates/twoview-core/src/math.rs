//! Mathematical utilities and type definitions.
//!
//! This module provides fundamental types used throughout the workspace
//! and small helpers for homogeneous coordinates and rotation checks.

use nalgebra::{DMatrix, Matrix3, Matrix3x4, Point2, Point3, Vector3};

use crate::{EpipolarError, Result};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 3×4 camera projection matrix with [`Real`] entries.
pub type Mat34 = Matrix3x4<Real>;

/// Convert a 2D point in Euclidean coordinates into homogeneous coordinates.
///
/// Given a point `p = (x, y)`, returns the homogeneous vector `(x, y, 1)`.
pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Skew-symmetric cross-product matrix `[v]_x`, so that `[v]_x w = v × w`.
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Check that `r` is a proper rotation: `RᵀR ≈ I` and `det(R) ≈ +1`.
///
/// Both conditions are tested against the absolute tolerance `tol`.
pub fn is_rotation(r: &Mat3, tol: Real) -> bool {
    if r.iter().any(|v| !v.is_finite()) {
        return false;
    }
    let ortho_err = (r.transpose() * r - Mat3::identity()).amax();
    ortho_err <= tol && (r.determinant() - 1.0).abs() <= tol
}

/// Geodesic angle (radians) between two rotation matrices.
pub fn rotation_angle_between(a: &Mat3, b: &Mat3) -> Real {
    let r_diff = a.transpose() * b;
    let cos_theta = ((r_diff.trace() - 1.0) * 0.5).clamp(-1.0, 1.0);
    cos_theta.acos()
}

/// Convert a dynamically-sized matrix into a fixed 3×3 one.
///
/// `what` names the quantity in the error message.
///
/// # Errors
///
/// [`EpipolarError::ShapeMismatch`] if `m` is not exactly 3×3.
pub fn mat3_from_dmatrix(what: &'static str, m: &DMatrix<Real>) -> Result<Mat3> {
    if m.shape() != (3, 3) {
        return Err(EpipolarError::ShapeMismatch {
            what,
            expected: "3x3".to_string(),
            got: format!("{}x{}", m.nrows(), m.ncols()),
        });
    }
    Ok(m.fixed_view::<3, 3>(0, 0).into_owned())
}

/// Convert nested rows (row-major) into a fixed 3×3 matrix.
///
/// # Errors
///
/// [`EpipolarError::ShapeMismatch`] if there are not exactly three rows of
/// three entries each.
pub fn mat3_from_rows(what: &'static str, rows: &[Vec<Real>]) -> Result<Mat3> {
    let bad_row = rows.iter().find(|r| r.len() != 3);
    if rows.len() != 3 || bad_row.is_some() {
        let cols = bad_row.or(rows.first()).map(|r| r.len()).unwrap_or(0);
        return Err(EpipolarError::ShapeMismatch {
            what,
            expected: "3x3".to_string(),
            got: format!("{}x{}", rows.len(), cols),
        });
    }
    Ok(Mat3::from_fn(|r, c| rows[r][c]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    #[test]
    fn skew_matches_cross_product() {
        let v = Vec3::new(0.3, -1.2, 2.0);
        let w = Vec3::new(-0.7, 0.1, 0.5);
        let err = (skew(&v) * w - v.cross(&w)).norm();
        assert!(err < 1e-12, "skew/cross mismatch: {}", err);
    }

    #[test]
    fn rotation_check_accepts_rotations_and_rejects_reflections() {
        let r = *Rotation3::from_euler_angles(0.2, -0.4, 1.1).matrix();
        assert!(is_rotation(&r, 1e-9));

        let mut reflection = r;
        reflection.column_mut(2).neg_mut();
        assert!(!is_rotation(&reflection, 1e-9));
        assert!(!is_rotation(&(r * 2.0), 1e-9));
    }

    #[test]
    fn mat3_from_rows_rejects_ragged_input() {
        let rows = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0, 1.0]];
        let err = mat3_from_rows("K", &rows).unwrap_err();
        assert!(matches!(err, EpipolarError::ShapeMismatch { what: "K", .. }));

        let ok = mat3_from_rows(
            "K",
            &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]],
        )
        .unwrap();
        assert_eq!(ok[(1, 2)], 6.0);
    }

    #[test]
    fn mat3_from_dmatrix_checks_shape() {
        let m = DMatrix::<Real>::zeros(3, 4);
        assert!(mat3_from_dmatrix("F", &m).is_err());
        let m = DMatrix::<Real>::identity(3, 3);
        assert_eq!(mat3_from_dmatrix("F", &m).unwrap(), Mat3::identity());
    }
}
