//! Essential matrix decomposition into rotation and translation.
//!
//! Recovers candidate camera poses from an essential matrix using SVD
//! decomposition. Returns four possible (R, t) pairs that must be
//! disambiguated via cheirality checks (see [`super::cheirality`]).
//!
//! Pose convention: the reference camera sits at the origin with identity
//! rotation, and a point `X` in the reference frame is seen by the other
//! camera at `R X + t`. The other camera's center in the reference frame is
//! therefore `C = -Rᵀ t`.

use log::debug;
use serde::{Deserialize, Serialize};
use twoview_core::{is_rotation, EpipolarError, Mat3, Mat34, Pt3, Real, Result, Vec3};

use crate::math::Svd3;

/// Tolerance on `RᵀR - I` and `det(R) - 1` for a hypothesis to count as a
/// proper rotation.
pub const ROTATION_TOLERANCE: Real = 1e-6;

/// `σ2 / σ1` below which an essential matrix is treated as rank 1.
const RANK_TOLERANCE: Real = 1e-10;

/// Relative pose of one camera with respect to a reference camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseHypothesis {
    /// Rotation taking reference-frame coordinates into this camera.
    pub rotation: Mat3,
    /// Translation of the reference origin as seen from this camera.
    pub translation: Vec3,
    /// Camera center in the reference frame, `-Rᵀ t`.
    pub center: Vec3,
}

impl PoseHypothesis {
    /// Build a pose from `(R, t)`, deriving the center.
    pub fn from_rotation_translation(rotation: Mat3, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
            center: -(rotation.transpose() * translation),
        }
    }

    /// The reference camera itself.
    pub fn identity() -> Self {
        Self::from_rotation_translation(Mat3::identity(), Vec3::zeros())
    }

    /// The reference camera's pose as seen from this camera.
    ///
    /// `R' = Rᵀ`, `t' = -Rᵀ t`, hence `C' = t`.
    pub fn inverse(&self) -> Self {
        let rt = self.rotation.transpose();
        Self::from_rotation_translation(rt, -(rt * self.translation))
    }

    /// Normalized projection matrix `[R | t]`.
    pub fn projection_matrix(&self) -> Mat34 {
        let mut p = Mat34::zeros();
        p.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        p.set_column(3, &self.translation);
        p
    }

    /// Map a reference-frame point into this camera's frame.
    pub fn transform_point(&self, p: &Pt3) -> Vec3 {
        self.rotation * p.coords + self.translation
    }

    /// Whether the rotation is proper within `tol`.
    pub fn is_proper(&self, tol: Real) -> bool {
        is_rotation(&self.rotation, tol)
    }
}

/// Enforce essential matrix constraints via SVD projection.
///
/// Projects a 3x3 matrix onto the essential matrix manifold by forcing
/// the singular values to be (σ, σ, 0) where σ is the mean of the first
/// two singular values.
pub fn enforce_essential_constraints(e: &Mat3) -> Result<Mat3> {
    let svd = Svd3::new(e)?;
    let s = 0.5 * (svd.singular_values[0] + svd.singular_values[1]);
    Ok(svd.recompose(&Vec3::new(s, s, 0.0)))
}

/// Decompose an essential matrix into candidate rotation and translation pairs.
///
/// Returns the pairs `(R_a, t), (R_a, -t), (R_b, t), (R_b, -t)` with
/// `R_a = U W Vᵀ`, `R_b = U Wᵀ Vᵀ` and `t = U[:, 2]` (unit length, direction
/// only). Only the absolute scale of `E` is discarded; its sign does not
/// change the set of hypotheses.
///
/// # Errors
///
/// [`EpipolarError::DegenerateEssentialMatrix`] if `e` is non-finite, zero,
/// of rank below 2, or if no candidate passes the proper-rotation check.
pub fn decompose_essential(e: &Mat3) -> Result<Vec<PoseHypothesis>> {
    if e.iter().any(|v| !v.is_finite()) {
        return Err(EpipolarError::DegenerateEssentialMatrix(
            "matrix has non-finite entries".to_string(),
        ));
    }

    let svd = Svd3::new(e)?;
    let s = svd.singular_values;
    if s[0] <= Real::EPSILON {
        return Err(EpipolarError::DegenerateEssentialMatrix(
            "matrix is zero".to_string(),
        ));
    }
    if s[1] <= RANK_TOLERANCE * s[0] {
        return Err(EpipolarError::DegenerateEssentialMatrix(format!(
            "rank below 2 (singular values {:.3e}, {:.3e}, {:.3e})",
            s[0], s[1], s[2]
        )));
    }

    let mut u = svd.u;
    let mut v_t = svd.v_t;
    if u.determinant() < 0.0 {
        u.column_mut(2).neg_mut();
    }
    if (u * v_t).determinant() < 0.0 {
        v_t.row_mut(2).neg_mut();
    }

    let w = Mat3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);

    let r_a = u * w * v_t;
    let r_b = u * w.transpose() * v_t;

    let t = u.column(2).normalize();

    let candidates = [(r_a, t), (r_a, -t), (r_b, t), (r_b, -t)];
    let hypotheses: Vec<PoseHypothesis> = candidates
        .into_iter()
        .map(|(r, t)| PoseHypothesis::from_rotation_translation(r, t))
        .filter(|h| h.is_proper(ROTATION_TOLERANCE))
        .collect();

    if hypotheses.is_empty() {
        return Err(EpipolarError::DegenerateEssentialMatrix(
            "no candidate rotation is proper".to_string(),
        ));
    }
    if hypotheses.len() < candidates.len() {
        debug!(
            "essential decomposition kept {} of {} hypotheses",
            hypotheses.len(),
            candidates.len()
        );
    }

    Ok(hypotheses)
}
