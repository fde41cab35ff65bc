//! Mathematical utilities for the linear two-view solvers.
//!
//! This module provides shared functions used across the solvers in the
//! `twoview-linear` crate:
//!
//! - **Hartley normalization** of 2D points (numerical conditioning)
//! - **Nullspace extraction** from an over-determined design matrix
//! - **Sorted 3×3 SVD** so that the last singular triplet is always the
//!   smallest one
//! - **Canonical scale/sign** for matrices defined only up to scale
//!
//! # Hartley Normalization
//!
//! Normalizing points before DLT-style algorithms improves numerical stability
//! by centering the data and scaling it to a mean distance of `√2`. This is
//! critical for accurate fundamental matrix estimation from pixel coordinates.
//!
//! # Example
//!
//! ```
//! use twoview_linear::math::normalize_points_2d;
//! use twoview_core::Pt2;
//!
//! let points = vec![
//!     Pt2::new(100.0, 200.0),
//!     Pt2::new(150.0, 250.0),
//!     Pt2::new(120.0, 220.0),
//! ];
//!
//! let (normalized, transform) = normalize_points_2d(&points).unwrap();
//! // normalized points have mean at origin, mean distance = sqrt(2)
//! ```

use std::cmp::Ordering;

use nalgebra::{DMatrix, DVector};
use twoview_core::{EpipolarError, Mat3, Pt2, Real, Result, Vec3};

/// Hartley normalization for 2D points.
///
/// Centers points at the origin and scales so that the mean distance from
/// the origin is `√2`.
///
/// # Returns
///
/// The normalized points and the 3x3 transformation matrix `T` such that
/// `p_norm = T * p_homogeneous`.
///
/// # Errors
///
/// [`EpipolarError::IllConditionedInput`] if the input is empty, contains a
/// non-finite coordinate, or all points coincide (zero mean distance, so the
/// scale factor is undefined).
///
/// # Algorithm
///
/// 1. Compute centroid `(cx, cy)` of all points
/// 2. Compute mean Euclidean distance from centroid
/// 3. Scale factor = `√2 / mean_distance`
/// 4. Transformation matrix: translate to origin, then scale
///
/// # References
///
/// Hartley & Zisserman, "Multiple View Geometry in Computer Vision", 2nd ed.,
/// Algorithm 4.2 (Normalized DLT)
pub fn normalize_points_2d(points: &[Pt2]) -> Result<(Vec<Pt2>, Mat3)> {
    if points.is_empty() {
        return Err(EpipolarError::IllConditionedInput(
            "cannot normalize an empty point set".to_string(),
        ));
    }
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(EpipolarError::IllConditionedInput(
            "point set contains non-finite coordinates".to_string(),
        ));
    }

    let n = points.len() as Real;
    let mut cx: Real = 0.0;
    let mut cy: Real = 0.0;
    for p in points {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist: Real = 0.0;
    for p in points {
        let dx = p.x - cx;
        let dy = p.y - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    // Relative to the coordinate magnitude: identical points far from the
    // origin can leave rounding residue in the centroid.
    let tol = Real::EPSILON * (1.0 + cx.abs().max(cy.abs()));
    if mean_dist <= tol {
        return Err(EpipolarError::IllConditionedInput(format!(
            "all {} points coincide at ({cx}, {cy})",
            points.len()
        )));
    }

    let scale = (2.0_f64).sqrt() / mean_dist;
    let t = Mat3::new(
        scale,
        0.0,
        -scale * cx,
        0.0,
        scale,
        -scale * cy,
        0.0,
        0.0,
        1.0,
    );

    let norm = points
        .iter()
        .map(|p| Pt2::new((p.x - cx) * scale, (p.y - cy) * scale))
        .collect();

    Ok((norm, t))
}

/// Right singular vector of `a` for its smallest singular value.
///
/// Matrices with fewer rows than columns are zero-padded to square first,
/// so the thin SVD still exposes the full right singular basis.
///
/// Returns the unit vector together with all singular values sorted in
/// ascending order (the padded zeros included).
pub fn nullspace_vector(a: &DMatrix<Real>) -> Result<(DVector<Real>, Vec<Real>)> {
    let rows = a.nrows();
    let cols = a.ncols();
    let svd = if rows < cols {
        let mut a_pad = DMatrix::<Real>::zeros(cols, cols);
        a_pad.view_mut((0, 0), (rows, cols)).copy_from(a);
        a_pad.svd(false, true)
    } else {
        a.clone().svd(false, true)
    };

    let v_t = svd.v_t.ok_or(EpipolarError::SvdFailed("nullspace extraction"))?;
    let (min_idx, _) = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
        .ok_or(EpipolarError::SvdFailed("nullspace extraction"))?;

    let vector = v_t.row(min_idx).transpose();
    let mut singular_values: Vec<Real> = svd.singular_values.iter().copied().collect();
    singular_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Ok((vector, singular_values))
}

/// Reshape a 9-element vector row-major into a 3×3 matrix.
///
/// # Panics
///
/// Panics if `v` does not have exactly 9 entries.
pub fn mat3_from_vec9(v: &DVector<Real>) -> Mat3 {
    assert_eq!(v.len(), 9, "Expected 9 entries for 3x3 matrix extraction");
    Mat3::from_fn(|r, c| v[3 * r + c])
}

/// SVD of a 3×3 matrix with singular values sorted in descending order.
#[derive(Debug, Clone, Copy)]
pub struct Svd3 {
    pub u: Mat3,
    pub singular_values: Vec3,
    pub v_t: Mat3,
}

impl Svd3 {
    /// Decompose `m`, reordering the singular triplets so that
    /// `σ1 ≥ σ2 ≥ σ3`.
    pub fn new(m: &Mat3) -> Result<Self> {
        let svd = m.svd(true, true);
        let u = svd.u.ok_or(EpipolarError::SvdFailed("3x3 decomposition"))?;
        let v_t = svd.v_t.ok_or(EpipolarError::SvdFailed("3x3 decomposition"))?;
        let s = svd.singular_values;

        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| s[b].partial_cmp(&s[a]).unwrap_or(Ordering::Equal));

        Ok(Self {
            u: Mat3::from_columns(&[
                u.column(order[0]).into_owned(),
                u.column(order[1]).into_owned(),
                u.column(order[2]).into_owned(),
            ]),
            singular_values: Vec3::new(s[order[0]], s[order[1]], s[order[2]]),
            v_t: Mat3::from_rows(&[
                v_t.row(order[0]).into_owned(),
                v_t.row(order[1]).into_owned(),
                v_t.row(order[2]).into_owned(),
            ]),
        })
    }

    /// Recompose `U diag(s) Vᵀ` with replacement singular values.
    pub fn recompose(&self, s: &Vec3) -> Mat3 {
        self.u * Mat3::from_diagonal(s) * self.v_t
    }
}

/// Fix the scale and sign of a matrix defined only up to scale.
///
/// The result has unit Frobenius norm and its entry of largest magnitude is
/// positive (the first such entry in column-major order wins ties). Zero or
/// non-finite matrices are returned unchanged.
pub fn canonicalize(m: &Mat3) -> Mat3 {
    let norm = m.norm();
    if !norm.is_finite() || norm <= Real::EPSILON {
        return *m;
    }
    let out = m / norm;
    let mut dominant: Real = 0.0;
    for v in out.iter() {
        if v.abs() > dominant.abs() {
            dominant = *v;
        }
    }
    if dominant < 0.0 {
        -out
    } else {
        out
    }
}
