//! Index-aligned pixel correspondences between two images.
//!
//! This is the canonical input of every two-view solver: `points_a[i]` and
//! `points_b[i]` are the pixel coordinates of the same scene point in image
//! A and image B.

use serde::{Deserialize, Serialize};

use crate::{ensure_correspondences, EpipolarError, Pt2, Real, Result};

/// A set of pixel correspondences between two views.
///
/// # Example
///
/// ```
/// use twoview_core::{CorrespondenceSet, Pt2};
///
/// let a = vec![Pt2::new(320.0, 240.0), Pt2::new(400.0, 240.0)];
/// let b = vec![Pt2::new(310.0, 242.0), Pt2::new(391.0, 238.0)];
/// let set = CorrespondenceSet::new(a, b).unwrap();
///
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrespondenceSet {
    /// Pixel coordinates in image A.
    pub points_a: Vec<Pt2>,
    /// Corresponding pixel coordinates in image B.
    pub points_b: Vec<Pt2>,
}

impl CorrespondenceSet {
    /// Construct a set from two index-aligned point sequences.
    ///
    /// # Errors
    ///
    /// [`EpipolarError::InsufficientCorrespondences`] if the counts differ.
    pub fn new(points_a: Vec<Pt2>, points_b: Vec<Pt2>) -> Result<Self> {
        ensure_correspondences(0, points_a.len(), points_b.len())?;
        Ok(Self { points_a, points_b })
    }

    /// Construct from raw `[x, y]` rows, e.g. parsed JSON.
    ///
    /// # Errors
    ///
    /// [`EpipolarError::ShapeMismatch`] if any row does not hold exactly two
    /// coordinates, then the checks of [`CorrespondenceSet::new`].
    pub fn from_rows(rows_a: &[Vec<Real>], rows_b: &[Vec<Real>]) -> Result<Self> {
        let points_a = points_from_rows("points in image A", rows_a)?;
        let points_b = points_from_rows("points in image B", rows_b)?;
        Self::new(points_a, points_b)
    }

    /// Number of correspondences.
    #[inline]
    pub fn len(&self) -> usize {
        self.points_a.len()
    }

    /// Returns true if the set holds no correspondences.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points_a.is_empty()
    }

    /// Iterate over `(point in A, point in B)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Pt2, &Pt2)> {
        self.points_a.iter().zip(self.points_b.iter())
    }
}

fn points_from_rows(what: &'static str, rows: &[Vec<Real>]) -> Result<Vec<Pt2>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| match row.as_slice() {
            [x, y] => Ok(Pt2::new(*x, *y)),
            _ => Err(EpipolarError::ShapeMismatch {
                what,
                expected: "2 coordinates per point".to_string(),
                got: format!("{} coordinates at index {}", row.len(), idx),
            }),
        })
        .collect()
}

/// Summary statistics for per-correspondence residuals (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualStats {
    /// Mean residual.
    pub mean: f64,
    /// Root mean square residual.
    pub rms: f64,
    /// Maximum residual.
    pub max: f64,
    /// Number of residuals evaluated.
    pub count: usize,
}

impl ResidualStats {
    /// Compute statistics from a collection of residuals.
    pub fn from_residuals(residuals: &[f64]) -> Self {
        if residuals.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                max: 0.0,
                count: 0,
            };
        }

        let sum: f64 = residuals.iter().sum();
        let sum_sq: f64 = residuals.iter().map(|e| e * e).sum();
        let max = residuals.iter().cloned().fold(0.0_f64, f64::max);
        let n = residuals.len() as f64;

        Self {
            mean: sum / n,
            rms: (sum_sq / n).sqrt(),
            max,
            count: residuals.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_counts_are_rejected() {
        let a = vec![Pt2::new(0.0, 0.0), Pt2::new(1.0, 0.0)];
        let b = vec![Pt2::new(0.0, 0.0)];
        let err = CorrespondenceSet::new(a, b).unwrap_err();
        assert!(matches!(
            err,
            EpipolarError::InsufficientCorrespondences {
                got_a: 2,
                got_b: 1,
                ..
            }
        ));
    }

    #[test]
    fn from_rows_rejects_three_coordinates() {
        let a = vec![vec![1.0, 2.0], vec![3.0, 4.0, 1.0]];
        let b = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let err = CorrespondenceSet::from_rows(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            EpipolarError::ShapeMismatch {
                what: "points in image A",
                ..
            }
        ));
    }

    #[test]
    fn residual_stats() {
        let stats = ResidualStats::from_residuals(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.rms - 7.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.count, 4);
    }
}
