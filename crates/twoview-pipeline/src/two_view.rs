//! Serializable entry point used by the CLI.

use serde::{Deserialize, Serialize};
use twoview_core::{CameraMatrix, CorrespondenceSet, Pt2, Real, ResidualStats, Result};
use twoview_linear::{sampson_distance, symmetric_epipolar_distance, PoseHypothesis};

use crate::config::TwoViewConfig;
use crate::geometry::{compute_epipolar_geometry, EpipolarGeometry};

/// Raw two-view input as read from JSON.
///
/// Points are `[x, y]` pixel pairs; intrinsic matrices are row-major 3×3
/// nested arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoViewInput {
    pub points_a: Vec<Vec<Real>>,
    pub points_b: Vec<Vec<Real>>,
    pub k_a: Vec<Vec<Real>>,
    pub k_b: Vec<Vec<Real>>,
}

impl TwoViewInput {
    /// Build an input from typed correspondences and calibrations.
    pub fn from_parts(set: &CorrespondenceSet, k_a: &CameraMatrix, k_b: &CameraMatrix) -> Self {
        let rows = |pts: &[Pt2]| -> Vec<Vec<Real>> { pts.iter().map(|p| vec![p.x, p.y]).collect() };
        let k_rows = |k: &CameraMatrix| -> Vec<Vec<Real>> {
            let m = k.matrix();
            (0..3).map(|r| (0..3).map(|c| m[(r, c)]).collect()).collect()
        };
        Self {
            points_a: rows(&set.points_a),
            points_b: rows(&set.points_b),
            k_a: k_rows(k_a),
            k_b: k_rows(k_b),
        }
    }
}

/// Geometry plus fit quality, as written by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoViewReport {
    pub geometry: EpipolarGeometry,
    /// Sampson distance of every correspondence to `F`, in pixels.
    pub sampson: ResidualStats,
    /// Mean point-to-epipolar-line distance over both images, in pixels.
    pub symmetric: ResidualStats,
}

impl TwoViewReport {
    /// The selected pose, if any.
    pub fn selected(&self) -> Option<&PoseHypothesis> {
        self.geometry.best()
    }
}

/// Parse `input`, run [`compute_epipolar_geometry`] and score the result.
///
/// # Errors
///
/// [`EpipolarError::ShapeMismatch`](twoview_core::EpipolarError::ShapeMismatch)
/// for malformed points or matrices, then anything the pipeline raises.
pub fn run_two_view(input: &TwoViewInput, config: &TwoViewConfig) -> Result<TwoViewReport> {
    let set = CorrespondenceSet::from_rows(&input.points_a, &input.points_b)?;
    let k_a = CameraMatrix::from_rows(&input.k_a)?;
    let k_b = CameraMatrix::from_rows(&input.k_b)?;

    let geometry = compute_epipolar_geometry(&set.points_a, &set.points_b, &k_a, &k_b, config)?;

    let f = &geometry.fundamental;
    let sampson: Vec<Real> = set.iter().map(|(a, b)| sampson_distance(f, a, b)).collect();
    let symmetric: Vec<Real> = set
        .iter()
        .map(|(a, b)| symmetric_epipolar_distance(f, a, b))
        .collect();

    Ok(TwoViewReport {
        geometry,
        sampson: ResidualStats::from_residuals(&sampson),
        symmetric: ResidualStats::from_residuals(&symmetric),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use twoview_core::synthetic::two_view::TwoViewScene;
    use twoview_core::EpipolarError;

    fn scene_input() -> TwoViewInput {
        let scene = TwoViewScene::standard(30, 3).unwrap();
        TwoViewInput::from_parts(&scene.correspondences, &scene.k_a, &scene.k_b)
    }

    #[test]
    fn exact_input_has_negligible_residuals() {
        let report = run_two_view(&scene_input(), &TwoViewConfig::default()).unwrap();
        assert_eq!(report.sampson.count, 30);
        assert!(report.sampson.max < 1e-6, "sampson max {}", report.sampson.max);
        assert!(report.symmetric.max < 1e-6);
        assert!(report.selected().is_some());
    }

    #[test]
    fn malformed_point_row_is_shape_mismatch() {
        let mut input = scene_input();
        input.points_b[4] = vec![1.0, 2.0, 3.0];
        let err = run_two_view(&input, &TwoViewConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            EpipolarError::ShapeMismatch {
                what: "points in image B",
                ..
            }
        ));
    }

    #[test]
    fn non_square_intrinsics_are_shape_mismatch() {
        let mut input = scene_input();
        input.k_a.pop();
        let err = run_two_view(&input, &TwoViewConfig::default()).unwrap_err();
        assert!(matches!(err, EpipolarError::ShapeMismatch { .. }));
    }

    #[test]
    fn lower_triangular_intrinsics_are_rejected() {
        let mut input = scene_input();
        input.k_b[1][0] = 5.0;
        let err = run_two_view(&input, &TwoViewConfig::default()).unwrap_err();
        assert!(matches!(err, EpipolarError::InvalidIntrinsics(_)));
    }
}
