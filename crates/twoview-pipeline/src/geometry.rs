use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use twoview_core::{ensure_correspondences, CameraMatrix, Mat3, Pt2, Result};
use twoview_linear::{
    canonicalize, decompose_essential, essential_from_fundamental, fundamental_8point,
    select_pose, CheiralityReport, PoseHypothesis, SelectionStatus, MIN_CORRESPONDENCES,
};

use crate::config::{ReferenceFrame, TwoViewConfig};

/// Full two-view epipolar geometry of one image pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpipolarGeometry {
    /// Fundamental matrix in pixels, `x_bᵀ F x_a = 0`.
    pub fundamental: Mat3,
    /// Essential matrix, `E = K_bᵀ F K_a`, canonically scaled.
    pub essential: Mat3,
    /// Frame in which the poses below are expressed.
    pub reference_frame: ReferenceFrame,
    /// Pose of the fixed camera (always the identity).
    pub reference_pose: PoseHypothesis,
    /// Candidate poses of the other camera, in decomposition order.
    pub hypotheses: Vec<PoseHypothesis>,
    /// Positive-depth vote over `hypotheses`.
    pub cheirality: CheiralityReport,
}

impl EpipolarGeometry {
    /// The hypothesis chosen by the cheirality vote, if it was not a tie.
    pub fn best(&self) -> Option<&PoseHypothesis> {
        self.cheirality.best.and_then(|idx| self.hypotheses.get(idx))
    }
}

/// Estimate F, E and the relative pose from pixel correspondences.
///
/// `pts_a[i]` and `pts_b[i]` must observe the same scene point; `k_a` and
/// `k_b` calibrate image A and image B. The call is pure and deterministic.
///
/// # Errors
///
/// Any [`EpipolarError`](twoview_core::EpipolarError) raised by the
/// stages; no partial result is returned.
pub fn compute_epipolar_geometry(
    pts_a: &[Pt2],
    pts_b: &[Pt2],
    k_a: &CameraMatrix,
    k_b: &CameraMatrix,
    config: &TwoViewConfig,
) -> Result<EpipolarGeometry> {
    ensure_correspondences(MIN_CORRESPONDENCES, pts_a.len(), pts_b.len())?;
    debug!("estimating epipolar geometry from {} correspondences", pts_a.len());

    let fundamental = fundamental_8point(pts_a, pts_b)?;
    let essential = canonicalize(&essential_from_fundamental(&fundamental, k_a, k_b));
    let hypotheses = decompose_essential(&essential)?;
    let cheirality = select_pose(&hypotheses, pts_a, pts_b, k_a, k_b, &config.cheirality)?;

    match cheirality.status {
        SelectionStatus::Resolved => info!(
            "selected pose hypothesis {:?} ({:.1}% positive depth)",
            cheirality.best,
            100.0 * cheirality.best_ratio()
        ),
        SelectionStatus::Tie => warn!(
            "pose hypotheses tied at {:?} positive-depth points; no pose selected",
            cheirality.positive_counts
        ),
        SelectionStatus::LowConfidence => warn!(
            "best pose hypothesis has only {:.1}% positive depth",
            100.0 * cheirality.best_ratio()
        ),
    }

    let hypotheses = match config.reference_frame {
        ReferenceFrame::FirstCamera => hypotheses,
        ReferenceFrame::SecondCamera => hypotheses.iter().map(PoseHypothesis::inverse).collect(),
    };

    Ok(EpipolarGeometry {
        fundamental,
        essential,
        reference_frame: config.reference_frame,
        reference_pose: PoseHypothesis::identity(),
        hypotheses,
        cheirality,
    })
}

/// Canonical essential matrix for a known relative pose, `E = [t]ₓ R`.
///
/// Useful to compare an estimate against ground truth.
pub fn essential_from_pose(pose: &PoseHypothesis) -> Mat3 {
    canonicalize(&(twoview_core::skew(&pose.translation) * pose.rotation))
}
