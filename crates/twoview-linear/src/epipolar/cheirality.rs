//! Cheirality (positive-depth) disambiguation of pose hypotheses.
//!
//! Each hypothesis is scored by triangulating a deterministic sample of the
//! correspondences and counting points in front of both cameras. Ties and
//! weak winners are reported, never broken silently.

use log::debug;
use serde::{Deserialize, Serialize};
use twoview_core::{ensure_correspondences, CameraMatrix, EpipolarError, Pt2, Real, Result};

use super::decomposition::PoseHypothesis;
use crate::triangulation::triangulate_pair;

/// Options for [`select_pose`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheiralityOptions {
    /// Maximum number of correspondences triangulated per hypothesis.
    /// `0` means all of them.
    pub max_samples: usize,
    /// Minimum fraction of sampled points that must be in front of both
    /// cameras for the winner to count as confident.
    pub min_positive_ratio: Real,
}

impl Default for CheiralityOptions {
    fn default() -> Self {
        Self {
            max_samples: 100,
            min_positive_ratio: 0.75,
        }
    }
}

/// Outcome of the cheirality vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    /// A unique winner above the confidence threshold.
    Resolved,
    /// Several hypotheses share the top count; none is selected.
    Tie,
    /// A unique winner, but below the confidence threshold.
    LowConfidence,
}

/// Per-hypothesis positive-depth counts and the resulting verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheiralityReport {
    /// Points in front of both cameras, indexed like the hypotheses.
    pub positive_counts: Vec<usize>,
    /// Number of correspondences triangulated per hypothesis.
    pub sampled: usize,
    /// Index of the selected hypothesis, `None` on a tie.
    pub best: Option<usize>,
    pub status: SelectionStatus,
}

impl CheiralityReport {
    /// Fraction of sampled points supporting the selected hypothesis.
    pub fn best_ratio(&self) -> Real {
        match self.best {
            Some(idx) if self.sampled > 0 => {
                self.positive_counts[idx] as Real / self.sampled as Real
            }
            _ => 0.0,
        }
    }
}

/// Evenly spaced indices into `0..n`, at most `max` of them (`0` = all).
pub fn sample_indices(n: usize, max: usize) -> Vec<usize> {
    if max == 0 || n <= max {
        return (0..n).collect();
    }
    (0..max).map(|k| k * n / max).collect()
}

/// Number of normalized pairs that triangulate in front of both cameras.
pub fn count_positive_depth(pose: &PoseHypothesis, rays_a: &[Pt2], rays_b: &[Pt2]) -> usize {
    rays_a
        .iter()
        .zip(rays_b.iter())
        .filter(|(xa, xb)| match triangulate_pair(pose, xa, xb) {
            Ok(p) => p.z > 0.0 && pose.transform_point(&p).z > 0.0,
            Err(_) => false,
        })
        .count()
}

/// Score every hypothesis by positive depth and pick the best one.
///
/// `pts_a`/`pts_b` are pixel correspondences; `k_a`/`k_b` the calibrations
/// of the reference and the other camera.
///
/// # Errors
///
/// - [`EpipolarError::InsufficientCorrespondences`] if there are no pairs
///   or the counts differ.
/// - [`EpipolarError::DegenerateEssentialMatrix`] if `hypotheses` is empty.
pub fn select_pose(
    hypotheses: &[PoseHypothesis],
    pts_a: &[Pt2],
    pts_b: &[Pt2],
    k_a: &CameraMatrix,
    k_b: &CameraMatrix,
    opts: &CheiralityOptions,
) -> Result<CheiralityReport> {
    ensure_correspondences(1, pts_a.len(), pts_b.len())?;
    if hypotheses.is_empty() {
        return Err(EpipolarError::DegenerateEssentialMatrix(
            "no pose hypotheses to disambiguate".to_string(),
        ));
    }

    let indices = sample_indices(pts_a.len(), opts.max_samples);
    let to_plane = |k: &CameraMatrix, p: &Pt2| {
        let ray = k.pixel_to_ray(p);
        Pt2::new(ray.x, ray.y)
    };
    let rays_a: Vec<Pt2> = indices.iter().map(|&i| to_plane(k_a, &pts_a[i])).collect();
    let rays_b: Vec<Pt2> = indices.iter().map(|&i| to_plane(k_b, &pts_b[i])).collect();

    let positive_counts: Vec<usize> = hypotheses
        .iter()
        .map(|h| count_positive_depth(h, &rays_a, &rays_b))
        .collect();
    let sampled = indices.len();

    let top = positive_counts.iter().copied().max().unwrap_or(0);
    let winners: Vec<usize> = positive_counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == top)
        .map(|(i, _)| i)
        .collect();

    let (best, status) = if winners.len() > 1 {
        (None, SelectionStatus::Tie)
    } else if (top as Real) < opts.min_positive_ratio * sampled as Real {
        (winners.first().copied(), SelectionStatus::LowConfidence)
    } else {
        (winners.first().copied(), SelectionStatus::Resolved)
    };

    debug!(
        "cheirality counts {:?} over {} samples -> {:?}",
        positive_counts, sampled, status
    );

    Ok(CheiralityReport {
        positive_counts,
        sampled,
        best,
        status,
    })
}
