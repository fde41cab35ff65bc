//! Epipolar geometry solvers for fundamental and essential matrices.
//!
//! Includes the normalized 8-point solver, the fundamental-to-essential
//! lift, decomposition of the essential matrix into candidate poses, and
//! cheirality-based selection among them.
//!
//! - Fundamental matrix `F` expects **pixel coordinates** in both images.
//! - Essential matrix `E` expects **normalized coordinates** (after applying
//!   `K^{-1}`), or equivalently calibrated rays on the normalized image plane.

mod cheirality;
mod decomposition;
mod essential;
mod fundamental;

// Re-export public API
pub use cheirality::{
    count_positive_depth, sample_indices, select_pose, CheiralityOptions, CheiralityReport,
    SelectionStatus,
};
pub use decomposition::{
    decompose_essential, enforce_essential_constraints, PoseHypothesis, ROTATION_TOLERANCE,
};
pub use essential::{
    essential_from_fundamental, essential_from_fundamental_dyn, fundamental_from_essential,
};
pub use fundamental::{
    algebraic_residual, enforce_rank2, epipolar_line, epipolar_line_transposed,
    fundamental_8point, fundamental_8point_normalized, sampson_distance,
    symmetric_epipolar_distance, FundamentalEstimator, PixelMatch, MIN_CORRESPONDENCES,
};
