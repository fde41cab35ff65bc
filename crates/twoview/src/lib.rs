//! High-level entry crate for the `twoview` toolbox.
//!
//! Recovers the epipolar geometry of an image pair from pixel
//! correspondences and the two calibration matrices: the fundamental matrix
//! `F`, the essential matrix `E`, the four relative-pose hypotheses encoded by
//! `E`, and the one selected by the positive-depth (cheirality) test.
//!
//! ## 1. One-call pipeline
//!
//! ```no_run
//! use twoview::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pts_a: Vec<Pt2> = /* pixels in image A */
//! # vec![];
//! let pts_b: Vec<Pt2> = /* matching pixels in image B */
//! # vec![];
//! let k = FxFyCxCySkew { fx: 800.0, fy: 800.0, cx: 640.0, cy: 360.0, skew: 0.0 };
//! let k = CameraMatrix::try_from(k)?;
//!
//! let geometry = compute_epipolar_geometry(&pts_a, &pts_b, &k, &k, &TwoViewConfig::default())?;
//! match geometry.best() {
//!     Some(pose) => println!("R = {}, C = {}", pose.rotation, pose.center),
//!     None => println!("ambiguous: {:?}", geometry.cheirality.positive_counts),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Step by step
//!
//! ```no_run
//! use twoview::linear::{
//!     decompose_essential, essential_from_fundamental, fundamental_8point, select_pose,
//!     CheiralityOptions,
//! };
//! # use twoview::core::{CameraMatrix, Pt2};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let (pts_a, pts_b): (Vec<Pt2>, Vec<Pt2>) = (vec![], vec![]);
//! # let k = CameraMatrix::new(twoview::core::Mat3::identity())?;
//! let f = fundamental_8point(&pts_a, &pts_b)?;
//! let e = essential_from_fundamental(&f, &k, &k);
//! let hypotheses = decompose_essential(&e)?;
//! let report = select_pose(&hypotheses, &pts_a, &pts_b, &k, &k, &CheiralityOptions::default())?;
//! println!("{:?}", report.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate layout
//!
//! - **[`core`]**: math aliases, intrinsics, correspondences, errors, synthetic scenes
//! - **[`linear`]**: normalization, 8-point, essential decomposition, triangulation
//! - **[`pipeline`]**: the orchestrated computation and its serde config/report
//! - **[`prelude`]**: convenient re-exports for common use cases

/// Core math types, camera intrinsics and the error taxonomy.
pub mod core {
    pub use twoview_core::*;
}

/// Closed-form two-view solvers.
pub mod linear {
    pub use twoview_linear::*;
}

/// Orchestrated epipolar geometry computation.
pub mod pipeline {
    pub use twoview_pipeline::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use twoview::prelude::*;` to get started quickly.
pub mod prelude {
    pub use crate::core::{
        CameraMatrix, CorrespondenceSet, EpipolarError, FxFyCxCySkew, Mat3, Pt2, Pt3, Vec3,
    };
    pub use crate::pipeline::{
        compute_epipolar_geometry, run_two_view, CheiralityOptions, EpipolarGeometry,
        PoseHypothesis, ReferenceFrame, SelectionStatus, TwoViewConfig, TwoViewInput,
        TwoViewReport,
    };
}
