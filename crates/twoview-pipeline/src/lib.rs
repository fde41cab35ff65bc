//! Two-view epipolar geometry pipeline.
//!
//! Composes the linear solvers of `twoview-linear` into a single pure call:
//! correspondences and intrinsics in, fundamental matrix, essential matrix
//! and disambiguated relative pose out.
//!
//! ```no_run
//! use twoview_core::synthetic::two_view::TwoViewScene;
//! use twoview_pipeline::{compute_epipolar_geometry, TwoViewConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let scene = TwoViewScene::standard(50, 1)?;
//! let c = &scene.correspondences;
//! let geometry = compute_epipolar_geometry(
//!     &c.points_a,
//!     &c.points_b,
//!     &scene.k_a,
//!     &scene.k_b,
//!     &TwoViewConfig::default(),
//! )?;
//! println!("{:?}", geometry.best());
//! # Ok(())
//! # }
//! ```

mod config;
mod geometry;
mod two_view;

pub use config::{ReferenceFrame, TwoViewConfig};
pub use geometry::{compute_epipolar_geometry, essential_from_pose, EpipolarGeometry};
pub use two_view::{run_two_view, TwoViewInput, TwoViewReport};

pub use twoview_linear::{CheiralityOptions, CheiralityReport, PoseHypothesis, SelectionStatus};
