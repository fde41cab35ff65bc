//! Linear two-view solvers.
//!
//! Everything here is closed-form and deterministic: Hartley normalization,
//! the normalized 8-point fundamental matrix, the essential matrix lift and
//! its decomposition, DLT triangulation, and cheirality selection. The
//! orchestrated pipeline lives in `twoview-pipeline`.

pub mod epipolar;
pub mod math;
pub mod triangulation;

pub use epipolar::*;
pub use math::{canonicalize, normalize_points_2d, Svd3};
pub use triangulation::*;
