//! Camera intrinsics.
//!
//! Lens distortion is assumed to be corrected upstream, so the only camera
//! model needed for two-view geometry is the pinhole calibration matrix:
//!
//! `pixel ~ K · [x_n, y_n, 1]ᵀ`
//!
//! [`FxFyCxCySkew`] is the parametric form; [`CameraMatrix`] is a validated
//! 3×3 `K` that solvers accept directly.

mod intrinsics;

pub use intrinsics::*;
