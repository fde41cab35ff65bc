//! Core math and geometry primitives for `twoview`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt2`, `Mat3`, ...),
//! - the pinhole intrinsics model and a validated calibration matrix `K`,
//! - the index-aligned two-view correspondence set,
//! - the typed error taxonomy shared by every solver ([`EpipolarError`]),
//! - the [`Estimator`] trait used to plug solvers into sampling loops,
//! - deterministic synthetic two-view scenes for tests and examples.

/// Typed error taxonomy for two-view estimation.
pub mod error;
/// Solver interface for consensus-style wrappers.
pub mod estimator;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Camera intrinsics.
pub mod models;
/// Deterministic synthetic data generation.
pub mod synthetic;
/// Observation types.
pub mod types;

pub use error::*;
pub use estimator::*;
pub use math::*;
pub use models::*;
pub use types::*;
