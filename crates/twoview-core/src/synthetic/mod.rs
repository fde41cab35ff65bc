//! Deterministic synthetic data generation helpers.
//!
//! This module provides small, reusable building blocks for constructing
//! synthetic two-view problems used in tests and examples:
//! - random-but-reproducible 3D point clouds in front of both cameras,
//! - a ground-truth two-camera rig projecting them into pixel correspondences,
//! - seeded splitmix64 streams and per-image pixel jitter.
//!
//! The helpers are deterministic (explicit seeds; stable point ordering).
//!
//! # Example
//!
//! ```
//! use twoview_core::synthetic::{noise::PixelJitter, two_view::TwoViewScene};
//!
//! let scene = TwoViewScene::standard(40, 7).unwrap();
//! assert_eq!(scene.correspondences.len(), 40);
//!
//! let noisy = scene.noisy_correspondences(&PixelJitter { seed: 3, amplitude_px: 0.5 });
//! assert_eq!(noisy.len(), 40);
//! ```

pub mod noise;
pub mod two_view;
