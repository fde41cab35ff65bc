//! Observation types for two-view estimation.

mod correspondence;

pub use correspondence::*;
