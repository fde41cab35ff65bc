use serde::{Deserialize, Serialize};
use twoview_linear::CheiralityOptions;

/// Which camera is held fixed at the identity pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceFrame {
    /// Camera A sits at the origin; hypotheses describe camera B.
    #[default]
    FirstCamera,
    /// Camera B sits at the origin; hypotheses describe camera A.
    SecondCamera,
}

/// Configuration of [`compute_epipolar_geometry`](crate::compute_epipolar_geometry).
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoViewConfig {
    /// Frame the pose hypotheses are expressed in.
    pub reference_frame: ReferenceFrame,
    /// Sampling and confidence settings of the positive-depth vote.
    pub cheirality: CheiralityOptions,
}
