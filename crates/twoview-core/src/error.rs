use thiserror::Error;

/// Errors raised by the two-view estimation stages.
///
/// All variants are validation or numerical failures that surface
/// immediately; none of them is retryable with the same input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EpipolarError {
    /// Fewer point pairs than the solver needs, or mismatched pair counts.
    #[error(
        "need at least {required} index-aligned correspondences, got {got_a} in image A and {got_b} in image B"
    )]
    InsufficientCorrespondences {
        required: usize,
        got_a: usize,
        got_b: usize,
    },
    /// Normalization cannot proceed (degenerate point spread).
    #[error("ill-conditioned input: {0}")]
    IllConditionedInput(String),
    /// A matrix or point array has the wrong dimensionality.
    #[error("shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: String,
        got: String,
    },
    /// Intrinsic matrix violates the pinhole `K` invariants.
    #[error("invalid intrinsics: {0}")]
    InvalidIntrinsics(String),
    /// No proper-rotation pose hypothesis could be recovered.
    #[error("degenerate essential matrix: {0}")]
    DegenerateEssentialMatrix(String),
    /// Singular value decomposition did not produce the requested factors.
    #[error("svd failed in {0}")]
    SvdFailed(&'static str),
}

impl EpipolarError {
    /// Build an [`EpipolarError::InsufficientCorrespondences`] for the given counts.
    pub fn insufficient(required: usize, got_a: usize, got_b: usize) -> Self {
        Self::InsufficientCorrespondences {
            required,
            got_a,
            got_b,
        }
    }
}

/// Result alias used by every two-view solver.
pub type Result<T, E = EpipolarError> = std::result::Result<T, E>;

/// Check that two point sequences are index-aligned and hold at least
/// `required` pairs.
pub fn ensure_correspondences(required: usize, got_a: usize, got_b: usize) -> Result<()> {
    if got_a != got_b || got_a < required {
        return Err(EpipolarError::insufficient(required, got_a, got_b));
    }
    Ok(())
}
