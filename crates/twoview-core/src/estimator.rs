//! Model-agnostic solver interface.
//!
//! Implement [`Estimator`] for a geometric model so that it can be driven by
//! a consensus loop (random minimal subsets, residual scoring, refit on the
//! inlier set). The minimal solvers in `twoview-linear` implement it; the
//! loop itself is left to the caller.

/// Generic estimator for RANSAC-like methods.
///
/// `fit` receives the full data slice plus the indices of the current
/// sample, so a driver can score the same data against many models without
/// copying it.
pub trait Estimator {
    type Datum;
    type Model;

    /// Minimal number of samples needed to estimate a model.
    const MIN_SAMPLES: usize;

    /// Fit a model from a subset of data indices.
    ///
    /// Return `None` if the subset is degenerate or fitting fails.
    fn fit(data: &[Self::Datum], sample_indices: &[usize]) -> Option<Self::Model>;

    /// Residual/error for one datum (e.g. epipolar distance in pixels).
    ///
    /// This should be a **non-negative scalar**.
    fn residual(model: &Self::Model, datum: &Self::Datum) -> f64;

    /// Optional degeneracy check on the sample subset.
    ///
    /// Default: degenerate only when the sample is smaller than
    /// [`Estimator::MIN_SAMPLES`].
    fn is_degenerate(_data: &[Self::Datum], sample_indices: &[usize]) -> bool {
        sample_indices.len() < Self::MIN_SAMPLES
    }

    /// Optional refit on full inlier set.
    ///
    /// Default: fit on all inliers with [`Estimator::fit`].
    fn refit(data: &[Self::Datum], inliers: &[usize]) -> Option<Self::Model> {
        Self::fit(data, inliers)
    }

    /// Indices of the data whose residual is at most `thresh`.
    fn inliers(model: &Self::Model, data: &[Self::Datum], thresh: f64) -> Vec<usize> {
        data.iter()
            .enumerate()
            .filter(|(_, d)| Self::residual(model, d) <= thresh)
            .map(|(i, _)| i)
            .collect()
    }
}
