//! Fundamental matrix estimation.
//!
//! Implements the normalized 8-point algorithm, epipolar residuals, and the
//! [`Estimator`] adapter that lets a consensus loop drive the solver.

use log::{debug, warn};
use nalgebra::DMatrix;
use twoview_core::{
    ensure_correspondences, to_homogeneous, Estimator, Mat3, Pt2, Real, Result, Vec3,
};

use crate::math::{canonicalize, mat3_from_vec9, normalize_points_2d, nullspace_vector, Svd3};

/// Minimal number of correspondences for the linear 8-point solver.
pub const MIN_CORRESPONDENCES: usize = 8;

/// Ratio `σ₈ / σ₁` of the design matrix below which the nullspace is
/// considered not unique.
const NULLSPACE_SEPARATION: Real = 1e-9;

/// Normalized 8-point algorithm for the fundamental matrix.
///
/// `pts1` and `pts2` are corresponding pixel points in two images. Each set
/// is Hartley-normalized independently, the linear system is solved in
/// normalized coordinates, and the result is mapped back to pixels.
///
/// The returned matrix has rank 2, unit Frobenius norm, a positive dominant
/// entry, and satisfies `x'^T F x = 0` (up to numerical error).
///
/// # Errors
///
/// - [`EpipolarError::InsufficientCorrespondences`](twoview_core::EpipolarError::InsufficientCorrespondences)
///   for fewer than eight pairs or mismatched counts.
/// - [`EpipolarError::IllConditionedInput`](twoview_core::EpipolarError::IllConditionedInput)
///   if either point set collapses to a single point.
pub fn fundamental_8point(pts1: &[Pt2], pts2: &[Pt2]) -> Result<Mat3> {
    ensure_correspondences(MIN_CORRESPONDENCES, pts1.len(), pts2.len())?;

    let (pts1_n, t1) = normalize_points_2d(pts1)?;
    let (pts2_n, t2) = normalize_points_2d(pts2)?;

    fundamental_8point_normalized(&pts1_n, &pts2_n, &t1, &t2)
}

/// 8-point solve on already normalized correspondences.
///
/// `t1` and `t2` are the normalizing transforms that produced `pts1_n` and
/// `pts2_n` (see [`normalize_points_2d`]); they are used to map the solution
/// back to the original pixel frame as `F = T2ᵀ F̃ T1`.
///
/// Rank-deficient systems (collinear or repeated points) still produce a
/// matrix. It is numerically unreliable and only reported through a
/// `warn!` log record.
pub fn fundamental_8point_normalized(
    pts1_n: &[Pt2],
    pts2_n: &[Pt2],
    t1: &Mat3,
    t2: &Mat3,
) -> Result<Mat3> {
    let n = pts1_n.len();
    ensure_correspondences(MIN_CORRESPONDENCES, n, pts2_n.len())?;

    // Build design matrix A (n x 9) for x'^T F x = 0.
    let mut a = DMatrix::<Real>::zeros(n, 9);
    for (i, (p1, p2)) in pts1_n.iter().zip(pts2_n.iter()).enumerate() {
        let x = p1.x;
        let y = p1.y;
        let xp = p2.x;
        let yp = p2.y;

        a[(i, 0)] = xp * x;
        a[(i, 1)] = xp * y;
        a[(i, 2)] = xp;
        a[(i, 3)] = yp * x;
        a[(i, 4)] = yp * y;
        a[(i, 5)] = yp;
        a[(i, 6)] = x;
        a[(i, 7)] = y;
        a[(i, 8)] = 1.0;
    }

    // Solve A f = 0: singular vector of the smallest singular value.
    let (f_vec, singular_values) = nullspace_vector(&a)?;
    let largest = singular_values.last().copied().unwrap_or(0.0);
    if singular_values.len() > 1 && singular_values[1] <= NULLSPACE_SEPARATION * largest {
        warn!(
            "8-point design matrix is rank deficient (sigma_8/sigma_1 = {:.3e}); \
             fundamental matrix is unreliable",
            singular_values[1] / largest.max(Real::MIN_POSITIVE)
        );
    }

    let f = enforce_rank2(&mat3_from_vec9(&f_vec))?;

    // Denormalize.
    let f = t2.transpose() * f * t1;

    debug!("8-point fundamental matrix from {} correspondences", n);
    Ok(canonicalize(&f))
}

/// Project a 3×3 matrix onto the rank-2 manifold by zeroing its smallest
/// singular value.
pub fn enforce_rank2(f: &Mat3) -> Result<Mat3> {
    let svd = Svd3::new(f)?;
    let mut s = svd.singular_values;
    s[2] = 0.0;
    Ok(svd.recompose(&s))
}

/// Algebraic epipolar residual `x'^T F x`.
pub fn algebraic_residual(f: &Mat3, p1: &Pt2, p2: &Pt2) -> Real {
    to_homogeneous(p2).dot(&(f * to_homogeneous(p1)))
}

/// Epipolar line `F x` in the second image, scaled so that `a² + b² = 1`.
///
/// With this scaling `l · (u, v, 1)` is the signed pixel distance of `(u, v)`
/// from the line. A point mapping to the epipole yields the zero line.
pub fn epipolar_line(f: &Mat3, p1: &Pt2) -> Vec3 {
    normalize_line(f * to_homogeneous(p1))
}

/// Epipolar line `Fᵀ x'` in the first image, scaled like [`epipolar_line`].
pub fn epipolar_line_transposed(f: &Mat3, p2: &Pt2) -> Vec3 {
    normalize_line(f.transpose() * to_homogeneous(p2))
}

fn normalize_line(l: Vec3) -> Vec3 {
    let ab = (l.x * l.x + l.y * l.y).sqrt();
    if ab <= Real::EPSILON {
        return l;
    }
    l / ab
}

/// Sampson (first-order geometric) distance in pixels.
pub fn sampson_distance(f: &Mat3, p1: &Pt2, p2: &Pt2) -> Real {
    let x = to_homogeneous(p1);
    let xp = to_homogeneous(p2);

    let fx = f * x;
    let ftxp = f.transpose() * xp;
    let denom = fx.x * fx.x + fx.y * fx.y + ftxp.x * ftxp.x + ftxp.y * ftxp.y;
    let denom = denom.max(1e-12);
    let val = xp.dot(&fx);
    ((val * val) / denom).sqrt()
}

/// Mean of the two point-to-epipolar-line distances in pixels.
pub fn symmetric_epipolar_distance(f: &Mat3, p1: &Pt2, p2: &Pt2) -> Real {
    let d2 = epipolar_line(f, p1).dot(&to_homogeneous(p2)).abs();
    let d1 = epipolar_line_transposed(f, p2)
        .dot(&to_homogeneous(p1))
        .abs();
    0.5 * (d1 + d2)
}

/// One pixel correspondence, the datum of [`FundamentalEstimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMatch {
    pub a: Pt2,
    pub b: Pt2,
}

impl PixelMatch {
    /// Zip two index-aligned point sequences.
    pub fn zip(pts1: &[Pt2], pts2: &[Pt2]) -> Vec<Self> {
        pts1.iter()
            .zip(pts2.iter())
            .map(|(&a, &b)| Self { a, b })
            .collect()
    }
}

/// The normalized 8-point solver as a consensus-loop inner estimator.
///
/// The residual is the Sampson distance in pixels.
#[derive(Debug, Clone, Copy)]
pub struct FundamentalEstimator;

impl Estimator for FundamentalEstimator {
    type Datum = PixelMatch;
    type Model = Mat3;

    const MIN_SAMPLES: usize = MIN_CORRESPONDENCES;

    fn fit(data: &[Self::Datum], sample_indices: &[usize]) -> Option<Self::Model> {
        if Self::is_degenerate(data, sample_indices) {
            return None;
        }
        let mut p1 = Vec::with_capacity(sample_indices.len());
        let mut p2 = Vec::with_capacity(sample_indices.len());
        for &idx in sample_indices {
            p1.push(data[idx].a);
            p2.push(data[idx].b);
        }
        fundamental_8point(&p1, &p2).ok()
    }

    fn residual(model: &Self::Model, datum: &Self::Datum) -> f64 {
        sampson_distance(model, &datum.a, &datum.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twoview_core::synthetic::{noise::PixelJitter, two_view::TwoViewScene};
    use twoview_core::EpipolarError;

    #[test]
    fn fundamental_8point_satisfies_epipolar_constraint() {
        let scene = TwoViewScene::standard(24, 3).unwrap();
        let c = &scene.correspondences;

        let f = fundamental_8point(&c.points_a, &c.points_b).unwrap();

        assert!((f.norm() - 1.0).abs() < 1e-12);
        for (p1, p2) in c.iter() {
            let r = algebraic_residual(&f, p1, p2);
            assert!(r.abs() < 1e-6, "epipolar residual too large: {}", r);
            assert!(sampson_distance(&f, p1, p2) < 1e-6);
        }
    }

    #[test]
    fn fundamental_8point_has_rank_two() {
        let scene = TwoViewScene::standard(16, 9).unwrap();
        let c = &scene.correspondences;
        let f = fundamental_8point(&c.points_a, &c.points_b).unwrap();

        let s = Svd3::new(&f).unwrap().singular_values;
        assert!(s[2] < 1e-12 * s[0], "third singular value not zero: {:?}", s);
        assert!(s[1] > 1e-6 * s[0], "second singular value vanished: {:?}", s);
    }

    #[test]
    fn exactly_eight_points_are_enough() {
        let scene = TwoViewScene::standard(8, 21).unwrap();
        let c = &scene.correspondences;
        let f = fundamental_8point(&c.points_a, &c.points_b).unwrap();
        for (p1, p2) in c.iter() {
            assert!(algebraic_residual(&f, p1, p2).abs() < 1e-6);
        }
    }

    #[test]
    fn seven_points_are_rejected() {
        let scene = TwoViewScene::standard(7, 1).unwrap();
        let c = &scene.correspondences;
        let err = fundamental_8point(&c.points_a, &c.points_b).unwrap_err();
        assert_eq!(err, EpipolarError::insufficient(8, 7, 7));
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        let scene = TwoViewScene::standard(10, 1).unwrap();
        let c = &scene.correspondences;
        let err = fundamental_8point(&c.points_a, &c.points_b[..9]).unwrap_err();
        assert!(matches!(
            err,
            EpipolarError::InsufficientCorrespondences {
                got_a: 10,
                got_b: 9,
                ..
            }
        ));
    }

    #[test]
    fn identical_points_are_ill_conditioned() {
        let pts = vec![Pt2::new(320.0, 240.0); 8];
        let err = fundamental_8point(&pts, &pts).unwrap_err();
        assert!(matches!(err, EpipolarError::IllConditionedInput(_)));
    }

    #[test]
    fn collinear_points_still_return_a_matrix() {
        let pts1: Vec<Pt2> = (0..10)
            .map(|i| Pt2::new(100.0 + 10.0 * i as Real, 50.0 + 5.0 * i as Real))
            .collect();
        let pts2: Vec<Pt2> = (0..10)
            .map(|i| Pt2::new(90.0 + 11.0 * i as Real, 60.0 + 4.0 * i as Real))
            .collect();
        let f = fundamental_8point(&pts1, &pts2).unwrap();
        assert!(f.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let scene = TwoViewScene::standard(30, 4).unwrap();
        let c = scene.noisy_correspondences(&PixelJitter {
            seed: 8,
            amplitude_px: 0.5,
        });
        let f1 = fundamental_8point(&c.points_a, &c.points_b).unwrap();
        let f2 = fundamental_8point(&c.points_a, &c.points_b).unwrap();
        assert_eq!(f1, f2);
    }

    #[test]
    fn noisy_points_have_small_sampson_error() {
        let scene = TwoViewScene::standard(60, 5).unwrap();
        let c = scene.noisy_correspondences(&PixelJitter {
            seed: 2,
            amplitude_px: 0.5,
        });
        let f = fundamental_8point(&c.points_a, &c.points_b).unwrap();
        let max_err = c
            .iter()
            .map(|(p1, p2)| sampson_distance(&f, p1, p2))
            .fold(0.0, Real::max);
        assert!(max_err < 2.0, "sampson error too large: {}", max_err);
    }

    #[test]
    fn epipolar_line_passes_through_match() {
        let scene = TwoViewScene::standard(12, 6).unwrap();
        let c = &scene.correspondences;
        let f = fundamental_8point(&c.points_a, &c.points_b).unwrap();

        let l = epipolar_line(&f, &c.points_a[3]);
        assert!(((l.x * l.x + l.y * l.y) - 1.0).abs() < 1e-12);
        assert!(l.dot(&to_homogeneous(&c.points_b[3])).abs() < 1e-6);
        assert!(symmetric_epipolar_distance(&f, &c.points_a[3], &c.points_b[3]) < 1e-6);
    }

    #[test]
    fn estimator_flags_gross_outliers() {
        let scene = TwoViewScene::standard(20, 12).unwrap();
        let c = &scene.correspondences;
        let mut data = PixelMatch::zip(&c.points_a, &c.points_b);
        data[4].b = Pt2::new(data[4].b.x + 40.0, data[4].b.y - 35.0);

        let sample: Vec<usize> = (0..20).filter(|&i| i != 4).collect();
        assert!(FundamentalEstimator::fit(&data, &sample[..7]).is_none());

        let model = FundamentalEstimator::fit(&data, &sample).unwrap();
        let inliers = FundamentalEstimator::inliers(&model, &data, 1e-3);
        assert_eq!(inliers, sample);
    }
}
