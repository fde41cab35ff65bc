use nalgebra::{DMatrix, Matrix3, RealField, Vector2};
use serde::{Deserialize, Serialize};

use crate::{mat3_from_dmatrix, mat3_from_rows, EpipolarError, Mat3, Pt2, Real, Result, Vec3};

/// Intrinsics that map normalized image coordinates to pixel coordinates.
pub trait IntrinsicsModel<S: RealField + Copy> {
    /// Convert normalized (Z=1 plane) coordinates into pixel coordinates.
    fn normalized_to_pixel(&self, n: &Vector2<S>) -> Vector2<S>;
    /// Convert pixel coordinates into normalized (Z=1 plane) coordinates.
    fn pixel_to_normalized(&self, pixel: &Vector2<S>) -> Vector2<S>;
}

/// Standard pinhole intrinsics with optional skew.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FxFyCxCySkew<S: RealField + Copy> {
    /// Focal length in pixels along X.
    pub fx: S,
    /// Focal length in pixels along Y.
    pub fy: S,
    /// Principal point X coordinate in pixels.
    pub cx: S,
    /// Principal point Y coordinate in pixels.
    pub cy: S,
    /// Skew term (typically 0).
    pub skew: S,
}

impl<S: RealField + Copy> FxFyCxCySkew<S> {
    /// Return the 3x3 camera intrinsics matrix K.
    pub fn k_matrix(&self) -> Matrix3<S> {
        Matrix3::new(
            self.fx,
            self.skew,
            self.cx,
            S::zero(),
            self.fy,
            self.cy,
            S::zero(),
            S::zero(),
            S::one(),
        )
    }
}

impl<S: RealField + Copy> IntrinsicsModel<S> for FxFyCxCySkew<S> {
    fn normalized_to_pixel(&self, n: &Vector2<S>) -> Vector2<S> {
        let u = self.fx * n.x + self.skew * n.y + self.cx;
        let v = self.fy * n.y + self.cy;
        Vector2::new(u, v)
    }

    fn pixel_to_normalized(&self, pixel: &Vector2<S>) -> Vector2<S> {
        let ny = (pixel.y - self.cy) / self.fy;
        let nx = (pixel.x - self.cx - self.skew * ny) / self.fx;
        Vector2::new(nx, ny)
    }
}

/// Validated pinhole calibration matrix `K`.
///
/// Invariants: upper triangular, `K[2][2] = 1`, `fx > 0` and `fy > 0`, all
/// entries finite. The inverse is computed in closed form, so it always
/// exists.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Mat3", into = "Mat3")]
pub struct CameraMatrix {
    k: Mat3,
}

const K_TRIANGULAR_TOL: Real = 1e-12;

impl CameraMatrix {
    /// Wrap `k` after checking the pinhole invariants.
    ///
    /// # Errors
    ///
    /// [`EpipolarError::InvalidIntrinsics`] if `k` is not upper triangular,
    /// has a non-positive focal length, or `K[2][2] != 1`.
    pub fn new(k: Mat3) -> Result<Self> {
        if k.iter().any(|v| !v.is_finite()) {
            return Err(EpipolarError::InvalidIntrinsics(
                "non-finite entry in K".to_string(),
            ));
        }
        let lower = [k[(1, 0)], k[(2, 0)], k[(2, 1)]];
        if lower.iter().any(|v| v.abs() > K_TRIANGULAR_TOL) {
            return Err(EpipolarError::InvalidIntrinsics(format!(
                "K must be upper triangular, lower entries are {:?}",
                lower
            )));
        }
        if (k[(2, 2)] - 1.0).abs() > K_TRIANGULAR_TOL {
            return Err(EpipolarError::InvalidIntrinsics(format!(
                "K[2][2] must be 1, got {}",
                k[(2, 2)]
            )));
        }
        if k[(0, 0)] <= 0.0 || k[(1, 1)] <= 0.0 {
            return Err(EpipolarError::InvalidIntrinsics(format!(
                "focal lengths must be positive, got fx={} fy={}",
                k[(0, 0)],
                k[(1, 1)]
            )));
        }
        Ok(Self { k })
    }

    /// Build from nested row-major rows, e.g. parsed JSON.
    ///
    /// # Errors
    ///
    /// [`EpipolarError::ShapeMismatch`] for anything other than 3×3, then the
    /// checks of [`CameraMatrix::new`].
    pub fn from_rows(rows: &[Vec<Real>]) -> Result<Self> {
        Self::new(mat3_from_rows("intrinsic matrix", rows)?)
    }

    /// Build from a dynamically-sized matrix.
    pub fn from_dmatrix(k: &DMatrix<Real>) -> Result<Self> {
        Self::new(mat3_from_dmatrix("intrinsic matrix", k)?)
    }

    /// The 3×3 matrix `K`.
    pub fn matrix(&self) -> &Mat3 {
        &self.k
    }

    /// Closed-form inverse of the upper-triangular `K`.
    pub fn inverse(&self) -> Mat3 {
        let fx = self.k[(0, 0)];
        let s = self.k[(0, 1)];
        let cx = self.k[(0, 2)];
        let fy = self.k[(1, 1)];
        let cy = self.k[(1, 2)];
        Mat3::new(
            1.0 / fx,
            -s / (fx * fy),
            (s * cy - cx * fy) / (fx * fy),
            0.0,
            1.0 / fy,
            -cy / fy,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Parametric view of this matrix.
    pub fn intrinsics(&self) -> FxFyCxCySkew<Real> {
        FxFyCxCySkew {
            fx: self.k[(0, 0)],
            fy: self.k[(1, 1)],
            cx: self.k[(0, 2)],
            cy: self.k[(1, 2)],
            skew: self.k[(0, 1)],
        }
    }

    /// Back-project a pixel onto the normalized image plane as `(x, y, 1)`.
    pub fn pixel_to_ray(&self, p: &Pt2) -> Vec3 {
        let n = self.intrinsics().pixel_to_normalized(&p.coords);
        Vec3::new(n.x, n.y, 1.0)
    }

    /// Project a camera-frame point to pixels, or `None` behind the camera.
    pub fn project(&self, pc: &Vec3) -> Option<Pt2> {
        if pc.z <= Real::EPSILON {
            return None;
        }
        let n = Vector2::new(pc.x / pc.z, pc.y / pc.z);
        Some(Pt2::from(self.intrinsics().normalized_to_pixel(&n)))
    }
}

impl TryFrom<Mat3> for CameraMatrix {
    type Error = EpipolarError;

    fn try_from(k: Mat3) -> Result<Self> {
        Self::new(k)
    }
}

impl From<CameraMatrix> for Mat3 {
    fn from(k: CameraMatrix) -> Self {
        k.k
    }
}

impl TryFrom<FxFyCxCySkew<Real>> for CameraMatrix {
    type Error = EpipolarError;

    fn try_from(k: FxFyCxCySkew<Real>) -> Result<Self> {
        Self::new(k.k_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_k() -> FxFyCxCySkew<Real> {
        FxFyCxCySkew {
            fx: 800.0,
            fy: 780.0,
            cx: 640.0,
            cy: 360.0,
            skew: 1.5,
        }
    }

    #[test]
    fn closed_form_inverse_matches_numeric() {
        let k = CameraMatrix::new(sample_k().k_matrix()).unwrap();
        let numeric = k.matrix().try_inverse().unwrap();
        let err = (k.inverse() - numeric).amax();
        assert!(err < 1e-12, "inverse mismatch: {}", err);
    }

    #[test]
    fn pixel_ray_roundtrip() {
        let k = CameraMatrix::try_from(sample_k()).unwrap();
        let pc = Vec3::new(0.3, -0.2, 2.5);
        let px = k.project(&pc).unwrap();
        let ray = k.pixel_to_ray(&px);
        let expected = pc / pc.z;
        assert!((ray - expected).norm() < 1e-12);
        assert!(k.project(&Vec3::new(0.0, 0.0, -1.0)).is_none());
    }

    #[test]
    fn rejects_invalid_matrices() {
        let mut k = sample_k().k_matrix();
        k[(2, 0)] = 0.1;
        assert!(matches!(
            CameraMatrix::new(k),
            Err(EpipolarError::InvalidIntrinsics(_))
        ));

        let mut k = sample_k().k_matrix();
        k[(0, 0)] = -800.0;
        assert!(CameraMatrix::new(k).is_err());

        let mut k = sample_k().k_matrix();
        k[(2, 2)] = 2.0;
        assert!(CameraMatrix::new(k).is_err());

        let err = CameraMatrix::from_rows(&[vec![800.0, 0.0, 320.0], vec![0.0, 800.0, 240.0]])
            .unwrap_err();
        assert!(matches!(err, EpipolarError::ShapeMismatch { .. }));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let k = CameraMatrix::try_from(sample_k()).unwrap();
        let json = serde_json::to_string(&k).unwrap();
        let back: CameraMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, k);

        let bad = Mat3::new(800.0, 0.0, 0.0, 0.0, 800.0, 0.0, 0.0, 0.0, 0.0);
        let json = serde_json::to_string(&bad).unwrap();
        assert!(serde_json::from_str::<CameraMatrix>(&json).is_err());
    }
}
