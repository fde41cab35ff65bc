//! Synthetic two-camera rig.
//!
//! Camera A sits at the origin of the world frame looking down `+Z`.
//! Camera B has orientation `R` and center `C` so that a world point `X`
//! maps into camera B as `X_b = R (X - C) = R X + t` with `t = -R C`.

use anyhow::Result;
use nalgebra::Rotation3;

use super::noise::{PixelJitter, SplitMix64};
use crate::{CameraMatrix, CorrespondenceSet, FxFyCxCySkew, Mat3, Pt3, Vec3};

/// Ground-truth two-view scene with exact pixel correspondences.
#[derive(Debug, Clone)]
pub struct TwoViewScene {
    /// Intrinsics of camera A.
    pub k_a: CameraMatrix,
    /// Intrinsics of camera B.
    pub k_b: CameraMatrix,
    /// Rotation taking camera-A coordinates into camera B.
    pub rotation: Mat3,
    /// Center of camera B expressed in the camera-A frame.
    pub center_b: Vec3,
    /// Scene points in the camera-A frame.
    pub points: Vec<Pt3>,
    /// Noise-free projections of `points` into both images.
    pub correspondences: CorrespondenceSet,
}

impl TwoViewScene {
    /// Project `points` through both cameras.
    ///
    /// Fails if any point lies behind either camera.
    pub fn new(
        k_a: CameraMatrix,
        k_b: CameraMatrix,
        rotation: Mat3,
        center_b: Vec3,
        points: Vec<Pt3>,
    ) -> Result<Self> {
        let mut points_a = Vec::with_capacity(points.len());
        let mut points_b = Vec::with_capacity(points.len());
        for (idx, pw) in points.iter().enumerate() {
            let pc_b = rotation * (pw.coords - center_b);
            let (Some(uv_a), Some(uv_b)) = (k_a.project(&pw.coords), k_b.project(&pc_b)) else {
                anyhow::bail!(
                    "point {idx} not visible in both cameras (z_a={:.6}, z_b={:.6})",
                    pw.z,
                    pc_b.z
                );
            };
            points_a.push(uv_a);
            points_b.push(uv_b);
        }

        Ok(Self {
            k_a,
            k_b,
            rotation,
            center_b,
            points,
            correspondences: CorrespondenceSet::new(points_a, points_b)?,
        })
    }

    /// A moderately wide-baseline rig with distinct intrinsics and `n`
    /// points drawn from a box in front of both cameras.
    pub fn standard(n: usize, seed: u64) -> Result<Self> {
        let k_a = CameraMatrix::try_from(FxFyCxCySkew {
            fx: 800.0,
            fy: 780.0,
            cx: 640.0,
            cy: 360.0,
            skew: 0.0,
        })?;
        let k_b = CameraMatrix::try_from(FxFyCxCySkew {
            fx: 820.0,
            fy: 805.0,
            cx: 630.0,
            cy: 350.0,
            skew: 0.0,
        })?;
        let rotation = *Rotation3::from_euler_angles(0.04, -0.18, 0.05).matrix();
        let center_b = Vec3::new(1.0, 0.12, 0.08);
        let points = random_points(
            n,
            seed,
            &Vec3::new(-1.5, -1.0, 4.0),
            &Vec3::new(1.5, 1.0, 8.0),
        );
        Self::new(k_a, k_b, rotation, center_b, points)
    }

    /// Translation `t = -R C` of camera B.
    pub fn translation(&self) -> Vec3 {
        -(self.rotation * self.center_b)
    }

    /// Ground-truth essential matrix `[t]_x R`.
    pub fn essential(&self) -> Mat3 {
        crate::skew(&self.translation()) * self.rotation
    }

    /// Correspondences with seeded pixel jitter, image A on stream 0 and
    /// image B on stream 1.
    pub fn noisy_correspondences(&self, jitter: &PixelJitter) -> CorrespondenceSet {
        CorrespondenceSet {
            points_a: jitter.perturb(0, &self.correspondences.points_a),
            points_b: jitter.perturb(1, &self.correspondences.points_b),
        }
    }
}

/// `n` deterministic points uniformly distributed in the box `[lo, hi]`.
pub fn random_points(n: usize, seed: u64, lo: &Vec3, hi: &Vec3) -> Vec<Pt3> {
    let mut rng = SplitMix64::new(seed);
    (0..n)
        .map(|_| {
            let x = rng.uniform(lo.x, hi.x);
            let y = rng.uniform(lo.y, hi.y);
            let z = rng.uniform(lo.z, hi.z);
            Pt3::new(x, y, z)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_scene_satisfies_epipolar_constraint() {
        let scene = TwoViewScene::standard(30, 11).unwrap();
        let e = scene.essential();
        for (pa, pb) in scene.correspondences.iter() {
            let xa = scene.k_a.pixel_to_ray(pa);
            let xb = scene.k_b.pixel_to_ray(pb);
            let val = xb.dot(&(e * xa));
            assert!(val.abs() < 1e-10, "epipolar residual {}", val);
        }
    }

    #[test]
    fn random_points_stay_in_box_and_are_reproducible() {
        let lo = Vec3::new(-1.0, -2.0, 3.0);
        let hi = Vec3::new(1.0, 2.0, 5.0);
        let a = random_points(50, 5, &lo, &hi);
        let b = random_points(50, 5, &lo, &hi);
        assert_eq!(a, b);
        for p in &a {
            for axis in 0..3 {
                assert!(p[axis] >= lo[axis] && p[axis] < hi[axis]);
            }
        }
    }

    #[test]
    fn points_behind_camera_are_rejected() {
        let scene = TwoViewScene::standard(8, 1).unwrap();
        let mut points = scene.points.clone();
        points.push(Pt3::new(0.0, 0.0, -2.0));
        let res = TwoViewScene::new(
            scene.k_a,
            scene.k_b,
            scene.rotation,
            scene.center_b,
            points,
        );
        assert!(res.is_err());
    }

    #[test]
    fn noisy_correspondences_stay_within_amplitude() {
        let scene = TwoViewScene::standard(25, 4).unwrap();
        let jitter = PixelJitter {
            seed: 9,
            amplitude_px: 0.75,
        };
        let noisy = scene.noisy_correspondences(&jitter);
        assert_eq!(noisy.len(), 25);

        let exact = &scene.correspondences;
        let mut moved = 0;
        for (n, e) in noisy
            .points_a
            .iter()
            .chain(noisy.points_b.iter())
            .zip(exact.points_a.iter().chain(exact.points_b.iter()))
        {
            let d = n - e;
            assert!(d.x.abs() <= 0.75 && d.y.abs() <= 0.75);
            if d.norm() > 0.0 {
                moved += 1;
            }
        }
        assert_eq!(moved, 50);
        assert_eq!(noisy, scene.noisy_correspondences(&jitter));
    }
}
