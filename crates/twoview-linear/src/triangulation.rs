//! Linear triangulation of 3D points from two or more views.
//!
//! Uses a DLT formulation on the camera projection matrices and image points.

use nalgebra::DMatrix;
use twoview_core::{CameraMatrix, EpipolarError, Mat34, Pt2, Pt3, Real, Result};

use crate::epipolar::PoseHypothesis;

/// Linear triangulation from multiple views using DLT.
///
/// `cameras` are projection matrices `P_i`, and `points` are their corresponding
/// image coordinates. The returned 3D point is in the same world frame as the
/// camera matrices.
///
/// # Errors
///
/// - [`EpipolarError::ShapeMismatch`] for fewer than two views or a
///   camera/point count mismatch.
/// - [`EpipolarError::IllConditionedInput`] if the solution lies at infinity
///   (parallel rays).
pub fn triangulate_point_linear(cameras: &[Mat34], points: &[Pt2]) -> Result<Pt3> {
    if cameras.len() < 2 || cameras.len() != points.len() {
        return Err(EpipolarError::ShapeMismatch {
            what: "triangulation views",
            expected: "at least 2 cameras with one point each".to_string(),
            got: format!("{} cameras, {} points", cameras.len(), points.len()),
        });
    }

    let mut a = DMatrix::<Real>::zeros(2 * cameras.len(), 4);
    for (i, (p, cam)) in points.iter().zip(cameras.iter()).enumerate() {
        let u = p.x;
        let v = p.y;

        let r0 = 2 * i;
        let r1 = 2 * i + 1;

        let row0 = cam.row(0);
        let row1 = cam.row(1);
        let row2 = cam.row(2);

        a.row_mut(r0).copy_from(&(u * row2 - row0));
        a.row_mut(r1).copy_from(&(v * row2 - row1));
    }

    let svd = a.svd(false, true);
    let v_t = svd.v_t.ok_or(EpipolarError::SvdFailed("triangulation"))?;
    let x_h = v_t.row(v_t.nrows() - 1);

    let w = x_h[3];
    if w.abs() <= Real::EPSILON {
        return Err(EpipolarError::IllConditionedInput(
            "triangulated point lies at infinity".to_string(),
        ));
    }

    Ok(Pt3::new(x_h[0] / w, x_h[1] / w, x_h[2] / w))
}

/// Triangulate one normalized-coordinate pair under `pose`.
///
/// `xa` is observed by the reference camera `[I | 0]`, `xb` by `[R | t]`.
/// The point is returned in the reference frame.
pub fn triangulate_pair(pose: &PoseHypothesis, xa: &Pt2, xb: &Pt2) -> Result<Pt3> {
    let reference = PoseHypothesis::identity().projection_matrix();
    triangulate_point_linear(&[reference, pose.projection_matrix()], &[*xa, *xb])
}

/// Triangulate pixel correspondences under `pose`, one result per pair.
///
/// Pixels are mapped to normalized coordinates with `K⁻¹` first. Pairs whose
/// rays are parallel yield an error entry rather than aborting the batch.
pub fn triangulate_correspondences(
    pose: &PoseHypothesis,
    pts_a: &[Pt2],
    pts_b: &[Pt2],
    k_a: &CameraMatrix,
    k_b: &CameraMatrix,
) -> Vec<Result<Pt3>> {
    pts_a
        .iter()
        .zip(pts_b.iter())
        .map(|(pa, pb)| {
            let xa = k_a.pixel_to_ray(pa);
            let xb = k_b.pixel_to_ray(pb);
            triangulate_pair(pose, &Pt2::new(xa.x, xa.y), &Pt2::new(xb.x, xb.y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;
    use twoview_core::synthetic::two_view::TwoViewScene;

    fn project(cam: &Mat34, p: &Pt3) -> Pt2 {
        let x = cam * Vector4::new(p.x, p.y, p.z, 1.0);
        Pt2::new(x.x / x.z, x.y / x.z)
    }

    #[test]
    fn triangulation_two_views_recovers_point() {
        let cam1 = Mat34::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let cam2 = Mat34::new(1.0, 0.0, 0.0, -0.2, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);

        let pw = Pt3::new(0.1, -0.05, 2.0);
        let p1 = project(&cam1, &pw);
        let p2 = project(&cam2, &pw);

        let est = triangulate_point_linear(&[cam1, cam2], &[p1, p2]).unwrap();

        let err = (est - pw).norm();
        assert!(err < 1e-6, "triangulation error too large: {}", err);
    }

    #[test]
    fn single_view_is_rejected() {
        let cam = PoseHypothesis::identity().projection_matrix();
        let err = triangulate_point_linear(&[cam], &[Pt2::new(0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, EpipolarError::ShapeMismatch { .. }));
    }

    #[test]
    fn scene_points_are_recovered_with_true_pose() {
        let scene = TwoViewScene::standard(15, 31).unwrap();
        let pose = PoseHypothesis::from_rotation_translation(scene.rotation, scene.translation());
        let c = &scene.correspondences;

        let points =
            triangulate_correspondences(&pose, &c.points_a, &c.points_b, &scene.k_a, &scene.k_b);
        for (est, gt) in points.iter().zip(scene.points.iter()) {
            let est = est.as_ref().unwrap();
            assert!((est - gt).norm() < 1e-6, "point error {}", (est - gt).norm());
        }
    }
}
