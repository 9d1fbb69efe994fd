use engine_core::camera::{Camera, ProjectionError, ProjectionKind};
use engine_core::math::{to_radians, Plane, Quat, Vec3, Vec4, HALF_PI, PI};
use engine_tests::capture_logs;
use tracing::Level;

#[test]
fn perspective_maps_near_and_far_to_clip_bounds() -> anyhow::Result<()> {
    let mut camera = Camera::perspective(to_radians(60.0), 16.0 / 9.0, 0.1, 1000.0)?;
    camera.set_position(Vec3::new(0.0, 0.0, 5.0));
    let vp = camera.view_projection();

    let near = vp.transform_point(Vec3::new(0.0, 0.0, 4.9));
    let far = vp.transform_point(Vec3::new(0.0, 0.0, -995.0));
    assert!((near.z + 1.0).abs() < 1e-3, "near {near}");
    assert!((far.z - 1.0).abs() < 1e-3, "far {far}");

    // A point on the top edge of the frustum lands on ndc y = 1.
    let depth = 10.0;
    let half_height = depth * (to_radians(60.0) * 0.5).tan();
    let top = vp.transform_point(Vec3::new(0.0, half_height, 5.0 - depth));
    assert!((top.y - 1.0).abs() < 1e-3);
    Ok(())
}

#[test]
fn orthographic_size_is_full_vertical_extent() -> anyhow::Result<()> {
    let camera = Camera::orthographic(10.0, 2.0, 0.1, 100.0)?;
    let corner = camera.view_projection().transform_point(Vec3::new(10.0, 5.0, -50.0));
    assert!(corner.abs_diff_eq(Vec3::new(1.0, 1.0, corner.z), 1e-4), "{corner}");

    let clip = camera.view_projection() * Vec4::new(0.0, 0.0, -50.0, 1.0);
    assert!((clip.w - 1.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn invalid_parameters_are_logged_and_ignored() {
    let mut camera = Camera::default();
    let before = *camera.projection();

    let (results, logs) = capture_logs(|| {
        [
            camera.set_perspective(0.0, 1.0, 0.1, 10.0),
            camera.set_perspective(PI, 1.0, 0.1, 10.0),
            camera.set_perspective(1.0, 0.0, 0.1, 10.0),
            camera.set_perspective(1.0, 1.0, 0.0, 10.0),
            camera.set_orthographic(-1.0, 1.0, 0.1, 10.0),
            camera.set_orthographic(1.0, 1.0, 5.0, 5.0),
            camera.set_perspective(1.0, 1.0, 0.1, f32::INFINITY),
            camera.set_perspective(1.0, f32::INFINITY, 0.1, 10.0),
            camera.set_perspective(1.0, 1.0, f32::INFINITY, f32::INFINITY),
            camera.set_orthographic(f32::INFINITY, 1.0, 0.1, 10.0),
        ]
    });

    assert_eq!(results[0], Err(ProjectionError::InvalidFov(0.0)));
    assert_eq!(results[1], Err(ProjectionError::InvalidFov(PI)));
    assert_eq!(results[2], Err(ProjectionError::InvalidAspect(0.0)));
    assert_eq!(results[3], Err(ProjectionError::InvalidNear(0.0)));
    assert_eq!(results[4], Err(ProjectionError::InvalidSize(-1.0)));
    assert_eq!(results[5], Err(ProjectionError::InvalidFar { far: 5.0, near: 5.0 }));
    assert_eq!(
        results[6],
        Err(ProjectionError::InvalidFar { far: f32::INFINITY, near: 0.1 })
    );
    assert_eq!(results[7], Err(ProjectionError::InvalidAspect(f32::INFINITY)));
    assert_eq!(results[8], Err(ProjectionError::InvalidNear(f32::INFINITY)));
    assert_eq!(results[9], Err(ProjectionError::InvalidSize(f32::INFINITY)));
    assert_eq!(logs.count(Level::ERROR), 10);
    assert_eq!(camera.kind(), ProjectionKind::Perspective);
    assert!(camera.projection().abs_diff_eq(&before, 0.0));
}

#[test]
fn aspect_change_keeps_projection_kind() -> anyhow::Result<()> {
    let mut camera = Camera::orthographic(4.0, 1.0, 0.1, 50.0)?;
    camera.set_aspect(2.0)?;
    assert_eq!(camera.kind(), ProjectionKind::Orthographic);
    assert_eq!(camera.size(), 4.0);
    assert_eq!(camera.aspect(), 2.0);
    assert!(camera.set_aspect(-1.0).is_err());
    assert_eq!(camera.aspect(), 2.0);
    Ok(())
}

#[test]
fn view_moves_the_eye_to_the_origin() {
    let mut camera = Camera::default();
    camera.set_position(Vec3::new(3.0, 4.0, 5.0));
    camera.look_at(Vec3::ZERO, Vec3::UP);
    let eye = camera.view().transform_point(camera.position());
    assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));

    // The target lies straight ahead on the view's -Z axis.
    let target = camera.view().transform_point(Vec3::ZERO);
    assert!(target.abs_diff_eq(Vec3::new(0.0, 0.0, -Vec3::new(3.0, 4.0, 5.0).length()), 1e-3));
}

#[test]
fn centre_ray_hits_the_ground_under_the_target() {
    let mut camera = Camera::default();
    camera.set_position(Vec3::new(0.0, 5.0, 5.0));
    camera.look_at(Vec3::new(1.0, 0.0, -1.0), Vec3::UP);
    let hit = camera
        .screen_to_plane(0.0, 0.0, &Plane::new(Vec3::UP, 0.0))
        .expect("ray points at the ground");
    assert!(hit.abs_diff_eq(Vec3::new(1.0, 0.0, -1.0), 1e-2), "{hit}");

    // Looking straight up never reaches the ground.
    camera.look_at(Vec3::new(0.0, 10.0, 5.0), Vec3::BACKWARD);
    assert!(camera
        .screen_to_plane(0.0, 0.0, &Plane::new(Vec3::UP, 0.0))
        .is_none());
}

#[test]
fn rotate_and_translate_move_the_basis() {
    let mut camera = Camera::default();
    camera.rotate(Quat::from_axis_angle(Vec3::UP, HALF_PI));
    assert!(camera.forward().abs_diff_eq(Vec3::LEFT, 1e-5));
    assert!(camera.right().abs_diff_eq(Vec3::FORWARD, 1e-5));
    camera.translate(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
}
