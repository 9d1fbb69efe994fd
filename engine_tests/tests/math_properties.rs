use engine_core::math::{Mat4, Quat, Transform, Vec3};
use engine_tests::Sampler;

const SAMPLES: usize = 200;

#[test]
fn rotation_preserves_length_and_inverse_undoes_it() {
    let mut s = Sampler::seeded(0xC0FFEE);
    for _ in 0..SAMPLES {
        let q = s.rotation();
        let v = s.vec3(5.0);
        let rotated = q * v;
        assert!((rotated.length() - v.length()).abs() < 1e-3, "{q} {v}");
        assert!((q.inverse() * rotated).abs_diff_eq(v, 1e-3));
    }
}

#[test]
fn quaternion_and_matrix_agree() {
    let mut s = Sampler::seeded(11);
    for _ in 0..SAMPLES {
        let q = s.rotation();
        let v = s.vec3(5.0);
        let m = q.to_mat4();
        assert!(m.transform_direction(v).abs_diff_eq(q * v, 1e-3));
        assert!(Quat::from_rotation_matrix(&m).same_rotation(q, 1e-4), "{q}");
        assert!((m.determinant() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn euler_round_trip_away_from_gimbal_lock() {
    let mut s = Sampler::seeded(12);
    for _ in 0..SAMPLES {
        let euler = Vec3::new(s.scalar(-3.0, 3.0), s.scalar(-1.4, 1.4), s.scalar(-3.0, 3.0));
        let back = Quat::from_euler(euler).to_euler();
        assert!(back.abs_diff_eq(euler, 1e-3), "{euler} -> {back}");
    }
}

#[test]
fn affine_inverse_round_trips() -> anyhow::Result<()> {
    let mut s = Sampler::seeded(13);
    for _ in 0..SAMPLES {
        let m = s.affine();
        let inv = m.try_inverse()?;
        assert!((m * inv).abs_diff_eq(&Mat4::IDENTITY, 1e-3), "{m}");
        assert!((inv * m).abs_diff_eq(&Mat4::IDENTITY, 1e-3));
        assert!(m.transpose().transpose().abs_diff_eq(&m, 0.0));
    }
    Ok(())
}

#[test]
fn general_inverse_round_trips() -> anyhow::Result<()> {
    let mut s = Sampler::seeded(21);
    let mut checked = 0;
    for _ in 0..SAMPLES {
        let mut rows = [[0.0; 4]; 4];
        for row in &mut rows {
            for entry in row.iter_mut() {
                *entry = s.scalar(-2.0, 2.0);
            }
        }
        let m = Mat4::from_rows(rows[0], rows[1], rows[2], rows[3]);
        // Keep the inverse well conditioned enough for f32.
        if m.determinant().abs() < 1.0 {
            continue;
        }
        let inv = m.try_inverse()?;
        assert!((m * inv).abs_diff_eq(&Mat4::IDENTITY, 1e-3), "{m}");
        assert!((inv * m).abs_diff_eq(&Mat4::IDENTITY, 1e-3), "{m}");
        checked += 1;
    }
    assert!(checked > SAMPLES / 4, "only {checked} matrices checked");
    Ok(())
}

#[test]
fn trs_determinant_is_scale_volume() {
    let mut s = Sampler::seeded(14);
    for _ in 0..SAMPLES {
        let scale = s.scale();
        let m = Mat4::from_trs(s.vec3(10.0), s.rotation(), scale);
        let volume = scale.x * scale.y * scale.z;
        assert!((m.determinant() - volume).abs() < 1e-3 * volume.max(1.0));
    }
}

#[test]
fn transform_matrix_matches_direct_application() {
    let mut s = Sampler::seeded(15);
    for _ in 0..SAMPLES {
        let t = Transform::new(s.vec3(10.0), s.rotation(), s.scale());
        let p = s.vec3(10.0);
        assert!(t.to_mat4().transform_point(p).abs_diff_eq(t.transform_point(p), 1e-3));
    }
}

#[test]
fn composition_with_uniform_scale_nests() {
    let mut s = Sampler::seeded(16);
    for _ in 0..SAMPLES {
        let parent = Transform::new(s.vec3(5.0), s.rotation(), Vec3::splat(s.scalar(0.5, 2.0)));
        let child = Transform::new(s.vec3(5.0), s.rotation(), s.scale());
        let p = s.vec3(3.0);
        let nested = parent.transform_point(child.transform_point(p));
        assert!((parent * child).transform_point(p).abs_diff_eq(nested, 1e-3));
    }
}

#[test]
fn slerp_hits_endpoints_and_halves_the_angle() {
    let mut s = Sampler::seeded(17);
    for _ in 0..SAMPLES {
        let a = s.rotation();
        let b = s.rotation();
        assert!(a.slerp(b, 0.0).same_rotation(a, 1e-4));
        assert!(a.slerp(b, 1.0).same_rotation(b, 1e-4));
        let mid = a.slerp(b, 0.5);
        assert!(mid.is_normalized());
        assert!((a.angle_between(mid) - mid.angle_between(b)).abs() < 2e-3);
    }
}

#[test]
fn slerp_from_a_rotation_to_itself_stays_put() {
    let mut s = Sampler::seeded(22);
    for _ in 0..SAMPLES {
        let a = s.rotation();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let q = a.slerp(a, t);
            assert!(q.same_rotation(a, 1e-5), "t = {t}");
            assert!(q.is_normalized());
        }
    }
}

#[test]
fn look_rotation_points_forward_along_direction() {
    let mut s = Sampler::seeded(18);
    for _ in 0..SAMPLES {
        let dir = s.direction();
        let q = Quat::look_rotation(dir, Vec3::UP);
        assert!((q * Vec3::FORWARD).abs_diff_eq(dir, 1e-3), "{dir}");
        let up = q * Vec3::UP;
        assert!(up.dot(dir).abs() < 1e-3);
    }
    // Degenerate up vector still produces a valid rotation.
    let q = Quat::look_rotation(Vec3::UP, Vec3::UP);
    assert!((q * Vec3::FORWARD).abs_diff_eq(Vec3::UP, 1e-4));
}

#[test]
fn cross_product_is_orthogonal() {
    let mut s = Sampler::seeded(19);
    for _ in 0..SAMPLES {
        let a = s.vec3(5.0);
        let b = s.vec3(5.0);
        let c = a.cross(b);
        assert!(c.dot(a).abs() < 1e-2);
        assert!(c.dot(b).abs() < 1e-2);
        assert!((a.cross(b) + b.cross(a)).abs_diff_eq(Vec3::ZERO, 1e-4));
    }
}
