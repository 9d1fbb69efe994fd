use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use engine_core::math::{Mat4, Quat, Transform, Vec3, Vec4, HALF_PI};
use engine_core::render::{
    uniforms, CommandLog, HeadlessBackend, Material, Mesh, MeshData, RecordingShader, Renderer,
    SceneData, Shader, StaticMesh, UniformValue,
};
use engine_core::scene::{Scene, SceneError, SceneObject};
use engine_tests::capture_logs;
use tracing::Level;

fn recording_renderer() -> (Renderer, CommandLog) {
    let backend = HeadlessBackend::new();
    let log = backend.log();
    let mut renderer = Renderer::new(Box::new(backend));
    renderer.init();
    (renderer, log)
}

fn cube(renderer: &mut Renderer, name: &str, position: Vec3) -> (SceneObject, u32) {
    let mesh = StaticMesh::new(renderer, &MeshData::cube());
    let id = mesh.vertex_array().id;
    let object = SceneObject::new(name, Some(Arc::new(mesh)), Transform::from_position(position));
    (object, id)
}

#[test]
fn draws_follow_insertion_order_across_removal() -> anyhow::Result<()> {
    let (mut renderer, log) = recording_renderer();
    let mut scene = Scene::new("order");
    let mut ids = Vec::new();
    for (i, name) in ["A", "B", "C"].into_iter().enumerate() {
        let (object, id) = cube(&mut renderer, name, Vec3::new(i as f32, 0.0, 0.0));
        scene.add_object(object)?;
        ids.push(id);
    }
    let mut shader = RecordingShader::new("flat");

    scene.render(&mut renderer, Some(&mut shader));
    assert_eq!(log.draw_calls(), ids);

    let b = scene.remove_object("B")?;
    scene.add_object(b)?;
    log.clear();
    let stats = scene
        .render(&mut renderer, Some(&mut shader))
        .expect("shader supplied");
    assert_eq!(log.draw_calls(), vec![ids[0], ids[2], ids[1]]);
    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.indices, 3 * 36);
    Ok(())
}

#[test]
fn missing_shader_is_an_error_and_draws_nothing() {
    let (mut renderer, log) = recording_renderer();
    let mut scene = Scene::new("noshader");
    let (object, _) = cube(&mut renderer, "A", Vec3::ZERO);
    scene.add_object(object).expect("add");
    log.clear();

    let (stats, logs) = capture_logs(|| scene.render(&mut renderer, None));
    assert!(stats.is_none());
    assert!(log.draw_calls().is_empty());
    assert_eq!(logs.count(Level::ERROR), 1);
}

#[test]
fn duplicate_and_missing_names_warn() {
    let mut scene = Scene::new("names");
    let (results, logs) = capture_logs(|| {
        let first = scene.add_object(SceneObject::empty("A")).map(|_| ());
        let dup = scene.add_object(SceneObject::empty("A")).map(|_| ());
        let missing = scene.remove_object("Z").map(|_| ());
        (first, dup, missing)
    });
    assert_eq!(results.0, Ok(()));
    assert_eq!(results.1, Err(SceneError::DuplicateName("A".into())));
    assert_eq!(results.2, Err(SceneError::NotFound("Z".into())));
    assert_eq!(logs.count(Level::WARN), 2);
    assert!(logs.contains(Level::INFO, "Added object"));
    assert_eq!(scene.len(), 1);
}

#[test]
fn meshless_objects_and_empty_geometry_are_skipped() {
    let (mut renderer, log) = recording_renderer();
    let mut scene = Scene::new("skips");
    let empty = StaticMesh::new(&mut renderer, &MeshData::new(Vec::new(), Vec::new()));
    scene
        .add_object(SceneObject::new("hollow", Some(Arc::new(empty)), Transform::IDENTITY))
        .expect("add");
    scene.add_object(SceneObject::empty("marker")).expect("add");
    let (object, id) = cube(&mut renderer, "solid", Vec3::ZERO);
    scene.add_object(object).expect("add");

    let mut shader = RecordingShader::new("flat");
    let (stats, logs) = capture_logs(|| scene.render(&mut renderer, Some(&mut shader)));
    let stats = stats.expect("shader supplied");
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(log.draw_calls(), vec![id]);
    assert!(logs.contains(Level::WARN, "index count is 0"));
    // Two meshes bound the shader; the meshless object never touched it.
    assert_eq!(shader.bind_count(), 2);
}

#[test]
fn frame_uniforms_come_from_the_scene_camera() {
    let (mut renderer, _log) = recording_renderer();
    let mut scene = Scene::new("uniforms");
    let mesh = StaticMesh::new(&mut renderer, &MeshData::sphere(8))
        .with_material(Material::with_albedo(Vec4::new(0.2, 0.4, 0.6, 1.0)));
    let transform = Transform::new(
        Vec3::new(1.0, 2.0, 3.0),
        Quat::from_axis_angle(Vec3::UP, HALF_PI),
        Vec3::splat(2.0),
    );
    scene
        .add_object(SceneObject::new("ball", Some(Arc::new(mesh)), transform))
        .expect("add");
    scene.camera_mut().set_position(Vec3::new(0.0, 3.0, 10.0));

    let mut shader = RecordingShader::new("pbr");
    scene.render(&mut renderer, Some(&mut shader));

    let vp = shader.mat4(uniforms::VIEW_PROJECTION).expect("view projection");
    assert!(vp.abs_diff_eq(&scene.camera().view_projection(), 1e-6));
    assert_eq!(
        shader.uniform(uniforms::VIEW_POSITION),
        Some(&UniformValue::Vec3(Vec3::new(0.0, 3.0, 10.0)))
    );
    let model = shader.mat4(uniforms::MODEL).expect("model");
    assert!(model.abs_diff_eq(&transform.to_mat4(), 1e-6));
    assert_eq!(
        shader.uniform(uniforms::MATERIAL_ALBEDO),
        Some(&UniformValue::Vec4(Vec4::new(0.2, 0.4, 0.6, 1.0)))
    );
    let normal = shader.mat3(uniforms::NORMAL_MATRIX).expect("normal matrix");
    assert!(normal.abs_diff_eq(&transform.to_mat4().normal_matrix(), 1e-6));
}

/// Counts draws and records the model matrices it was handed.
struct CountingMesh {
    draws: Rc<Cell<u32>>,
    last_origin: Rc<Cell<Vec3>>,
}

impl Mesh for CountingMesh {
    fn draw(
        &self,
        _renderer: &mut Renderer,
        _frame: &SceneData,
        shader: &mut dyn Shader,
        transform: &Mat4,
    ) {
        self.draws.set(self.draws.get() + 1);
        self.last_origin.set(transform.get_translation());
        shader.set_mat4(uniforms::MODEL, transform);
    }
}

#[test]
fn custom_meshes_receive_updated_transforms() {
    let (mut renderer, _log) = recording_renderer();
    let draws = Rc::new(Cell::new(0));
    let last_origin = Rc::new(Cell::new(Vec3::ZERO));
    let counter = CountingMesh {
        draws: draws.clone(),
        last_origin: last_origin.clone(),
    };

    let mut scene = Scene::new("counter");
    scene
        .add_object(
            SceneObject::new("counter", Some(Arc::new(counter)), Transform::IDENTITY).with_update(
                |object, dt| object.transform.translate(Vec3::new(0.0, 0.0, -dt)),
            ),
        )
        .expect("add");

    let mut shader = RecordingShader::new("counter");
    for _ in 0..4 {
        scene.update(0.5);
        scene.render(&mut renderer, Some(&mut shader));
    }
    assert_eq!(draws.get(), 4);
    assert!(last_origin.get().abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-6));
    assert_eq!(shader.history(uniforms::MODEL).len(), 4);
}

#[test]
fn look_at_orients_model_forward_toward_target() {
    let mut transform = Transform::from_position(Vec3::new(2.0, 0.0, 2.0));
    transform.look_at(Vec3::new(2.0, 0.0, -8.0), Vec3::UP);
    assert!(transform.forward().abs_diff_eq(Vec3::FORWARD, 1e-5));

    transform.look_at(Vec3::new(12.0, 0.0, 2.0), Vec3::UP);
    let model = transform.to_mat4();
    assert!(model.transform_direction(Vec3::FORWARD).abs_diff_eq(Vec3::RIGHT, 1e-5));
    assert!(model
        .transform_point(Vec3::new(0.0, 0.0, -1.0))
        .abs_diff_eq(Vec3::new(3.0, 0.0, 2.0), 1e-5));
}
