//! The demo scene: two spinning cubes, a pulsing sphere and a floor, seen by
//! a camera orbiting the origin.

use std::sync::Arc;

use engine_core::math::{Quat, Transform, Vec3, Vec4, TWO_PI};
use engine_core::render::{Material, MeshData, Renderer, StaticMesh};
use engine_core::scene::{Scene, SceneObject};
use tracing::{debug, info};

/// Camera path around the scene centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub target: Vec3,
    pub radius: f32,
    pub height: f32,
    /// Radians per second.
    pub speed: f32,
    pub angle: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 8.0,
            height: 2.0,
            speed: 0.3,
            angle: 0.0,
        }
    }
}

impl Orbit {
    pub fn advance(&mut self, dt: f32) {
        self.angle += dt * self.speed;
        if self.angle > TWO_PI {
            self.angle -= TWO_PI;
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (s, c) = self.angle.sin_cos();
        self.target + Vec3::new(c * self.radius, self.height, s * self.radius)
    }
}

pub struct DemoScene {
    scene: Scene,
    orbit: Option<Orbit>,
}

impl DemoScene {
    pub const MAIN_CUBE: &'static str = "MainCube";
    pub const SPHERE: &'static str = "Sphere";
    pub const FLOOR: &'static str = "Floor";
    pub const ROTATING_CUBE: &'static str = "RotatingCube";

    /// Uploads the demo meshes through `renderer` and populates the scene.
    pub fn new(renderer: &mut Renderer) -> Self {
        info!("Initializing demo scene");
        let mut scene = Scene::new("DemoScene");

        let main_cube = StaticMesh::new(renderer, &MeshData::cube()).with_material(Material {
            albedo: Vec4::new(0.8, 0.2, 0.2, 1.0),
            metallic: 0.8,
            roughness: 0.2,
            ..Material::default()
        });
        let sphere = StaticMesh::new(renderer, &MeshData::sphere(32)).with_material(Material {
            albedo: Vec4::new(1.0, 0.8, 0.4, 1.0),
            metallic: 1.0,
            roughness: 0.1,
            ..Material::default()
        });
        let floor = StaticMesh::new(renderer, &MeshData::plane()).with_material(Material {
            albedo: Vec4::new(0.5, 0.5, 0.5, 1.0),
            metallic: 0.0,
            roughness: 0.9,
            ..Material::default()
        });
        let small_cube = StaticMesh::new(renderer, &MeshData::cube()).with_material(Material {
            albedo: Vec4::new(0.2, 0.3, 0.8, 1.0),
            metallic: 0.0,
            roughness: 0.6,
            ..Material::default()
        });

        let objects = [
            SceneObject::new(
                Self::MAIN_CUBE,
                Some(Arc::new(main_cube)),
                Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
            )
            .with_update(spin(Vec3::new(0.3, 1.0, 0.2), 0.6)),
            SceneObject::new(
                Self::SPHERE,
                Some(Arc::new(sphere)),
                Transform::from_position(Vec3::new(3.0, 0.5, 0.0)),
            )
            .with_update(pulse(2.0, 0.2)),
            SceneObject::new(
                Self::FLOOR,
                Some(Arc::new(floor)),
                Transform::from_position(Vec3::new(0.0, -1.5, 0.0))
                    .with_scale(Vec3::new(10.0, 1.0, 10.0)),
            ),
            SceneObject::new(
                Self::ROTATING_CUBE,
                Some(Arc::new(small_cube)),
                Transform::from_position(Vec3::new(-3.0, 0.5, 0.0)).with_scale(Vec3::splat(0.7)),
            )
            .with_update(spin(Vec3::UP, 1.2)),
        ];
        for object in objects {
            // Names above are distinct.
            let _ = scene.add_object(object);
        }

        let orbit = Orbit::default();
        let camera = scene.camera_mut();
        camera.set_position(orbit.eye());
        camera.look_at(orbit.target, Vec3::UP);

        info!(objects = scene.len(), "Demo scene initialized");
        Self {
            scene,
            orbit: Some(orbit),
        }
    }

    /// Stops (`None`) or replaces the camera orbit.
    pub fn set_orbit(&mut self, orbit: Option<Orbit>) {
        self.orbit = orbit;
    }

    pub fn orbit(&self) -> Option<&Orbit> {
        self.orbit.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Advances object animations, then the camera orbit.
    pub fn update(&mut self, dt: f32) {
        self.scene.update(dt);

        if let Some(orbit) = self.orbit.as_mut() {
            orbit.advance(dt);
            let eye = orbit.eye();
            let target = orbit.target;
            let camera = self.scene.camera_mut();
            camera.set_position(eye);
            camera.look_at(target, Vec3::UP);
            debug!(angle = orbit.angle, "Camera orbit");
        }
    }
}

/// Absolute rotation of `speed` rad/s about `axis`, from the object's
/// first update.
fn spin(axis: Vec3, speed: f32) -> impl FnMut(&mut SceneObject, f32) {
    let axis = axis.normalized();
    let mut elapsed = 0.0_f32;
    move |object, dt| {
        elapsed += dt;
        object.transform.rotation = Quat::from_axis_angle(axis, elapsed * speed);
    }
}

/// Uniform scale oscillating around one.
fn pulse(frequency: f32, amplitude: f32) -> impl FnMut(&mut SceneObject, f32) {
    let mut elapsed = 0.0_f32;
    move |object, dt| {
        elapsed += dt;
        let s = 1.0 + (elapsed * frequency).sin() * amplitude;
        object.transform.scale = Vec3::splat(s);
    }
}
