//! Flat scene of named objects.
//!
//! Objects live in a generational slot arena. Names map to [`ObjectId`]s;
//! a separate order list keeps insertion (draw) order across removals.

mod object;

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, error, info, warn};

use crate::camera::Camera;
use crate::math::Vec3;
use crate::render::{FrameStats, Renderer, Shader};

pub use object::{ObjectId, SceneObject, UpdateFn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    DuplicateName(String),
    NotFound(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "object '{name}' already exists in scene"),
            Self::NotFound(name) => write!(f, "object '{name}' not found in scene"),
        }
    }
}

impl std::error::Error for SceneError {}

struct Slot {
    generation: u32,
    object: Option<SceneObject>,
}

pub struct Scene {
    name: String,
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_name: HashMap<String, ObjectId>,
    order: Vec<ObjectId>,
    camera: Camera,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Scene {
    /// Creates an empty scene with a perspective camera at (0, 0, 5).
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(0.0, 0.0, 5.0));
        info!(scene = %name, "Scene created with default camera settings");
        Self {
            name,
            slots: Vec::new(),
            free: Vec::new(),
            by_name: HashMap::new(),
            order: Vec::new(),
            camera,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds `object` at the end of the draw order. A name already in use is
    /// rejected with a warning and the scene is unchanged.
    pub fn add_object(&mut self, object: SceneObject) -> Result<ObjectId, SceneError> {
        if self.by_name.contains_key(object.name()) {
            warn!(scene = %self.name, object = %object.name(), "Object already exists in scene, skipping add");
            return Err(SceneError::DuplicateName(object.name().to_string()));
        }

        let name = object.name().to_string();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.object = Some(object);
                ObjectId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
                self.slots.push(Slot {
                    generation: 0,
                    object: Some(object),
                });
                ObjectId {
                    index,
                    generation: 0,
                }
            }
        };

        self.by_name.insert(name.clone(), id);
        self.order.push(id);
        info!(scene = %self.name, object = %name, id = %id, "Added object to scene");
        Ok(id)
    }

    /// Removes and returns the named object. The relative order of the
    /// remaining objects is unchanged.
    pub fn remove_object(&mut self, name: &str) -> Result<SceneObject, SceneError> {
        let Some(id) = self.by_name.get(name).copied() else {
            warn!(scene = %self.name, object = %name, "Object not found in scene");
            return Err(SceneError::NotFound(name.to_string()));
        };
        self.take(id)
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Removes by id. A stale id yields `None`.
    pub fn remove_by_id(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.take(id)
    }

    fn take(&mut self, id: ObjectId) -> Option<SceneObject> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.by_name.remove(object.name());
        self.order.retain(|o| *o != id);
        info!(scene = %self.name, object = %object.name(), "Removed object from scene");
        Some(object)
    }

    pub fn find_object(&self, name: &str) -> Option<&SceneObject> {
        self.by_name.get(name).and_then(|id| self.object(*id))
    }

    pub fn find_object_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        let id = *self.by_name.get(name)?;
        self.object_mut(id)
    }

    pub fn id_of(&self, name: &str) -> Option<ObjectId> {
        self.by_name.get(name).copied()
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_ref())
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_mut())
    }

    /// Objects in draw order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.order.iter().filter_map(move |id| self.object(*id))
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Runs every object's update callback in draw order.
    pub fn update(&mut self, dt: f32) {
        for id in &self.order {
            if let Some(object) = self
                .slots
                .get_mut(id.index as usize)
                .and_then(|slot| slot.object.as_mut())
            {
                object.update(dt);
            }
        }
    }

    /// Draws every object that has a mesh, in draw order. Without a shader
    /// nothing is drawn and `None` is returned.
    pub fn render(
        &self,
        renderer: &mut Renderer,
        shader: Option<&mut dyn Shader>,
    ) -> Option<FrameStats> {
        let Some(shader) = shader else {
            error!(scene = %self.name, "Scene::render called without a shader");
            return None;
        };

        let frame = renderer.begin_scene(&self.camera);
        for object in self.objects() {
            let Some(mesh) = &object.mesh else {
                continue;
            };
            debug!(object = %object.name(), "Rendering");
            mesh.draw(renderer, &frame, &mut *shader, &object.transform.to_mat4());
        }
        Some(renderer.end_scene(frame))
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        info!(scene = %self.name, "Scene destroyed");
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("objects", &self.objects().map(SceneObject::name).collect::<Vec<_>>())
            .field("camera", &self.camera)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(scene: &Scene) -> Vec<&str> {
        scene.objects().map(SceneObject::name).collect()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut scene = Scene::new("dupes");
        scene.add_object(SceneObject::empty("A")).expect("first add");
        let err = scene.add_object(SceneObject::empty("A")).unwrap_err();
        assert_eq!(err, SceneError::DuplicateName("A".into()));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn removal_keeps_order_and_lookup() {
        let mut scene = Scene::new("order");
        for n in ["A", "B", "C"] {
            scene.add_object(SceneObject::empty(n)).expect("add");
        }
        let removed = scene.remove_object("B").expect("remove B");
        assert_eq!(removed.name(), "B");
        assert_eq!(names(&scene), vec!["A", "C"]);
        assert_eq!(scene.find_object("C").map(SceneObject::name), Some("C"));
        assert!(scene.find_object("B").is_none());
        assert_eq!(
            scene.remove_object("B").unwrap_err(),
            SceneError::NotFound("B".into())
        );
    }

    #[test]
    fn stale_ids_do_not_resolve_after_slot_reuse() {
        let mut scene = Scene::new("ids");
        let a = scene.add_object(SceneObject::empty("A")).expect("add");
        scene.remove_object("A").expect("remove");
        let b = scene.add_object(SceneObject::empty("B")).expect("add");
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(scene.object(a).is_none());
        assert!(scene.remove_by_id(a).is_none());
        assert_eq!(scene.object(b).map(SceneObject::name), Some("B"));
        assert_eq!(scene.id_of("B"), Some(b));
    }

    #[test]
    fn re_adding_a_removed_name_goes_to_the_end() {
        let mut scene = Scene::new("readd");
        for n in ["A", "B", "C"] {
            scene.add_object(SceneObject::empty(n)).expect("add");
        }
        scene.remove_object("A").expect("remove");
        scene.add_object(SceneObject::empty("A")).expect("re-add");
        assert_eq!(names(&scene), vec!["B", "C", "A"]);
    }

    #[test]
    fn update_runs_callbacks() {
        let mut scene = Scene::new("update");
        scene
            .add_object(SceneObject::empty("spinner").with_update(|o, dt| {
                o.transform.translate(Vec3::new(0.0, dt, 0.0));
            }))
            .expect("add");
        scene.add_object(SceneObject::empty("static")).expect("add");
        scene.update(0.5);
        scene.update(0.5);
        let spinner = scene.find_object("spinner").expect("present");
        assert_eq!(spinner.transform.position, Vec3::new(0.0, 1.0, 0.0));
        scene
            .find_object_mut("static")
            .expect("present")
            .transform
            .translate(Vec3::ONE);
        assert_eq!(scene.find_object("static").expect("present").transform.position, Vec3::ONE);
    }

    #[test]
    fn default_camera_sits_on_positive_z() {
        let scene = Scene::default();
        assert_eq!(scene.camera().position(), Vec3::new(0.0, 0.0, 5.0));
        assert!(scene.is_empty());
        assert_eq!(scene.name(), "Untitled");
    }

    #[test]
    fn render_without_shader_draws_nothing() {
        let scene = Scene::new("noshader");
        let mut renderer = Renderer::headless();
        assert!(scene.render(&mut renderer, None).is_none());
    }
}
