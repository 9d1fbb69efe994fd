use std::fmt;
use std::sync::Arc;

use crate::math::Transform;
use crate::render::Mesh;

/// Per-frame behaviour. Receives the object it is attached to and the frame
/// delta in seconds.
pub type UpdateFn = Box<dyn FnMut(&mut SceneObject, f32)>;

/// Stable handle into a [`Scene`](super::Scene).
///
/// A removed object's id never resolves again, even after its slot is
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ObjectId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

pub struct SceneObject {
    name: String,
    pub mesh: Option<Arc<dyn Mesh>>,
    pub transform: Transform,
    on_update: Option<UpdateFn>,
    /// Set by `clear_on_update` so a running callback is not reattached.
    update_cleared: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: Option<Arc<dyn Mesh>>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform,
            on_update: None,
            update_cleared: false,
        }
    }

    /// An object with no mesh; skipped by rendering but still updated.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, None, Transform::IDENTITY)
    }

    pub fn with_update(mut self, f: impl FnMut(&mut SceneObject, f32) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Unique within a scene; fixed at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_on_update(&mut self, f: impl FnMut(&mut SceneObject, f32) + 'static) {
        self.on_update = Some(Box::new(f));
        self.update_cleared = false;
    }

    pub fn clear_on_update(&mut self) {
        self.on_update = None;
        self.update_cleared = true;
    }

    pub fn has_update(&self) -> bool {
        self.on_update.is_some()
    }

    /// Runs the callback, if any. The callback is detached while it runs, so
    /// it may replace or clear itself through the object it receives.
    pub fn update(&mut self, dt: f32) {
        let Some(mut callback) = self.on_update.take() else {
            return;
        };
        self.update_cleared = false;
        callback(self, dt);
        if self.on_update.is_none() && !self.update_cleared {
            self.on_update = Some(callback);
        }
        self.update_cleared = false;
    }
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("name", &self.name)
            .field("has_mesh", &self.mesh.is_some())
            .field("transform", &self.transform)
            .field("has_update", &self.on_update.is_some())
            .finish()
    }
}
