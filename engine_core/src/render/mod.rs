//! Render-submission contract.
//!
//! This crate does not depend on a graphics API. The GPU sits behind
//! [`RenderBackend`]; shaders behind [`Shader`]. [`Renderer`] owns a boxed
//! backend and turns scene draws into backend commands.
//!
//! Per-frame state is the explicit [`SceneData`] value returned by
//! [`Renderer::begin_scene`] and threaded through every submission.

pub mod geometry;
pub mod headless;
pub mod material;
pub mod mesh;

use tracing::{debug, info, trace, warn};

use crate::camera::Camera;
use crate::math::{Mat3, Mat4, Vec2, Vec3, Vec4};

pub use geometry::{MeshData, Vertex};
pub use headless::{BackendCommand, CommandLog, HeadlessBackend, RecordingShader, UniformValue};
pub use material::Material;
pub use mesh::StaticMesh;

/// Uniform names shared by the renderer and the default shaders.
pub mod uniforms {
    pub const VIEW_PROJECTION: &str = "u_ViewProjection";
    pub const MODEL: &str = "u_Model";
    pub const NORMAL_MATRIX: &str = "u_NormalMatrix";
    pub const VIEW_POSITION: &str = "u_ViewPos";
    pub const MATERIAL_ALBEDO: &str = "u_Material.albedo";
    pub const MATERIAL_METALLIC: &str = "u_Material.metallic";
    pub const MATERIAL_ROUGHNESS: &str = "u_Material.roughness";
    pub const MATERIAL_AO: &str = "u_Material.ambientOcclusion";
}

/// A bound GPU program accepting named uniforms.
///
/// Matrices are passed row-major; implementations that talk to a
/// column-major API upload [`Mat4::to_cols_array`].
pub trait Shader {
    fn bind(&mut self);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_vec2(&mut self, name: &str, value: Vec2);
    fn set_vec3(&mut self, name: &str, value: Vec3);
    fn set_vec4(&mut self, name: &str, value: Vec4);
    fn set_mat3(&mut self, name: &str, value: &Mat3);
    fn set_mat4(&mut self, name: &str, value: &Mat4);
}

/// Anything a scene object can draw.
pub trait Mesh {
    fn draw(
        &self,
        renderer: &mut Renderer,
        frame: &SceneData,
        shader: &mut dyn Shader,
        transform: &Mat4,
    );
}

bitflags::bitflags! {
    /// Buffers cleared by [`Renderer::clear`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self::COLOR | Self::DEPTH
    }
}

/// Handle to geometry uploaded to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArray {
    pub id: u32,
    pub vertex_count: u32,
    pub index_count: u32,
}

/// The GPU shim.
pub trait RenderBackend: Send {
    fn init(&mut self);
    fn shutdown(&mut self);
    fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32);
    fn set_clear_color(&mut self, color: Vec4);
    fn clear(&mut self, flags: ClearFlags);
    fn upload(&mut self, data: &MeshData) -> VertexArray;
    fn draw_indexed(&mut self, vertex_array: &VertexArray);
}

/// A no-op backend useful for headless runs.
#[derive(Debug, Default)]
pub struct NullRenderer {
    next_id: u32,
}

impl RenderBackend for NullRenderer {
    fn init(&mut self) {}
    fn shutdown(&mut self) {}
    fn set_viewport(&mut self, _x: u32, _y: u32, _width: u32, _height: u32) {}
    fn set_clear_color(&mut self, _color: Vec4) {}
    fn clear(&mut self, _flags: ClearFlags) {}
    fn upload(&mut self, data: &MeshData) -> VertexArray {
        self.next_id += 1;
        VertexArray {
            id: self.next_id,
            vertex_count: data.vertex_count(),
            index_count: data.index_count(),
        }
    }
    fn draw_indexed(&mut self, _vertex_array: &VertexArray) {}
}

/// Camera state captured once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneData {
    pub view_projection: Mat4,
    pub view_position: Vec3,
}

/// Counters for one `begin_scene` / `end_scene` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub indices: u64,
    /// Submissions dropped because the vertex array had no indices.
    pub skipped: u32,
}

pub struct Renderer {
    backend: Box<dyn RenderBackend>,
    stats: FrameStats,
    initialized: bool,
}

impl Renderer {
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            stats: FrameStats::default(),
            initialized: false,
        }
    }

    pub fn headless() -> Self {
        Self::new(Box::new(NullRenderer::default()))
    }

    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.backend.init();
        self.initialized = true;
        info!("Renderer initialized");
    }

    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.backend.shutdown();
        self.initialized = false;
        info!("Renderer shutdown");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Captures the camera's view-projection for this frame and resets the
    /// frame counters.
    pub fn begin_scene(&mut self, camera: &Camera) -> SceneData {
        self.stats = FrameStats::default();
        SceneData {
            view_projection: camera.view_projection(),
            view_position: camera.position(),
        }
    }

    /// Closes the frame opened by `begin_scene`.
    pub fn end_scene(&mut self, _frame: SceneData) -> FrameStats {
        let stats = std::mem::take(&mut self.stats);
        trace!(
            draw_calls = stats.draw_calls,
            indices = stats.indices,
            skipped = stats.skipped,
            "Scene ended"
        );
        stats
    }

    /// Binds `shader`, uploads the frame and model matrices and issues an
    /// indexed draw. An empty index buffer is skipped with a warning.
    pub fn submit(
        &mut self,
        frame: &SceneData,
        shader: &mut dyn Shader,
        vertex_array: &VertexArray,
        transform: &Mat4,
    ) {
        shader.bind();
        shader.set_mat4(uniforms::VIEW_PROJECTION, &frame.view_projection);
        shader.set_mat4(uniforms::MODEL, transform);
        shader.set_vec3(uniforms::VIEW_POSITION, frame.view_position);

        if vertex_array.index_count == 0 {
            warn!(vertex_array = vertex_array.id, "Submit skipped: index count is 0");
            self.stats.skipped += 1;
            return;
        }

        self.backend.draw_indexed(vertex_array);
        self.stats.draw_calls += 1;
        self.stats.indices += u64::from(vertex_array.index_count);
    }

    pub fn upload(&mut self, data: &MeshData) -> VertexArray {
        let va = self.backend.upload(data);
        debug!(
            vertex_array = va.id,
            vertices = va.vertex_count,
            indices = va.index_count,
            "Uploaded mesh data"
        );
        va
    }

    pub fn set_clear_color(&mut self, color: Vec4) {
        self.backend.set_clear_color(color);
    }

    pub fn clear(&mut self, flags: ClearFlags) {
        self.backend.clear(flags);
    }

    pub fn on_window_resize(&mut self, width: u32, height: u32) {
        debug!(width, height, "Viewport resized");
        self.backend.set_viewport(0, 0, width, height);
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("initialized", &self.initialized)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
