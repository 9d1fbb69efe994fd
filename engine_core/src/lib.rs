//! `engine_core`
//!
//! Math, camera, scene and render-submission core of the engine.
//!
//! Design goals:
//! - Deterministic numerics: degenerate inputs produce documented fallbacks,
//!   never NaN or infinity.
//! - No graphics API dependency; the GPU sits behind [`render::RenderBackend`].
//! - Explicit per-frame state, no globals.
//! - No `unsafe`.

pub mod camera;
pub mod config;
pub mod math;
pub mod render;
pub mod scene;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::camera::*;
    pub use crate::config::*;
    pub use crate::math::*;
    pub use crate::render::{
        ClearFlags, FrameStats, Material, Mesh, MeshData, NullRenderer, RenderBackend, Renderer,
        SceneData, Shader, StaticMesh, Vertex, VertexArray,
    };
    pub use crate::scene::*;
}
