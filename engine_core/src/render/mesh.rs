use tracing::info;

use super::{uniforms, Material, Mesh, MeshData, Renderer, SceneData, Shader, VertexArray};
use crate::math::Mat4;

/// Geometry uploaded once, drawn with a fixed material.
#[derive(Debug, Clone)]
pub struct StaticMesh {
    vertex_array: VertexArray,
    material: Material,
}

impl StaticMesh {
    pub fn new(renderer: &mut Renderer, data: &MeshData) -> Self {
        let vertex_array = renderer.upload(data);
        info!(
            vertices = vertex_array.vertex_count,
            indices = vertex_array.index_count,
            "Mesh created"
        );
        Self {
            vertex_array,
            material: Material::default(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Mesh for StaticMesh {
    /// Applies the material, uploads `u_Model` and the normal matrix, then
    /// submits. The normal matrix is derived from `transform` on every draw.
    fn draw(
        &self,
        renderer: &mut Renderer,
        frame: &SceneData,
        shader: &mut dyn Shader,
        transform: &Mat4,
    ) {
        self.material.apply(shader);
        shader.set_mat4(uniforms::MODEL, transform);
        shader.set_mat3(uniforms::NORMAL_MATRIX, &transform.normal_matrix());
        renderer.submit(frame, shader, &self.vertex_array, transform);
    }
}
