use serde::{Deserialize, Serialize};

use super::{uniforms, Shader};
use crate::math::Vec4;

/// Scalar PBR parameters uploaded as the `u_Material` struct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub albedo: Vec4,
    pub metallic: f32,
    pub roughness: f32,
    pub ambient_occlusion: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec4::ONE,
            metallic: 0.0,
            roughness: 0.5,
            ambient_occlusion: 1.0,
        }
    }
}

impl Material {
    pub fn with_albedo(albedo: Vec4) -> Self {
        Self {
            albedo,
            ..Self::default()
        }
    }

    pub fn apply(&self, shader: &mut dyn Shader) {
        shader.set_vec4(uniforms::MATERIAL_ALBEDO, self.albedo);
        shader.set_float(uniforms::MATERIAL_METALLIC, self.metallic);
        shader.set_float(uniforms::MATERIAL_ROUGHNESS, self.roughness);
        shader.set_float(uniforms::MATERIAL_AO, self.ambient_occlusion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingShader, UniformValue};

    #[test]
    fn apply_uploads_every_field() {
        let mut shader = RecordingShader::new("material");
        let material = Material {
            metallic: 0.25,
            ..Material::with_albedo(Vec4::new(1.0, 0.0, 0.0, 1.0))
        };
        material.apply(&mut shader);
        assert_eq!(
            shader.uniform("u_Material.albedo"),
            Some(&UniformValue::Vec4(Vec4::new(1.0, 0.0, 0.0, 1.0)))
        );
        assert_eq!(shader.float("u_Material.metallic"), Some(0.25));
        assert_eq!(shader.float("u_Material.roughness"), Some(0.5));
        assert_eq!(shader.float("u_Material.ambientOcclusion"), Some(1.0));
        assert_eq!(shader.bind_count(), 0);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let m: Material = serde_json::from_str(r#"{ "metallic": 1.0 }"#).expect("parse");
        assert_eq!(m.metallic, 1.0);
        assert_eq!(m.roughness, 0.5);
        assert_eq!(m.albedo, Vec4::ONE);
    }
}
