//! Recording implementations of [`RenderBackend`] and [`Shader`].
//!
//! Nothing is rasterised. The backend appends every command to a shared
//! [`CommandLog`] that stays readable after the backend has been boxed into
//! a [`Renderer`](super::Renderer); the shader keeps the last value of every
//! uniform plus the full upload history.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{ClearFlags, MeshData, RenderBackend, Shader, VertexArray};
use crate::math::{Mat3, Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Init,
    Shutdown,
    Viewport {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    ClearColor(Vec4),
    Clear(ClearFlags),
    Upload {
        id: u32,
        vertices: u32,
        indices: u32,
    },
    DrawIndexed {
        id: u32,
        index_count: u32,
    },
}

/// Shared handle to a backend's command history.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Arc<RwLock<Vec<BackendCommand>>>,
}

impl CommandLog {
    fn push(&self, command: BackendCommand) {
        if let Ok(mut commands) = self.commands.write() {
            commands.push(command);
        }
    }

    pub fn commands(&self) -> Vec<BackendCommand> {
        self.commands
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Vertex array ids of every indexed draw, in submission order.
    pub fn draw_calls(&self) -> Vec<u32> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                BackendCommand::DrawIndexed { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut commands) = self.commands.write() {
            commands.clear();
        }
    }
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    log: CommandLog,
    next_id: u32,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }
}

impl RenderBackend for HeadlessBackend {
    fn init(&mut self) {
        self.log.push(BackendCommand::Init);
    }

    fn shutdown(&mut self) {
        self.log.push(BackendCommand::Shutdown);
    }

    fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.log.push(BackendCommand::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn set_clear_color(&mut self, color: Vec4) {
        self.log.push(BackendCommand::ClearColor(color));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.log.push(BackendCommand::Clear(flags));
    }

    fn upload(&mut self, data: &MeshData) -> VertexArray {
        self.next_id += 1;
        let va = VertexArray {
            id: self.next_id,
            vertex_count: data.vertex_count(),
            index_count: data.index_count(),
        };
        self.log.push(BackendCommand::Upload {
            id: va.id,
            vertices: va.vertex_count,
            indices: va.index_count,
        });
        va
    }

    fn draw_indexed(&mut self, vertex_array: &VertexArray) {
        self.log.push(BackendCommand::DrawIndexed {
            id: vertex_array.id,
            index_count: vertex_array.index_count,
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

#[derive(Debug, Default)]
pub struct RecordingShader {
    name: String,
    binds: u32,
    uniforms: HashMap<String, UniformValue>,
    uploads: Vec<(String, UniformValue)>,
}

impl RecordingShader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bind_count(&self) -> u32 {
        self.binds
    }

    /// Latest value set under `name`.
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.uniforms.get(name)? {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn mat3(&self, name: &str) -> Option<Mat3> {
        match self.uniforms.get(name)? {
            UniformValue::Mat3(m) => Some(*m),
            _ => None,
        }
    }

    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.uniforms.get(name)? {
            UniformValue::Mat4(m) => Some(*m),
            _ => None,
        }
    }

    /// Every upload in call order.
    pub fn uploads(&self) -> &[(String, UniformValue)] {
        &self.uploads
    }

    /// Every value uploaded under `name`, in call order.
    pub fn history(&self, name: &str) -> Vec<&UniformValue> {
        self.uploads
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn reset(&mut self) {
        self.binds = 0;
        self.uniforms.clear();
        self.uploads.clear();
    }

    fn record(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_string(), value.clone());
        self.uploads.push((name.to_string(), value));
    }
}

impl Shader for RecordingShader {
    fn bind(&mut self) {
        self.binds += 1;
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.record(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.record(name, UniformValue::Float(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.record(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.record(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.record(name, UniformValue::Vec4(value));
    }

    fn set_mat3(&mut self, name: &str, value: &Mat3) {
        self.record(name, UniformValue::Mat3(*value));
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        self.record(name, UniformValue::Mat4(*value));
    }
}
