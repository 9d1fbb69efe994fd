//! Configuration system.
//!
//! Loads engine configuration from JSON strings/files. Every field has a
//! default, so a partial (or empty) document is valid.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, ProjectionError};
use crate::math::{to_radians, Vec3, Vec4};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_clear_color")]
    pub clear_color: Vec4,
    /// Frames the headless viewer runs. Zero selects the default.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Simulated frame rate; sets the fixed frame delta.
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionConfig {
    Perspective { fov_degrees: f32 },
    /// Full vertical extent of the view volume.
    Orthographic { size: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_projection")]
    pub projection: ProjectionConfig,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_camera_position")]
    pub position: Vec3,
    /// World-space point the camera faces; `None` keeps looking down -Z.
    #[serde(default)]
    pub look_at: Option<Vec3>,
}

pub const DEFAULT_FRAMES: u32 = 600;

fn default_clear_color() -> Vec4 {
    Vec4::new(0.1, 0.1, 0.15, 1.0)
}

fn default_frames() -> u32 {
    DEFAULT_FRAMES
}

fn default_target_fps() -> u32 {
    60
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_title() -> String {
    "Engine Viewer".to_string()
}

fn default_projection() -> ProjectionConfig {
    ProjectionConfig::Perspective { fov_degrees: 60.0 }
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_camera_position() -> Vec3 {
    Vec3::new(0.0, 0.0, 5.0)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            clear_color: default_clear_color(),
            frames: default_frames(),
            target_fps: default_target_fps(),
            log_filter: default_log_filter(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            projection: default_projection(),
            near: default_near(),
            far: default_far(),
            position: default_camera_position(),
            look_at: None,
        }
    }
}

impl EngineConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads and parses a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// `frames`, with zero mapped to [`DEFAULT_FRAMES`].
    pub fn frame_count(&self) -> u32 {
        if self.frames == 0 {
            DEFAULT_FRAMES
        } else {
            self.frames
        }
    }

    /// Fixed delta per simulated frame, in seconds.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

impl WindowConfig {
    /// Width over height; a zero height is treated as one pixel.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl CameraConfig {
    /// Builds a camera with the configured projection and placement.
    pub fn build(&self, aspect: f32) -> Result<Camera, ProjectionError> {
        let mut camera = match self.projection {
            ProjectionConfig::Perspective { fov_degrees } => {
                Camera::perspective(to_radians(fov_degrees), aspect, self.near, self.far)?
            }
            ProjectionConfig::Orthographic { size } => {
                Camera::orthographic(size, aspect, self.near, self.far)?
            }
        };
        camera.set_position(self.position);
        if let Some(target) = self.look_at {
            camera.look_at(target, Vec3::UP);
        }
        Ok(camera)
    }
}
