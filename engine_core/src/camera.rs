//! Perspective / orthographic camera.
//!
//! View and projection matrices are cached and rebuilt after every mutation,
//! so reads are always consistent with the current parameters.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::math::{to_radians, Mat4, Plane, Quat, Ray, Vec3, PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionKind {
    Perspective,
    Orthographic,
}

/// Rejected projection parameters; every parameter must also be finite.
/// The camera is left untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    /// Field of view outside $(0, \pi)$ radians.
    InvalidFov(f32),
    /// Orthographic size must be positive and finite.
    InvalidSize(f32),
    InvalidAspect(f32),
    InvalidNear(f32),
    /// `far` must be finite and greater than `near`.
    InvalidFar { far: f32, near: f32 },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFov(fov) => write!(f, "invalid fov {fov} (must be between 0 and PI)"),
            Self::InvalidSize(size) => {
                write!(f, "invalid orthographic size {size} (must be > 0)")
            }
            Self::InvalidAspect(aspect) => {
                write!(f, "invalid aspect ratio {aspect} (must be > 0)")
            }
            Self::InvalidNear(near) => write!(f, "invalid near plane {near} (must be > 0)"),
            Self::InvalidFar { far, near } => {
                write!(f, "invalid far plane {far} (must be > near {near})")
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

fn validate_shared(aspect: f32, near: f32, far: f32) -> Result<(), ProjectionError> {
    if !aspect.is_finite() || aspect <= 0.0 {
        return Err(ProjectionError::InvalidAspect(aspect));
    }
    if !near.is_finite() || near <= 0.0 {
        return Err(ProjectionError::InvalidNear(near));
    }
    if !far.is_finite() || far <= near {
        return Err(ProjectionError::InvalidFar { far, near });
    }
    Ok(())
}

fn validate_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<(), ProjectionError> {
    if !fov.is_finite() || fov <= 0.0 || fov >= PI {
        return Err(ProjectionError::InvalidFov(fov));
    }
    validate_shared(aspect, near, far)
}

fn validate_orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Result<(), ProjectionError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(ProjectionError::InvalidSize(size));
    }
    validate_shared(aspect, near, far)
}

#[derive(Debug, Clone)]
pub struct Camera {
    kind: ProjectionKind,
    position: Vec3,
    rotation: Quat,
    /// Vertical field of view, radians.
    fov: f32,
    /// Full vertical extent of the orthographic volume.
    size: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
    projection: Mat4,
}

impl Default for Camera {
    /// Perspective, 60 degrees, 16:9, near 0.1, far 1000, at the origin
    /// looking down -Z.
    fn default() -> Self {
        let mut camera = Self {
            kind: ProjectionKind::Perspective,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov: to_radians(60.0),
            size: 5.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.recalculate();
        camera
    }
}

impl Camera {
    /// `fov_or_size` is the vertical field of view in radians for
    /// [`ProjectionKind::Perspective`] and the vertical extent for
    /// [`ProjectionKind::Orthographic`].
    pub fn new(
        kind: ProjectionKind,
        fov_or_size: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, ProjectionError> {
        let mut camera = Self::default();
        match kind {
            ProjectionKind::Perspective => camera.set_perspective(fov_or_size, aspect, near, far)?,
            ProjectionKind::Orthographic => {
                camera.set_orthographic(fov_or_size, aspect, near, far)?
            }
        }
        Ok(camera)
    }

    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Self, ProjectionError> {
        Self::new(ProjectionKind::Perspective, fov, aspect, near, far)
    }

    pub fn orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Result<Self, ProjectionError> {
        Self::new(ProjectionKind::Orthographic, size, aspect, near, far)
    }

    /// Switches to a perspective projection. Invalid parameters are logged
    /// and leave the camera unchanged.
    pub fn set_perspective(
        &mut self,
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<(), ProjectionError> {
        if let Err(e) = validate_perspective(fov, aspect, near, far) {
            error!(error = %e, "Rejected perspective projection");
            return Err(e);
        }
        self.kind = ProjectionKind::Perspective;
        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.recalculate();
        Ok(())
    }

    /// Switches to an orthographic projection. Invalid parameters are logged
    /// and leave the camera unchanged.
    pub fn set_orthographic(
        &mut self,
        size: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<(), ProjectionError> {
        if let Err(e) = validate_orthographic(size, aspect, near, far) {
            error!(error = %e, "Rejected orthographic projection");
            return Err(e);
        }
        self.kind = ProjectionKind::Orthographic;
        self.size = size;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.recalculate();
        Ok(())
    }

    /// Window resize path; keeps the projection kind and other parameters.
    pub fn set_aspect(&mut self, aspect: f32) -> Result<(), ProjectionError> {
        match self.kind {
            ProjectionKind::Perspective => self.set_perspective(self.fov, aspect, self.near, self.far),
            ProjectionKind::Orthographic => {
                self.set_orthographic(self.size, aspect, self.near, self.far)
            }
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recalculate();
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalized();
        self.recalculate();
    }

    /// Turns toward `target`. A target at the camera position resets the
    /// rotation to identity.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.rotation = Quat::look_rotation(target - self.position, up);
        self.recalculate();
    }

    /// World-space offset.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.recalculate();
    }

    /// Pre-multiplies: `rotation` is applied after the current orientation.
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation * self.rotation;
        self.recalculate();
    }

    fn recalculate(&mut self) {
        let forward = self.forward();
        let up = self.up();
        self.view = Mat4::look_at(self.position, self.position + forward, up);

        self.projection = match self.kind {
            ProjectionKind::Perspective => {
                Mat4::perspective(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionKind::Orthographic => {
                let right = self.size * self.aspect * 0.5;
                let top = self.size * 0.5;
                Mat4::orthographic(-right, right, -top, top, self.near, self.far)
            }
        };
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::FORWARD
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::RIGHT
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::UP
    }

    /// World-space ray through a point in normalised device coordinates
    /// (`[-1, 1]` on both axes, +Y up). The origin lies on the near plane.
    pub fn screen_to_ray(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let inv = self.view_projection().inverse();
        let near = inv.transform_point(Vec3::new(ndc_x, ndc_y, -1.0));
        let far = inv.transform_point(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, far - near)
    }

    /// Where the ray through an NDC point meets `plane`, if in front of the
    /// camera.
    pub fn screen_to_plane(&self, ndc_x: f32, ndc_y: f32, plane: &Plane) -> Option<Vec3> {
        let ray = self.screen_to_ray(ndc_x, ndc_y);
        ray.intersect(plane).map(|t| ray.get_point(t))
    }
}
