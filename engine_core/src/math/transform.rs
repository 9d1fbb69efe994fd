use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::{Mat4, Quat, Vec3};

/// Position, rotation and scale. The matrix form is `T * R * S`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_trs(self.position, self.rotation, self.scale)
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

    /// Scale, then rotate, then translate.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * (p * self.scale) + self.position
    }

    /// Rotate only.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.rotation * d
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Pre-multiplies: `delta` is applied after the current rotation.
    pub fn rotate(&mut self, delta: Quat) {
        self.rotation = (delta * self.rotation).normalized();
    }

    /// Turns the forward axis toward `target`. A target at the current
    /// position leaves the rotation as identity.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.rotation = Quat::look_rotation(target - self.position, up);
    }

    /// Position and scale blend unclamped; rotation uses [`Quat::slerp`].
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(to.position, t),
            rotation: self.rotation.slerp(to.rotation, t),
            scale: self.scale.lerp(to.scale, t),
        }
    }
}

/// Parent-child composition: `parent * child` places `child` in the parent's
/// space. Exact for uniform scale.
impl Mul for Transform {
    type Output = Self;
    fn mul(self, child: Self) -> Self {
        Self {
            position: self.position + self.rotation * (child.position * self.scale),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transform(pos {}, rot {}, scale {})",
            self.position, self.rotation, self.scale
        )
    }
}
