use std::fmt;

use serde::{Deserialize, Serialize};

use super::{approximately_eps, near_zero, Vec4};

/// 3D vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl_vector_ops!(Vec3 { x, y, z });

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    /// Cameras and transforms look down -Z.
    pub const FORWARD: Self = Self::new(0.0, 0.0, -1.0);
    pub const BACKWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalises in place. A near-zero vector becomes zero.
    pub fn normalize(&mut self) {
        let len = self.length();
        if near_zero(len) {
            *self = Self::ZERO;
            return;
        }
        *self /= len;
    }

    /// Unit-length copy, or [`Vec3::ZERO`] when the length is near zero.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if near_zero(len) {
            return Self::ZERO;
        }
        self / len
    }

    pub fn is_normalized(self) -> bool {
        approximately_eps(self.length_squared(), 1.0, 1e-5)
    }

    pub fn is_zero(self) -> bool {
        near_zero(self.x) && near_zero(self.y) && near_zero(self.z)
    }

    pub fn distance(self, rhs: Self) -> f32 {
        (self - rhs).length()
    }

    pub fn distance_squared(self, rhs: Self) -> f32 {
        (self - rhs).length_squared()
    }

    /// Unclamped; `t` outside $[0,1]$ extrapolates.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self::new(
            super::lerp(self.x, to.x, t),
            super::lerp(self.y, to.y, t),
            super::lerp(self.z, to.z, t),
        )
    }

    pub fn lerp_clamped(self, to: Self, t: f32) -> Self {
        self.lerp(to, t.clamp(0.0, 1.0))
    }

    pub fn quadratic_lerp(a: Self, b: Self, c: Self, t: f32) -> Self {
        a.lerp(b, t).lerp(b.lerp(c, t), t)
    }

    /// Projection of `self` onto `onto`; zero when `onto` has near-zero length.
    pub fn project(self, onto: Self) -> Self {
        let len_sq = onto.length_squared();
        if near_zero(len_sq) {
            return Self::ZERO;
        }
        onto * (self.dot(onto) / len_sq)
    }

    /// Mirrors `self` about the plane with unit `normal`.
    pub fn reflect(self, normal: Self) -> Self {
        self - normal * (2.0 * self.dot(normal))
    }

    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}, {}}}", self.x, self.y, self.z)
    }
}
