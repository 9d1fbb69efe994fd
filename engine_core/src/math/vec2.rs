use std::fmt;

use serde::{Deserialize, Serialize};

use super::near_zero;

/// 2D vector (texture coordinates, screen positions, 2D transforms).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl_vector_ops!(Vec2 { x, y });

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
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

    /// Unit-length copy, or the zero vector when the length is near zero.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if near_zero(len) {
            return Self::ZERO;
        }
        self / len
    }

    pub fn is_normalized(self) -> bool {
        super::approximately_eps(self.length_squared(), 1.0, 1e-5)
    }

    pub fn is_zero(self) -> bool {
        near_zero(self.x) && near_zero(self.y)
    }

    pub fn distance(self, rhs: Self) -> f32 {
        (self - rhs).length()
    }

    pub fn distance_squared(self, rhs: Self) -> f32 {
        (self - rhs).length_squared()
    }

    /// Unclamped.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.x, self.y)
    }
}
