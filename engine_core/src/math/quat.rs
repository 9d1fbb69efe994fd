use std::fmt;
use std::ops::{Add, Mul, MulAssign, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::{approximately, approximately_eps, near_zero, Mat3, Mat4, Vec3};

/// Rotation quaternion `(x, y, z, w)` with `w` the scalar part.
///
/// Composition `a * b` applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis`. A zero-length axis yields
    /// identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        if axis.is_zero() {
            return Self::IDENTITY;
        }
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Euler angles in radians. Applies X, then Y, then Z about the fixed
    /// world axes (equivalently `Rz * Ry * Rx`).
    pub fn from_euler(euler: Vec3) -> Self {
        let (sx, cx) = (euler.x * 0.5).sin_cos();
        let (sy, cy) = (euler.y * 0.5).sin_cos();
        let (sz, cz) = (euler.z * 0.5).sin_cos();
        Self::new(
            sx * cy * cz - cx * sy * sz,
            cx * sy * cz + sx * cy * sz,
            cx * cy * sz - sx * sy * cz,
            cx * cy * cz + sx * sy * sz,
        )
    }

    /// Extracts the rotation of an orthonormal upper-left 3x3 block.
    pub fn from_rotation_matrix(m: &Mat4) -> Self {
        let (m00, m01, m02) = (m.at(0, 0), m.at(0, 1), m.at(0, 2));
        let (m10, m11, m12) = (m.at(1, 0), m.at(1, 1), m.at(1, 2));
        let (m20, m21, m22) = (m.at(2, 0), m.at(2, 1), m.at(2, 2));
        let trace = m00 + m11 + m22;

        let q = if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new((m21 - m12) * s, (m02 - m20) * s, (m10 - m01) * s, 0.25 / s)
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };
        q.normalized()
    }

    /// Rotation taking [`Vec3::FORWARD`] onto `forward` and keeping the local
    /// up axis as close to `up` as possible.
    ///
    /// A zero `forward` yields identity. When `up` is parallel to `forward`
    /// a perpendicular world axis is substituted.
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let f = forward.normalized();
        if f.is_zero() {
            return Self::IDENTITY;
        }
        let mut right = f.cross(up).normalized();
        if right.is_zero() {
            let fallback = if f.y.abs() < 0.999 { Vec3::UP } else { Vec3::UNIT_Z };
            right = f.cross(fallback).normalized();
        }
        let true_up = right.cross(f);
        let basis = Mat3::from_cols(right, true_up, -f);
        Self::from_rotation_matrix(&Mat4::from_mat3(&basis))
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// A near-zero quaternion is reset to identity.
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Unit-length copy, or identity when the length is near zero.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if near_zero(len) {
            return Self::IDENTITY;
        }
        let inv = 1.0 / len;
        Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
    }

    pub fn is_normalized(self) -> bool {
        approximately_eps(self.length_squared(), 1.0, 1e-5)
    }

    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Conjugate over squared length; identity for a near-zero quaternion.
    pub fn inverse(self) -> Self {
        let len_sq = self.length_squared();
        if near_zero(len_sq) {
            return Self::IDENTITY;
        }
        let inv = 1.0 / len_sq;
        let c = self.conjugate();
        Self::new(c.x * inv, c.y * inv, c.z * inv, c.w * inv)
    }

    /// Returns `(axis, angle)`. Identity reports the X axis and angle zero.
    pub fn to_axis_angle(self) -> (Vec3, f32) {
        let q = if self.w > 1.0 { self.normalized() } else { self };
        let angle = 2.0 * q.w.clamp(-1.0, 1.0).acos();
        let s = (1.0 - q.w * q.w).max(0.0).sqrt();
        if s < 1e-3 {
            return (Vec3::UNIT_X, angle);
        }
        (Vec3::new(q.x / s, q.y / s, q.z / s), angle)
    }

    /// Euler angles (radians) in the same convention as [`Quat::from_euler`].
    pub fn to_euler(self) -> Vec3 {
        let q = self;
        let sinr_cosp = 2.0 * (q.w * q.x + q.y * q.z);
        let cosr_cosp = 1.0 - 2.0 * (q.x * q.x + q.y * q.y);
        let roll = sinr_cosp.atan2(cosr_cosp);

        let sinp = 2.0 * (q.w * q.y - q.z * q.x);
        let pitch = if sinp.abs() >= 1.0 {
            super::HALF_PI.copysign(sinp)
        } else {
            sinp.asin()
        };

        let siny_cosp = 2.0 * (q.w * q.z + q.x * q.y);
        let cosy_cosp = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
        let yaw = siny_cosp.atan2(cosy_cosp);

        Vec3::new(roll, pitch, yaw)
    }

    pub fn to_mat4(self) -> Mat4 {
        let Self { x, y, z, w } = self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (xw, yw, zw) = (x * w, y * w, z * w);
        Mat4::from_rows(
            [1.0 - 2.0 * (yy + zz), 2.0 * (xy - zw), 2.0 * (xz + yw), 0.0],
            [2.0 * (xy + zw), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - xw), 0.0],
            [2.0 * (xz - yw), 2.0 * (yz + xw), 1.0 - 2.0 * (xx + yy), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    pub fn to_mat3(self) -> Mat3 {
        Mat3::from_mat4(&self.to_mat4())
    }

    /// Normalised linear blend; `t` is clamped to $[0, 1]$.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        Self::new(
            self.x * u + to.x * t,
            self.y * u + to.y * t,
            self.z * u + to.z * t,
            self.w * u + to.w * t,
        )
        .normalized()
    }

    /// Shortest-path spherical interpolation; `t` is clamped to $[0, 1]$.
    /// Nearly parallel inputs fall back to [`Quat::lerp`].
    pub fn slerp(self, to: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut to = to;
        let mut cos_half = self.dot(to);
        if cos_half < 0.0 {
            to = -to;
            cos_half = -cos_half;
        }
        if cos_half > 0.9999 {
            return self.lerp(to, t);
        }

        let half_theta = cos_half.acos();
        let sin_half = (1.0 - cos_half * cos_half).sqrt();
        if near_zero(sin_half) {
            return self.lerp(to, t);
        }
        let a = ((1.0 - t) * half_theta).sin() / sin_half;
        let b = (t * half_theta).sin() / sin_half;
        Self::new(
            self.x * a + to.x * b,
            self.y * a + to.y * b,
            self.z * a + to.z * b,
            self.w * a + to.w * b,
        )
        .normalized()
    }

    /// Angle in radians between two rotations, in $[0, \pi]$.
    pub fn angle_between(self, other: Self) -> f32 {
        let d = self.normalized().dot(other.normalized()).abs().min(1.0);
        2.0 * d.acos()
    }

    pub fn abs_diff_eq(self, other: Self, epsilon: f32) -> bool {
        approximately_eps(self.x, other.x, epsilon)
            && approximately_eps(self.y, other.y, epsilon)
            && approximately_eps(self.z, other.z, epsilon)
            && approximately_eps(self.w, other.w, epsilon)
    }

    /// `q` and `-q` encode the same rotation.
    pub fn same_rotation(self, other: Self, epsilon: f32) -> bool {
        self.abs_diff_eq(other, epsilon) || self.abs_diff_eq(-other, epsilon)
    }
}

/// Approximate, component-wise within `EPSILON`. Does not treat `q` and `-q`
/// as equal; see [`Quat::same_rotation`].
impl PartialEq for Quat {
    fn eq(&self, other: &Self) -> bool {
        approximately(self.x, other.x)
            && approximately(self.y, other.y)
            && approximately(self.z, other.z)
            && approximately(self.w, other.w)
    }
}

impl Add for Quat {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Quat {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Quat {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Mul<f32> for Quat {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

/// Hamilton product.
impl Mul for Quat {
    type Output = Self;
    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}

impl MulAssign for Quat {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Rotates a vector: the vector part of `q * (v, 0) * q̄`.
impl Mul<Vec3> for Quat {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        let p = Quat::new(v.x, v.y, v.z, 0.0);
        let r = self * p * self.conjugate();
        Vec3::new(r.x, r.y, r.z)
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}, {}, {}}}", self.x, self.y, self.z, self.w)
    }
}
