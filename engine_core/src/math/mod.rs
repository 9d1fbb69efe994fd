//! Math types.
//!
//! This module intentionally stays small and deterministic.
//! It avoids SIMD/unsafe and focuses on stable semantics: every
//! normalisation and inversion path substitutes a safe value instead of
//! producing NaN or infinity.
//!
//! Conventions:
//! - Right-handed world space, the camera looks down -Z.
//! - Matrices are stored row-major (`m[row * N + col]`) and multiply column
//!   vectors (`M * v`). Use [`Mat4::to_cols_array`] when uploading to an API
//!   that expects column-major data.
//! - Approximate equality (`==`) compares components within [`EPSILON`].

#[macro_use]
mod ops;

mod geom;
mod mat3;
mod mat4;
mod quat;
mod transform;
mod vec2;
mod vec3;
mod vec4;

use std::fmt;

pub use geom::{Plane, Ray};
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quat::Quat;
pub use transform::Transform;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;

pub const PI: f32 = std::f32::consts::PI;
pub const TWO_PI: f32 = std::f32::consts::TAU;
pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
pub const DEG2RAD: f32 = PI / 180.0;
pub const RAD2DEG: f32 = 180.0 / PI;

/// Tolerance used by every near-zero test and approximate comparison.
pub const EPSILON: f32 = 1.0e-6;

/// Returned by [`Mat3::try_inverse`] and [`Mat4::try_inverse`] when
/// `|det| <= EPSILON`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegenerateMatrixError {
    pub determinant: f32,
}

impl fmt::Display for DegenerateMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix is singular (determinant {} within {} of zero)",
            self.determinant, EPSILON
        )
    }
}

impl std::error::Error for DegenerateMatrixError {}

/// `|a - b| <= EPSILON`.
#[inline]
pub fn approximately(a: f32, b: f32) -> bool {
    approximately_eps(a, b, EPSILON)
}

#[inline]
pub fn approximately_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

#[inline]
pub fn near_zero(value: f32) -> bool {
    value.abs() <= EPSILON
}

/// Unclamped linear interpolation; `t` outside $[0,1]$ extrapolates.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    lerp(a, b, t.clamp(0.0, 1.0))
}

/// Quadratic Bezier through three control values.
#[inline]
pub fn quadratic_lerp(a: f32, b: f32, c: f32, t: f32) -> f32 {
    lerp(lerp(a, b, t), lerp(b, c, t), t)
}

/// Like `f32::clamp` but never panics on an inverted range; `max` wins.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * DEG2RAD
}

#[inline]
pub fn to_degrees(radians: f32) -> f32 {
    radians * RAD2DEG
}

/// Returns -1, 0 or 1.
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Hermite interpolation between `edge0` and `edge1`. Equal edges act as a
/// step at `edge0`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if near_zero(edge1 - edge0) {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Ken Perlin's variant with zero first and second derivatives at the edges.
pub fn smootherstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if near_zero(edge1 - edge0) {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Maps `value` from one range to another. A degenerate source range maps
/// everything to `to_min`.
pub fn remap(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    let span = from_max - from_min;
    if near_zero(span) {
        return to_min;
    }
    to_min + (value - from_min) / span * (to_max - to_min)
}

/// Wraps an angle in radians into $[-\pi, \pi]$.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TWO_PI;
    if a > PI {
        a -= TWO_PI;
    } else if a < -PI {
        a += TWO_PI;
    }
    a
}
