use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, MulAssign, Sub};

use serde::{Deserialize, Serialize};

use super::{
    approximately, approximately_eps, near_zero, DegenerateMatrixError, Mat3, Quat, Vec3, Vec4,
};

/// 4x4 matrix, row-major (`m[row * 4 + col]`), multiplying column vectors.
///
/// Translation lives in the last column (`m[3]`, `m[7]`, `m[11]`).
/// Projections follow the OpenGL clip convention (NDC depth in $[-1, 1]$).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const ZERO: Self = Self { m: [0.0; 16] };

    pub const fn from_rows(r0: [f32; 4], r1: [f32; 4], r2: [f32; 4], r3: [f32; 4]) -> Self {
        Self {
            m: [
                r0[0], r0[1], r0[2], r0[3], //
                r1[0], r1[1], r1[2], r1[3], //
                r2[0], r2[1], r2[2], r2[3], //
                r3[0], r3[1], r3[2], r3[3],
            ],
        }
    }

    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self::from_rows(
            [c0.x, c1.x, c2.x, c3.x],
            [c0.y, c1.y, c2.y, c3.y],
            [c0.z, c1.z, c2.z, c3.z],
            [c0.w, c1.w, c2.w, c3.w],
        )
    }

    /// Embeds a 3x3 block in the upper-left corner of an identity matrix.
    pub fn from_mat3(m: &Mat3) -> Self {
        let mut out = Self::IDENTITY;
        for row in 0..3 {
            for col in 0..3 {
                out.set(row, col, m.at(row, col));
            }
        }
        out
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[row * 4 + col] = value;
    }

    pub fn row(&self, row: usize) -> Vec4 {
        Vec4::new(
            self.at(row, 0),
            self.at(row, 1),
            self.at(row, 2),
            self.at(row, 3),
        )
    }

    pub fn col(&self, col: usize) -> Vec4 {
        Vec4::new(
            self.at(0, col),
            self.at(1, col),
            self.at(2, col),
            self.at(3, col),
        )
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                out.set(col, row, self.at(row, col));
            }
        }
        out
    }

    /// Cofactor expansion over 2x2 sub-determinants of the top and bottom
    /// row pairs.
    fn sub_factors(&self) -> ([f32; 6], [f32; 6]) {
        let a = &self.m;
        let s = [
            a[0] * a[5] - a[4] * a[1],
            a[0] * a[6] - a[4] * a[2],
            a[0] * a[7] - a[4] * a[3],
            a[1] * a[6] - a[5] * a[2],
            a[1] * a[7] - a[5] * a[3],
            a[2] * a[7] - a[6] * a[3],
        ];
        let c = [
            a[8] * a[13] - a[12] * a[9],
            a[8] * a[14] - a[12] * a[10],
            a[8] * a[15] - a[12] * a[11],
            a[9] * a[14] - a[13] * a[10],
            a[9] * a[15] - a[13] * a[11],
            a[10] * a[15] - a[14] * a[11],
        ];
        (s, c)
    }

    pub fn determinant(&self) -> f32 {
        let (s, c) = self.sub_factors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Fails when `|det| <= EPSILON`.
    pub fn try_inverse(&self) -> Result<Self, DegenerateMatrixError> {
        let (s, c) = self.sub_factors();
        let det =
            s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];
        if near_zero(det) {
            return Err(DegenerateMatrixError { determinant: det });
        }
        let inv = 1.0 / det;
        let a = &self.m;
        let (a00, a01, a02, a03) = (a[0], a[1], a[2], a[3]);
        let (a10, a11, a12, a13) = (a[4], a[5], a[6], a[7]);
        let (a20, a21, a22, a23) = (a[8], a[9], a[10], a[11]);
        let (a30, a31, a32, a33) = (a[12], a[13], a[14], a[15]);

        Ok(Self {
            m: [
                (a11 * c[5] - a12 * c[4] + a13 * c[3]) * inv,
                (-a01 * c[5] + a02 * c[4] - a03 * c[3]) * inv,
                (a31 * s[5] - a32 * s[4] + a33 * s[3]) * inv,
                (-a21 * s[5] + a22 * s[4] - a23 * s[3]) * inv,
                (-a10 * c[5] + a12 * c[2] - a13 * c[1]) * inv,
                (a00 * c[5] - a02 * c[2] + a03 * c[1]) * inv,
                (-a30 * s[5] + a32 * s[2] - a33 * s[1]) * inv,
                (a20 * s[5] - a22 * s[2] + a23 * s[1]) * inv,
                (a10 * c[4] - a11 * c[2] + a13 * c[0]) * inv,
                (-a00 * c[4] + a01 * c[2] - a03 * c[0]) * inv,
                (a30 * s[4] - a31 * s[2] + a33 * s[0]) * inv,
                (-a20 * s[4] + a21 * s[2] - a23 * s[0]) * inv,
                (-a10 * c[3] + a11 * c[1] - a12 * c[0]) * inv,
                (a00 * c[3] - a01 * c[1] + a02 * c[0]) * inv,
                (-a30 * s[3] + a31 * s[1] - a32 * s[0]) * inv,
                (a20 * s[3] - a21 * s[1] + a22 * s[0]) * inv,
            ],
        })
    }

    /// Inverse, or [`Mat4::IDENTITY`] for a singular matrix.
    pub fn inverse(&self) -> Self {
        self.try_inverse().unwrap_or(Self::IDENTITY)
    }

    /// Inverse-transpose of the upper 3x3; transforms normals under
    /// non-uniform scale.
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self).inverse().transpose()
    }

    pub fn translation(t: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[3] = t.x;
        out.m[7] = t.y;
        out.m[11] = t.z;
        out
    }

    pub fn scale(s: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0] = s.x;
        out.m[5] = s.y;
        out.m[10] = s.z;
        out
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[5] = c;
        out.m[6] = -s;
        out.m[9] = s;
        out.m[10] = c;
        out
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0] = c;
        out.m[2] = s;
        out.m[8] = -s;
        out.m[10] = c;
        out
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0] = c;
        out.m[1] = -s;
        out.m[4] = s;
        out.m[5] = c;
        out
    }

    /// Rotation of `angle` radians about `axis` (normalised here). A
    /// zero-length axis yields identity.
    pub fn rotation(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        if axis.is_zero() {
            return Self::IDENTITY;
        }
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;
        Self::from_rows(
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    pub fn from_quat(q: Quat) -> Self {
        q.to_mat4()
    }

    /// `T * R * S`.
    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self::translation(translation) * rotation.to_mat4() * Self::scale(scale)
    }

    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0] = 2.0 / (right - left);
        out.m[5] = 2.0 / (top - bottom);
        out.m[10] = -2.0 / (far - near);
        out.m[3] = -(right + left) / (right - left);
        out.m[7] = -(top + bottom) / (top - bottom);
        out.m[11] = -(far + near) / (far - near);
        out
    }

    /// `fov_y` in radians.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let tan_half = (fov_y * 0.5).tan();
        let mut out = Self::ZERO;
        out.m[0] = 1.0 / (aspect * tan_half);
        out.m[5] = 1.0 / tan_half;
        out.m[10] = -(far + near) / (far - near);
        out.m[11] = -(2.0 * far * near) / (far - near);
        out.m[14] = -1.0;
        out
    }

    /// World-to-view matrix for an eye at `eye` looking at `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let z = (eye - target).normalized();
        let x = up.cross(z).normalized();
        let y = z.cross(x);
        Self::from_rows(
            [x.x, x.y, x.z, -x.dot(eye)],
            [y.x, y.y, y.z, -y.dot(eye)],
            [z.x, z.y, z.z, -z.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    /// Transforms a point (w = 1) and divides by the resulting w.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * p.extend(1.0)).homogenized()
    }

    /// Transforms a direction (w = 0); translation is ignored.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        (*self * d.extend(0.0)).xyz()
    }

    pub fn get_translation(&self) -> Vec3 {
        Vec3::new(self.m[3], self.m[7], self.m[11])
    }

    /// Column-major copy for uniform upload.
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.transpose().m
    }

    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| approximately_eps(*a, *b, epsilon))
    }
}

/// Approximate, element-wise within `EPSILON`.
impl PartialEq for Mat4 {
    fn eq(&self, other: &Self) -> bool {
        self.m.iter().zip(other.m.iter()).all(|(a, b)| approximately(*a, *b))
    }
}

impl Index<(usize, usize)> for Mat4 {
    type Output = f32;
    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.m[row * 4 + col]
    }
}

impl IndexMut<(usize, usize)> for Mat4 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.m[row * 4 + col]
    }
}

impl Add for Mat4 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut out = self;
        out.m.iter_mut().zip(rhs.m.iter()).for_each(|(a, b)| *a += b);
        out
    }
}

impl Sub for Mat4 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let mut out = self;
        out.m.iter_mut().zip(rhs.m.iter()).for_each(|(a, b)| *a -= b);
        out
    }
}

impl Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                let v = (0..4).map(|k| self.at(i, k) * rhs.at(k, j)).sum();
                out.set(i, j, v);
            }
        }
        out
    }
}

impl MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            write!(f, "[ ")?;
            for col in 0..4 {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:8.4}", self.at(row, col))?;
            }
            write!(f, " ]")?;
            if row < 3 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::HALF_PI;

    #[test]
    fn translation_moves_points_not_directions() {
        let t = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_direction(Vec3::UNIT_X), Vec3::UNIT_X);
        assert_eq!(t.get_translation(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn axis_rotations_match_general_rotation() {
        for angle in [0.3_f32, 1.2, -2.0] {
            assert!(Mat4::rotation_x(angle).abs_diff_eq(&Mat4::rotation(Vec3::UNIT_X, angle), 1e-5));
            assert!(Mat4::rotation_y(angle).abs_diff_eq(&Mat4::rotation(Vec3::UNIT_Y, angle), 1e-5));
            assert!(Mat4::rotation_z(angle).abs_diff_eq(&Mat4::rotation(Vec3::UNIT_Z, angle), 1e-5));
        }
        let p = Mat4::rotation_z(HALF_PI).transform_point(Vec3::UNIT_X);
        assert!(p.abs_diff_eq(Vec3::UNIT_Y, 1e-6));
        assert_eq!(Mat4::rotation(Vec3::ZERO, 1.0), Mat4::IDENTITY);
    }

    #[test]
    fn inverse_round_trips() {
        let m = Mat4::translation(Vec3::new(3.0, -1.0, 2.0))
            * Mat4::rotation(Vec3::new(1.0, 1.0, 0.0), 0.7)
            * Mat4::scale(Vec3::new(2.0, 0.5, 1.5));
        assert!((m * m.inverse()).abs_diff_eq(&Mat4::IDENTITY, 1e-5));
        assert!((m.inverse() * m).abs_diff_eq(&Mat4::IDENTITY, 1e-5));
        assert!((m.determinant() - 1.5).abs() < 1e-4);
    }

    #[test]
    fn singular_inverse_is_identity() {
        let flat = Mat4::scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(flat.try_inverse().is_err());
        assert_eq!(flat.inverse(), Mat4::IDENTITY);
        assert!(Mat4::ZERO.try_inverse().is_err());
        assert_eq!(Mat4::ZERO.inverse(), Mat4::IDENTITY);
    }

    #[test]
    fn general_inverse_round_trips() {
        let m = Mat4::from_rows(
            [2.0, -1.0, 0.5, 3.0],
            [0.0, 1.5, -2.0, 1.0],
            [1.0, 0.25, 1.0, -1.0],
            [0.5, 0.0, -0.5, 2.0],
        );
        assert!(m.determinant().abs() > 0.1);
        assert!((m * m.inverse()).abs_diff_eq(&Mat4::IDENTITY, 1e-4));
        assert!((m.inverse() * m).abs_diff_eq(&Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn perspective_entries() {
        let p = Mat4::perspective(HALF_PI, 1.0, 1.0, 10.0);
        assert!(approximately_eps(p.m[0], 1.0, 1e-6));
        assert!(approximately_eps(p.m[5], 1.0, 1e-6));
        assert!(approximately_eps(p.m[10], -11.0 / 9.0, 1e-6));
        assert!(approximately_eps(p.m[11], -20.0 / 9.0, 1e-6));
        assert_eq!(p.m[14], -1.0);
        assert_eq!(p.m[15], 0.0);
        // Near plane maps to -1, far plane to 1.
        assert!(approximately_eps(p.transform_point(Vec3::new(0.0, 0.0, -1.0)).z, -1.0, 1e-5));
        assert!(approximately_eps(p.transform_point(Vec3::new(0.0, 0.0, -10.0)).z, 1.0, 1e-5));
    }

    #[test]
    fn orthographic_maps_box_to_ndc() {
        let o = Mat4::orthographic(-2.0, 2.0, -1.0, 1.0, 0.1, 100.0);
        let p = o.transform_point(Vec3::new(2.0, 1.0, -100.0));
        assert!(p.abs_diff_eq(Vec3::new(1.0, 1.0, 1.0), 1e-5));
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::UP);
        assert!(view.transform_point(eye).abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(view
            .transform_point(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-6));
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let m = Mat4::scale(Vec3::new(2.0, 1.0, 1.0));
        let n = m.normal_matrix();
        assert!(n.abs_diff_eq(&Mat3::from_rows([0.5, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]), 1e-6));
    }

    #[test]
    fn column_major_upload_is_transpose() {
        let t = Mat4::translation(Vec3::new(7.0, 8.0, 9.0));
        let cols = t.to_cols_array();
        assert_eq!(&cols[12..15], &[7.0, 8.0, 9.0]);
        let shown = t.to_string();
        assert!(shown.contains("7.0000"));
        assert_eq!(shown.lines().count(), 4);
    }
}
