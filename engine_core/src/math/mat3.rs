use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, MulAssign, Sub};

use serde::{Deserialize, Serialize};

use super::{approximately, approximately_eps, near_zero, DegenerateMatrixError, Mat4, Vec2, Vec3};

/// 3x3 matrix, row-major (`m[row * 3 + col]`).
///
/// Used for normal matrices and 2D homogeneous transforms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mat3 {
    pub m: [f32; 9],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ],
    };

    pub const ZERO: Self = Self { m: [0.0; 9] };

    pub const fn from_rows(r0: [f32; 3], r1: [f32; 3], r2: [f32; 3]) -> Self {
        Self {
            m: [
                r0[0], r0[1], r0[2], //
                r1[0], r1[1], r1[2], //
                r2[0], r2[1], r2[2],
            ],
        }
    }

    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_rows([c0.x, c1.x, c2.x], [c0.y, c1.y, c2.y], [c0.z, c1.z, c2.z])
    }

    /// Upper-left 3x3 block of a [`Mat4`].
    pub fn from_mat4(m: &Mat4) -> Self {
        let mut out = Self::ZERO;
        for row in 0..3 {
            for col in 0..3 {
                out.set(row, col, m.at(row, col));
            }
        }
        out
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[row * 3 + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[row * 3 + col] = value;
    }

    pub fn row(&self, row: usize) -> Vec3 {
        Vec3::new(self.at(row, 0), self.at(row, 1), self.at(row, 2))
    }

    pub fn col(&self, col: usize) -> Vec3 {
        Vec3::new(self.at(0, col), self.at(1, col), self.at(2, col))
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for row in 0..3 {
            for col in 0..3 {
                out.set(col, row, self.at(row, col));
            }
        }
        out
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Adjugate / determinant. Fails when `|det| <= EPSILON`.
    pub fn try_inverse(&self) -> Result<Self, DegenerateMatrixError> {
        let det = self.determinant();
        if near_zero(det) {
            return Err(DegenerateMatrixError { determinant: det });
        }
        let inv = 1.0 / det;
        let m = &self.m;
        Ok(Self {
            m: [
                (m[4] * m[8] - m[5] * m[7]) * inv,
                (m[2] * m[7] - m[1] * m[8]) * inv,
                (m[1] * m[5] - m[2] * m[4]) * inv,
                (m[5] * m[6] - m[3] * m[8]) * inv,
                (m[0] * m[8] - m[2] * m[6]) * inv,
                (m[2] * m[3] - m[0] * m[5]) * inv,
                (m[3] * m[7] - m[4] * m[6]) * inv,
                (m[1] * m[6] - m[0] * m[7]) * inv,
                (m[0] * m[4] - m[1] * m[3]) * inv,
            ],
        })
    }

    /// Inverse, or [`Mat3::IDENTITY`] for a singular matrix.
    pub fn inverse(&self) -> Self {
        self.try_inverse().unwrap_or(Self::IDENTITY)
    }

    /// 2D homogeneous scale.
    pub fn scale_2d(scale: Vec2) -> Self {
        let mut out = Self::IDENTITY;
        out.set(0, 0, scale.x);
        out.set(1, 1, scale.y);
        out
    }

    /// 2D homogeneous counter-clockwise rotation.
    pub fn rotation_2d(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0])
    }

    /// 2D homogeneous translation.
    pub fn translation_2d(t: Vec2) -> Self {
        let mut out = Self::IDENTITY;
        out.set(0, 2, t.x);
        out.set(1, 2, t.y);
        out
    }

    /// Column-major copy for uniform upload.
    pub fn to_cols_array(&self) -> [f32; 9] {
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
impl PartialEq for Mat3 {
    fn eq(&self, other: &Self) -> bool {
        self.m.iter().zip(other.m.iter()).all(|(a, b)| approximately(*a, *b))
    }
}

impl Index<(usize, usize)> for Mat3 {
    type Output = f32;
    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.m[row * 3 + col]
    }
}

impl IndexMut<(usize, usize)> for Mat3 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.m[row * 3 + col]
    }
}

impl Add for Mat3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut out = self;
        out.m.iter_mut().zip(rhs.m.iter()).for_each(|(a, b)| *a += b);
        out
    }
}

impl Sub for Mat3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let mut out = self;
        out.m.iter_mut().zip(rhs.m.iter()).for_each(|(a, b)| *a -= b);
        out
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                let v = (0..3).map(|k| self.at(i, k) * rhs.at(k, j)).sum();
                out.set(i, j, v);
            }
        }
        out
    }
}

impl MulAssign for Mat3 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }
}

impl fmt::Display for Mat3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            write!(f, "[ ")?;
            for col in 0..3 {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:8.4}", self.at(row, col))?;
            }
            write!(f, " ]")?;
            if row < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
