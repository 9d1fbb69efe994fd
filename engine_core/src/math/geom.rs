//! Rays and planes for picking.

use serde::{Deserialize, Serialize};

use super::{near_zero, Vec3};

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::FORWARD,
        }
    }
}

impl Ray {
    /// `direction` is normalised.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    pub fn get_point(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance along the ray to the plane through `point` with `normal`.
    /// `None` when the ray is parallel to the plane or the hit lies behind
    /// the origin.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = self.direction.dot(normal);
        if near_zero(denom) {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then_some(t)
    }

    pub fn intersect(&self, plane: &Plane) -> Option<f32> {
        self.intersect_plane(plane.normal * plane.distance, plane.normal)
    }
}

/// `dot(normal, p) == distance` for points `p` on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::UP,
            distance: 0.0,
        }
    }
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalized(),
            distance,
        }
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalized();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Counter-clockwise winding `a, b, c` faces the normal.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalized();
        Self {
            normal,
            distance: normal.dot(a),
        }
    }

    /// Signed; positive on the side the normal points to.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.distance_to_point(point)
    }

    /// `true` for points strictly in front of the plane.
    pub fn side(&self, point: Vec3) -> bool {
        self.distance_to_point(point) > 0.0
    }
}
