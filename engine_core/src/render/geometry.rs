//! CPU-side geometry and the built-in primitives.

use serde::{Deserialize, Serialize};

use crate::math::{near_zero, Vec2, Vec3, PI, TWO_PI};

/// Interleaved vertex: position, normal, uv, tangent, bitangent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl Vertex {
    /// `(attribute, float count)` in buffer order.
    pub const LAYOUT: [(&'static str, usize); 5] = [
        ("a_Position", 3),
        ("a_Normal", 3),
        ("a_TexCoord", 2),
        ("a_Tangent", 3),
        ("a_Bitangent", 3),
    ];

    /// Floats per vertex.
    pub const STRIDE: usize = 14;

    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> u32 {
        u32::try_from(self.vertices.len()).unwrap_or(u32::MAX)
    }

    pub fn index_count(&self) -> u32 {
        u32::try_from(self.indices.len()).unwrap_or(u32::MAX)
    }

    /// `true` when every index addresses an existing vertex and the index
    /// count is a whole number of triangles.
    pub fn is_valid(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    /// Flattens vertices following [`Vertex::LAYOUT`].
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * Vertex::STRIDE);
        for v in &self.vertices {
            out.extend_from_slice(&v.position.to_array());
            out.extend_from_slice(&v.normal.to_array());
            out.extend_from_slice(&v.tex_coord.to_array());
            out.extend_from_slice(&v.tangent.to_array());
            out.extend_from_slice(&v.bitangent.to_array());
        }
        out
    }

    /// Per-triangle tangent frames from positions and uvs. Vertices shared
    /// between triangles keep the frame of the last triangle touching them.
    /// Triangles with degenerate uvs get zero tangents.
    pub fn compute_tangents(&mut self) {
        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(v0), Some(v1), Some(v2)) = (
                self.vertices.get(i0),
                self.vertices.get(i1),
                self.vertices.get(i2),
            ) else {
                continue;
            };

            let edge1 = v1.position - v0.position;
            let edge2 = v2.position - v0.position;
            let duv1 = v1.tex_coord - v0.tex_coord;
            let duv2 = v2.tex_coord - v0.tex_coord;

            let det = duv1.x * duv2.y - duv2.x * duv1.y;
            let (tangent, bitangent) = if near_zero(det) {
                (Vec3::ZERO, Vec3::ZERO)
            } else {
                let f = 1.0 / det;
                (
                    ((edge1 * duv2.y - edge2 * duv1.y) * f).normalized(),
                    ((edge2 * duv1.x - edge1 * duv2.x) * f).normalized(),
                )
            };

            for i in [i0, i1, i2] {
                self.vertices[i].tangent = tangent;
                self.vertices[i].bitangent = bitangent;
            }
        }
    }

    /// Unit cube centred on the origin: 24 vertices (4 per face, so normals
    /// stay flat) and 36 indices.
    pub fn cube() -> Self {
        let v = |p: [f32; 3], n: [f32; 3], uv: [f32; 2]| {
            Vertex::new(Vec3::from(p), Vec3::from(n), Vec2::from(uv))
        };
        let vertices = vec![
            // +Z
            v([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0], [0.0, 0.0]),
            v([0.5, -0.5, 0.5], [0.0, 0.0, 1.0], [1.0, 0.0]),
            v([0.5, 0.5, 0.5], [0.0, 0.0, 1.0], [1.0, 1.0]),
            v([-0.5, 0.5, 0.5], [0.0, 0.0, 1.0], [0.0, 1.0]),
            // -Z
            v([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0], [1.0, 0.0]),
            v([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0], [1.0, 1.0]),
            v([0.5, 0.5, -0.5], [0.0, 0.0, -1.0], [0.0, 1.0]),
            v([0.5, -0.5, -0.5], [0.0, 0.0, -1.0], [0.0, 0.0]),
            // +Y
            v([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0], [0.0, 1.0]),
            v([-0.5, 0.5, 0.5], [0.0, 1.0, 0.0], [0.0, 0.0]),
            v([0.5, 0.5, 0.5], [0.0, 1.0, 0.0], [1.0, 0.0]),
            v([0.5, 0.5, -0.5], [0.0, 1.0, 0.0], [1.0, 1.0]),
            // -Y
            v([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0], [1.0, 1.0]),
            v([0.5, -0.5, -0.5], [0.0, -1.0, 0.0], [0.0, 1.0]),
            v([0.5, -0.5, 0.5], [0.0, -1.0, 0.0], [0.0, 0.0]),
            v([-0.5, -0.5, 0.5], [0.0, -1.0, 0.0], [1.0, 0.0]),
            // +X
            v([0.5, -0.5, -0.5], [1.0, 0.0, 0.0], [1.0, 0.0]),
            v([0.5, 0.5, -0.5], [1.0, 0.0, 0.0], [1.0, 1.0]),
            v([0.5, 0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 1.0]),
            v([0.5, -0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 0.0]),
            // -X
            v([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0], [0.0, 0.0]),
            v([-0.5, -0.5, 0.5], [-1.0, 0.0, 0.0], [1.0, 0.0]),
            v([-0.5, 0.5, 0.5], [-1.0, 0.0, 0.0], [1.0, 1.0]),
            v([-0.5, 0.5, -0.5], [-1.0, 0.0, 0.0], [0.0, 1.0]),
        ];
        let indices = (0..6u32)
            .flat_map(|face| {
                let b = face * 4;
                [b, b + 1, b + 2, b + 2, b + 3, b]
            })
            .collect();
        let mut mesh = Self::new(vertices, indices);
        mesh.compute_tangents();
        mesh
    }

    /// Unit quad in the XZ plane facing +Y.
    pub fn plane() -> Self {
        let n = Vec3::UP;
        let vertices = vec![
            Vertex::new(Vec3::new(-0.5, 0.0, -0.5), n, Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(0.5, 0.0, -0.5), n, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(0.5, 0.0, 0.5), n, Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-0.5, 0.0, 0.5), n, Vec2::new(0.0, 1.0)),
        ];
        let mut mesh = Self::new(vertices, vec![0, 1, 2, 2, 3, 0]);
        mesh.compute_tangents();
        mesh
    }

    /// Upper bound on sphere rings and slices; keeps every index within `u32`.
    pub const MAX_SPHERE_SEGMENTS: u32 = 512;

    /// UV sphere of radius 0.5 with `segments` rings and slices, clamped to
    /// `3..=MAX_SPHERE_SEGMENTS`.
    pub fn sphere(segments: u32) -> Self {
        let segments = segments.clamp(3, Self::MAX_SPHERE_SEGMENTS);
        let side = segments as usize + 1;
        let mut vertices = Vec::with_capacity(side * side);
        for y in 0..=segments {
            for x in 0..=segments {
                let u = x as f32 / segments as f32;
                let v = y as f32 / segments as f32;
                let (sin_theta, cos_theta) = (u * TWO_PI).sin_cos();
                let (sin_phi, cos_phi) = (v * PI).sin_cos();
                let dir = Vec3::new(cos_theta * sin_phi, cos_phi, sin_theta * sin_phi);
                vertices.push(Vertex::new(dir * 0.5, dir.normalized(), Vec2::new(u, v)));
            }
        }

        let mut indices = Vec::with_capacity(segments as usize * segments as usize * 6);
        for y in 0..segments {
            for x in 0..segments {
                let first = y * (segments + 1) + x;
                let second = first + segments + 1;
                indices.extend_from_slice(&[first, second, first + 1]);
                indices.extend_from_slice(&[second, second + 1, first + 1]);
            }
        }

        let mut mesh = Self::new(vertices, indices);
        mesh.compute_tangents();
        mesh
    }
}
