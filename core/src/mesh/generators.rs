//! Closed mesh generators.
//!
//! Shadow volumes need watertight occluders, so every generator here emits a
//! closed two-manifold with counter-clockwise, outward-facing triangles and
//! no duplicated seam vertices. Convert the result with
//! [`IndexedTriangles::into_volume_mesh`].

use std::f32::consts::PI;

use crate::math::Vec3;

use super::volume::{MeshError, VolumeMesh};

/// A plain triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedTriangles {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
}

impl IndexedTriangles {
    /// Move every vertex by `offset`.
    pub fn translated(mut self, offset: Vec3) -> Self {
        for p in &mut self.positions {
            *p += offset;
        }
        self
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Build the adjacency for shadow volume extraction.
    pub fn into_volume_mesh(self) -> Result<VolumeMesh, MeshError> {
        VolumeMesh::from_triangles(&self.positions, &self.indices)
    }
}

/// Generate a regular tetrahedron centered at the origin.
///
/// Corners sit at alternating corners of the cube `[-size, size]^3`.
pub fn generate_tetrahedron(size: f32) -> IndexedTriangles {
    let positions = vec![
        Vec3::new(size, size, size),
        Vec3::new(size, -size, -size),
        Vec3::new(-size, size, -size),
        Vec3::new(-size, -size, size),
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2,
        0, 2, 3,
        0, 3, 1,
        1, 3, 2,
    ];
    IndexedTriangles { positions, indices }
}

/// Generate an axis-aligned box centered at the origin.
///
/// 8 vertices, 12 triangles, 18 edges.
pub fn generate_box(half_extents: Vec3) -> IndexedTriangles {
    let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
    let positions = vec![
        Vec3::new(-x, -y, -z),
        Vec3::new(x, -y, -z),
        Vec3::new(x, y, -z),
        Vec3::new(-x, y, -z),
        Vec3::new(-x, -y, z),
        Vec3::new(x, -y, z),
        Vec3::new(x, y, z),
        Vec3::new(-x, y, z),
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 3, 2,  0, 2, 1, // -Z
        4, 5, 6,  4, 6, 7, // +Z
        0, 1, 5,  0, 5, 4, // -Y
        3, 7, 6,  3, 6, 2, // +Y
        0, 4, 7,  0, 7, 3, // -X
        1, 2, 6,  1, 6, 5, // +X
    ];
    IndexedTriangles { positions, indices }
}

/// Upper bound for sphere `segments` and `rings`. Keeps every vertex index
/// and buffer length of the largest sphere within `u32`.
pub const MAX_SPHERE_DIVISIONS: u32 = 4096;

/// Generate a closed UV sphere.
///
/// Unlike a render sphere there is no seam column and each pole is a single
/// vertex, so the result is watertight.
///
/// # Arguments
///
/// * `radius` - Sphere radius
/// * `segments` - Number of longitudinal segments (3 to [`MAX_SPHERE_DIVISIONS`])
/// * `rings` - Number of latitudinal rings from pole to pole (2 to [`MAX_SPHERE_DIVISIONS`])
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> IndexedTriangles {
    let segments = segments.clamp(3, MAX_SPHERE_DIVISIONS);
    let rings = rings.clamp(2, MAX_SPHERE_DIVISIONS);

    let mut positions = Vec::with_capacity((2 + (rings - 1) * segments) as usize);
    positions.push(Vec3::new(0.0, radius, 0.0));
    for ring in 1..rings {
        let theta = ring as f32 * PI / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for segment in 0..segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            positions.push(Vec3::new(
                sin_theta * cos_phi * radius,
                cos_theta * radius,
                sin_theta * sin_phi * radius,
            ));
        }
    }
    positions.push(Vec3::new(0.0, -radius, 0.0));

    let top = 0u32;
    let bottom = positions.len() as u32 - 1;
    let ring_vertex = |ring: u32, segment: u32| 1 + (ring - 1) * segments + segment % segments;

    let mut indices = Vec::with_capacity((6 * segments * (rings - 1)) as usize);
    for segment in 0..segments {
        indices.extend_from_slice(&[top, ring_vertex(1, segment + 1), ring_vertex(1, segment)]);
    }
    for ring in 1..rings - 1 {
        for segment in 0..segments {
            let current = ring_vertex(ring, segment);
            let current_next = ring_vertex(ring, segment + 1);
            let below = ring_vertex(ring + 1, segment);
            let below_next = ring_vertex(ring + 1, segment + 1);

            indices.extend_from_slice(&[current, current_next, below]);
            indices.extend_from_slice(&[current_next, below_next, below]);
        }
    }
    for segment in 0..segments {
        indices.extend_from_slice(&[
            bottom,
            ring_vertex(rings - 1, segment),
            ring_vertex(rings - 1, segment + 1),
        ]);
    }

    IndexedTriangles { positions, indices }
}
