//! Common fixtures for shadow volume integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use umbra_core::math::{Mat4, Vec3, look_at_rh, perspective_rh};
use umbra_core::mesh::VolumeMesh;
use umbra_core::mesh::generators::{generate_box, generate_sphere, generate_tetrahedron};
use umbra_shadow::{ShadowVolume, camera_projected_z};

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Meshes
// ============================================================================

/// Closed test shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Tetrahedron,
    Box,
    Sphere,
}

impl Shape {
    pub fn mesh(&self) -> VolumeMesh {
        let tris = match self {
            Shape::Tetrahedron => generate_tetrahedron(1.0),
            Shape::Box => generate_box(Vec3::new(1.0, 1.0, 1.0)),
            Shape::Sphere => generate_sphere(1.0, 16, 8),
        };
        tris.into_volume_mesh().expect("generated shapes are valid")
    }

    pub fn engine(&self) -> ShadowVolume {
        ShadowVolume::new(Arc::new(self.mesh()))
    }
}

/// Engine over `shape` with volume `id` already allocated.
pub fn allocated_engine(shape: Shape, id: u32) -> ShadowVolume {
    let mut engine = shape.engine();
    engine.allocate(id).expect("fresh engine has no volumes");
    engine
}

// ============================================================================
// Camera
// ============================================================================

/// A perspective camera looking down -Z at the origin.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub view_proj: Mat4,
    pub projected_z: f32,
}

impl Camera {
    pub fn looking_at_origin(position: Vec3) -> Self {
        let view = look_at_rh(&position, &Vec3::zeros(), &Vec3::new(0.0, 1.0, 0.0));
        let proj = perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0);
        let view_proj = proj * view;
        Self {
            position,
            view_proj,
            projected_z: camera_projected_z(&view_proj, &position),
        }
    }

    /// Camera at `(0, 0, 5)`.
    pub fn default_view() -> Self {
        Self::looking_at_origin(Vec3::new(0.0, 0.0, 5.0))
    }
}

// ============================================================================
// Volume checks
// ============================================================================

/// Count of each directed edge in a triangle list.
pub fn directed_edges(indices: &[u32]) -> HashMap<(u32, u32), i32> {
    let mut edges = HashMap::new();
    for tri in indices.chunks_exact(3) {
        for k in 0..3 {
            *edges.entry((tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
        }
    }
    edges
}

/// Whether every directed edge is matched by its reverse, i.e. the triangle
/// list is a closed, consistently wound surface.
pub fn is_watertight(indices: &[u32]) -> bool {
    let edges = directed_edges(indices);
    edges
        .iter()
        .all(|(&(a, b), &count)| edges.get(&(b, a)).copied().unwrap_or(0) == count)
}
