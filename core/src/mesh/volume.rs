//! Volume meshes: welded triangle meshes with edge adjacency.
//!
//! A [`VolumeMesh`] is built once from render geometry and then only read.
//! Every vertex exists twice at draw time: index `i` is the original
//! position and `i + vertex_count()` is the same vertex pushed away from the
//! light, either by a vertex shader (see [`ShadowVertex`]) or on the CPU
//! (see [`VolumeMesh::extrude_vertices`]).

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::math::{Aabb, Vec3};

use super::index::IndexFormat;

/// An undirected mesh edge, stored once for the two triangles sharing it.
///
/// `v0 -> v1` is the canonical direction: the direction in which the first
/// triangle that introduced the edge traverses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VolumeEdge {
    /// First vertex.
    pub v0: u32,
    /// Second vertex.
    pub v1: u32,
}

/// A triangle with links to its three edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeTriangle {
    /// Vertex indices in winding order.
    pub vertices: [u32; 3],
    /// Edge `k` joins `vertices[k]` and `vertices[(k + 1) % 3]`.
    pub edges: [u32; 3],
    /// Face normal. `dot(normal, vertices[0] - light) >= 0` when the face is
    /// turned toward the light.
    pub normal: Vec3,
    /// Bit `k` is set when this triangle walks edge `k` as `v1 -> v0`.
    pub winding: u8,
}

impl VolumeTriangle {
    /// Whether this triangle traverses edge `k` against its canonical direction.
    #[inline]
    pub fn is_edge_reversed(&self, k: usize) -> bool {
        self.winding & (1 << k) != 0
    }
}

/// Vertex layout for GPU-side extrusion.
///
/// The vertex buffer holds every position twice. `extrude` is 0.0 for the
/// first half and 1.0 for the second; the vertex shader moves only the
/// latter away from the light.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowVertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// 0.0 keeps the vertex in place, 1.0 extrudes it.
    pub extrude: f32,
}

static_assertions::assert_eq_size!(ShadowVertex, [f32; 4]);

/// Errors that can occur while building a [`VolumeMesh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The triangle list length is not a multiple of three.
    IndexCountNotMultipleOfThree(usize),
    /// A triangle references a vertex that does not exist.
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of available vertices.
        vertex_count: usize,
    },
    /// No non-degenerate triangles remain.
    EmptyMesh,
    /// Precomputed adjacency is inconsistent.
    InvalidAdjacency(String),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexCountNotMultipleOfThree(count) => {
                write!(f, "index count {count} is not a multiple of 3")
            }
            Self::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "index {index} out of range for {vertex_count} vertices"
            ),
            Self::EmptyMesh => write!(f, "mesh has no non-degenerate triangles"),
            Self::InvalidAdjacency(msg) => write!(f, "invalid adjacency: {msg}"),
        }
    }
}

impl std::error::Error for MeshError {}

/// Direction in which a point is pushed away from a light.
///
/// For a point light this is the normalized vector from the light to the
/// point; for a directional light `light` already is the direction the light
/// travels. A point sitting exactly on a point light has no defined
/// direction and yields zero.
pub fn extrusion_direction(point: &Vec3, light: &Vec3, is_point_light: bool) -> Vec3 {
    let dir = if is_point_light { point - light } else { *light };
    dir.try_normalize(f32::MIN_POSITIVE)
        .unwrap_or_else(Vec3::zeros)
}

/// A closed triangle mesh prepared for shadow volume extraction.
#[derive(Debug, Clone)]
pub struct VolumeMesh {
    vertices: Vec<Vec3>,
    edges: Vec<VolumeEdge>,
    triangles: Vec<VolumeTriangle>,
    bounds: Aabb,
    index_format: IndexFormat,
    open_edges: usize,
}

impl VolumeMesh {
    /// Build a volume mesh from a triangle list.
    ///
    /// Vertices with bit-identical positions are welded so that triangles on
    /// either side of a texture seam share their edge. Only vertices that are
    /// referenced by a triangle are kept. Triangles that collapse after
    /// welding are dropped.
    pub fn from_triangles(positions: &[Vec3], indices: &[u32]) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }

        let mut welder = Welder::new(positions.len());
        let mut edges: Vec<VolumeEdge> = Vec::new();
        let mut edge_lookup: HashMap<(u32, u32), u32> = HashMap::new();
        let mut triangles = Vec::with_capacity(indices.len() / 3);
        let mut degenerate = 0usize;

        for tri in indices.chunks_exact(3) {
            let w = [
                welder.weld(positions, tri[0]),
                welder.weld(positions, tri[1]),
                welder.weld(positions, tri[2]),
            ];
            if w[0] == w[1] || w[1] == w[2] || w[2] == w[0] {
                degenerate += 1;
                continue;
            }

            let mut tri_edges = [0u32; 3];
            let mut winding = 0u8;
            for k in 0..3 {
                let (a, b) = (w[k], w[(k + 1) % 3]);
                let index = match edge_lookup.entry((a.min(b), a.max(b))) {
                    Entry::Occupied(entry) => *entry.get(),
                    Entry::Vacant(entry) => {
                        edges.push(VolumeEdge { v0: a, v1: b });
                        *entry.insert((edges.len() - 1) as u32)
                    }
                };
                if edges[index as usize].v0 != a {
                    winding |= 1 << k;
                }
                tri_edges[k] = index;
            }

            let normal = face_normal(&welder.vertices, &w);
            triangles.push(VolumeTriangle {
                vertices: w,
                edges: tri_edges,
                normal,
                winding,
            });
        }

        if degenerate > 0 {
            log::debug!("Dropped {degenerate} degenerate triangles while building volume mesh");
        }

        Self::assemble(welder.vertices, edges, triangles)
    }

    /// Build a volume mesh from precomputed adjacency.
    ///
    /// Validates that every index is in range and that each triangle's edge
    /// `k` joins its vertices `k` and `k + 1` in the direction given by its
    /// winding bits.
    pub fn from_parts(
        vertices: Vec<Vec3>,
        edges: Vec<VolumeEdge>,
        triangles: Vec<VolumeTriangle>,
    ) -> Result<Self, MeshError> {
        let vertex_count = vertices.len();
        for edge in &edges {
            for index in [edge.v0, edge.v1] {
                if index as usize >= vertex_count {
                    return Err(MeshError::IndexOutOfRange {
                        index,
                        vertex_count,
                    });
                }
            }
        }

        for (t, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.vertices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
            for k in 0..3 {
                let Some(edge) = edges.get(tri.edges[k] as usize) else {
                    return Err(MeshError::InvalidAdjacency(format!(
                        "triangle {t} references missing edge {}",
                        tri.edges[k]
                    )));
                };
                let (a, b) = (tri.vertices[k], tri.vertices[(k + 1) % 3]);
                let expected = if tri.is_edge_reversed(k) {
                    VolumeEdge { v0: b, v1: a }
                } else {
                    VolumeEdge { v0: a, v1: b }
                };
                if *edge != expected {
                    return Err(MeshError::InvalidAdjacency(format!(
                        "triangle {t} edge {k} does not match its winding"
                    )));
                }
            }
        }

        Self::assemble(vertices, edges, triangles)
    }

    fn assemble(
        vertices: Vec<Vec3>,
        edges: Vec<VolumeEdge>,
        triangles: Vec<VolumeTriangle>,
    ) -> Result<Self, MeshError> {
        if triangles.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        let bounds = Aabb::from_points(&vertices).ok_or(MeshError::EmptyMesh)?;

        let mut uses = vec![0u32; edges.len()];
        for tri in &triangles {
            for &e in &tri.edges {
                uses[e as usize] += 1;
            }
        }
        let open_edges = uses.iter().filter(|&&count| count != 2).count();
        if open_edges > 0 {
            log::warn!(
                "Volume mesh has {open_edges} of {} edges not shared by exactly two triangles; \
                 silhouettes along them will be missing",
                edges.len()
            );
        }

        let index_format = IndexFormat::for_vertex_count(2 * vertices.len());

        Ok(Self {
            vertices,
            edges,
            triangles,
            bounds,
            index_format,
            open_edges,
        })
    }

    /// Welded vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Unique edges.
    pub fn edges(&self) -> &[VolumeEdge] {
        &self.edges
    }

    /// Non-degenerate triangles.
    pub fn triangles(&self) -> &[VolumeTriangle] {
        &self.triangles
    }

    /// Number of welded vertices (half the size of the extruded vertex buffer).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of unique edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounding box of the un-extruded mesh.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Index width of every shadow volume built from this mesh.
    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    /// Whether shadow volume indices need 32 bits.
    pub fn needs_32bit_indices(&self) -> bool {
        self.index_format == IndexFormat::Uint32
    }

    /// Number of edges not shared by exactly two triangles.
    pub fn open_edge_count(&self) -> usize {
        self.open_edges
    }

    /// Whether the mesh is a closed two-manifold.
    pub fn is_closed(&self) -> bool {
        self.open_edges == 0
    }

    /// Vertex data for GPU extrusion: originals followed by extrudable copies.
    pub fn shadow_vertices(&self) -> Vec<ShadowVertex> {
        let original = self.vertices.iter().map(|v| ShadowVertex {
            position: [v.x, v.y, v.z],
            extrude: 0.0,
        });
        let extruded = self.vertices.iter().map(|v| ShadowVertex {
            position: [v.x, v.y, v.z],
            extrude: 1.0,
        });
        original.chain(extruded).collect()
    }

    /// CPU extrusion: originals followed by copies pushed `length` units
    /// away from the light.
    pub fn extrude_vertices(&self, light: &Vec3, is_point_light: bool, length: f32) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.vertices.len() * 2);
        out.extend_from_slice(&self.vertices);
        out.extend(
            self.vertices
                .iter()
                .map(|v| v + extrusion_direction(v, light, is_point_light) * length),
        );
        out
    }
}

/// Merges positions with identical bit patterns, lazily in first-use order.
struct Welder {
    vertices: Vec<Vec3>,
    remap: Vec<Option<u32>>,
    lookup: HashMap<[u32; 3], u32>,
}

impl Welder {
    fn new(position_count: usize) -> Self {
        Self {
            vertices: Vec::new(),
            remap: vec![None; position_count],
            lookup: HashMap::new(),
        }
    }

    fn weld(&mut self, positions: &[Vec3], index: u32) -> u32 {
        if let Some(welded) = self.remap[index as usize] {
            return welded;
        }
        let p = positions[index as usize];
        let key = [weld_bits(p.x), weld_bits(p.y), weld_bits(p.z)];
        let vertices = &mut self.vertices;
        let welded = *self.lookup.entry(key).or_insert_with(|| {
            vertices.push(p);
            (vertices.len() - 1) as u32
        });
        self.remap[index as usize] = Some(welded);
        welded
    }
}

// -0.0 and 0.0 weld together.
fn weld_bits(value: f32) -> u32 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

fn face_normal(vertices: &[Vec3], w: &[u32; 3]) -> Vec3 {
    let a = vertices[w[0] as usize];
    let b = vertices[w[1] as usize];
    let c = vertices[w[2] as usize];
    // Reverse of the counter-clockwise geometric normal.
    (c - a)
        .cross(&(b - a))
        .try_normalize(f32::MIN_POSITIVE)
        .unwrap_or_else(Vec3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_positions() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let err = VolumeMesh::from_triangles(&quad_positions(), &[0, 1]).unwrap_err();
        assert_eq!(err, MeshError::IndexCountNotMultipleOfThree(2));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = VolumeMesh::from_triangles(&quad_positions(), &[0, 1, 9]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                index: 9,
                vertex_count: 4
            }
        );
    }

    #[test]
    fn test_rejects_only_degenerate_triangles() {
        let err = VolumeMesh::from_triangles(&quad_positions(), &[0, 0, 1]).unwrap_err();
        assert_eq!(err, MeshError::EmptyMesh);
    }

    #[test]
    fn test_shared_edge_created_once_with_winding() {
        let mesh = VolumeMesh::from_triangles(&quad_positions(), &[0, 1, 2, 2, 3, 0]).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        // 4 outer edges + 1 diagonal
        assert_eq!(mesh.edge_count(), 5);

        let first = mesh.triangles()[0];
        let second = mesh.triangles()[1];
        // First triangle introduced the diagonal as 2 -> 0, second walks it 0 -> 2.
        assert_eq!(first.winding, 0);
        let diagonal = first.edges[2];
        assert_eq!(mesh.edges()[diagonal as usize], VolumeEdge { v0: 2, v1: 0 });
        assert_eq!(second.edges[2], diagonal);
        assert!(second.is_edge_reversed(2));
        assert!(!second.is_edge_reversed(0));

        // Open quad: only the diagonal is shared.
        assert_eq!(mesh.open_edge_count(), 4);
        assert!(!mesh.is_closed());
    }

    #[test]
    fn test_welds_duplicate_positions() {
        let mut positions = quad_positions();
        // Seam duplicates of vertices 0 and 2, with a negative zero thrown in.
        positions.push(Vec3::new(-0.0, 0.0, 0.0));
        positions.push(Vec3::new(1.0, 1.0, 0.0));
        let mesh = VolumeMesh::from_triangles(&positions, &[0, 1, 2, 5, 3, 4]).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 5);
    }

    #[test]
    fn test_normal_faces_away_from_front_side() {
        // Counter-clockwise seen from +Z.
        let mesh = VolumeMesh::from_triangles(&quad_positions(), &[0, 1, 2]).unwrap();
        let normal = mesh.triangles()[0].normal;
        assert!((normal - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-6);

        // A light on the +Z side sees the front of the face.
        let light = Vec3::new(0.5, 0.5, 3.0);
        let v0 = mesh.vertices()[0];
        assert!(normal.dot(&(v0 - light)) > 0.0);
    }

    #[test]
    fn test_bounds_and_index_format() {
        let mesh = VolumeMesh::from_triangles(&quad_positions(), &[0, 1, 2, 2, 3, 0]).unwrap();
        assert_eq!(mesh.bounds().min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.bounds().max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.index_format(), IndexFormat::Uint16);
        assert!(!mesh.needs_32bit_indices());
    }

    #[test]
    fn test_from_parts_validates_winding() {
        let vertices = quad_positions();
        let edges = vec![
            VolumeEdge { v0: 0, v1: 1 },
            VolumeEdge { v0: 1, v1: 2 },
            VolumeEdge { v0: 2, v1: 0 },
        ];
        let good = VolumeTriangle {
            vertices: [0, 1, 2],
            edges: [0, 1, 2],
            normal: Vec3::new(0.0, 0.0, -1.0),
            winding: 0,
        };
        assert!(VolumeMesh::from_parts(vertices.clone(), edges.clone(), vec![good]).is_ok());

        let bad = VolumeTriangle {
            winding: 0b001,
            ..good
        };
        let err = VolumeMesh::from_parts(vertices.clone(), edges.clone(), vec![bad]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidAdjacency(_)));

        let missing = VolumeTriangle {
            edges: [0, 1, 7],
            ..good
        };
        let err = VolumeMesh::from_parts(vertices, edges, vec![missing]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidAdjacency(_)));
    }

    #[test]
    fn test_shadow_vertices_layout() {
        let mesh = VolumeMesh::from_triangles(&quad_positions(), &[0, 1, 2]).unwrap();
        let verts = mesh.shadow_vertices();
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].extrude, 0.0);
        assert_eq!(verts[3].extrude, 1.0);
        assert_eq!(verts[1].position, verts[4].position);
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 6 * 16);
    }

    #[test]
    fn test_extrude_vertices_point_light() {
        let mesh = VolumeMesh::from_triangles(&quad_positions(), &[0, 1, 2]).unwrap();
        let light = Vec3::new(0.0, 0.0, 1.0);
        let out = mesh.extrude_vertices(&light, true, 2.0);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0], mesh.vertices()[0]);
        // Vertex 0 sits straight below the light.
        assert!((out[3] - Vec3::new(0.0, 0.0, -2.0)).norm() < 1e-6);
    }

    #[test]
    fn test_extrude_vertices_directional_light() {
        let mesh = VolumeMesh::from_triangles(&quad_positions(), &[0, 1, 2]).unwrap();
        let out = mesh.extrude_vertices(&Vec3::new(0.0, 0.0, -5.0), false, 3.0);
        for (orig, ext) in out[..3].iter().zip(&out[3..]) {
            assert!((ext - orig - Vec3::new(0.0, 0.0, -3.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_extrusion_direction_at_light_is_zero() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(extrusion_direction(&p, &p, true), Vec3::zeros());
    }

    #[test]
    fn test_error_display() {
        let err = MeshError::IndexOutOfRange {
            index: 5,
            vertex_count: 3,
        };
        assert_eq!(err.to_string(), "index 5 out of range for 3 vertices");
    }
}
