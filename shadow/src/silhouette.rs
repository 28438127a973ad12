//! Silhouette detection and cap emission.

use umbra_core::math::Vec3;
use umbra_core::mesh::VolumeMesh;

use crate::flags::ShadowVolumeFlags;
use crate::sink::IndexSink;

/// An adjacent triangle faces the light.
pub(crate) const EDGE_LIT: u8 = 0x01;
/// An adjacent triangle faces away from the light.
pub(crate) const EDGE_SHADOWED: u8 = 0x02;
/// The shadowed triangle walks the edge `v1 -> v0`.
pub(crate) const EDGE_REVERSED: u8 = 0x04;

const SILHOUETTE: u8 = EDGE_LIT | EDGE_SHADOWED;
const SILHOUETTE_REVERSED: u8 = SILHOUETTE | EDGE_REVERSED;

/// Worst-case index count for one projection of `mesh`.
pub(crate) fn max_indices(mesh: &VolumeMesh) -> usize {
    mesh.triangle_count() * 3 * 2 + mesh.edge_count() * 6
}

/// Whether a face is turned toward the light. Faces exactly edge-on count as lit.
#[inline]
pub(crate) fn is_lit(normal: &Vec3, v0: &Vec3, light: &Vec3, is_point_light: bool) -> bool {
    let f = if is_point_light {
        normal.dot(&(v0 - light))
    } else {
        normal.dot(light)
    };
    f >= 0.0
}

/// Classify triangles, emit the requested caps, then emit one quad per
/// silhouette edge.
///
/// `edge_flags` holds one scratch byte per mesh edge. It is cleared before
/// the triangle pass and every entry is zero again on return.
pub(crate) fn project<S: IndexSink>(
    mesh: &VolumeMesh,
    edge_flags: &mut [u8],
    caps: ShadowVolumeFlags,
    light: &Vec3,
    is_point_light: bool,
    sink: &mut S,
) -> usize {
    debug_assert_eq!(edge_flags.len(), mesh.edge_count());
    edge_flags.fill(0);

    let vertices = mesh.vertices();
    let offset = mesh.vertex_count() as u32;
    let front = caps.contains(ShadowVolumeFlags::CAP_FRONT);
    let back = caps.contains(ShadowVolumeFlags::CAP_BACK);

    for tri in mesh.triangles() {
        let [a, b, c] = tri.vertices;
        let v0 = &vertices[a as usize];

        if is_lit(&tri.normal, v0, light, is_point_light) {
            for &e in &tri.edges {
                edge_flags[e as usize] |= EDGE_LIT;
            }
            if front {
                sink.push_triangle(a, b, c);
            }
        } else {
            for (k, &e) in tri.edges.iter().enumerate() {
                let mut bits = EDGE_SHADOWED;
                if tri.is_edge_reversed(k) {
                    bits |= EDGE_REVERSED;
                }
                edge_flags[e as usize] |= bits;
            }
            if back {
                sink.push_triangle(a + offset, b + offset, c + offset);
            }
        }
    }

    for (edge, flags) in mesh.edges().iter().zip(edge_flags.iter_mut()) {
        let (v0, v1) = (edge.v0, edge.v1);
        match *flags {
            SILHOUETTE => {
                sink.push_triangle(v0, v1, v0 + offset);
                sink.push_triangle(v0 + offset, v1, v1 + offset);
            }
            SILHOUETTE_REVERSED => {
                sink.push_triangle(v1, v0, v1 + offset);
                sink.push_triangle(v1 + offset, v0, v0 + offset);
            }
            _ => {}
        }
        *flags = 0;
    }

    sink.len()
}
