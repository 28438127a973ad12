//! Clip-space visibility of a shadow volume's bounding hyper-cube.
//!
//! The hyper-cube is the mesh bounding box (points 0..8, in
//! [`Aabb::corners`](umbra_core::math::Aabb::corners) order) plus the same
//! box extruded away from the light (points 8..16). All tests here are
//! conservative: they may report a hidden volume as visible, never the
//! reverse.

use umbra_core::math::{Mat4, Vec3, Vec4, transform_point4, transform_vector4};
use umbra_core::mesh::extrusion_direction;

use crate::flags::ShadowVolumeFlags;

/// Edges of a box whose corners differ in exactly one index bit, followed by
/// the same edges on the extruded box and the eight original-to-extruded
/// joins.
#[rustfmt::skip]
pub(crate) const HYPER_CUBE_EDGES: [(usize, usize); 32] = [
    (0, 1), (2, 3), (0, 2), (1, 3),
    (4, 5), (6, 7), (4, 6), (5, 7),
    (0, 4), (1, 5), (2, 6), (3, 7),

    (8, 9), (10, 11), (8, 10), (9, 11),
    (12, 13), (14, 15), (12, 14), (13, 15),
    (8, 12), (9, 13), (10, 14), (11, 15),

    (0, 8), (1, 9), (2, 10), (3, 11),
    (4, 12), (5, 13), (6, 14), (7, 15),
];

/// Rays through the four screen corners, in camera-shifted clip space.
const SCREEN_CORNERS: [Vec3; 4] = [
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

const CLIP_X_BELOW_MAX: u32 = 0x01;
const CLIP_X_ABOVE_MIN: u32 = 0x02;
const CLIP_Y_BELOW_MAX: u32 = 0x04;
const CLIP_Y_ABOVE_MIN: u32 = 0x08;
const CLIP_IN_FRONT: u32 = 0x10;
const CLIP_ALL: u32 = 0x1F;

const NEAR_X_ABOVE_MIN: u32 = 0x01;
const NEAR_X_BELOW_MAX: u32 = 0x02;
const NEAR_Y_ABOVE_MIN: u32 = 0x04;
const NEAR_Y_BELOW_MAX: u32 = 0x08;
const NEAR_ALL: u32 = 0x0F;

/// Relative threshold below which an edge is treated as pointing straight at
/// the camera.
const DEGENERATE_EDGE: f32 = 1e-12;

/// Per-plane test: every clip plane must have at least one point on its
/// inner side.
pub(crate) fn overlaps_clip_volume(points: &[Vec4]) -> bool {
    let mut flags = 0;
    for p in points {
        if p.x < p.w {
            flags |= CLIP_X_BELOW_MAX;
        }
        if p.x > -p.w {
            flags |= CLIP_X_ABOVE_MIN;
        }
        if p.y < p.w {
            flags |= CLIP_Y_BELOW_MAX;
        }
        if p.y > -p.w {
            flags |= CLIP_Y_ABOVE_MIN;
        }
        if p.z > 0.0 {
            flags |= CLIP_IN_FRONT;
        }
        if flags == CLIP_ALL {
            return true;
        }
    }
    false
}

/// Look for a plane through the camera and one hull edge that puts the hull
/// on one side and all four screen corner rays on the other.
///
/// Points are shifted so the camera sits at the origin; this only holds for
/// perspective projections.
pub(crate) fn is_hull_visible(points: &[Vec4], edges: &[(usize, usize)], camera_z: f32) -> bool {
    if !overlaps_clip_volume(points) {
        return false;
    }

    let shifted = |p: &Vec4| Vec3::new(p.x, p.y, p.z - camera_z);

    for &(i0, i1) in edges {
        let a = shifted(&points[i0]);
        let b = shifted(&points[i1]);
        let normal = a.cross(&b);
        if normal.norm_squared() <= DEGENERATE_EDGE * a.norm_squared() * b.norm_squared() {
            continue;
        }

        let corners_in_front = SCREEN_CORNERS.iter().filter(|c| normal.dot(c) > 0.0).count();
        let corners_behind = SCREEN_CORNERS.iter().filter(|c| normal.dot(c) < 0.0).count();
        if corners_in_front != SCREEN_CORNERS.len() && corners_behind != SCREEN_CORNERS.len() {
            continue;
        }

        let (mut points_in_front, mut points_behind) = (0, 0);
        for (i, p) in points.iter().enumerate() {
            if i == i0 || i == i1 {
                continue;
            }
            let d = normal.dot(&shifted(p));
            if d > 0.0 {
                points_in_front += 1;
            } else if d < 0.0 {
                points_behind += 1;
            }
        }

        if corners_in_front == SCREEN_CORNERS.len() && points_in_front == 0 {
            return false;
        }
        if corners_behind == SCREEN_CORNERS.len() && points_behind == 0 {
            return false;
        }
    }

    true
}

/// Eight clip-space box corners.
pub(crate) fn is_bounding_box_visible(points: &[Vec4], camera_z: f32) -> bool {
    is_hull_visible(points, &HYPER_CUBE_EDGES[..12], camera_z)
}

/// Sixteen clip-space hyper-cube points.
pub(crate) fn is_bounding_hyper_cube_visible(points: &[Vec4; 16], camera_z: f32) -> bool {
    is_hull_visible(points, &HYPER_CUBE_EDGES, camera_z)
}

/// Whether the near plane (`z = 0`) cuts the hyper-cube inside the viewport.
///
/// Collects where each edge crosses `z = 0` and checks that the crossings
/// reach every side of the viewport.
pub(crate) fn is_front_clip_in_volume(points: &[Vec4; 16]) -> bool {
    let mut flags = 0;
    let mut accumulate = |p: &Vec4| {
        if p.x > -p.w {
            flags |= NEAR_X_ABOVE_MIN;
        }
        if p.x < p.w {
            flags |= NEAR_X_BELOW_MAX;
        }
        if p.y > -p.w {
            flags |= NEAR_Y_ABOVE_MIN;
        }
        if p.y < p.w {
            flags |= NEAR_Y_BELOW_MAX;
        }
        flags == NEAR_ALL
    };

    for &(i0, i1) in &HYPER_CUBE_EDGES {
        let (a, b) = (&points[i0], &points[i1]);

        if a.z == 0.0 && b.z == 0.0 {
            if accumulate(a) || accumulate(b) {
                return true;
            }
            continue;
        }
        if a.z.min(b.z) > 0.0 || a.z.max(b.z) < 0.0 {
            continue;
        }

        let t = a.z / (a.z - b.z);
        if accumulate(&a.lerp(b, t)) {
            return true;
        }
    }
    false
}

/// Full visibility and capping decision for one bounding box.
pub(crate) fn determine_visibility(
    corners: &[Vec3; 8],
    view_proj: &Mat4,
    light: &Vec3,
    is_point_light: bool,
    camera_z: f32,
    extrude_length: f32,
) -> ShadowVolumeFlags {
    let mut points = [Vec4::zeros(); 16];

    // Extrusion never increases clip z for these corners.
    let light_z = if is_point_light {
        transform_point4(view_proj, light).z
    } else {
        transform_vector4(view_proj, light).z
    };

    let (mut behind_camera, mut behind_light) = (0, 0);
    for (point, corner) in points.iter_mut().zip(corners) {
        *point = transform_point4(view_proj, corner);
        if point.z <= 0.0 {
            behind_camera += 1;
        }
        let extrudes_backward = if is_point_light {
            point.z <= light_z
        } else {
            light_z <= 0.0
        };
        if extrudes_backward {
            behind_light += 1;
        }
    }

    if behind_camera == corners.len() && behind_light == corners.len() {
        return ShadowVolumeFlags::empty();
    }

    for (point, corner) in points[8..].iter_mut().zip(corners) {
        let extruded =
            corner + extrusion_direction(corner, light, is_point_light) * extrude_length;
        *point = transform_point4(view_proj, &extruded);
    }

    if !is_bounding_hyper_cube_visible(&points, camera_z) {
        return ShadowVolumeFlags::empty();
    }

    let mut flags = ShadowVolumeFlags::VISIBLE;
    if behind_camera == corners.len() && is_front_clip_in_volume(&points) {
        flags |= ShadowVolumeFlags::ZFAIL;
    }
    if is_bounding_box_visible(&points[..8], camera_z) {
        flags |= ShadowVolumeFlags::CAP_FRONT;
    }
    if is_bounding_box_visible(&points[8..], camera_z) {
        flags |= ShadowVolumeFlags::CAP_BACK;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A thin slab beside the top-right frustum corner. Each clip plane has a
    /// point inside it, yet the slab never enters the view cone.
    fn diagonal_slab(a: (f32, f32), b: (f32, f32)) -> [Vec4; 8] {
        std::array::from_fn(|i| {
            let (x, y) = if i & 1 == 0 { a } else { b };
            let z = if i & 2 == 0 { 1.0 } else { 0.9 };
            let offset = if i & 4 == 0 { 0.0 } else { 0.5 };
            Vec4::new(x + offset, y + offset, z, z)
        })
    }

    #[test]
    fn test_hyper_cube_edges_join_neighbours() {
        for &(a, b) in &HYPER_CUBE_EDGES {
            assert!(a < b);
            let diff = a ^ b;
            assert!(diff.is_power_of_two(), "({a}, {b}) is not a cube edge");
        }
    }

    #[test]
    fn test_overlaps_clip_volume() {
        let inside = [Vec4::new(0.0, 0.0, 0.5, 1.0)];
        assert!(overlaps_clip_volume(&inside));

        let right = [Vec4::new(2.0, 0.0, 0.5, 1.0), Vec4::new(3.0, 0.5, 0.5, 1.0)];
        assert!(!overlaps_clip_volume(&right));

        let behind = [Vec4::new(0.0, 0.0, -0.5, 1.0)];
        assert!(!overlaps_clip_volume(&behind));
    }

    #[test]
    fn test_separating_edge_rejects_diagonal_slab() {
        let slab = diagonal_slab((3.0, 0.0), (0.0, 3.0));
        assert!(overlaps_clip_volume(&slab));
        assert!(!is_bounding_box_visible(&slab, 0.0));
    }

    #[test]
    fn test_centered_slab_is_visible() {
        let slab = diagonal_slab((0.5, 0.0), (0.0, 0.5));
        assert!(is_bounding_box_visible(&slab, 0.0));
    }

    #[test]
    fn test_front_clip_crossing_covers_viewport() {
        let mut points = [Vec4::new(0.0, 0.0, -1.0, 1.0); 16];
        // Joins from a behind-camera box to a wide box in front.
        for (i, p) in points[8..].iter_mut().enumerate() {
            let sx = if i & 1 == 0 { 4.0 } else { -4.0 };
            let sy = if i & 2 == 0 { 4.0 } else { -4.0 };
            *p = Vec4::new(sx, sy, 1.0, 1.0);
        }
        assert!(is_front_clip_in_volume(&points));

        // Entirely behind the near plane: nothing crosses.
        let behind = [Vec4::new(0.0, 0.0, -1.0, 1.0); 16];
        assert!(!is_front_clip_in_volume(&behind));
    }

    #[test]
    fn test_front_clip_off_to_one_side() {
        let mut points = [Vec4::new(5.0, 0.0, -1.0, 1.0); 16];
        for p in &mut points[8..] {
            *p = Vec4::new(6.0, 0.0, 1.0, 1.0);
        }
        // Crossings exist but all sit right of the viewport.
        assert!(!is_front_clip_in_volume(&points));
    }
}
