//! Math aliases, bounding boxes and clip-space helpers.
//!
//! All rendering math is `f32` and built on nalgebra. Clip space follows the
//! wgpu/Vulkan convention: depth range `[0, w]`, so a clip-space point is in
//! front of the near plane when `z > 0`.

pub use nalgebra;

/// Positions, directions and normals.
pub type Vec3 = nalgebra::Vector3<f32>;

/// Homogeneous clip-space points.
pub type Vec4 = nalgebra::Vector4<f32>;

/// View, projection and model transforms.
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self::new(first, first), |aabb, p| aabb.expanded(p)))
    }

    /// Return this box grown to contain `point`.
    pub fn expanded(&self, point: &Vec3) -> Self {
        Self {
            min: self.min.inf(point),
            max: self.max.sup(point),
        }
    }

    /// The eight corners.
    ///
    /// Corner `i` takes the maximum on the X axis when bit 0 of `i` is clear
    /// and the minimum when it is set; bits 1 and 2 do the same for Y and Z.
    /// Corners joined by a box edge therefore differ in exactly one bit.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 != 0 { self.min.x } else { self.max.x },
                if i & 2 != 0 { self.min.y } else { self.max.y },
                if i & 4 != 0 { self.min.z } else { self.max.z },
            )
        })
    }
}

/// Transform a point (w = 1) into homogeneous clip space without dividing by w.
pub fn transform_point4(m: &Mat4, p: &Vec3) -> Vec4 {
    m * Vec4::new(p.x, p.y, p.z, 1.0)
}

/// Transform a direction (w = 0) into homogeneous clip space.
pub fn transform_vector4(m: &Mat4, v: &Vec3) -> Vec4 {
    m * Vec4::new(v.x, v.y, v.z, 0.0)
}

/// Right-handed perspective projection mapping the near plane to clip `z = 0`
/// and the far plane to `z = w`.
pub fn perspective_rh(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    let focal = 1.0 / (yfov * 0.5).tan();
    let depth = zfar / (znear - zfar);
    #[rustfmt::skip]
    let projection = Mat4::new(
        focal / aspect, 0.0,   0.0,   0.0,
        0.0,            focal, 0.0,   0.0,
        0.0,            0.0,   depth, depth * znear,
        0.0,            0.0,   -1.0,  0.0,
    );
    projection
}

/// View matrix placing `eye` at the origin, looking down -Z toward `target`.
pub fn look_at_rh(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    let (eye, target) = (nalgebra::Point3::from(*eye), nalgebra::Point3::from(*target));
    nalgebra::Isometry3::look_at_rh(&eye, &target, up).to_homogeneous()
}
