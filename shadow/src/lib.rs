//! # Umbra Shadow
//!
//! Stencil shadow volumes for closed meshes.
//!
//! A [`ShadowVolume`] owns a set of index buffers, one per caller-chosen
//! volume ID, over a shared [`VolumeMesh`](umbra_core::mesh::VolumeMesh).
//! Each frame the caller:
//!
//! 1. asks [`ShadowVolume::is_visible`] whether the volume can touch the
//!    screen, and whether the near plane cuts it (Z-fail) or not (Z-pass);
//! 2. calls [`ShadowVolume::project_silhouette`] with the caps the chosen
//!    algorithm needs, writing into the volume's own buffer or straight into
//!    a mapped GPU buffer;
//! 3. draws the indices against the doubled vertex buffer from
//!    [`VolumeMesh::shadow_vertices`](umbra_core::mesh::VolumeMesh::shadow_vertices).
//!
//! ```
//! use std::sync::Arc;
//! use umbra_core::math::Vec3;
//! use umbra_core::mesh::generators::generate_box;
//! use umbra_shadow::{ShadowVolume, ShadowVolumeFlags};
//!
//! let mesh = generate_box(Vec3::new(1.0, 1.0, 1.0)).into_volume_mesh().unwrap();
//! let mut volumes = ShadowVolume::new(Arc::new(mesh));
//! volumes.allocate(0).unwrap();
//!
//! let light = Vec3::new(0.0, 10.0, 0.0);
//! let count = volumes
//!     .project_silhouette(0, ShadowVolumeFlags::CAPS, &light, true, None)
//!     .unwrap();
//! assert_eq!(volumes.num_indices(0).unwrap(), count);
//! ```

mod error;
mod flags;
mod registry;
mod silhouette;
mod sink;
mod visibility;
mod volume;

pub use error::ShadowVolumeError;
pub use flags::ShadowVolumeFlags;
pub use registry::IndexSlice;
pub use volume::{ShadowVolume, camera_projected_z};
