//! CPU-side mesh types and generators.
//!
//! This module provides the data the shadow volume engine reads:
//!
//! - [`IndexFormat`] - Index width (u16 or u32) chosen once per mesh
//! - [`VolumeMesh`] - Welded vertices with edge/triangle adjacency
//! - [`ShadowVertex`] - GPU-ready vertex with an extrusion flag
//! - Generators for closed shapes (tetrahedron, box, sphere)

pub mod generators;
mod index;
mod volume;

pub use index::{IndexElement, IndexFormat};
pub use volume::{
    MeshError, ShadowVertex, VolumeEdge, VolumeMesh, VolumeTriangle, extrusion_direction,
};
