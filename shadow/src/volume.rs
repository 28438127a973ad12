//! The shadow volume engine.

use std::collections::HashMap;
use std::sync::Arc;

use umbra_core::math::{Mat4, Vec3, transform_point4};
use umbra_core::mesh::{IndexFormat, VolumeMesh};
use umbra_core::profiling::profile_scope;

use crate::error::ShadowVolumeError;
use crate::flags::ShadowVolumeFlags;
use crate::registry::{IndexData, IndexLocation, IndexSlice, ShadowVolumeData};
use crate::silhouette;
use crate::sink::{ByteSink, SliceSink};
use crate::visibility;

/// Projected clip-space Z of the camera, as expected by
/// [`ShadowVolume::is_visible`].
pub fn camera_projected_z(view_proj: &Mat4, camera_position: &Vec3) -> f32 {
    transform_point4(view_proj, camera_position).z
}

/// Builds shadow volume index buffers for one mesh.
///
/// Each volume ID (typically one per light) owns a buffer sized for the
/// worst case, so projecting every frame never allocates. The mesh itself is
/// shared and never modified; per-call edge state lives in the engine.
#[derive(Debug)]
pub struct ShadowVolume {
    mesh: Arc<VolumeMesh>,
    volumes: HashMap<u32, ShadowVolumeData>,
    edge_flags: Vec<u8>,
    max_indices: usize,
}

impl ShadowVolume {
    /// Create an engine with no volumes.
    pub fn new(mesh: Arc<VolumeMesh>) -> Self {
        let max_indices = silhouette::max_indices(&mesh);
        log::debug!(
            "Shadow volume engine: {} vertices, {} edges, {} triangles, up to {} {:?} indices",
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.triangle_count(),
            max_indices,
            mesh.index_format()
        );
        Self {
            edge_flags: vec![0; mesh.edge_count()],
            mesh,
            volumes: HashMap::new(),
            max_indices,
        }
    }

    /// The shared mesh.
    pub fn mesh(&self) -> &Arc<VolumeMesh> {
        &self.mesh
    }

    /// Index width of every volume.
    pub fn index_format(&self) -> IndexFormat {
        self.mesh.index_format()
    }

    /// Worst-case number of indices a single projection can write.
    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    /// Minimum size in bytes of an external index buffer.
    pub fn required_buffer_size(&self) -> usize {
        self.max_indices * self.index_format().size()
    }

    /// Register `volume_id` with an internal buffer of worst-case size.
    pub fn allocate(&mut self, volume_id: u32) -> Result<(), ShadowVolumeError> {
        let data = ShadowVolumeData::internal(self.index_format(), self.max_indices);
        self.insert(volume_id, data)
    }

    /// Register `volume_id` without internal storage.
    ///
    /// Such a volume can only be projected into a caller-supplied buffer.
    pub fn allocate_external(&mut self, volume_id: u32) -> Result<(), ShadowVolumeError> {
        self.insert(volume_id, ShadowVolumeData::external())
    }

    fn insert(&mut self, volume_id: u32, data: ShadowVolumeData) -> Result<(), ShadowVolumeError> {
        if self.volumes.contains_key(&volume_id) {
            log::warn!("Shadow volume {volume_id} allocated twice");
            return Err(ShadowVolumeError::AlreadyExists(volume_id));
        }
        self.volumes.insert(volume_id, data);
        Ok(())
    }

    /// Free the buffer of `volume_id` and forget the ID.
    pub fn release(&mut self, volume_id: u32) -> Result<(), ShadowVolumeError> {
        match self.volumes.remove(&volume_id) {
            Some(_) => Ok(()),
            None => {
                log::warn!("Releasing unknown shadow volume {volume_id}");
                Err(ShadowVolumeError::NotFound(volume_id))
            }
        }
    }

    /// Whether `volume_id` is registered.
    pub fn contains(&self, volume_id: u32) -> bool {
        self.volumes.contains_key(&volume_id)
    }

    /// Number of registered volumes.
    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    /// Whether `volume_id` exists and owns an internal buffer.
    pub fn is_index_data_internal(&self, volume_id: u32) -> bool {
        self.volumes
            .get(&volume_id)
            .is_some_and(|data| data.indices.is_some())
    }

    /// Write the shadow volume for `light` and return the index count.
    ///
    /// Only the cap bits of `flags` are used. With `external` the indices go
    /// to the caller's buffer as native-endian `u16` or `u32` (see
    /// [`index_format`](Self::index_format)), which must hold at least
    /// [`required_buffer_size`](Self::required_buffer_size) bytes; the
    /// volume's internal buffer is left untouched. Nothing is written on
    /// error.
    pub fn project_silhouette(
        &mut self,
        volume_id: u32,
        flags: ShadowVolumeFlags,
        light: &Vec3,
        is_point_light: bool,
        external: Option<&mut [u8]>,
    ) -> Result<u32, ShadowVolumeError> {
        profile_scope!("project_silhouette");

        let required = self.required_buffer_size();
        let Some(data) = self.volumes.get_mut(&volume_id) else {
            log::warn!("Projecting unknown shadow volume {volume_id}");
            return Err(ShadowVolumeError::NotFound(volume_id));
        };

        let mesh = &self.mesh;
        let edge_flags = &mut self.edge_flags;
        let caps = flags.caps();

        let (count, location) = match external {
            Some(bytes) => {
                if bytes.len() < required {
                    log::warn!(
                        "Index buffer for shadow volume {volume_id} holds {} bytes, {required} required",
                        bytes.len()
                    );
                    return Err(ShadowVolumeError::BufferTooSmall {
                        required,
                        provided: bytes.len(),
                    });
                }
                let count = match mesh.index_format() {
                    IndexFormat::Uint16 => {
                        let mut sink = ByteSink::<u16>::new(bytes);
                        silhouette::project(mesh, edge_flags, caps, light, is_point_light, &mut sink)
                    }
                    IndexFormat::Uint32 => {
                        let mut sink = ByteSink::<u32>::new(bytes);
                        silhouette::project(mesh, edge_flags, caps, light, is_point_light, &mut sink)
                    }
                };
                (count, IndexLocation::External)
            }
            None => {
                let count = match data.indices.as_mut() {
                    Some(IndexData::Uint16(indices)) => {
                        let mut sink = SliceSink::new(indices);
                        silhouette::project(mesh, edge_flags, caps, light, is_point_light, &mut sink)
                    }
                    Some(IndexData::Uint32(indices)) => {
                        let mut sink = SliceSink::new(indices);
                        silhouette::project(mesh, edge_flags, caps, light, is_point_light, &mut sink)
                    }
                    None => {
                        log::warn!(
                            "Shadow volume {volume_id} has no internal buffer and no external one was given"
                        );
                        return Err(ShadowVolumeError::NoInternalIndices(volume_id));
                    }
                };
                (count, IndexLocation::Internal)
            }
        };

        debug_assert!(count <= self.max_indices);
        data.num_indices = count as u32;
        data.location = location;
        log::trace!("Shadow volume {volume_id}: {count} indices");
        Ok(data.num_indices)
    }

    /// Decide whether the volume cast by `light` can be seen and how to
    /// render it.
    ///
    /// `extrude_length` is how far, in model units, the bounding box is
    /// pushed away from the light for this estimate. Get `camera_z` from
    /// [`camera_projected_z`]. The result can be passed straight to
    /// [`project_silhouette`](Self::project_silhouette).
    ///
    /// `ZFAIL` requires every corner of the occluder's bounds to be behind
    /// the camera; an occluder straddling the near plane is reported as
    /// Z-pass.
    pub fn is_visible(
        &self,
        view_proj: &Mat4,
        light: &Vec3,
        is_point_light: bool,
        camera_z: f32,
        extrude_length: f32,
    ) -> ShadowVolumeFlags {
        profile_scope!("shadow_volume_is_visible");
        visibility::determine_visibility(
            &self.mesh.bounds().corners(),
            view_proj,
            light,
            is_point_light,
            camera_z,
            extrude_length,
        )
    }

    /// Index count written by the latest projection of `volume_id`.
    pub fn num_indices(&self, volume_id: u32) -> Result<u32, ShadowVolumeError> {
        self.get(volume_id).map(|data| data.num_indices)
    }

    /// Indices written by the latest internal projection of `volume_id`.
    ///
    /// Empty before the first projection. Fails when the latest projection
    /// went to an external buffer.
    pub fn indices(&self, volume_id: u32) -> Result<IndexSlice<'_>, ShadowVolumeError> {
        let data = self.get(volume_id)?;
        match (&data.indices, data.location) {
            (Some(indices), IndexLocation::Internal) => Ok(indices.prefix(data.num_indices as usize)),
            (Some(indices), IndexLocation::None) => Ok(indices.prefix(0)),
            _ => Err(ShadowVolumeError::NoInternalIndices(volume_id)),
        }
    }

    /// [`indices`](Self::indices) as raw bytes, ready for upload.
    pub fn index_bytes(&self, volume_id: u32) -> Result<&[u8], ShadowVolumeError> {
        self.indices(volume_id).map(|slice| slice.as_bytes())
    }

    fn get(&self, volume_id: u32) -> Result<&ShadowVolumeData, ShadowVolumeError> {
        self.volumes
            .get(&volume_id)
            .ok_or(ShadowVolumeError::NotFound(volume_id))
    }
}
