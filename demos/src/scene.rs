//! A single occluder, a fixed camera and a light orbiting both.

use std::f32::consts::{FRAC_PI_3, TAU};
use std::sync::Arc;

use umbra_core::math::{Mat4, Vec3, look_at_rh, perspective_rh};
use umbra_core::mesh::generators::generate_sphere;
use umbra_core::mesh::{MeshError, VolumeMesh};
use umbra_core::profiling::{frame_mark, profile_plot, profile_scope};
use umbra_shadow::{ShadowVolume, ShadowVolumeError, ShadowVolumeFlags, camera_projected_z};

const VOLUME_ID: u32 = 0;

/// How caps are chosen each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapMode {
    /// Use the caps reported by the visibility test.
    #[default]
    Auto,
    /// Always emit both caps.
    Both,
    /// Never emit caps.
    None,
}

impl CapMode {
    fn resolve(&self, visibility: ShadowVolumeFlags) -> ShadowVolumeFlags {
        match self {
            CapMode::Auto => visibility.caps(),
            CapMode::Both => ShadowVolumeFlags::CAPS,
            CapMode::None => ShadowVolumeFlags::empty(),
        }
    }
}

/// Scene parameters.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub point_light: bool,
    pub extrude_length: f32,
    pub radius: f32,
    pub segments: u32,
    pub rings: u32,
    pub caps: CapMode,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            point_light: true,
            extrude_length: 50.0,
            radius: 1.0,
            segments: 32,
            rings: 16,
            caps: CapMode::Auto,
        }
    }
}

/// Errors raised while setting up or running the scene.
#[derive(Debug)]
pub enum SceneError {
    Mesh(MeshError),
    ShadowVolume(ShadowVolumeError),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mesh(e) => write!(f, "mesh error: {e}"),
            Self::ShadowVolume(e) => write!(f, "shadow volume error: {e}"),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<MeshError> for SceneError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

impl From<ShadowVolumeError> for SceneError {
    fn from(e: ShadowVolumeError) -> Self {
        Self::ShadowVolume(e)
    }
}

/// What happened in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub light: Vec3,
    pub flags: ShadowVolumeFlags,
    /// `None` when the volume was culled and not projected.
    pub indices: Option<u32>,
}

/// Totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub visible: u64,
    pub zfail: u64,
    pub indices: u64,
}

/// Sphere occluder seen from a fixed camera.
pub struct Scene {
    config: SceneConfig,
    engine: ShadowVolume,
    eye: Vec3,
    view_proj: Mat4,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        let mesh: VolumeMesh =
            generate_sphere(config.radius, config.segments, config.rings).into_volume_mesh()?;
        log::info!(
            "Occluder: {} vertices, {} edges, {} triangles, {:?} indices",
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.triangle_count(),
            mesh.index_format()
        );
        log::info!(
            "Shadow vertex buffer: {} bytes",
            std::mem::size_of_val(mesh.shadow_vertices().as_slice())
        );

        let mut engine = ShadowVolume::new(Arc::new(mesh));
        engine.allocate(VOLUME_ID)?;
        log::info!(
            "Index buffer: {} indices ({} bytes) per volume",
            engine.max_indices(),
            engine.required_buffer_size()
        );

        let eye = Vec3::new(0.0, 1.5, 4.0 * config.radius);
        let view = look_at_rh(&eye, &Vec3::zeros(), &Vec3::new(0.0, 1.0, 0.0));
        let view_proj = perspective_rh(FRAC_PI_3, 16.0 / 9.0, 0.1, 1000.0) * view;

        Ok(Self {
            config,
            engine,
            eye,
            view_proj,
        })
    }

    pub fn engine(&self) -> &ShadowVolume {
        &self.engine
    }

    /// Light for `frame` of a `frames`-long orbit.
    ///
    /// A point light circles the occluder at three radii, passing behind the
    /// camera; a directional light sweeps around while pointing downward.
    pub fn light_at(&self, frame: u64, frames: u64) -> Vec3 {
        let angle = TAU * frame as f32 / frames.max(1) as f32;
        let (sin, cos) = angle.sin_cos();
        if self.config.point_light {
            let r = 3.0 * self.config.radius;
            Vec3::new(cos * r, 2.0 * self.config.radius, sin * r + self.eye.z * 0.5)
        } else {
            Vec3::new(cos, -1.0, sin).normalize()
        }
    }

    pub fn step(&mut self, light: Vec3) -> Result<FrameReport, SceneError> {
        profile_scope!("scene_step");

        let camera_z = camera_projected_z(&self.view_proj, &self.eye);
        let flags = self.engine.is_visible(
            &self.view_proj,
            &light,
            self.config.point_light,
            camera_z,
            self.config.extrude_length,
        );
        if !flags.is_visible() {
            return Ok(FrameReport {
                light,
                flags,
                indices: None,
            });
        }

        let caps = self.config.caps.resolve(flags);
        let count =
            self.engine
                .project_silhouette(VOLUME_ID, caps, &light, self.config.point_light, None)?;
        profile_plot!("shadow_volume_indices", count);

        Ok(FrameReport {
            light,
            flags,
            indices: Some(count),
        })
    }

    pub fn run(&mut self, frames: u64) -> Result<RunSummary, SceneError> {
        let mut summary = RunSummary::default();
        for frame in 0..frames {
            let report = self.step(self.light_at(frame, frames))?;
            summary.frames += 1;
            match report.indices {
                Some(count) => {
                    summary.visible += 1;
                    summary.indices += count as u64;
                    if report.flags.needs_zfail() {
                        summary.zfail += 1;
                    }
                    log::info!(
                        "Frame {frame}: light ({:.2}, {:.2}, {:.2}) {:?}, {count} indices",
                        report.light.x,
                        report.light.y,
                        report.light.z,
                        report.flags
                    );
                }
                None => log::debug!("Frame {frame}: shadow volume culled"),
            }
            frame_mark!();
        }
        Ok(summary)
    }
}
