//! # Shadow Volume Demo
//!
//! Orbits a light around a sphere and logs, for every frame, whether the
//! sphere's shadow volume is visible, whether it needs Z-fail, and how many
//! indices the silhouette projection wrote.
//!
//! ```bash
//! # Point light, 120 frames
//! cargo run --bin shadow_volume_demo
//!
//! # Directional light with forced caps and a finer sphere
//! cargo run --bin shadow_volume_demo -- --light directional --caps both --segments 64 --rings 32
//!
//! # Per-frame details
//! RUST_LOG=debug cargo run --bin shadow_volume_demo -- --frames 10
//! ```

use clap::{Parser, ValueEnum};

use umbra_core::mesh::generators::MAX_SPHERE_DIVISIONS;
use umbra_demos::scene::{CapMode, Scene, SceneConfig};

/// Light type selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum CliLight {
    /// Positional light orbiting the occluder.
    #[default]
    Point,
    /// Infinitely distant light sweeping around the occluder.
    Directional,
}

/// Cap selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum CliCaps {
    /// Caps reported by the visibility test.
    #[default]
    Auto,
    /// Always both caps.
    Both,
    /// No caps (plain Z-pass silhouette).
    None,
}

impl From<CliCaps> for CapMode {
    fn from(cli: CliCaps) -> Self {
        match cli {
            CliCaps::Auto => CapMode::Auto,
            CliCaps::Both => CapMode::Both,
            CliCaps::None => CapMode::None,
        }
    }
}

/// Umbra shadow volume demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "shadow_volume_demo",
    about = "Headless shadow volume extraction demo",
    version
)]
struct Args {
    /// Light type.
    #[arg(long, default_value = "point", value_enum)]
    light: CliLight,

    /// Distance the bounding box is extruded for the visibility test.
    #[arg(long, default_value = "50.0")]
    extrude: f32,

    /// Number of frames in one light orbit.
    #[arg(long, default_value = "120")]
    frames: u64,

    /// Sphere radius.
    #[arg(long, default_value = "1.0")]
    radius: f32,

    /// Sphere longitudinal segments.
    #[arg(long, default_value = "32", value_parser = sphere_divisions(3))]
    segments: u32,

    /// Sphere latitudinal rings.
    #[arg(long, default_value = "16", value_parser = sphere_divisions(2))]
    rings: u32,

    /// Cap selection.
    #[arg(long, default_value = "auto", value_enum)]
    caps: CliCaps,
}

fn sphere_divisions(min: i64) -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(min..=MAX_SPHERE_DIVISIONS as i64)
}

impl From<&Args> for SceneConfig {
    fn from(args: &Args) -> Self {
        Self {
            point_light: args.light == CliLight::Point,
            extrude_length: args.extrude,
            radius: args.radius,
            segments: args.segments,
            rings: args.rings,
            caps: args.caps.into(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Umbra shadow volume demo v{}", umbra_demos::VERSION);
    log::debug!("{args:?}");

    if args.extrude <= 0.0 {
        log::warn!("--extrude {} leaves the extruded box on the occluder", args.extrude);
    }

    let result = Scene::new(SceneConfig::from(&args)).and_then(|mut scene| scene.run(args.frames));
    match result {
        Ok(summary) => log::info!(
            "{} frames: {} visible, {} Z-fail, {} indices total",
            summary.frames,
            summary.visible,
            summary.zfail,
            summary.indices
        ),
        Err(e) => {
            log::error!("Demo failed: {e}");
            std::process::exit(1);
        }
    }
}
