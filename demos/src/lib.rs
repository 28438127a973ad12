//! # Umbra Demos
//!
//! Headless demos for the Umbra shadow volume engine.
//!
//! ## Available Demos
//!
//! - `shadow_volume_demo` - Orbits a light around a sphere and reports the
//!   visibility decision and index count of its shadow volume each frame

pub mod scene;

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
