//! # Umbra Core
//!
//! Math aliases, bounding boxes and the adjacency-carrying volume mesh that
//! the shadow volume engine consumes.

pub mod math;
pub mod mesh;
pub mod profiling;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
