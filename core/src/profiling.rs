//! Tracy instrumentation.
//!
//! Build with the `profiling` feature to connect to a running Tracy
//! client through [`tracy_client`]. Otherwise every macro below expands to
//! nothing (a plotted value is still evaluated), so the calls can stay in
//! per-frame code.
//!
//! ```ignore
//! use umbra_core::profiling::{frame_mark, profile_plot, profile_scope};
//!
//! for frame in 0..frames {
//!     {
//!         profile_scope!("shadow_volumes");
//!         let count = engine.project_silhouette(id, flags, &light, true, None)?;
//!         profile_plot!("shadow_indices", count);
//!     }
//!     frame_mark!();
//! }
//! ```

#[cfg(feature = "profiling")]
pub use tracy_client::{self, frame_mark as tracy_frame_mark, plot as tracy_plot, span};

/// End the current frame in Tracy's timeline.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! frame_mark {
    () => {
        $crate::profiling::tracy_frame_mark()
    };
}

/// End the current frame (disabled build).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! frame_mark {
    () => {};
}

/// Open a named zone that closes at the end of the enclosing block.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Open a named zone (disabled build).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Open a zone named after the calling function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Open a zone named after the calling function (disabled build).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Record a numeric sample on a Tracy plot.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

/// Record a numeric sample (disabled build).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value;
    };
}

pub use frame_mark;
pub use profile_function;
pub use profile_plot;
pub use profile_scope;
