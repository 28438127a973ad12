//! Shadow volume error types.

use std::fmt;

/// Errors returned by [`ShadowVolume`](crate::ShadowVolume) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShadowVolumeError {
    /// The volume ID is already allocated.
    AlreadyExists(u32),
    /// The volume ID was never allocated or has been released.
    NotFound(u32),
    /// The volume has no internally stored indices to write or read.
    NoInternalIndices(u32),
    /// A caller-supplied index buffer cannot hold the worst case.
    BufferTooSmall {
        /// Bytes needed.
        required: usize,
        /// Bytes supplied.
        provided: usize,
    },
}

impl fmt::Display for ShadowVolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists(id) => write!(f, "shadow volume {id} already exists"),
            Self::NotFound(id) => write!(f, "shadow volume {id} not found"),
            Self::NoInternalIndices(id) => {
                write!(f, "shadow volume {id} has no internally stored indices")
            }
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "index buffer too small: {required} bytes required, {provided} provided"
            ),
        }
    }
}

impl std::error::Error for ShadowVolumeError {}
