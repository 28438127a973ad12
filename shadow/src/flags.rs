//! Visibility and capping flags.

use bitflags::bitflags;

bitflags! {
    /// Result of [`ShadowVolume::is_visible`](crate::ShadowVolume::is_visible)
    /// and cap selection for
    /// [`ShadowVolume::project_silhouette`](crate::ShadowVolume::project_silhouette).
    ///
    /// Projection only looks at [`CAP_FRONT`](Self::CAP_FRONT) and
    /// [`CAP_BACK`](Self::CAP_BACK), so a visibility result can be passed
    /// straight through.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShadowVolumeFlags: u32 {
        /// The volume may cover part of the screen.
        const VISIBLE = 1 << 0;
        /// The near plane cuts the volume; use Z-fail stencil counting.
        const ZFAIL = 1 << 1;
        /// Emit the un-extruded, light-facing triangles.
        const CAP_FRONT = 1 << 2;
        /// Emit the extruded, light-averted triangles.
        const CAP_BACK = 1 << 3;
        /// Both caps.
        const CAPS = Self::CAP_FRONT.bits() | Self::CAP_BACK.bits();
    }
}

impl Default for ShadowVolumeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl ShadowVolumeFlags {
    /// Whether the volume needs drawing at all.
    pub fn is_visible(&self) -> bool {
        self.contains(Self::VISIBLE)
    }

    /// Whether the Z-fail algorithm is required.
    pub fn needs_zfail(&self) -> bool {
        self.contains(Self::ZFAIL)
    }

    /// Only the cap bits.
    pub fn caps(&self) -> Self {
        self.intersection(Self::CAPS)
    }
}
