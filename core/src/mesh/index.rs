//! Index formats for shadow volume index buffers.

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers (max ~4 billion vertices).
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }

    /// Smallest format able to address `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count > u16::MAX as usize + 1 {
            Self::Uint32
        } else {
            Self::Uint16
        }
    }
}

/// A primitive integer type usable as an index buffer element.
pub trait IndexElement: bytemuck::Pod + Default + std::fmt::Debug {
    /// The matching [`IndexFormat`].
    const FORMAT: IndexFormat;

    /// Narrow a vertex index. The caller guarantees the value fits.
    fn from_u32(value: u32) -> Self;

    /// Widen back to `u32`.
    fn to_u32(self) -> u32;
}

impl IndexElement for u16 {
    const FORMAT: IndexFormat = IndexFormat::Uint16;

    #[inline]
    fn from_u32(value: u32) -> Self {
        debug_assert!(value <= u16::MAX as u32, "index {value} overflows u16");
        value as u16
    }

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl IndexElement for u32 {
    const FORMAT: IndexFormat = IndexFormat::Uint32;

    #[inline]
    fn from_u32(value: u32) -> Self {
        value
    }

    #[inline]
    fn to_u32(self) -> u32 {
        self
    }
}
