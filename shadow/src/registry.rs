//! Per-volume index storage.

use umbra_core::mesh::{IndexElement, IndexFormat};

/// Owned index buffer, pre-sized to the worst case and never reallocated.
#[derive(Debug, Clone)]
pub(crate) enum IndexData {
    Uint16(Vec<u16>),
    Uint32(Vec<u32>),
}

impl IndexData {
    pub(crate) fn with_capacity(format: IndexFormat, max_indices: usize) -> Self {
        match format {
            IndexFormat::Uint16 => Self::Uint16(vec![0; max_indices]),
            IndexFormat::Uint32 => Self::Uint32(vec![0; max_indices]),
        }
    }

    /// View of the first `count` indices.
    pub(crate) fn prefix(&self, count: usize) -> IndexSlice<'_> {
        match self {
            Self::Uint16(indices) => IndexSlice::Uint16(&indices[..count]),
            Self::Uint32(indices) => IndexSlice::Uint32(&indices[..count]),
        }
    }
}

/// Where the latest projection of a volume was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum IndexLocation {
    /// Not projected yet.
    #[default]
    None,
    /// The volume's own buffer.
    Internal,
    /// A caller-supplied buffer.
    External,
}

/// Registry entry for one volume ID.
#[derive(Debug, Clone)]
pub(crate) struct ShadowVolumeData {
    /// `None` for volumes registered with `allocate_external`.
    pub(crate) indices: Option<IndexData>,
    pub(crate) num_indices: u32,
    pub(crate) location: IndexLocation,
}

impl ShadowVolumeData {
    pub(crate) fn internal(format: IndexFormat, max_indices: usize) -> Self {
        Self {
            indices: Some(IndexData::with_capacity(format, max_indices)),
            num_indices: 0,
            location: IndexLocation::None,
        }
    }

    pub(crate) fn external() -> Self {
        Self {
            indices: None,
            num_indices: 0,
            location: IndexLocation::None,
        }
    }
}

/// Typed view of the indices written by the latest projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSlice<'a> {
    /// 16-bit indices.
    Uint16(&'a [u16]),
    /// 32-bit indices.
    Uint32(&'a [u32]),
}

impl<'a> IndexSlice<'a> {
    /// Element width.
    pub fn format(&self) -> IndexFormat {
        match self {
            Self::Uint16(_) => u16::FORMAT,
            Self::Uint32(_) => u32::FORMAT,
        }
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        match self {
            Self::Uint16(indices) => indices.len(),
            Self::Uint32(indices) => indices.len(),
        }
    }

    /// Whether no indices were written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at `i`, widened to `u32`.
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Self::Uint16(indices) => indices.get(i).map(|&v| v.to_u32()),
            Self::Uint32(indices) => indices.get(i).copied(),
        }
    }

    /// All indices widened to `u32`.
    pub fn to_u32_vec(&self) -> Vec<u32> {
        match self {
            Self::Uint16(indices) => indices.iter().map(|&v| v.to_u32()).collect(),
            Self::Uint32(indices) => indices.to_vec(),
        }
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Self::Uint16(indices) => bytemuck::cast_slice(indices),
            Self::Uint32(indices) => bytemuck::cast_slice(indices),
        }
    }
}
