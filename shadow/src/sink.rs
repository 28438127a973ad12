//! Index writers shared by the 16- and 32-bit projection paths.

use std::marker::PhantomData;

use umbra_core::mesh::IndexElement;

/// Destination for emitted shadow volume indices.
///
/// Callers size the destination for the worst case up front, so pushes never
/// fail and never reallocate.
pub(crate) trait IndexSink {
    /// Append one index.
    fn push(&mut self, index: u32);

    /// Number of indices written so far.
    fn len(&self) -> usize;

    #[inline]
    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.push(a);
        self.push(b);
        self.push(c);
    }
}

/// Writes into a typed, engine-owned slice.
pub(crate) struct SliceSink<'a, T: IndexElement> {
    indices: &'a mut [T],
    len: usize,
}

impl<'a, T: IndexElement> SliceSink<'a, T> {
    pub(crate) fn new(indices: &'a mut [T]) -> Self {
        Self { indices, len: 0 }
    }
}

impl<T: IndexElement> IndexSink for SliceSink<'_, T> {
    #[inline]
    fn push(&mut self, index: u32) {
        self.indices[self.len] = T::from_u32(index);
        self.len += 1;
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Writes native-endian indices into a caller-owned byte buffer.
///
/// Mapped GPU memory carries no alignment guarantee for `T`, so each index is
/// copied byte-wise.
pub(crate) struct ByteSink<'a, T: IndexElement> {
    bytes: &'a mut [u8],
    len: usize,
    _element: PhantomData<T>,
}

impl<'a, T: IndexElement> ByteSink<'a, T> {
    pub(crate) fn new(bytes: &'a mut [u8]) -> Self {
        Self {
            bytes,
            len: 0,
            _element: PhantomData,
        }
    }
}

impl<T: IndexElement> IndexSink for ByteSink<'_, T> {
    #[inline]
    fn push(&mut self, index: u32) {
        let size = std::mem::size_of::<T>();
        let start = self.len * size;
        let value = T::from_u32(index);
        self.bytes[start..start + size].copy_from_slice(bytemuck::bytes_of(&value));
        self.len += 1;
    }

    fn len(&self) -> usize {
        self.len
    }
}
