//! Borrowed views over caller-owned vertex buffers
//!
//! The library never takes ownership of mesh data: vertex streams and
//! position arrays stay in whatever layout the caller's engine uses, and the
//! views here describe just enough of that layout (record size, stride) for
//! the routines to address individual vertices.

use crate::{Error, Point3f, Result};
use bytemuck::Pod;

/// Number of bytes of each record that hold the position (three packed f32).
pub const POSITION_SIZE: usize = 12;

/// A view over a contiguous buffer of fixed-size vertex records.
///
/// Records are opaque byte strings; two vertices are considered identical iff
/// all `vertex_size` bytes compare equal.
#[derive(Debug, Clone, Copy)]
pub struct VertexStream<'a> {
    data: &'a [u8],
    vertex_size: usize,
}

impl<'a> VertexStream<'a> {
    /// Create a view over raw bytes holding records of `vertex_size` bytes each.
    pub fn new(data: &'a [u8], vertex_size: usize) -> Result<Self> {
        if vertex_size == 0 {
            return Err(Error::InvalidData(
                "vertex size must be at least 1 byte".to_string(),
            ));
        }
        if data.len() % vertex_size != 0 {
            return Err(Error::InvalidData(format!(
                "buffer length {} is not a multiple of vertex size {}",
                data.len(),
                vertex_size
            )));
        }
        Ok(Self { data, vertex_size })
    }

    /// Create a view over a slice of plain-old-data vertex records.
    pub fn from_typed<T: Pod>(vertices: &'a [T]) -> Result<Self> {
        Self::new(bytemuck::cast_slice(vertices), std::mem::size_of::<T>())
    }

    /// Size of one record in bytes.
    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    /// Number of records in the stream.
    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.vertex_size
    }

    /// Check if the stream holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw bytes of record `index`.
    pub fn vertex(&self, index: usize) -> &'a [u8] {
        &self.data[index * self.vertex_size..(index + 1) * self.vertex_size]
    }
}

/// A strided view over vertex positions.
///
/// The first [`POSITION_SIZE`] bytes of each record are three little-endian
/// IEEE-754 floats (x, y, z); the remaining `stride - 12` bytes are skipped.
#[derive(Debug, Clone, Copy)]
pub struct VertexPositions<'a> {
    data: &'a [u8],
    stride: usize,
}

impl<'a> VertexPositions<'a> {
    /// Create a view over raw bytes with `stride` bytes per record.
    pub fn new(data: &'a [u8], stride: usize) -> Result<Self> {
        if stride < POSITION_SIZE {
            return Err(Error::InvalidData(format!(
                "position stride {} is smaller than {} bytes",
                stride, POSITION_SIZE
            )));
        }
        if data.len() % stride != 0 {
            return Err(Error::InvalidData(format!(
                "buffer length {} is not a multiple of stride {}",
                data.len(),
                stride
            )));
        }
        Ok(Self { data, stride })
    }

    /// Create a view over tightly packed `[x, y, z]` triples.
    pub fn from_packed(positions: &'a [[f32; 3]]) -> Self {
        Self {
            data: bytemuck::cast_slice(positions),
            stride: POSITION_SIZE,
        }
    }

    /// Distance between consecutive records in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of records in the view.
    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.stride
    }

    /// Check if the view holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Position of vertex `index`.
    pub fn position(&self, index: usize) -> Point3f {
        let offset = index * self.stride;
        let read = |at: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&self.data[at..at + 4]);
            f32::from_le_bytes(raw)
        };
        Point3f::new(read(offset), read(offset + 4), read(offset + 8))
    }
}
