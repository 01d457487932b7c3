//! Index and vertex buffer generation from unindexed streams

use meshtune_core::{Error, Result, VertexIndex, VertexStream};
use std::collections::HashMap;

/// Deduplicate an unindexed vertex stream into an index buffer.
///
/// Two records are equal iff all their bytes are equal. Unique vertices are
/// numbered in order of first appearance, so the output is deterministic for
/// a given stream. Returns one index per input record together with the
/// unique vertex count (max index + 1); streams with more unique records
/// than the index type can address are rejected.
pub fn generate_index_buffer<I: VertexIndex>(vertices: &VertexStream) -> Result<(Vec<I>, usize)> {
    let vertex_count = vertices.vertex_count();

    let mut table: HashMap<&[u8], I> = HashMap::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(vertex_count);

    for record in 0..vertex_count {
        let bytes = vertices.vertex(record);
        if let Some(&index) = table.get(bytes) {
            indices.push(index);
        } else {
            let unique = table.len();
            if unique > I::MAX_INDEX {
                return Err(Error::IndexOverflow { unique: unique + 1 });
            }
            let index = I::from_usize(unique);
            table.insert(bytes, index);
            indices.push(index);
        }
    }

    Ok((indices, table.len()))
}

/// Rebuild the deduplicated vertex buffer addressed by `indices`.
///
/// For each index value, the first record of `vertices` that was assigned
/// that index is copied out; this materializes the inverse of the mapping
/// established by [`generate_index_buffer`]. The result holds
/// `max index + 1` records.
pub fn generate_vertex_buffer<I: VertexIndex>(
    indices: &[I],
    vertices: &VertexStream,
) -> Result<Vec<u8>> {
    if indices.len() != vertices.vertex_count() {
        return Err(Error::InvalidData(format!(
            "index count {} does not match record count {}",
            indices.len(),
            vertices.vertex_count()
        )));
    }

    let vertex_size = vertices.vertex_size();
    let unique = indices
        .iter()
        .map(|index| index.to_usize() + 1)
        .max()
        .unwrap_or(0);

    let mut destination = vec![0u8; unique * vertex_size];
    let mut written = vec![false; unique];

    for (record, &index) in indices.iter().enumerate() {
        let index = index.to_usize();
        if !written[index] {
            destination[index * vertex_size..(index + 1) * vertex_size]
                .copy_from_slice(vertices.vertex(record));
            written[index] = true;
        }
    }

    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_unique() {
        let data: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
        let stream = VertexStream::new(&data, 4).unwrap();
        let (indices, unique) = generate_index_buffer::<u32>(&stream).unwrap();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(unique, 3);
    }

    #[test]
    fn test_duplicates_collapse_to_first_appearance() {
        let data: [u8; 16] = [9, 9, 9, 9, 5, 5, 5, 5, 9, 9, 9, 9, 5, 5, 5, 5];
        let stream = VertexStream::new(&data, 4).unwrap();
        let (indices, unique) = generate_index_buffer::<u32>(&stream).unwrap();
        assert_eq!(indices, vec![0, 1, 0, 1]);
        assert_eq!(unique, 2);
    }

    #[test]
    fn test_empty_stream() {
        let stream = VertexStream::new(&[], 4).unwrap();
        let (indices, unique) = generate_index_buffer::<u16>(&stream).unwrap();
        assert!(indices.is_empty());
        assert_eq!(unique, 0);
    }

    #[test]
    fn test_round_trip() {
        // an unindexed quad: two triangles listing six records, four unique
        let records: [[f32; 3]; 6] = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let stream = VertexStream::from_typed(&records).unwrap();

        let (indices, unique) = generate_index_buffer::<u32>(&stream).unwrap();
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(unique, 4);

        let buffer = generate_vertex_buffer(&indices, &stream).unwrap();
        assert_eq!(buffer.len(), unique * stream.vertex_size());

        // unique vertices come out in first-appearance order
        let rebuilt = VertexStream::new(&buffer, stream.vertex_size()).unwrap();
        assert_eq!(rebuilt.vertex(0), stream.vertex(0));
        assert_eq!(rebuilt.vertex(1), stream.vertex(1));
        assert_eq!(rebuilt.vertex(2), stream.vertex(2));
        assert_eq!(rebuilt.vertex(3), stream.vertex(5));
    }

    #[test]
    fn test_byte_wise_identity() {
        // -0.0 and 0.0 differ in their byte patterns and must stay distinct
        let records: [f32; 2] = [0.0, -0.0];
        let stream = VertexStream::from_typed(&records).unwrap();
        let (_, unique) = generate_index_buffer::<u32>(&stream).unwrap();
        assert_eq!(unique, 2);
    }

    #[test]
    fn test_vertex_buffer_length_mismatch() {
        let data = [0u8; 8];
        let stream = VertexStream::new(&data, 4).unwrap();
        let indices: [u32; 3] = [0, 0, 0];
        assert!(generate_vertex_buffer(&indices, &stream).is_err());
    }

    #[test]
    fn test_16_bit_overflow_detected() {
        // 65537 unique single-byte records cannot exist, but 70000 unique
        // u32 records can; emulate with distinct 4-byte records
        let mut data = Vec::with_capacity(70_000 * 4);
        for value in 0u32..70_000 {
            data.extend_from_slice(&value.to_le_bytes());
        }
        let stream = VertexStream::new(&data, 4).unwrap();
        assert!(generate_index_buffer::<u16>(&stream).is_err());
        assert!(generate_index_buffer::<u32>(&stream).is_ok());
    }
}
