//! Pre-transform vertex fetch analysis

use meshtune_core::{validate_index_buffer, Error, PreTransformStatistics, Result, VertexIndex};

/// Bytes per modeled cache line.
pub const CACHE_LINE_SIZE: usize = 64;

/// Number of direct-mapped lines in the modeled fetch cache.
pub const CACHE_LINE_COUNT: usize = 16;

/// Simulate a direct-mapped vertex fetch cache over an index buffer.
///
/// Each referenced vertex reads its byte range
/// `[index * vertex_size, (index + 1) * vertex_size)`; every cache line the
/// range touches is looked up at slot `line mod CACHE_LINE_COUNT` and a tag
/// mismatch fetches the full line. `overfetch` relates fetched bytes to the
/// vertex buffer size (0 when the buffer is empty).
pub fn analyze_pre_transform<I: VertexIndex>(
    indices: &[I],
    vertex_count: usize,
    vertex_size: usize,
) -> Result<PreTransformStatistics> {
    if vertex_size == 0 {
        return Err(Error::InvalidData(
            "vertex size must be at least 1 byte".to_string(),
        ));
    }
    validate_index_buffer(indices, vertex_count)?;

    let line_size = CACHE_LINE_SIZE as u64;
    let mut tags = [u64::MAX; CACHE_LINE_COUNT];
    let mut fetched = 0u64;

    for &index in indices {
        let vertex = index.to_usize() as u64;
        let start = vertex * vertex_size as u64;
        let end = start + vertex_size as u64;

        for line in start / line_size..(end + line_size - 1) / line_size {
            let slot = (line % CACHE_LINE_COUNT as u64) as usize;
            if tags[slot] != line {
                tags[slot] = line;
                fetched += line_size;
            }
        }
    }

    let buffer_size = vertex_count as u64 * vertex_size as u64;
    let overfetch = if buffer_size > 0 {
        fetched as f32 / buffer_size as f32
    } else {
        0.0
    };

    Ok(PreTransformStatistics {
        bytes_fetched: fetched.min(u64::from(u32::MAX)) as u32,
        overfetch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let indices: [u32; 0] = [];
        let stats = analyze_pre_transform(&indices, 0, 16).unwrap();
        assert_eq!(stats.bytes_fetched, 0);
        assert_eq!(stats.overfetch, 0.0);
    }

    #[test]
    fn test_single_triangle_packed() {
        // three 16-byte vertices share the first cache line
        let indices: [u32; 3] = [0, 1, 2];
        let stats = analyze_pre_transform(&indices, 3, 16).unwrap();
        assert_eq!(stats.bytes_fetched, 64);
    }

    #[test]
    fn test_revisit_is_free() {
        let indices: [u32; 6] = [0, 1, 2, 0, 1, 2];
        let once = analyze_pre_transform(&indices[..3], 3, 16).unwrap();
        let twice = analyze_pre_transform(&indices, 3, 16).unwrap();
        assert_eq!(once.bytes_fetched, twice.bytes_fetched);
    }

    #[test]
    fn test_direct_mapped_conflict() {
        // vertices 0 and 16 live 1024 bytes apart with 64-byte vertices:
        // lines 0 and 16 map to the same slot and evict each other
        let indices: [u32; 6] = [0, 16, 0, 16, 0, 16];
        let stats = analyze_pre_transform(&indices, 17, 64).unwrap();
        assert_eq!(stats.bytes_fetched, 6 * 64);
    }

    #[test]
    fn test_straddling_vertex_fetches_both_lines() {
        // a 48-byte vertex at index 1 spans bytes 48..96, touching two lines
        let indices: [u32; 3] = [1, 1, 1];
        let stats = analyze_pre_transform(&indices, 2, 48).unwrap();
        assert_eq!(stats.bytes_fetched, 128);
    }

    #[test]
    fn test_sequential_fetch_overfetch_near_one() {
        // 16-byte vertices referenced in order: each line is fetched once
        let indices: Vec<u32> = (0..48).collect();
        let stats = analyze_pre_transform(&indices, 48, 16).unwrap();
        assert_eq!(stats.bytes_fetched, 48 * 16);
        assert!((stats.overfetch - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_zero_vertex_size() {
        let indices: [u32; 3] = [0, 1, 2];
        assert!(analyze_pre_transform(&indices, 3, 0).is_err());
    }

    #[test]
    fn test_16_bit_indices_match() {
        let wide: [u32; 6] = [0, 3, 5, 1, 2, 4];
        let narrow: [u16; 6] = [0, 3, 5, 1, 2, 4];
        let a = analyze_pre_transform(&wide, 6, 20).unwrap();
        let b = analyze_pre_transform(&narrow, 6, 20).unwrap();
        assert_eq!(a, b);
    }
}
