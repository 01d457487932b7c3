//! Post-transform vertex cache analysis

use meshtune_core::{validate_index_buffer, Error, PostTransformStatistics, Result, VertexIndex};

/// Default FIFO cache size for analysis.
///
/// Deliberately larger than the optimizer target so the analyzer can still
/// rank orderings tuned for smaller caches.
pub const ANALYSIS_CACHE_SIZE: u32 = 32;

/// Simulate a FIFO post-transform vertex cache over an index buffer.
///
/// Each index is a hit if the vertex is among the `cache_size` most recently
/// missed vertices; otherwise the oldest entry is evicted and
/// `vertices_transformed` grows by one. `acmr` is misses per triangle and
/// `atvr` misses per unique vertex. Empty input yields all zeros.
pub fn analyze_post_transform<I: VertexIndex>(
    indices: &[I],
    vertex_count: usize,
    cache_size: u32,
) -> Result<PostTransformStatistics> {
    validate_index_buffer(indices, vertex_count)?;
    if cache_size == 0 {
        return Err(Error::InvalidData(
            "cache size must be at least 1".to_string(),
        ));
    }

    // FIFO via timestamps: a vertex is resident iff fewer than `cache_size`
    // misses happened since its own miss
    let cache_size = u64::from(cache_size);
    let mut stamps = vec![0u64; vertex_count];
    let mut timestamp = cache_size + 1;
    let mut misses = 0u64;

    for &index in indices {
        let vertex = index.to_usize();
        if timestamp - stamps[vertex] > cache_size {
            stamps[vertex] = timestamp;
            timestamp += 1;
            misses += 1;
        }
    }

    let triangle_count = indices.len() / 3;
    let acmr = if triangle_count > 0 {
        misses as f32 / triangle_count as f32
    } else {
        0.0
    };
    let atvr = if vertex_count > 0 {
        misses as f32 / vertex_count as f32
    } else {
        0.0
    };

    Ok(PostTransformStatistics {
        vertices_transformed: misses.min(u64::from(u32::MAX)) as u32,
        acmr,
        atvr,
    })
}
