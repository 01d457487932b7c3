//! Post-transform vertex cache optimization
//!
//! A Tipsify-style greedy fan walk (Sander, Nehab, Barczak 2007): triangles
//! are emitted as fans around a running sequence of vertices chosen to still
//! be resident in a modeled FIFO cache, which keeps successive triangles
//! sharing recently transformed vertices. The walk amortizes to linear time
//! in the index count.

use meshtune_core::{validate_index_buffer, Error, Result, VertexIndex};

/// Default FIFO cache size targeted by the optimizer.
///
/// Smaller than the analyzer default: targeting less than the physical cache
/// size avoids thrashing on hardware with shorter FIFOs.
pub const OPTIMIZE_CACHE_SIZE: u32 = 16;

/// Cache slots reserved for the triangle being emitted when deciding whether
/// a candidate vertex is still resident.
const EMIT_SLACK: u64 = 3;

/// Vertex-to-triangle adjacency as parallel offset/entry arrays.
struct TriangleAdjacency {
    counts: Vec<u32>,
    offsets: Vec<u32>,
    data: Vec<u32>,
}

fn build_triangle_adjacency<I: VertexIndex>(
    indices: &[I],
    vertex_count: usize,
) -> TriangleAdjacency {
    let face_count = indices.len() / 3;

    let mut counts = vec![0u32; vertex_count];
    for index in indices {
        counts[index.to_usize()] += 1;
    }

    let mut offsets = vec![0u32; vertex_count];
    let mut offset = 0u32;
    for vertex in 0..vertex_count {
        offsets[vertex] = offset;
        offset += counts[vertex];
    }

    // fill entries, walking each offset forward
    let mut data = vec![0u32; indices.len()];
    for face in 0..face_count {
        for corner in 0..3 {
            let vertex = indices[face * 3 + corner].to_usize();
            data[offsets[vertex] as usize] = face as u32;
            offsets[vertex] += 1;
        }
    }

    // rewind the offsets disturbed by the fill pass
    for vertex in 0..vertex_count {
        offsets[vertex] -= counts[vertex];
    }

    TriangleAdjacency {
        counts,
        offsets,
        data,
    }
}

/// Reorder triangles to reduce post-transform vertex cache misses.
///
/// The output contains the same triangles as the input (same corner order,
/// same multiplicity) in a cache-friendly order, and is bit-identical for
/// identical input. `cache_size` must be at least 4; [`OPTIMIZE_CACHE_SIZE`]
/// is a good default.
pub fn optimize_post_transform<I: VertexIndex>(
    indices: &[I],
    vertex_count: usize,
    cache_size: u32,
) -> Result<Vec<I>> {
    let (destination, _) = tipsify(indices, vertex_count, cache_size)?;
    Ok(destination)
}

/// Like [`optimize_post_transform`], additionally returning the cluster
/// partition the walk produced.
///
/// A new cluster starts whenever the walk runs out of cache-resident
/// candidates and restarts from a cold vertex. Clusters are returned as
/// triangle offsets into the output buffer: strictly increasing, starting at
/// 0 for any non-empty mesh. The overdraw optimizer consumes this partition.
pub fn optimize_post_transform_clusters<I: VertexIndex>(
    indices: &[I],
    vertex_count: usize,
    cache_size: u32,
) -> Result<(Vec<I>, Vec<u32>)> {
    tipsify(indices, vertex_count, cache_size)
}

fn tipsify<I: VertexIndex>(
    indices: &[I],
    vertex_count: usize,
    cache_size: u32,
) -> Result<(Vec<I>, Vec<u32>)> {
    validate_index_buffer(indices, vertex_count)?;
    if u64::from(cache_size) <= EMIT_SLACK {
        return Err(Error::InvalidData(format!(
            "cache size {} leaves no room for the fan heuristic",
            cache_size
        )));
    }
    if indices.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let cache_size = u64::from(cache_size);
    let face_count = indices.len() / 3;
    let adjacency = build_triangle_adjacency(indices, vertex_count);

    let mut live = adjacency.counts.clone();
    let mut stamps = vec![0u64; vertex_count];
    let mut timestamp = cache_size + 1;

    let mut emitted = vec![false; face_count];
    let mut destination = Vec::with_capacity(indices.len());
    let mut clusters = Vec::new();
    let mut candidates: Vec<u32> = Vec::with_capacity(16);
    let mut cursor = 0usize;

    // seed from the lowest-numbered vertex with any triangles
    let mut fan = match next_live_vertex(&live, &mut cursor) {
        Some(vertex) => vertex,
        None => return Ok((destination, clusters)),
    };
    clusters.push(0);

    loop {
        candidates.clear();

        // emit every remaining triangle around the fanning vertex, in
        // adjacency (= input) order
        let begin = adjacency.offsets[fan] as usize;
        let end = begin + adjacency.counts[fan] as usize;
        for &face in &adjacency.data[begin..end] {
            let face = face as usize;
            if emitted[face] {
                continue;
            }
            emitted[face] = true;

            for corner in 0..3 {
                let index = indices[face * 3 + corner];
                let vertex = index.to_usize();

                destination.push(index);
                candidates.push(vertex as u32);
                live[vertex] -= 1;

                if timestamp - stamps[vertex] > cache_size {
                    stamps[vertex] = timestamp;
                    timestamp += 1;
                }
            }
        }

        // next fan: the cache-resident candidate with the best priority;
        // age rewards recency, the live count penalizes wide fans that
        // would flush the cache. Ties go to the lowest vertex index.
        let mut best: Option<(i64, usize)> = None;
        for &candidate in &candidates {
            let vertex = candidate as usize;
            if live[vertex] == 0 {
                continue;
            }

            let age = timestamp - stamps[vertex];
            if age + EMIT_SLACK >= cache_size {
                continue;
            }

            let priority = age as i64 - 2 * i64::from(live[vertex]);
            let better = match best {
                None => true,
                Some((best_priority, best_vertex)) => {
                    priority > best_priority || (priority == best_priority && vertex < best_vertex)
                }
            };
            if better {
                best = Some((priority, vertex));
            }
        }

        match best {
            Some((_, vertex)) => fan = vertex,
            None => match next_live_vertex(&live, &mut cursor) {
                // a cold restart begins a new cluster
                Some(vertex) => {
                    clusters.push((destination.len() / 3) as u32);
                    fan = vertex;
                }
                None => break,
            },
        }
    }

    Ok((destination, clusters))
}

fn next_live_vertex(live: &[u32], cursor: &mut usize) -> Option<usize> {
    while *cursor < live.len() {
        if live[*cursor] > 0 {
            return Some(*cursor);
        }
        *cursor += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sorted triangle multiset, ignoring corner rotation and order.
    fn triangle_set(indices: &[u32]) -> Vec<[u32; 3]> {
        let mut triangles: Vec<[u32; 3]> = indices
            .chunks_exact(3)
            .map(|t| {
                let mut t = [t[0], t[1], t[2]];
                t.sort_unstable();
                t
            })
            .collect();
        triangles.sort_unstable();
        triangles
    }

    fn make_strip(length: usize) -> Vec<u32> {
        let mut indices = Vec::with_capacity(length * 3);
        for i in 0..length as u32 {
            if i % 2 == 0 {
                indices.extend_from_slice(&[i, i + 1, i + 2]);
            } else {
                indices.extend_from_slice(&[i + 1, i, i + 2]);
            }
        }
        indices
    }

    #[test]
    fn test_empty_mesh() {
        let indices: [u32; 0] = [];
        let (out, clusters) = optimize_post_transform_clusters(&indices, 0, 16).unwrap();
        assert!(out.is_empty());
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_single_triangle_is_identity() {
        let indices: [u32; 3] = [0, 1, 2];
        let (out, clusters) = optimize_post_transform_clusters(&indices, 3, 16).unwrap();
        assert_eq!(out, vec![0, 1, 2]);
        assert_eq!(clusters, vec![0]);
    }

    #[test]
    fn test_output_is_triangle_permutation() {
        let indices = make_strip(40);
        let out = optimize_post_transform(&indices, 42, 16).unwrap();
        assert_eq!(triangle_set(&indices), triangle_set(&out));
    }

    #[test]
    fn test_deterministic() {
        let indices = make_strip(100);
        let a = optimize_post_transform(&indices, 102, 16).unwrap();
        let b = optimize_post_transform(&indices, 102, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cluster_list_well_formed() {
        let indices = make_strip(200);
        let (out, clusters) = optimize_post_transform_clusters(&indices, 202, 16).unwrap();
        assert_eq!(out.len(), indices.len());
        assert!(!clusters.is_empty());
        assert_eq!(clusters[0], 0);
        for pair in clusters.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(*clusters.last().unwrap() < (out.len() / 3) as u32);
    }

    #[test]
    fn test_disconnected_meshes_split_clusters() {
        // two quads with no shared vertices
        let indices: [u32; 12] = [0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7];
        let (_, clusters) = optimize_post_transform_clusters(&indices, 8, 16).unwrap();
        assert!(clusters.len() >= 2);
    }

    #[test]
    fn test_rejects_tiny_cache() {
        let indices: [u32; 3] = [0, 1, 2];
        assert!(optimize_post_transform(&indices, 3, 3).is_err());
        assert!(optimize_post_transform(&indices, 3, 4).is_ok());
    }

    #[test]
    fn test_16_bit_indices_match() {
        let wide = make_strip(30);
        let narrow: Vec<u16> = wide.iter().map(|&i| i as u16).collect();
        let out_wide = optimize_post_transform(&wide, 32, 16).unwrap();
        let out_narrow = optimize_post_transform(&narrow, 32, 16).unwrap();
        let widened: Vec<u32> = out_narrow.iter().map(|&i| u32::from(i)).collect();
        assert_eq!(out_wide, widened);
    }

    #[test]
    fn test_adjacency_offsets() {
        let indices: [u32; 6] = [0, 1, 2, 2, 1, 3];
        let adjacency = build_triangle_adjacency(&indices, 4);
        assert_eq!(adjacency.counts, vec![1, 2, 2, 1]);
        assert_eq!(adjacency.offsets, vec![0, 1, 3, 5]);
        // vertex 1 and 2 belong to both triangles, in input order
        assert_eq!(&adjacency.data[1..3], &[0, 1]);
        assert_eq!(&adjacency.data[3..5], &[0, 1]);
    }
}
