//! Overdraw optimization by cluster reordering
//!
//! Clusters produced by the post-transform optimizer are re-emitted roughly
//! front to back: outward-facing clusters far from the mesh center first, so
//! that early-Z rejects fragments of whatever they occlude. A FIFO cache
//! simulation guards the reorder so vertex cache efficiency never degrades
//! past the caller's threshold.

use meshtune_core::{
    validate_index_buffer, Error, Result, Vector3f, VertexIndex, VertexPositions,
};
use std::cmp::Ordering;

/// Default cache size for the ACMR regression guard.
pub const OVERDRAW_CACHE_SIZE: u32 = 16;

/// Default acceptable ACMR regression (none).
pub const OVERDRAW_THRESHOLD: f32 = 1.0;

/// FIFO cache simulation with undo support for candidate trials.
struct CacheSim {
    stamps: Vec<u64>,
    timestamp: u64,
    cache_size: u64,
}

impl CacheSim {
    fn new(vertex_count: usize, cache_size: u32) -> Self {
        Self {
            stamps: vec![0u64; vertex_count],
            timestamp: u64::from(cache_size) + 1,
            cache_size: u64::from(cache_size),
        }
    }

    /// Run `indices` through the cache, returning the miss count. Prior
    /// stamps are pushed onto `undo` so the run can be rolled back.
    fn simulate<I: VertexIndex>(&mut self, indices: &[I], undo: &mut Vec<(usize, u64)>) -> u64 {
        let mut misses = 0u64;
        for &index in indices {
            let vertex = index.to_usize();
            if self.timestamp - self.stamps[vertex] > self.cache_size {
                undo.push((vertex, self.stamps[vertex]));
                self.stamps[vertex] = self.timestamp;
                self.timestamp += 1;
                misses += 1;
            }
        }
        misses
    }

    fn rollback(&mut self, undo: &[(usize, u64)]) {
        for &(vertex, stamp) in undo.iter().rev() {
            self.stamps[vertex] = stamp;
        }
        self.timestamp -= undo.len() as u64;
    }
}

/// Reorder clusters to reduce overdraw without degrading the vertex cache.
///
/// `indices` and `clusters` must be the output of
/// [`optimize_post_transform_clusters`](crate::optimize_post_transform_clusters);
/// triangles inside a cluster keep their order. `threshold` bounds the
/// acceptable ACMR regression relative to the input (1.05 allows 5%) and
/// must be at least 1; with the default of 1.0 the result never analyzes
/// worse than its input.
pub fn optimize_overdraw<I: VertexIndex>(
    indices: &[I],
    positions: &VertexPositions,
    clusters: &[u32],
    cache_size: u32,
    threshold: f32,
) -> Result<Vec<I>> {
    validate_index_buffer(indices, positions.vertex_count())?;
    if cache_size == 0 {
        return Err(Error::InvalidData(
            "cache size must be at least 1".to_string(),
        ));
    }
    if !(threshold >= 1.0) {
        return Err(Error::InvalidData(format!(
            "threshold {} must be at least 1",
            threshold
        )));
    }
    if indices.is_empty() {
        if clusters.is_empty() {
            return Ok(Vec::new());
        }
        return Err(Error::InvalidData(
            "cluster list is not empty for an empty index buffer".to_string(),
        ));
    }

    let face_count = indices.len() / 3;
    let ranges = cluster_ranges(clusters, face_count)?;

    // input misses at the same cache size set the regression budget
    let mut scratch = Vec::new();
    let input_misses =
        CacheSim::new(positions.vertex_count(), cache_size).simulate(indices, &mut scratch);
    let budget = f64::from(threshold) * input_misses as f64;

    // candidate order: descending occlusion score, ties to the input order
    let scores = cluster_scores(indices, positions, &ranges);
    let mut remaining: Vec<usize> = (0..ranges.len()).collect();
    remaining.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut sim = CacheSim::new(positions.vertex_count(), cache_size);
    let mut sequence = Vec::with_capacity(ranges.len());
    let mut emitted_faces = 0usize;
    let mut misses = 0u64;
    let mut undo: Vec<(usize, u64)> = Vec::new();

    while !remaining.is_empty() {
        // take the best-scored cluster whose inclusion keeps the running
        // ACMR within budget, or the least-violating one if none does
        let mut accepted: Option<(usize, u64)> = None;
        let mut fallback = (f64::INFINITY, 0usize);

        for (position, &cluster) in remaining.iter().enumerate() {
            let slice = cluster_slice(indices, &ranges, cluster);
            scratch.clear();
            let added = sim.simulate(slice, &mut scratch);

            let faces = emitted_faces + slice.len() / 3;
            let running_acmr = (misses + added) as f64 / faces as f64;

            // accept when the running sequence stays within the budgeted
            // miss rate, pro-rated over the triangles emitted so far
            if (misses + added) as f64 <= budget * faces as f64 / face_count as f64 {
                accepted = Some((position, added));
                break;
            }

            sim.rollback(&scratch);
            if running_acmr < fallback.0 {
                fallback = (running_acmr, position);
            }
        }

        let (position, added) = match accepted {
            Some(choice) => choice,
            None => {
                let cluster = remaining[fallback.1];
                let slice = cluster_slice(indices, &ranges, cluster);
                scratch.clear();
                let added = sim.simulate(slice, &mut scratch);
                (fallback.1, added)
            }
        };

        let cluster = remaining.remove(position);
        emitted_faces += ranges[cluster].1 - ranges[cluster].0;
        misses += added;
        sequence.push(cluster);
    }

    let mut destination = Vec::with_capacity(indices.len());
    for &cluster in &sequence {
        destination.extend_from_slice(cluster_slice(indices, &ranges, cluster));
    }

    // hard guard: if the reorder still ends above budget, the input order
    // trivially satisfies any threshold >= 1
    if misses as f64 > budget {
        destination.clear();
        destination.extend_from_slice(indices);
    }

    Ok(destination)
}

/// Translate the cluster offset list into per-cluster face ranges.
fn cluster_ranges(clusters: &[u32], face_count: usize) -> Result<Vec<(usize, usize)>> {
    if clusters.is_empty() {
        return Err(Error::InvalidData(
            "cluster list is empty for a non-empty index buffer".to_string(),
        ));
    }
    if clusters[0] != 0 {
        return Err(Error::InvalidData(
            "cluster list does not start at triangle 0".to_string(),
        ));
    }

    let mut ranges = Vec::with_capacity(clusters.len());
    for (position, &start) in clusters.iter().enumerate() {
        let end = clusters
            .get(position + 1)
            .map(|&next| next as usize)
            .unwrap_or(face_count);
        if (start as usize) >= end || end > face_count {
            return Err(Error::InvalidData(format!(
                "cluster {} spans triangles {}..{} which is not strictly increasing",
                position, start, end
            )));
        }
        ranges.push((start as usize, end));
    }

    Ok(ranges)
}

fn cluster_slice<'a, I: VertexIndex>(
    indices: &'a [I],
    ranges: &[(usize, usize)],
    cluster: usize,
) -> &'a [I] {
    let (begin, end) = ranges[cluster];
    &indices[begin * 3..end * 3]
}

/// Occlusion score per cluster: how far the cluster sits from the mesh
/// center along its own area-weighted normal. High scores face outward and
/// get drawn first.
fn cluster_scores(
    indices: &[impl VertexIndex],
    positions: &VertexPositions,
    ranges: &[(usize, usize)],
) -> Vec<f32> {
    let face_count = indices.len() / 3;

    let mut mesh_centroid = Vector3f::zeros();
    let mut cluster_centroids = vec![Vector3f::zeros(); ranges.len()];
    let mut cluster_normals = vec![Vector3f::zeros(); ranges.len()];

    for (cluster, &(begin, end)) in ranges.iter().enumerate() {
        for face in begin..end {
            let a = positions.position(indices[face * 3].to_usize());
            let b = positions.position(indices[face * 3 + 1].to_usize());
            let c = positions.position(indices[face * 3 + 2].to_usize());

            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            mesh_centroid += centroid;
            cluster_centroids[cluster] += centroid;
            // cross product length carries the face area weighting
            cluster_normals[cluster] += (b - a).cross(&(c - a));
        }
    }
    mesh_centroid /= face_count as f32;

    ranges
        .iter()
        .enumerate()
        .map(|(cluster, &(begin, end))| {
            let centroid = cluster_centroids[cluster] / (end - begin) as f32;
            let length = cluster_normals[cluster].norm();
            if length > 0.0 {
                (centroid - mesh_centroid).dot(&cluster_normals[cluster]) / length
            } else {
                0.0
            }
        })
        .collect()
}
