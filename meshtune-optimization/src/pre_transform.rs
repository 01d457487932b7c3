//! Pre-transform vertex fetch optimization

use meshtune_core::{validate_index_buffer, Result, VertexIndex, VertexStream};

const UNASSIGNED: usize = usize::MAX;

/// Reorder vertices into first-reference order and remap `indices` in place.
///
/// After the call, walking `indices` references the returned vertex buffer
/// in ascending first-use order, which turns the GPU's vertex fetches into a
/// forward-moving access pattern. Vertices never referenced by `indices` are
/// appended at the end in their original relative order, so the returned
/// buffer always holds every input record.
pub fn optimize_pre_transform<I: VertexIndex>(
    indices: &mut [I],
    vertices: &VertexStream,
) -> Result<Vec<u8>> {
    let vertex_count = vertices.vertex_count();
    validate_index_buffer(indices, vertex_count)?;

    let mut remap = vec![UNASSIGNED; vertex_count];
    let mut next = 0usize;

    for index in indices.iter_mut() {
        let vertex = index.to_usize();
        if remap[vertex] == UNASSIGNED {
            remap[vertex] = next;
            next += 1;
        }
        *index = I::from_usize(remap[vertex]);
    }

    for slot in remap.iter_mut() {
        if *slot == UNASSIGNED {
            *slot = next;
            next += 1;
        }
    }

    let vertex_size = vertices.vertex_size();
    let mut destination = vec![0u8; vertex_count * vertex_size];
    for (source, &target) in remap.iter().enumerate() {
        destination[target * vertex_size..(target + 1) * vertex_size]
            .copy_from_slice(vertices.vertex(source));
    }

    Ok(destination)
}
