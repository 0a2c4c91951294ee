//! Welding an open extrusion onto a closed mesh.
//!
//! The open side (src after dispatch) is a cup: a surface whose only
//! boundary loops sit on the closed side's surface. Each loop either matches
//! a face of dst exactly, which is then removed, or outlines a strip or
//! corner of a face, which is cut out of it.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::context::MergeContext;
use super::cut::{apply_double_cut, apply_single_cut, find_double_cut, find_single_cut};
use crate::error::MergeError;
use crate::mesh::{EdgeKey, VertexId};

/// Open the dst faces under every boundary loop of src.
pub(crate) fn merge(ctx: &mut MergeContext<'_>) -> Result<(), MergeError> {
    let bad_edges: Vec<EdgeKey> = ctx.src.index().bad_edges().iter().copied().collect();
    let bad_faces = ctx.src.index().bad_faces().len();
    if bad_edges.len() != bad_faces {
        return Err(ctx.unsupported(format!(
            "open side has {} boundary edges on {} faces",
            bad_edges.len(),
            bad_faces
        )));
    }

    let loops = boundary_loops(&bad_edges)
        .ok_or_else(|| ctx.unsupported("boundary edges do not form simple loops"))?;

    let mut unmatched = 0;
    for outline in &loops {
        if !open_under(ctx, outline)? {
            warn!(vertices = outline.len(), "boundary loop matches no dst face");
            unmatched += 1;
        }
    }
    if unmatched > 0 {
        return Err(ctx.unsupported(format!(
            "{unmatched} of {} boundary loops match no dst face",
            loops.len()
        )));
    }
    Ok(())
}

/// Remove or cut the dst face under `outline`. Returns `false` when no face
/// fits.
fn open_under(ctx: &mut MergeContext<'_>, outline: &[VertexId]) -> Result<bool, MergeError> {
    if let Some(f) = ctx.dst.find_face(outline) {
        debug!(face = %f, "boundary loop matches a dst face");
        ctx.dst.mark(f);
        return Ok(true);
    }
    if let Some(cut) = find_single_cut(&ctx.dst, outline, ctx.positions, ctx.eps) {
        debug!(face = %cut.face(), "cutting strip from dst face");
        apply_single_cut(&mut ctx.dst, &cut, ctx.positions)?;
        return Ok(true);
    }
    if let Some(cut) = find_double_cut(&ctx.dst, outline, ctx.positions, ctx.eps) {
        debug!(face = %cut.face(), "cutting corner from dst face");
        apply_double_cut(&mut ctx.dst, &cut, ctx.positions)?;
        return Ok(true);
    }
    Ok(false)
}

/// Group `edges` into connected loops, each ordered as a vertex cycle.
///
/// Returns `None` if any group is not a simple cycle. Loops come out ordered
/// by their smallest vertex; each starts there.
pub(crate) fn boundary_loops(edges: &[EdgeKey]) -> Option<Vec<Vec<VertexId>>> {
    let mut vertices: Vec<VertexId> = edges
        .iter()
        .flat_map(|e| {
            let (a, b) = e.vertices();
            [a, b]
        })
        .collect();
    vertices.sort_unstable();
    vertices.dedup();
    let slot = |v: VertexId| vertices.binary_search(&v).ok();

    let mut parent: Vec<usize> = (0..vertices.len()).collect();
    for e in edges {
        let (a, b) = e.vertices();
        union(&mut parent, slot(a)?, slot(b)?);
    }

    let mut groups: BTreeMap<usize, Vec<EdgeKey>> = BTreeMap::new();
    for &e in edges {
        let root = find(&mut parent, slot(e.vertices().0)?);
        groups.entry(root).or_default().push(e);
    }

    let mut loops = groups
        .values()
        .map(|group| order_cycle(group))
        .collect::<Option<Vec<_>>>()?;
    loops.sort_by_key(|cycle| cycle[0]);
    Some(loops)
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], i: usize, j: usize) {
    let (ri, rj) = (find(parent, i), find(parent, j));
    if ri != rj {
        parent[ri.max(rj)] = ri.min(rj);
    }
}

/// Walk a connected edge set as a cycle starting at its smallest vertex and
/// heading to that vertex's smaller neighbor.
fn order_cycle(edges: &[EdgeKey]) -> Option<Vec<VertexId>> {
    let mut adjacency: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
    for e in edges {
        let (a, b) = e.vertices();
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }
    if adjacency.values().any(|n| n.len() != 2) {
        return None;
    }

    let (&start, first) = adjacency.iter().next()?;
    let mut cycle = vec![start];
    let (mut prev, mut current) = (start, *first.iter().min()?);
    while current != start {
        if cycle.len() >= adjacency.len() {
            return None;
        }
        cycle.push(current);
        let n = &adjacency[&current];
        let next = if n[0] == prev { n[1] } else { n[0] };
        prev = current;
        current = next;
    }
    (cycle.len() == adjacency.len()).then_some(cycle)
}
