//! Stitching two open meshes along shared edges.
//!
//! At a shared edge each side has a face that continues the surface (its
//! *main* face) and a flap folded back onto the other side's flap. The flaps
//! overlap with opposite normals; the shorter flap is deleted and the longer
//! one is cut back to where the shorter one ended.
//!
//! Every edge is planned before anything is edited, so an edge that cannot
//! be stitched leaves both sides unchanged.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::context::MergeContext;
use super::cut::{apply_single_cut, find_single_cut};
use super::side::Role;
use crate::error::MergeError;
use crate::mesh::{antiparallel, same_direction, vectors_equal, EdgeKey, Face, FaceId, VertexId};

/// Edits needed at one shared edge.
#[derive(Debug, Clone, PartialEq)]
struct EdgePlan {
    edge: EdgeKey,
    delete: Vec<(Role, FaceId)>,
    cut: Option<DeferredCut>,
}

/// A strip to cut from a face once all deletions are marked.
#[derive(Debug, Clone, PartialEq)]
struct DeferredCut {
    role: Role,
    outline: [VertexId; 4],
}

/// Stitch the single edge the sides share.
pub(crate) fn single_edge(ctx: &mut MergeContext<'_>) -> Result<(), MergeError> {
    let Some((&edge, (src_faces, dst_faces))) = ctx.shared.edges.iter().next() else {
        return Err(ctx.unsupported("no shared edge to stitch"));
    };
    if src_faces.len() != 2 || dst_faces.len() != 2 {
        return Err(ctx.unsupported(format!(
            "shared edge has {} src and {} dst faces, expected two each",
            src_faces.len(),
            dst_faces.len()
        )));
    }
    let flaps = src_faces
        .iter()
        .flat_map(|&s| dst_faces.iter().map(move |&d| (s, d)))
        .find(|&(s, d)| antiparallel(&ctx.src.normal(s), &ctx.dst.normal(d)));
    let Some((os, od)) = flaps else {
        return Err(ctx.unsupported("no opposed face pair at the shared edge"));
    };

    let plan = plan_edge(ctx, edge, os, od)?;
    apply(ctx, vec![plan])
}

/// Stitch edges that all lie on one main face per side.
pub(crate) fn dominant_faces(ctx: &mut MergeContext<'_>) -> Result<(), MergeError> {
    let edges: Vec<(EdgeKey, Vec<FaceId>, Vec<FaceId>)> = ctx
        .shared
        .edges
        .iter()
        .map(|(&e, (s, d))| (e, s.clone(), d.clone()))
        .collect();

    let main_src = dominant_face(edges.iter().map(|(_, s, _)| s.as_slice()), edges.len())
        .ok_or_else(|| ctx.unsupported("no src face touches every shared edge"))?;
    let main_dst = dominant_face(edges.iter().map(|(_, _, d)| d.as_slice()), edges.len())
        .ok_or_else(|| ctx.unsupported("no dst face touches every shared edge"))?;
    debug!(src = %main_src, dst = %main_dst, "stitching around dominant faces");

    let mut plans = Vec::with_capacity(edges.len());
    let mut failed = 0;
    for (e, s, d) in &edges {
        let planned = match (flap(s, main_src), flap(d, main_dst)) {
            (Some(os), Some(od)) => plan_edge(ctx, *e, os, od),
            _ => Err(ctx.unsupported(format!("edge {e:?} is not bordered by a main face and a flap"))),
        };
        match planned {
            Ok(plan) => plans.push(plan),
            Err(err) => {
                warn!(edge = ?e, error = %err, "cannot stitch shared edge");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(ctx.unsupported(format!(
            "{failed} of {} shared edges cannot be stitched",
            edges.len()
        )));
    }
    apply(ctx, plans)
}

/// The one face touching all `n` edges, provided every other face touches
/// exactly one.
fn dominant_face<'a>(lists: impl Iterator<Item = &'a [FaceId]>, n: usize) -> Option<FaceId> {
    let mut touches: BTreeMap<FaceId, usize> = BTreeMap::new();
    for list in lists {
        let mut seen: Vec<FaceId> = list.to_vec();
        seen.sort_unstable();
        seen.dedup();
        for f in seen {
            *touches.entry(f).or_default() += 1;
        }
    }
    let mut mains = touches.iter().filter(|&(_, &c)| c == n).map(|(&f, _)| f);
    let main = mains.next()?;
    if mains.next().is_some() {
        return None;
    }
    touches
        .iter()
        .all(|(&f, &c)| f == main || c == 1)
        .then_some(main)
}

/// The face other than `main` in a two-face edge list.
fn flap(faces: &[FaceId], main: FaceId) -> Option<FaceId> {
    match faces {
        [a, b] if *a == main => Some(*b),
        [a, b] if *b == main => Some(*a),
        _ => None,
    }
}

/// The vertices following `a` and `b` along `face`, away from edge `(a, b)`.
fn free_ends(face: &Face, a: VertexId, b: VertexId) -> Option<(VertexId, VertexId)> {
    let away = |x: VertexId, partner: VertexId| {
        let (prev, next) = face.neighbors_of(x)?;
        if prev == partner {
            Some(next)
        } else if next == partner {
            Some(prev)
        } else {
            None
        }
    };
    Some((away(a, b)?, away(b, a)?))
}

/// Decide how flaps `os` (src) and `od` (dst) at `edge` are resolved.
fn plan_edge(ctx: &MergeContext<'_>, edge: EdgeKey, os: FaceId, od: FaceId) -> Result<EdgePlan, MergeError> {
    if !antiparallel(&ctx.src.normal(os), &ctx.dst.normal(od)) {
        return Err(ctx.unsupported(format!("flaps at edge {edge:?} are not opposed")));
    }
    let (a, b) = edge.vertices();
    let (src_face, dst_face) = (ctx.src.face(os), ctx.dst.face(od));
    let ((sa, sb), (da, db)) = match (free_ends(src_face, a, b), free_ends(dst_face, a, b)) {
        (Some(s), Some(d)) => (s, d),
        _ => return Err(ctx.unsupported(format!("flap at edge {edge:?} does not use it"))),
    };

    let run = |from: VertexId, to: VertexId| ctx.position(to) - ctx.position(from);
    let (src_a, src_b, dst_a, dst_b) = (run(a, sa), run(b, sb), run(a, da), run(b, db));
    if !same_direction(&src_a, &dst_a) || !same_direction(&src_b, &dst_b) {
        return Err(ctx.unsupported(format!("flaps at edge {edge:?} diverge")));
    }

    let (src_len, dst_len) = (src_a.norm(), dst_a.norm());
    if (src_len - dst_len).abs() <= ctx.eps {
        if src_face.same_loop(dst_face.vertices()) {
            return Ok(EdgePlan {
                edge,
                delete: vec![(ctx.src.role(), os), (ctx.dst.role(), od)],
                cut: None,
            });
        }
        return Err(ctx.unsupported(format!("equal flaps at edge {edge:?} differ in shape")));
    }

    let (short_role, short_face, short_face_id, long_role, (short_a, short_b), (run_a, run_b)) =
        if src_len < dst_len {
            (ctx.src.role(), src_face, os, ctx.dst.role(), (sa, sb), (src_a, src_b))
        } else {
            (ctx.dst.role(), dst_face, od, ctx.src.role(), (da, db), (dst_a, dst_b))
        };
    if short_face.len() != 4 || !vectors_equal(&run_a, &run_b, ctx.eps) {
        return Err(ctx.unsupported(format!("shorter flap at edge {edge:?} is not a parallelogram")));
    }
    Ok(EdgePlan {
        edge,
        delete: vec![(short_role, short_face_id)],
        cut: Some(DeferredCut {
            role: long_role,
            outline: [a, b, short_b, short_a],
        }),
    })
}

/// Mark every planned deletion, then cut the longer flaps.
fn apply(ctx: &mut MergeContext<'_>, plans: Vec<EdgePlan>) -> Result<(), MergeError> {
    for plan in &plans {
        for &(role, f) in &plan.delete {
            ctx.side_mut(role).mark(f);
        }
    }
    let positions = ctx.positions;
    for plan in &plans {
        let Some(deferred) = &plan.cut else {
            continue;
        };
        let Some(cut) = find_single_cut(ctx.side(deferred.role), &deferred.outline, positions, ctx.eps) else {
            return Err(ctx.unsupported(format!("no {} face to cut at edge {:?}", deferred.role, plan.edge)));
        };
        apply_single_cut(ctx.side_mut(deferred.role), &cut, positions)?;
    }
    Ok(())
}
