//! Merging two meshes that share whole faces.
//!
//! A shared face with opposite normals on the two sides is a seam: both
//! copies are interior to the union and are removed. A single shared face
//! with the same normal on both sides is the common base of two extrusions
//! along the same direction; the longer one is truncated to start where the
//! shorter one ends.

use nalgebra::Vector3;
use tracing::debug;

use super::context::MergeContext;
use super::side::Side;
use crate::error::MergeError;
use crate::mesh::{antiparallel, same_direction, vectors_equal, FaceId, FaceKey, VertexId};

/// Resolve every shared face pair.
pub(crate) fn merge(ctx: &mut MergeContext<'_>) -> Result<(), MergeError> {
    let pairs: Vec<(FaceKey, FaceId, FaceId)> = ctx
        .shared
        .faces
        .iter()
        .map(|(key, &(s, d))| (key.clone(), s, d))
        .collect();

    for (key, s, d) in pairs {
        let (ns, nd) = (ctx.src.normal(s), ctx.dst.normal(d));
        if antiparallel(&ns, &nd) {
            debug!(src = %s, dst = %d, "removing seam face pair");
            ctx.src.mark(s);
            ctx.dst.mark(d);
        } else if same_direction(&ns, &nd) {
            if ctx.shared.faces.len() != 1 || ctx.shared.edges.len() != key.len() {
                return Err(ctx.unsupported("coplanar shared face is not the only overlap"));
            }
            truncate(ctx, s, d)?;
        } else {
            return Err(ctx.unsupported(format!(
                "shared face pair {s}/{d} has unrelated normals"
            )));
        }
    }
    Ok(())
}

/// A prism swept from a base face.
#[derive(Debug)]
struct Extrusion {
    /// Base vertex and the vertex it was swept to.
    ring: Vec<(VertexId, VertexId)>,
    /// The sweep.
    vector: Vector3<f64>,
    /// Live face closing the far end, if any.
    cap: Option<FaceId>,
}

/// Read the faces around `base` as an extrusion of it.
///
/// Every base vertex must have exactly one neighbor off the base, and all
/// those side edges must be the same vector.
fn detect_extrusion(ctx: &MergeContext<'_>, side: &Side, base: FaceId) -> Option<Extrusion> {
    let face = side.face(base);
    let mut ring = Vec::with_capacity(face.len());
    let mut vector: Option<Vector3<f64>> = None;
    for &v in face.vertices() {
        let mut off_base: Vec<VertexId> = Vec::new();
        for &g in side.index().faces_at_vertex(v) {
            if g == base || side.index().is_marked(g) {
                continue;
            }
            let (prev, next) = side.face(g).neighbors_of(v)?;
            for w in [prev, next] {
                if !face.contains(w) && !off_base.contains(&w) {
                    off_base.push(w);
                }
            }
        }
        let [w] = off_base[..] else {
            return None;
        };
        let d = ctx.position(w) - ctx.position(v);
        match vector {
            None => vector = Some(d),
            Some(u) if vectors_equal(&u, &d, ctx.eps) => {}
            Some(_) => return None,
        }
        ring.push((v, w));
    }
    let vector = vector.filter(|u| u.norm() > ctx.eps)?;
    let far: Vec<VertexId> = ring.iter().map(|&(_, w)| w).collect();
    let cap = side.find_face(&far);
    Some(Extrusion { ring, vector, cap })
}

/// Cut the longer of two extrusions sharing base `s`/`d` back to the end of
/// the shorter one.
fn truncate(ctx: &mut MergeContext<'_>, s: FaceId, d: FaceId) -> Result<(), MergeError> {
    let src_ext = detect_extrusion(ctx, &ctx.src, s)
        .ok_or_else(|| ctx.unsupported("src is not an extrusion of the shared face"))?;
    let dst_ext = detect_extrusion(ctx, &ctx.dst, d)
        .ok_or_else(|| ctx.unsupported("dst is not an extrusion of the shared face"))?;

    if !same_direction(&src_ext.vector, &dst_ext.vector) {
        return Err(ctx.unsupported("extrusions of the shared face diverge"));
    }
    let (src_len, dst_len) = (src_ext.vector.norm(), dst_ext.vector.norm());
    if (src_len - dst_len).abs() <= ctx.eps {
        return Err(ctx.unsupported("extrusions of the shared face have equal length"));
    }

    let src_is_short = src_len < dst_len;
    let short = if src_is_short { &src_ext } else { &dst_ext };
    // Without a cap the side edges may continue past the first ring.
    let Some(cap) = short.cap else {
        return Err(ctx.unsupported("shorter extrusion has no far cap"));
    };

    let positions = ctx.positions;
    let (long, long_base) = if src_is_short { (&mut ctx.dst, d) } else { (&mut ctx.src, s) };
    debug!(long = %long.role(), base = %long_base, "truncating longer extrusion");

    for &(base, far) in &short.ring {
        long.substitute_vertex(base, far, positions);
    }
    long.mark(long_base);

    let short_side = if src_is_short { &mut ctx.src } else { &mut ctx.dst };
    short_side.mark(cap);
    Ok(())
}
