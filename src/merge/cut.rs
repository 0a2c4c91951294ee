//! Cutting a quad outline out of an existing face.
//!
//! A boundary loop that does not coincide with any face may still lie inside
//! one. Two shapes are recognized:
//!
//! - a *single cut*: the loop `(a, b, b', a')` shares edge `(a, b)` with a
//!   face and is the strip swept by moving that edge along `a' - a`. The face
//!   loses the strip.
//! - a *double cut*: the loop `(a, p, q, r)` is a parallelogram in the corner
//!   `a` of a face, with `p` and `r` on the face's two edges at `a`. The face
//!   loses the corner.
//!
//! Neighbors across the cut edges gain the new vertices so the mesh stays
//! conforming.

use nalgebra::{Point3, Vector3};

use super::side::Side;
use crate::error::MergeError;
use crate::mesh::{same_direction, vectors_equal, EdgeKey, Face, FaceId, VertexId};

/// What happens at one endpoint of a single cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CutEnd {
    /// The swept vertex is already the face's next vertex: drop the endpoint.
    Adjacent,
    /// The face continues past the swept vertex towards `far`.
    Extend { far: VertexId },
}

/// A strip to remove from face `face`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SingleCut {
    face: FaceId,
    a: VertexId,
    b: VertexId,
    a_swept: VertexId,
    b_swept: VertexId,
    a_end: CutEnd,
    b_end: CutEnd,
}

impl SingleCut {
    pub fn face(&self) -> FaceId {
        self.face
    }
}

/// A corner to remove from face `face`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DoubleCut {
    face: FaceId,
    corner: VertexId,
    prev: VertexId,
    next: VertexId,
    on_prev: VertexId,
    inner: VertexId,
    on_next: VertexId,
}

impl DoubleCut {
    pub fn face(&self) -> FaceId {
        self.face
    }
}

fn delta(positions: &[Point3<f64>], from: VertexId, to: VertexId) -> Vector3<f64> {
    positions[to.index()] - positions[from.index()]
}

/// Find a live face of `side` that `outline` can be cut from as a strip.
pub(crate) fn find_single_cut(
    side: &Side,
    outline: &[VertexId],
    positions: &[Point3<f64>],
    eps: f64,
) -> Option<SingleCut> {
    if outline.len() != 4 {
        return None;
    }
    for i in 0..4 {
        let (a, b) = (outline[i], outline[(i + 1) % 4]);
        let (b_swept, a_swept) = (outline[(i + 2) % 4], outline[(i + 3) % 4]);

        let sweep = delta(positions, a, a_swept);
        if sweep.norm() <= eps || !vectors_equal(&sweep, &delta(positions, b, b_swept), eps) {
            continue;
        }
        for f in side.live_faces_at_edge(EdgeKey::new(a, b)) {
            let face = side.face(f);
            let Some(a_end) = cut_end(face, a, b, a_swept, &sweep, positions, eps) else {
                continue;
            };
            let Some(b_end) = cut_end(face, b, a, b_swept, &sweep, positions, eps) else {
                continue;
            };
            if a_end == CutEnd::Adjacent && b_end == CutEnd::Adjacent {
                // The face is the outline itself.
                continue;
            }
            return Some(SingleCut {
                face: f,
                a,
                b,
                a_swept,
                b_swept,
                a_end,
                b_end,
            });
        }
    }
    None
}

/// How the face continues at `x`, the endpoint of cut edge `(x, partner)`.
fn cut_end(
    face: &Face,
    x: VertexId,
    partner: VertexId,
    swept: VertexId,
    sweep: &Vector3<f64>,
    positions: &[Point3<f64>],
    eps: f64,
) -> Option<CutEnd> {
    let (prev, next) = face.neighbors_of(x)?;
    let other = if prev == partner {
        next
    } else if next == partner {
        prev
    } else {
        return None;
    };
    if other == swept {
        return Some(CutEnd::Adjacent);
    }
    if face.contains(swept) {
        return None;
    }
    let run = delta(positions, x, other);
    (same_direction(&run, sweep) && run.norm() > sweep.norm() + eps).then_some(CutEnd::Extend { far: other })
}

/// Remove the strip described by `cut` from its face.
pub(crate) fn apply_single_cut(
    side: &mut Side,
    cut: &SingleCut,
    positions: &[Point3<f64>],
) -> Result<(), MergeError> {
    let f = cut.face;
    let expected = side.normal(f);
    let mut face = side.face(f).clone();
    for (x, swept, end) in [(cut.a, cut.a_swept, cut.a_end), (cut.b, cut.b_swept, cut.b_end)] {
        face.substitute(x, swept);
        if let CutEnd::Extend { far } = end {
            side.insert_vertex_on_edge(x, far, swept, f, positions);
        }
    }
    face.dedup_consecutive();
    let face = side.wind_like(f, face, &expected, positions)?;
    side.replace_face(f, face, positions);
    Ok(())
}

/// Find a live face of `side` that `outline` can be cut from as a corner.
pub(crate) fn find_double_cut(
    side: &Side,
    outline: &[VertexId],
    positions: &[Point3<f64>],
    eps: f64,
) -> Option<DoubleCut> {
    if outline.len() != 4 {
        return None;
    }
    for i in 0..4 {
        let corner = outline[i];
        let (p, q, r) = (outline[(i + 1) % 4], outline[(i + 2) % 4], outline[(i + 3) % 4]);
        if !side.index().has_vertex(corner) || [p, q, r].iter().any(|&v| side.index().has_vertex(v)) {
            continue;
        }
        let (to_p, to_r) = (delta(positions, corner, p), delta(positions, corner, r));
        if !vectors_equal(&delta(positions, corner, q), &(to_p + to_r), eps) {
            continue;
        }

        let inside = |leg: &Vector3<f64>, edge: &Vector3<f64>| {
            same_direction(leg, edge) && leg.norm() + eps < edge.norm()
        };
        for &f in side.index().faces_at_vertex(corner) {
            if side.index().is_marked(f) {
                continue;
            }
            let Some((prev, next)) = side.face(f).neighbors_of(corner) else {
                continue;
            };
            let (to_prev, to_next) = (delta(positions, corner, prev), delta(positions, corner, next));
            let legs = if inside(&to_p, &to_next) && inside(&to_r, &to_prev) {
                Some((r, p))
            } else if inside(&to_p, &to_prev) && inside(&to_r, &to_next) {
                Some((p, r))
            } else {
                None
            };
            if let Some((on_prev, on_next)) = legs {
                return Some(DoubleCut {
                    face: f,
                    corner,
                    prev,
                    next,
                    on_prev,
                    inner: q,
                    on_next,
                });
            }
        }
    }
    None
}

/// Remove the corner described by `cut` from its face.
pub(crate) fn apply_double_cut(
    side: &mut Side,
    cut: &DoubleCut,
    positions: &[Point3<f64>],
) -> Result<(), MergeError> {
    let f = cut.face;
    let expected = side.normal(f);
    let mut loop_ = Vec::with_capacity(side.face(f).len() + 2);
    for &v in side.face(f).vertices() {
        if v == cut.corner {
            loop_.extend([cut.on_prev, cut.inner, cut.on_next]);
        } else {
            loop_.push(v);
        }
    }
    let face = side.wind_like(f, Face::new(loop_), &expected, positions)?;

    side.insert_vertex_on_edge(cut.prev, cut.corner, cut.on_prev, f, positions);
    side.insert_vertex_on_edge(cut.corner, cut.next, cut.on_next, f, positions);
    side.replace_face(f, face, positions);
    Ok(())
}
