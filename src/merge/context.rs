//! State shared by the strategies during one merge call.

use nalgebra::Point3;

use super::shared::SharedGeometry;
use super::side::{Role, Side};
use crate::error::MergeError;
use crate::mesh::{Face, VertexId};

/// Both sides of a merge over one vertex pool.
///
/// `src` and `dst` name the roles the sides currently play; after a swap the
/// side built from the src input sits in `dst` and vice versa.
pub(crate) struct MergeContext<'a> {
    pub src: Side,
    pub dst: Side,
    pub positions: &'a [Point3<f64>],
    pub shared: SharedGeometry,
    /// Length below which two positions or vectors are considered equal.
    pub eps: f64,
    pub swapped: bool,
}

impl<'a> MergeContext<'a> {
    pub fn new(dst_faces: Vec<Face>, src_faces: Vec<Face>, positions: &'a [Point3<f64>], precision: u32) -> Self {
        let src = Side::new(Role::Src, src_faces, positions);
        let dst = Side::new(Role::Dst, dst_faces, positions);
        let shared = SharedGeometry::detect(&src, &dst);
        Self {
            src,
            dst,
            positions,
            shared,
            eps: 10f64.powi(-(precision as i32)),
            swapped: false,
        }
    }

    /// Exchange the roles of the two sides.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.src, &mut self.dst);
        self.shared = SharedGeometry::detect(&self.src, &self.dst);
        self.swapped = !self.swapped;
    }

    #[inline]
    pub fn position(&self, v: VertexId) -> Point3<f64> {
        self.positions[v.index()]
    }

    /// Bad edges of both sides together.
    pub fn bad_edge_total(&self) -> usize {
        self.src.bad_edge_count() + self.dst.bad_edge_count()
    }

    /// The side built from input `role`.
    pub fn side(&self, role: Role) -> &Side {
        if self.src.role() == role {
            &self.src
        } else {
            &self.dst
        }
    }

    /// The side built from input `role`, mutably.
    pub fn side_mut(&mut self, role: Role) -> &mut Side {
        if self.src.role() == role {
            &mut self.src
        } else {
            &mut self.dst
        }
    }

    /// An unsupported-topology error stamped with the current overlap shape.
    pub fn unsupported(&self, reason: impl Into<String>) -> MergeError {
        MergeError::unsupported(reason, self.shared.signature(&self.src, &self.dst))
    }

    /// Split into (side built from dst, side built from src).
    pub fn into_sides(self) -> (Side, Side) {
        if self.swapped {
            (self.src, self.dst)
        } else {
            (self.dst, self.src)
        }
    }
}
