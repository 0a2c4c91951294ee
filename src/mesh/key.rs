//! Hashable keys for vertices, edges and faces.
//!
//! Positions are compared by quantizing each coordinate to a fixed number of
//! decimals. Edges and faces are keyed by vertex ids so they can be matched
//! across the two sides of a merge once both share one vertex pool.

use nalgebra::Point3;

use super::index::VertexId;

/// Number of decimals kept by [`PositionKey`] unless a mesh overrides it.
pub const DEFAULT_PRECISION: u32 = 5;

/// A position rounded to a fixed decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey([i64; 3]);

impl PositionKey {
    /// Quantize `p` to `precision` decimals.
    pub fn new(p: &Point3<f64>, precision: u32) -> Self {
        let scale = 10f64.powi(precision as i32);
        // Casting folds -0.0 into 0.
        let q = |c: f64| (c * scale).round() as i64;
        PositionKey([q(p.x), q(p.y), q(p.z)])
    }
}

/// Whether two points round to the same key.
pub fn about_equal(a: &Point3<f64>, b: &Point3<f64>, precision: u32) -> bool {
    PositionKey::new(a, precision) == PositionKey::new(b, precision)
}

/// An undirected edge, smaller vertex first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(VertexId, VertexId);

impl EdgeKey {
    /// Canonicalize the edge between `a` and `b`.
    #[inline]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }

    /// Endpoints, smaller first.
    #[inline]
    pub fn vertices(self) -> (VertexId, VertexId) {
        (self.0, self.1)
    }

    /// Whether `v` is an endpoint.
    #[inline]
    pub fn contains(self, v: VertexId) -> bool {
        self.0 == v || self.1 == v
    }

    /// The endpoint that is not `v`.
    #[inline]
    pub fn other(self, v: VertexId) -> VertexId {
        if self.0 == v {
            self.1
        } else {
            self.0
        }
    }
}

/// Sorted vertex set of a face or loop.
///
/// Loops with equal keys can still visit their vertices in a different
/// order; [`Face::same_loop`](crate::mesh::Face::same_loop) tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey(Vec<VertexId>);

impl FaceKey {
    /// Build the key of a vertex loop.
    pub fn from_vertices(vertices: &[VertexId]) -> Self {
        let mut ids = vertices.to_vec();
        ids.sort_unstable();
        FaceKey(ids)
    }

    /// Number of vertices in the keyed loop.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
