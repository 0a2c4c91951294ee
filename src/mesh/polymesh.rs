//! Indexed polygon mesh.
//!
//! A [`PolyMesh`] owns a deduplicating vertex pool and a list of polygonal
//! faces. Every relationship between faces and vertices is an index into one
//! of the two lists; adjacency is derived on demand by
//! [`crate::merge::TopologyIndex`].

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, VertexId};
use super::key::{EdgeKey, FaceKey, PositionKey, DEFAULT_PRECISION};
use crate::merge::TopologyIndex;

/// A polygon given as a cyclic sequence of vertex ids.
///
/// The winding order determines the outward normal (counter-clockwise when
/// viewed from outside).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    vertices: Vec<VertexId>,
}

impl Face {
    /// Create a face from its vertex loop.
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self { vertices }
    }

    /// Create a face from raw vertex indices.
    pub fn from_indices(indices: &[usize]) -> Self {
        Self::new(indices.iter().map(|&i| VertexId::new(i)).collect())
    }

    /// The vertex loop.
    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Number of vertices (and edges).
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the face has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Directed edges in winding order, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
            .map(|(&a, &b)| (a, b))
    }

    /// Canonical keys of all edges.
    pub fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges().map(|(a, b)| EdgeKey::new(a, b))
    }

    /// Whether `v` is one of the face's vertices.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }

    /// Position of `v` in the loop.
    #[inline]
    pub fn position_of(&self, v: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&x| x == v)
    }

    /// Whether the face has an edge between `a` and `b` in either direction.
    pub fn has_edge(&self, key: EdgeKey) -> bool {
        self.edge_keys().any(|k| k == key)
    }

    /// The vertices before and after `v` in winding order.
    pub fn neighbors_of(&self, v: VertexId) -> Option<(VertexId, VertexId)> {
        let n = self.vertices.len();
        let i = self.position_of(v)?;
        Some((self.vertices[(i + n - 1) % n], self.vertices[(i + 1) % n]))
    }

    /// Key used to detect identical faces.
    pub fn key(&self) -> FaceKey {
        FaceKey::from_vertices(&self.vertices)
    }

    /// Whether `other` walks this loop, from any start and in either direction.
    pub fn same_loop(&self, other: &[VertexId]) -> bool {
        let n = self.vertices.len();
        if other.len() != n {
            return false;
        }
        let Some(&first) = other.first() else {
            return true;
        };
        let Some(start) = self.position_of(first) else {
            return false;
        };
        let forward = (0..n).all(|i| other[i] == self.vertices[(start + i) % n]);
        forward || (0..n).all(|i| other[i] == self.vertices[(start + n - i) % n])
    }

    /// The same loop with the opposite winding.
    pub fn reversed(&self) -> Face {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Face { vertices }
    }

    /// Replace every occurrence of `from` with `to`. Returns whether anything changed.
    pub fn substitute(&mut self, from: VertexId, to: VertexId) -> bool {
        let mut changed = false;
        for v in &mut self.vertices {
            if *v == from {
                *v = to;
                changed = true;
            }
        }
        changed
    }

    /// Insert `v` on the edge between `a` and `b` (either direction).
    /// Returns `false` if the face has no such edge.
    pub fn insert_between(&mut self, a: VertexId, b: VertexId, v: VertexId) -> bool {
        let n = self.vertices.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let (x, y) = (self.vertices[i], self.vertices[j]);
            if (x == a && y == b) || (x == b && y == a) {
                self.vertices.insert(i + 1, v);
                return true;
            }
        }
        false
    }

    /// Drop consecutive repeated vertices (including across the seam).
    pub(crate) fn dedup_consecutive(&mut self) {
        self.vertices.dedup();
        while self.vertices.len() > 1 && self.vertices.first() == self.vertices.last() {
            self.vertices.pop();
        }
    }
}

/// Normal of a polygon by Newell's method.
///
/// Robust to non-planar and concave loops. Returns the zero vector for
/// degenerate loops.
pub fn face_normal(vertices: &[VertexId], positions: &[Point3<f64>]) -> Vector3<f64> {
    let mut n = Vector3::zeros();
    let count = vertices.len();
    for i in 0..count {
        let p = positions[vertices[i].index()];
        let q = positions[vertices[(i + 1) % count].index()];
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// A polygon mesh over a deduplicated vertex pool.
#[derive(Debug, Clone)]
pub struct PolyMesh {
    /// Vertex positions, indexed by [`VertexId`].
    pub(crate) vertices: Vec<Point3<f64>>,

    /// Faces, indexed by [`FaceId`].
    pub(crate) faces: Vec<Face>,

    /// Quantized position to vertex id.
    lookup: HashMap<PositionKey, VertexId>,

    /// Decimal precision of the position keys.
    precision: u32,
}

impl Default for PolyMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl PolyMesh {
    /// Create a new empty mesh with the default key precision.
    pub fn new() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }

    /// Create an empty mesh whose vertices are deduplicated at `precision` decimals.
    pub fn with_precision(precision: u32) -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            lookup: HashMap::new(),
            precision,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Decimal precision of the positional keys.
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertices[v.index()]
    }

    /// All vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.index()]
    }

    /// All faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Compute the unit normal of a face.
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        face_normal(self.face(f).vertices(), &self.vertices)
    }

    /// Id of the vertex at `p`, if one rounds to the same key.
    pub fn find_vertex(&self, p: &Point3<f64>) -> Option<VertexId> {
        self.lookup.get(&PositionKey::new(p, self.precision)).copied()
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        let (mut min, mut max) = (first, first);
        for p in &self.vertices[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some((min, max))
    }

    /// Number of edges not bordered by exactly two faces.
    pub fn bad_edge_count(&self) -> usize {
        TopologyIndex::build(&self.faces, &self.vertices).bad_edge_count()
    }

    /// Whether every edge is bordered by exactly two faces.
    pub fn is_manifold(&self) -> bool {
        self.bad_edge_count() == 0
    }

    // ==================== Mutation ====================

    /// Add a vertex, returning the existing id if the position is already present.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let key = PositionKey::new(&position, self.precision);
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(position);
        self.lookup.insert(key, id);
        id
    }

    /// Append a face. Vertex ids are not validated here; use
    /// [`crate::mesh::mesh_from_vertex_face_lists`] for untrusted input.
    pub fn add_face(&mut self, face: Face) -> FaceId {
        let id = FaceId::new(self.faces.len());
        self.faces.push(face);
        id
    }

    pub(crate) fn take_faces(&mut self) -> Vec<Face> {
        std::mem::take(&mut self.faces)
    }

    pub(crate) fn set_faces(&mut self, faces: Vec<Face>) {
        self.faces = faces;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> PolyMesh {
        let mut mesh = PolyMesh::new();
        let ids: Vec<VertexId> = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
        .into_iter()
        .map(|p| mesh.add_vertex(p))
        .collect();
        mesh.add_face(Face::new(ids));
        mesh
    }

    #[test]
    fn test_add_vertex_deduplicates() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Point3::new(1.0, 2.0, 3.0));
        let b = mesh.add_vertex(Point3::new(1.000_000_1, 2.0, 3.0));
        let c = mesh.add_vertex(Point3::new(1.1, 2.0, 3.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(mesh.find_vertex(&Point3::new(1.1, 2.0, 3.0)), Some(c));
    }

    #[test]
    fn test_newell_normal_follows_winding() {
        let mesh = unit_square();
        let n = mesh.face_normal(FaceId::new(0));
        assert!((n - Vector3::z()).norm() < 1e-12);

        let flipped = mesh.face(FaceId::new(0)).reversed();
        let n = face_normal(flipped.vertices(), mesh.positions());
        assert!((n + Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_newell_normal_concave() {
        let mut mesh = PolyMesh::new();
        let ids: Vec<VertexId> = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(1.0, 0.5, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ]
        .into_iter()
        .map(|p| mesh.add_vertex(p))
        .collect();
        let n = face_normal(&ids, mesh.positions());
        assert!((n - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(2.0, 0.0, 0.0));
        assert_eq!(face_normal(&[a, b, c], mesh.positions()), Vector3::zeros());
    }

    #[test]
    fn test_face_editing() {
        let mut face = Face::from_indices(&[0, 1, 2, 3]);
        assert!(face.insert_between(VertexId::new(2), VertexId::new(1), VertexId::new(9)));
        assert_eq!(face, Face::from_indices(&[0, 1, 9, 2, 3]));
        assert!(face.insert_between(VertexId::new(3), VertexId::new(0), VertexId::new(8)));
        assert_eq!(face, Face::from_indices(&[0, 1, 9, 2, 3, 8]));
        assert!(!face.insert_between(VertexId::new(0), VertexId::new(2), VertexId::new(7)));

        assert!(face.substitute(VertexId::new(9), VertexId::new(5)));
        assert_eq!(
            face.neighbors_of(VertexId::new(0)),
            Some((VertexId::new(8), VertexId::new(1)))
        );
    }

    #[test]
    fn test_same_loop() {
        let face = Face::from_indices(&[0, 1, 2, 3]);
        let ids = |ix: &[usize]| ix.iter().map(|&i| VertexId::new(i)).collect::<Vec<_>>();
        assert!(face.same_loop(&ids(&[2, 3, 0, 1])));
        assert!(face.same_loop(&ids(&[1, 0, 3, 2])));
        // Same vertex set, crossed order.
        assert!(!face.same_loop(&ids(&[0, 2, 1, 3])));
        assert_eq!(face.key(), FaceKey::from_vertices(&ids(&[0, 2, 1, 3])));
        assert!(!face.same_loop(&ids(&[0, 1, 2])));
    }

    #[test]
    fn test_dedup_consecutive() {
        let mut face = Face::from_indices(&[0, 0, 1, 2, 2, 0]);
        face.dedup_consecutive();
        assert_eq!(face, Face::from_indices(&[0, 1, 2]));
    }

    #[test]
    fn test_open_square_is_not_manifold() {
        let mesh = unit_square();
        assert_eq!(mesh.bad_edge_count(), 4);
        assert!(!mesh.is_manifold());
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }
}
