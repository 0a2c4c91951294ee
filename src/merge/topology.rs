//! Per-side adjacency derived from a face list.
//!
//! A [`TopologyIndex`] maps vertices and edges to the faces that use them and
//! keeps the set of edges whose incident face count is not two. It is a view:
//! it owns no geometry and must be rebuilt, or edited through
//! [`crate::merge::Side`], whenever the face list changes.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::{Point3, Vector3};

use crate::mesh::{face_normal, EdgeKey, Face, FaceId, VertexId};

/// Adjacency of one face list.
#[derive(Debug, Clone, Default)]
pub struct TopologyIndex {
    /// Unit normal per face.
    normals: Vec<Vector3<f64>>,

    /// Faces using each vertex, ascending.
    vertex_faces: BTreeMap<VertexId, Vec<FaceId>>,

    /// Faces using each edge, one entry per occurrence.
    edge_faces: BTreeMap<EdgeKey, Vec<FaceId>>,

    /// Edges with an incident face count other than two.
    bad_edges: BTreeSet<EdgeKey>,

    /// Faces pending deletion.
    marked: BTreeSet<FaceId>,
}

impl TopologyIndex {
    /// Build the index of `faces` in one pass over their edges.
    ///
    /// Any face list is accepted, including degenerate ones.
    pub fn build(faces: &[Face], positions: &[Point3<f64>]) -> Self {
        let mut index = TopologyIndex {
            normals: Vec::with_capacity(faces.len()),
            ..Default::default()
        };
        for (i, face) in faces.iter().enumerate() {
            index.normals.push(face_normal(face.vertices(), positions));
            index.link(FaceId::new(i), face);
        }
        index.bad_edges = index
            .edge_faces
            .iter()
            .filter(|(_, faces)| faces.len() != 2)
            .map(|(&e, _)| e)
            .collect();
        index
    }

    // ==================== Queries ====================

    /// Unit normal of face `f`.
    #[inline]
    pub fn normal(&self, f: FaceId) -> Vector3<f64> {
        self.normals[f.index()]
    }

    /// Number of indexed faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.normals.len()
    }

    /// Faces using vertex `v`.
    pub fn faces_at_vertex(&self, v: VertexId) -> &[FaceId] {
        self.vertex_faces.get(&v).map_or(&[][..], Vec::as_slice)
    }

    /// Faces using edge `e`.
    pub fn faces_at_edge(&self, e: EdgeKey) -> &[FaceId] {
        self.edge_faces.get(&e).map_or(&[][..], Vec::as_slice)
    }

    /// Whether any face uses `v`.
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.vertex_faces.contains_key(&v)
    }

    /// Vertices used by at least one face, ascending.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_faces.keys().copied()
    }

    /// All edges with their incident faces, in key order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &[FaceId])> + '_ {
        self.edge_faces.iter().map(|(&e, f)| (e, f.as_slice()))
    }

    /// Edges not bordered by exactly two faces.
    pub fn bad_edges(&self) -> &BTreeSet<EdgeKey> {
        &self.bad_edges
    }

    /// Number of bad edges.
    #[inline]
    pub fn bad_edge_count(&self) -> usize {
        self.bad_edges.len()
    }

    /// Whether every edge is bordered by exactly two faces.
    #[inline]
    pub fn is_manifold(&self) -> bool {
        self.bad_edges.is_empty()
    }

    /// Faces touching at least one bad edge.
    pub fn bad_faces(&self) -> BTreeSet<FaceId> {
        self.bad_edges
            .iter()
            .flat_map(|e| self.faces_at_edge(*e).iter().copied())
            .collect()
    }

    /// Faces pending deletion.
    pub fn marked(&self) -> &BTreeSet<FaceId> {
        &self.marked
    }

    /// Whether `f` is pending deletion.
    #[inline]
    pub fn is_marked(&self, f: FaceId) -> bool {
        self.marked.contains(&f)
    }

    // ==================== Maintenance ====================

    /// Mark `f` for deletion at reassembly.
    pub fn mark(&mut self, f: FaceId) {
        self.marked.insert(f);
    }

    /// Drop every reference `face` (stored at `f`) contributes.
    pub(crate) fn unlink(&mut self, f: FaceId, face: &Face) {
        for &v in face.vertices() {
            if let Some(list) = self.vertex_faces.get_mut(&v) {
                list.retain(|&x| x != f);
                if list.is_empty() {
                    self.vertex_faces.remove(&v);
                }
            }
        }
        for e in face.edge_keys() {
            if let Some(list) = self.edge_faces.get_mut(&e) {
                if let Some(pos) = list.iter().position(|&x| x == f) {
                    list.remove(pos);
                }
            }
            self.refresh_edge(e);
        }
    }

    /// Add the references of `face` stored at `f` and recompute its normal.
    pub(crate) fn relink(&mut self, f: FaceId, face: &Face, positions: &[Point3<f64>]) {
        self.normals[f.index()] = face_normal(face.vertices(), positions);
        self.link(f, face);
        for e in face.edge_keys() {
            self.refresh_edge(e);
        }
    }

    fn link(&mut self, f: FaceId, face: &Face) {
        for &v in face.vertices() {
            let list = self.vertex_faces.entry(v).or_default();
            if !list.contains(&f) {
                list.push(f);
                list.sort_unstable();
            }
        }
        for e in face.edge_keys() {
            self.edge_faces.entry(e).or_default().push(f);
        }
    }

    fn refresh_edge(&mut self, e: EdgeKey) {
        match self.edge_faces.get(&e).map(Vec::len) {
            None | Some(0) => {
                self.edge_faces.remove(&e);
                self.bad_edges.remove(&e);
            }
            Some(2) => {
                self.bad_edges.remove(&e);
            }
            Some(_) => {
                self.bad_edges.insert(e);
            }
        }
    }
}

/// Remove the `marked` faces from `faces`, highest index first, so that no
/// removal shifts a face that is still waiting to be removed.
///
/// Any index built over `faces` is stale afterwards.
pub fn delete_faces_highest_index_first(faces: &mut Vec<Face>, marked: &BTreeSet<FaceId>) {
    for f in marked.iter().rev() {
        if f.index() < faces.len() {
            faces.remove(f.index());
        }
    }
}
