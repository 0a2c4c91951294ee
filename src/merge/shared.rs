//! Detection of geometry present on both sides of a merge.
//!
//! Both sides index into one deduplicated vertex pool, so coincident vertices
//! already share an id. Shared edges are found by key alone; shared faces by
//! key, then by comparing their vertex loops.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::side::Side;
use crate::error::SharedSignature;
use crate::mesh::{EdgeKey, FaceId, FaceKey, VertexId};

/// Vertices, edges and faces common to src and dst.
#[derive(Debug, Clone, Default)]
pub struct SharedGeometry {
    /// Vertices used by faces on both sides.
    pub verts: BTreeSet<VertexId>,
    /// Edges used on both sides, with (src faces, dst faces).
    pub edges: BTreeMap<EdgeKey, (Vec<FaceId>, Vec<FaceId>)>,
    /// Faces with the same vertex loop on both sides, as (src face, dst face).
    pub faces: BTreeMap<FaceKey, (FaceId, FaceId)>,
}

impl SharedGeometry {
    /// Compare the live geometry of `src` and `dst`.
    pub fn detect(src: &Side, dst: &Side) -> Self {
        let verts = src
            .index()
            .vertices()
            .filter(|&v| dst.index().has_vertex(v))
            .collect();

        let mut edges = BTreeMap::new();
        for (e, src_faces) in src.index().edges() {
            let dst_faces = dst.index().faces_at_edge(e);
            if !dst_faces.is_empty() {
                edges.insert(e, (src_faces.to_vec(), dst_faces.to_vec()));
            }
        }

        let mut dst_keys: HashMap<FaceKey, Vec<FaceId>> = HashMap::new();
        for (i, face) in dst.faces().iter().enumerate() {
            dst_keys.entry(face.key()).or_default().push(FaceId::new(i));
        }
        let mut faces = BTreeMap::new();
        for (i, face) in src.faces().iter().enumerate() {
            let key = face.key();
            let Some(candidates) = dst_keys.get(&key) else {
                continue;
            };
            // Equal vertex sets in a different cyclic order are different faces.
            if let Some(&d) = candidates.iter().find(|&&d| dst.face(d).same_loop(face.vertices())) {
                faces.entry(key).or_insert((FaceId::new(i), d));
            }
        }

        SharedGeometry { verts, edges, faces }
    }

    /// Whether the two sides do not touch at all.
    pub fn is_disjoint(&self) -> bool {
        self.verts.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    /// Whether every shared vertex and edge lies on some shared face.
    pub fn explained_by_faces(&self, src: &Side) -> bool {
        if self.faces.is_empty() {
            return false;
        }
        let on_faces = |v: VertexId| self.faces.values().any(|&(s, _)| src.face(s).contains(v));
        let edge_on_faces =
            |e: EdgeKey| self.faces.values().any(|&(s, _)| src.face(s).has_edge(e));
        self.verts.iter().all(|&v| on_faces(v)) && self.edges.keys().all(|&e| edge_on_faces(e))
    }

    /// Counts for error reports.
    pub fn signature(&self, src: &Side, dst: &Side) -> SharedSignature {
        SharedSignature {
            verts: self.verts.len(),
            edges: self.edges.len(),
            faces: self.faces.len(),
            src_bad_edges: src.bad_edge_count(),
            dst_bad_edges: dst.bad_edge_count(),
        }
    }
}
