//! One operand of a merge.
//!
//! Both operands go through the same code: a [`Side`] bundles a face list
//! with its [`TopologyIndex`] and a [`Role`] naming the input it came from.
//! The dispatcher swaps whole sides instead of duplicating logic per operand.

use std::fmt;

use nalgebra::{Point3, Vector3};

use super::topology::{delete_faces_highest_index_first, TopologyIndex};
use crate::error::MergeError;
use crate::mesh::{face_normal, same_direction, EdgeKey, Face, FaceId, VertexId};

/// Which input of the merge a side was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The mesh being merged in.
    Src,
    /// The mesh receiving the result.
    Dst,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Src => write!(f, "src"),
            Role::Dst => write!(f, "dst"),
        }
    }
}

/// A face list plus the adjacency derived from it.
#[derive(Debug, Clone)]
pub struct Side {
    role: Role,
    faces: Vec<Face>,
    index: TopologyIndex,
}

impl Side {
    /// Index `faces` over the shared vertex pool.
    pub fn new(role: Role, faces: Vec<Face>, positions: &[Point3<f64>]) -> Self {
        let index = TopologyIndex::build(&faces, positions);
        Self { role, faces, index }
    }

    /// Input this side was built from.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current faces, including those marked for deletion.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Face `f`.
    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.index()]
    }

    /// Derived adjacency.
    #[inline]
    pub fn index(&self) -> &TopologyIndex {
        &self.index
    }

    /// Number of faces, including those marked for deletion.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Whether the side has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Number of bad edges.
    #[inline]
    pub fn bad_edge_count(&self) -> usize {
        self.index.bad_edge_count()
    }

    /// Unit normal of face `f`.
    #[inline]
    pub fn normal(&self, f: FaceId) -> Vector3<f64> {
        self.index.normal(f)
    }

    /// Mark `f` for deletion at reassembly.
    pub fn mark(&mut self, f: FaceId) {
        self.index.mark(f);
    }

    /// Unmarked faces using edge `e`.
    pub fn live_faces_at_edge(&self, e: EdgeKey) -> Vec<FaceId> {
        self.index
            .faces_at_edge(e)
            .iter()
            .copied()
            .filter(|&f| !self.index.is_marked(f))
            .collect()
    }

    /// First unmarked face walking the vertex loop `outline`, from any start
    /// and in either direction.
    pub fn find_face(&self, outline: &[VertexId]) -> Option<FaceId> {
        self.faces
            .iter()
            .enumerate()
            .find(|(i, face)| !self.index.is_marked(FaceId::new(*i)) && face.same_loop(outline))
            .map(|(i, _)| FaceId::new(i))
    }

    // ==================== Editing ====================

    /// Replace face `f`, keeping the index in step.
    pub fn replace_face(&mut self, f: FaceId, face: Face, positions: &[Point3<f64>]) {
        let old = std::mem::replace(&mut self.faces[f.index()], face);
        self.index.unlink(f, &old);
        self.index.relink(f, &self.faces[f.index()], positions);
    }

    /// Insert `v` on edge `(a, b)` of every face using that edge except `skip`.
    /// Returns the faces that changed.
    pub fn insert_vertex_on_edge(
        &mut self,
        a: VertexId,
        b: VertexId,
        v: VertexId,
        skip: FaceId,
        positions: &[Point3<f64>],
    ) -> Vec<FaceId> {
        let targets: Vec<FaceId> = self
            .index
            .faces_at_edge(EdgeKey::new(a, b))
            .iter()
            .copied()
            .filter(|&g| g != skip)
            .collect();
        for &g in &targets {
            let mut face = self.face(g).clone();
            if face.insert_between(a, b, v) {
                self.replace_face(g, face, positions);
            }
        }
        targets
    }

    /// Re-point every face using `from` to `to`, which moves the vertex for
    /// this side only. Returns the number of faces changed.
    pub fn substitute_vertex(
        &mut self,
        from: VertexId,
        to: VertexId,
        positions: &[Point3<f64>],
    ) -> usize {
        let targets = self.index.faces_at_vertex(from).to_vec();
        for &g in &targets {
            let mut face = self.face(g).clone();
            face.substitute(from, to);
            face.dedup_consecutive();
            self.replace_face(g, face, positions);
        }
        targets.len()
    }

    /// Wind `candidate` so its normal matches `expected`: first as built, then
    /// reversed. Fails with [`MergeError::OrientationInvariant`] when neither
    /// winding matches; `f` names the face being rebuilt.
    pub fn wind_like(
        &self,
        f: FaceId,
        candidate: Face,
        expected: &Vector3<f64>,
        positions: &[Point3<f64>],
    ) -> Result<Face, MergeError> {
        if same_direction(&face_normal(candidate.vertices(), positions), expected) {
            return Ok(candidate);
        }
        let reversed = candidate.reversed();
        if same_direction(&face_normal(reversed.vertices(), positions), expected) {
            return Ok(reversed);
        }
        Err(MergeError::OrientationInvariant {
            role: self.role,
            face: f.index(),
        })
    }

    /// Consume the side, dropping marked faces highest index first.
    pub fn into_remaining_faces(self) -> Vec<Face> {
        let Side { mut faces, index, .. } = self;
        delete_faces_highest_index_first(&mut faces, index.marked());
        faces
    }
}
