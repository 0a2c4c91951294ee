//! Core mesh data structures.
//!
//! This module provides the indexed polygon mesh consumed and produced by the
//! merge engine.
//!
//! # Overview
//!
//! The primary type is [`PolyMesh`]: a vertex pool deduplicated by quantized
//! position, plus a list of [`Face`]s given as cyclic vertex-id loops. All
//! adjacency is expressed through indices, never references, so deleting or
//! rewriting faces cannot leave dangling links.
//!
//! # Index Types
//!
//! - [`VertexId`] - Identifies a vertex in the pool
//! - [`FaceId`] - Identifies a face by its position in the face list
//!
//! Face ids are not stable across deletions.
//!
//! # Construction
//!
//! ```
//! use meshweld::mesh::{mesh_from_vertex_face_lists, PolyMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2]];
//!
//! let mesh: PolyMesh = mesh_from_vertex_face_lists(&vertices, &faces).unwrap();
//! ```

mod builder;
mod index;
mod key;
mod polymesh;
mod vector;

pub use builder::{
    mesh_from_vertex_face_lists, mesh_from_vertex_face_lists_with_precision,
    mesh_to_vertex_face_lists, to_triangles,
};
pub use index::{FaceId, VertexId};
pub use key::{about_equal, EdgeKey, FaceKey, PositionKey, DEFAULT_PRECISION};
pub use polymesh::{face_normal, Face, PolyMesh};
pub use vector::{antiparallel, same_direction, vectors_equal};
