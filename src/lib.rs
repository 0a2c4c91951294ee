//! # Meshweld
//!
//! Manifold-preserving merge of polygon meshes.
//!
//! Procedural modeling pipelines build solids piece by piece: a box, an
//! extrusion on one of its faces, a second box against its side. Meshweld
//! joins such pieces into one mesh whose edges are each shared by exactly two
//! faces, removing the faces where the pieces touch and splitting faces where
//! one piece covers only part of another.
//!
//! ## Features
//!
//! - **Polygon meshes**: faces of any arity over a vertex pool deduplicated by position
//! - **Overlap classification**: seams, coplanar extrusions, open cups and
//!   folded flaps each get their own strategy
//! - **All or nothing**: a merge that cannot be completed leaves its destination untouched
//! - **File formats**: OBJ, STL, PLY
//! - **Golden-file capture**: optional snapshots of every merge for regression suites
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshweld::prelude::*;
//!
//! let mut body = meshweld::io::load("body.obj").unwrap();
//! let handle = meshweld::io::load("handle.obj").unwrap();
//!
//! let report = merge_with_options(&mut body, &handle, &MergeOptions::default()).unwrap();
//! println!("{} -> {} faces", report.strategy, report.num_faces);
//!
//! meshweld::io::save(&body, "welded.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use meshweld::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     vec![0, 2, 1], // bottom
//!     vec![0, 1, 3], // front
//!     vec![1, 2, 3], // right
//!     vec![2, 0, 3], // left
//! ];
//!
//! let mesh = mesh_from_vertex_face_lists(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert!(mesh.is_manifold());
//! ```
//!
//! ## Logging
//!
//! Classification decisions and rejected overlaps are reported through
//! [`tracing`] at `debug` and `warn` level. Install any subscriber to see them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod io;
pub mod merge;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use meshweld::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MergeError, MeshError, Result};
    pub use crate::merge::{merge, merge_with_options, CaptureConfig, MergeOptions, MergeReport, Strategy};
    pub use crate::mesh::{
        mesh_from_vertex_face_lists, mesh_to_vertex_face_lists, Face, FaceId, PolyMesh, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
