//! Merging one polygon mesh into another.
//!
//! # Overview
//!
//! [`merge`] welds a source mesh into a destination mesh that share a vertex
//! pool. The overlap between the two is classified and handed to one of a
//! small set of strategies, each of which deletes or rewrites faces so that
//! coincident geometry disappears and the surfaces join along their seam.
//!
//! | Overlap | Strategy |
//! |---|---|
//! | none | [`Strategy::Concatenate`] |
//! | closed meshes sharing whole faces | [`Strategy::ExtrusionPair`] |
//! | open cup against a closed mesh | [`Strategy::OpenExtrusion`] |
//! | open meshes sharing one edge | [`Strategy::EdgeStitch`] |
//! | open meshes sharing edges of one face each | [`Strategy::DominantFaces`] |
//!
//! Every overlap the strategies do not recognize is reported as
//! [`MergeError::UnsupportedTopology`](crate::error::MergeError) and leaves
//! the destination untouched.
//!
//! # Example
//!
//! ```
//! use meshweld::merge::{merge_with_options, MergeOptions, Strategy};
//! use meshweld::mesh::mesh_from_vertex_face_lists;
//! use nalgebra::Point3;
//!
//! let square = |x: f64| {
//!     let vertices = vec![
//!         Point3::new(x, 0.0, 0.0),
//!         Point3::new(x + 1.0, 0.0, 0.0),
//!         Point3::new(x + 1.0, 1.0, 0.0),
//!         Point3::new(x, 1.0, 0.0),
//!     ];
//!     mesh_from_vertex_face_lists(&vertices, &[vec![0, 1, 2, 3]]).unwrap()
//! };
//!
//! let mut dst = square(0.0);
//! let report = merge_with_options(&mut dst, &square(5.0), &MergeOptions::default()).unwrap();
//! assert_eq!(report.strategy, Strategy::Concatenate);
//! assert_eq!(dst.num_faces(), 2);
//! ```

mod capture;
mod context;
mod cut;
mod dispatch;
mod extrusion;
mod options;
mod pair;
mod reassemble;
mod shared;
mod side;
mod stitch;
mod topology;

#[cfg(test)]
pub(crate) mod fixtures;

pub use dispatch::{merge, merge_with_options, MergeReport, Strategy};
pub use options::{CaptureConfig, MergeOptions};
pub use shared::SharedGeometry;
pub use side::{Role, Side};
pub use topology::{delete_faces_highest_index_first, TopologyIndex};
