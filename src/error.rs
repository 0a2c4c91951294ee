//! Error types for meshweld.
//!
//! [`MeshError`] covers mesh construction and file I/O. [`MergeError`] is the
//! taxonomy reported by [`crate::merge::merge`] when a pair of meshes cannot be
//! combined.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::merge::Role;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building, loading or saving meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three distinct vertices.
    #[error("face {face} is degenerate (fewer than 3 distinct vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

/// Shape of the overlap between two meshes, attached to unsupported-topology
/// reports so the failing configuration can be reproduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SharedSignature {
    /// Number of vertices present on both sides.
    pub verts: usize,
    /// Number of edges present on both sides.
    pub edges: usize,
    /// Number of faces present on both sides.
    pub faces: usize,
    /// Bad-edge count of the src side.
    pub src_bad_edges: usize,
    /// Bad-edge count of the dst side.
    pub dst_bad_edges: usize,
}

impl fmt::Display for SharedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shared verts={} edges={} faces={}, bad edges src={} dst={}",
            self.verts, self.edges, self.faces, self.src_bad_edges, self.dst_bad_edges
        )
    }
}

/// Errors reported by the merge engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    /// The overlap between the two meshes has no merge strategy, or a
    /// strategy's precondition did not hold.
    #[error("unsupported topology: {reason} ({signature})")]
    UnsupportedTopology {
        /// What did not match.
        reason: String,
        /// Overlap shape at the time of the failure.
        signature: SharedSignature,
    },

    /// A rebuilt face could not be wound to match its expected normal.
    #[error("face {face} on {role} side cannot be wound to match its original normal")]
    OrientationInvariant {
        /// Side that owns the face.
        role: Role,
        /// Index of the face in that side's face list.
        face: usize,
    },

    /// The merged mesh has more bad edges than both inputs together.
    #[error("merge introduced non-manifold edges: {after} bad edges after, {before} before")]
    PostMergeInvariant {
        /// Bad edges of src and dst before the merge.
        before: usize,
        /// Bad edges of the merged mesh.
        after: usize,
    },
}

impl MergeError {
    /// Create an unsupported-topology error.
    pub fn unsupported(reason: impl Into<String>, signature: SharedSignature) -> Self {
        MergeError::UnsupportedTopology {
            reason: reason.into(),
            signature,
        }
    }

    /// Whether the caller may reasonably retry (for example with the operands
    /// swapped) or skip the merge.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MergeError::UnsupportedTopology { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_carries_signature() {
        let signature = SharedSignature {
            verts: 2,
            edges: 1,
            faces: 0,
            src_bad_edges: 4,
            dst_bad_edges: 0,
        };
        let err = MergeError::unsupported("no loop matched", signature);
        let msg = err.to_string();
        assert!(msg.contains("no loop matched"));
        assert!(msg.contains("edges=1"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invariant_errors_are_hard_failures() {
        let err = MergeError::PostMergeInvariant { before: 2, after: 5 };
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "merge introduced non-manifold edges: 5 bad edges after, 2 before"
        );
    }
}
