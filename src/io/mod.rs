//! Mesh file I/O.
//!
//! This module provides functions for loading and saving meshes in various formats.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Polygons; capture snapshots use it |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII; triangles only |
//! | PLY | `.ply` | ✓ | ✓ | Stanford polygon format |
//!
//! Loaded vertices are welded by position at the default key precision, so a
//! file that repeats a corner per face yields one shared vertex.
//!
//! # Usage
//!
//! The easiest way to load and save meshes is using the automatic format detection:
//!
//! ```no_run
//! use meshweld::io::{load, save};
//!
//! // Load with automatic format detection
//! let mesh = load("model.obj").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.stl").unwrap();
//! ```
//!
//! You can also use format-specific functions:
//!
//! ```no_run
//! use meshweld::io::obj;
//!
//! let mesh = obj::load("model.obj").unwrap();
//! obj::save(&mesh, "output.obj").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::PolyMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Example
///
/// ```no_run
/// use meshweld::io::load;
///
/// let mesh = load("model.obj").unwrap();
/// println!("{} faces", mesh.num_faces());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<PolyMesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
    }
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Example
///
/// ```no_run
/// use meshweld::io::save;
/// use meshweld::mesh::PolyMesh;
///
/// let mesh = PolyMesh::new();
/// save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}
