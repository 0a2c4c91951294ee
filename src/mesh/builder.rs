//! Mesh construction utilities.
//!
//! This module converts between [`PolyMesh`] and plain vertex/face lists, the
//! representation used by interchange formats and by callers that evaluate
//! node graphs.

use nalgebra::Point3;

use super::index::VertexId;
use super::polymesh::{Face, PolyMesh};
use crate::error::{MeshError, Result};

/// Build a mesh from vertex positions and polygon faces.
///
/// Positions that round to the same key are merged into one vertex and the
/// face indices are remapped accordingly.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of polygons, each a cyclic list of indices into `vertices`
///
/// # Returns
/// A mesh, or an error if a face references a missing vertex or has fewer
/// than three distinct vertices after deduplication.
///
/// # Example
/// ```
/// use meshweld::mesh::mesh_from_vertex_face_lists;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh = mesh_from_vertex_face_lists(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn mesh_from_vertex_face_lists(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
) -> Result<PolyMesh> {
    build_into(PolyMesh::new(), vertices, faces)
}

/// Like [`mesh_from_vertex_face_lists`], with an explicit key precision.
pub fn mesh_from_vertex_face_lists_with_precision(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
    precision: u32,
) -> Result<PolyMesh> {
    build_into(PolyMesh::with_precision(precision), vertices, faces)
}

fn build_into(mut mesh: PolyMesh, vertices: &[Point3<f64>], faces: &[Vec<usize>]) -> Result<PolyMesh> {
    // Validate vertex indices
    for (fi, face) in faces.iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
    }

    let remap: Vec<VertexId> = vertices.iter().map(|&p| mesh.add_vertex(p)).collect();

    for (fi, face) in faces.iter().enumerate() {
        let mut face = Face::new(face.iter().map(|&vi| remap[vi]).collect());
        face.dedup_consecutive();
        let mut distinct = face.vertices().to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        mesh.add_face(face);
    }

    Ok(mesh)
}

/// Convert a mesh to vertex positions and polygon index lists.
pub fn mesh_to_vertex_face_lists(mesh: &PolyMesh) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices = mesh.positions().to_vec();
    let faces = mesh
        .faces()
        .iter()
        .map(|f| f.vertices().iter().map(|v| v.index()).collect())
        .collect();
    (vertices, faces)
}

/// Fan-triangulate every face, for formats that only store triangles.
pub fn to_triangles(mesh: &PolyMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = mesh.positions().to_vec();
    let mut triangles = Vec::with_capacity(mesh.num_faces() * 2);
    for face in mesh.faces() {
        let v = face.vertices();
        for i in 1..v.len().saturating_sub(1) {
            triangles.push([v[0].index(), v[i].index(), v[i + 1].index()]);
        }
    }
    (vertices, triangles)
}
