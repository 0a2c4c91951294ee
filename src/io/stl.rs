//! STL (stereolithography) format support.
//!
//! STL stores triangles only. Loaded triangles are welded by position; saved
//! polygons are fan-triangulated.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{about_equal, mesh_from_vertex_face_lists, to_triangles, PolyMesh, DEFAULT_PRECISION};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse
/// when their corners are welded are skipped.
///
/// # Example
///
/// ```no_run
/// use meshweld::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<PolyMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertices: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(stl.faces.len());
    let mut skipped = 0;
    for tri in &stl.faces {
        let [i0, i1, i2] = tri.vertices;
        let same = |a: usize, b: usize| about_equal(&vertices[a], &vertices[b], DEFAULT_PRECISION);
        if same(i0, i1) || same(i1, i2) || same(i0, i2) {
            skipped += 1;
            continue;
        }
        faces.push(vec![i0, i1, i2]);
    }
    if skipped > 0 {
        debug!(path = %path.display(), skipped, "skipped degenerate STL triangles");
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    mesh_from_vertex_face_lists(&vertices, &faces)
}

/// Save a mesh to a binary STL file.
///
/// # Example
///
/// ```no_run
/// use meshweld::io::stl;
/// use meshweld::mesh::PolyMesh;
///
/// let mesh = PolyMesh::new();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_triangles(mesh);

    let triangles: Vec<stl_io::Triangle> = faces
        .iter()
        .map(|f| {
            let p0 = &vertices[f[0]];
            let p1 = &vertices[f[1]];
            let p2 = &vertices[f[2]];

            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(nalgebra::Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
