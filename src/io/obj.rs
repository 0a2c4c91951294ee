//! Wavefront OBJ format support.
//!
//! Only geometry is read: `v` and `f` records. Texture coordinates, normals,
//! groups and materials are ignored. Faces keep their polygon arity.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{mesh_from_vertex_face_lists, PolyMesh};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use meshweld::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<PolyMesh> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let (vertices, faces) = parse(reader).map_err(|message| MeshError::LoadError {
        path: path.to_path_buf(),
        message,
    })?;
    mesh_from_vertex_face_lists(&vertices, &faces)
}

/// Parse `v` and `f` records. Errors carry the offending line number.
///
/// A file without faces is a valid empty mesh.
fn parse<R: BufRead>(reader: R) -> std::result::Result<(Vec<Point3<f64>>, Vec<Vec<usize>>), String> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        let lineno = n + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut coord = || -> std::result::Result<f64, String> {
                    parts
                        .next()
                        .ok_or_else(|| format!("line {lineno}: vertex needs three coordinates"))?
                        .parse()
                        .map_err(|e| format!("line {lineno}: {e}"))
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                vertices.push(Point3::new(x, y, z));
            }
            Some("f") => {
                let face = parts
                    .map(|token| resolve_index(token, vertices.len()).ok_or_else(|| format!("line {lineno}: bad face index {token:?}")))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                if face.len() < 3 {
                    return Err(format!("line {lineno}: face needs at least three vertices"));
                }
                faces.push(face);
            }
            _ => {}
        }
    }

    Ok((vertices, faces))
}

/// Zero-based vertex index of a face token such as `7`, `7/1/3` or `-1`.
fn resolve_index(token: &str, num_vertices: usize) -> Option<usize> {
    let index: i64 = token.split('/').next()?.parse().ok()?;
    match index {
        i if i > 0 => Some(i as usize - 1),
        i if i < 0 => num_vertices.checked_sub(i.unsigned_abs() as usize),
        _ => None,
    }
}

/// Save a mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use meshweld::io::obj;
/// use meshweld::mesh::PolyMesh;
///
/// let mesh = PolyMesh::new();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write<W: Write>(mesh: &PolyMesh, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "# meshweld")?;
    for p in mesh.positions() {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for face in mesh.faces() {
        write!(out, "f")?;
        // OBJ is 1-based
        for v in face.vertices() {
            write!(out, " {}", v.index() + 1)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_AND_TRIANGLE: &str = "\
# comment
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
f 1/1 2/1 3/1 4/1
f -4 -2 -1
";

    #[test]
    fn test_parse_keeps_polygons() {
        let (vertices, faces) = parse(SQUARE_AND_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(vertices.len(), 4);
        assert_eq!(faces, vec![vec![0, 1, 2, 3], vec![0, 2, 3]]);
    }

    #[test]
    fn test_parse_reports_line() {
        let err = parse("v 0 0 0\nv 1 0\nf 1 2 3\n".as_bytes()).unwrap_err();
        assert!(err.starts_with("line 2"), "{err}");

        let err = parse("v 0 0 0\nf 1 2 9\n".as_bytes());
        assert!(err.is_ok(), "index range is checked when the mesh is built");
        assert!(parse("v 0 0 0\nf 1 0 1\n".as_bytes()).is_err());
    }

    #[test]
    fn test_write_then_parse() {
        let (vertices, faces) = parse(SQUARE_AND_TRIANGLE.as_bytes()).unwrap();
        let mesh = mesh_from_vertex_face_lists(&vertices, &faces).unwrap();
        let mut buf = Vec::new();
        write(&mesh, &mut buf).unwrap();

        let (vertices2, faces2) = parse(buf.as_slice()).unwrap();
        assert_eq!(vertices2, vertices);
        assert_eq!(faces2, faces);
    }

    #[test]
    fn test_parse_without_faces() {
        let (vertices, faces) = parse("# meshweld\nv 0 0 0\n".as_bytes()).unwrap();
        assert_eq!(vertices.len(), 1);
        assert!(faces.is_empty());

        let (vertices, faces) = parse("".as_bytes()).unwrap();
        assert!(vertices.is_empty() && faces.is_empty());
    }
}
