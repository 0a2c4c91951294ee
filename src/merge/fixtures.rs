//! Meshes shared by the merge unit tests.

use nalgebra::Point3;

use crate::mesh::{mesh_from_vertex_face_lists, PolyMesh};

/// Outward-wound quads of an axis-aligned box over the corners of
/// [`box_corners`]: bottom, top, y-min, x-max, y-max, x-min.
pub(crate) const BOX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
];

pub(crate) const BOTTOM: usize = 0;
pub(crate) const TOP: usize = 1;

/// Corners of the box `[min, max]`, bottom ring then top ring.
pub(crate) fn box_corners(min: [f64; 3], max: [f64; 3]) -> Vec<Point3<f64>> {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    vec![
        Point3::new(x0, y0, z0),
        Point3::new(x1, y0, z0),
        Point3::new(x1, y1, z0),
        Point3::new(x0, y1, z0),
        Point3::new(x0, y0, z1),
        Point3::new(x1, y0, z1),
        Point3::new(x1, y1, z1),
        Point3::new(x0, y1, z1),
    ]
}

/// Closed box.
pub(crate) fn box_mesh(min: [f64; 3], max: [f64; 3]) -> PolyMesh {
    open_box(min, max, &[])
}

/// Box with the faces at `missing` (indices into [`BOX_FACES`]) left out.
pub(crate) fn open_box(min: [f64; 3], max: [f64; 3], missing: &[usize]) -> PolyMesh {
    let faces: Vec<Vec<usize>> = BOX_FACES
        .iter()
        .enumerate()
        .filter(|(i, _)| !missing.contains(i))
        .map(|(_, f)| f.to_vec())
        .collect();
    mesh_from_vertex_face_lists(&box_corners(min, max), &faces).unwrap()
}

/// Build a mesh from explicit quads.
pub(crate) fn quads(vertices: &[[f64; 3]], faces: &[[usize; 4]]) -> PolyMesh {
    let vertices: Vec<Point3<f64>> = vertices.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect();
    let faces: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    mesh_from_vertex_face_lists(&vertices, &faces).unwrap()
}
