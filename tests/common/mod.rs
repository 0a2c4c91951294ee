//! Mesh builders shared by the integration tests.

#![allow(dead_code)]

use meshweld::error::MergeError;
use meshweld::merge::{merge_with_options, MergeOptions, MergeReport};
use meshweld::mesh::{mesh_from_vertex_face_lists, PolyMesh};
use nalgebra::Point3;

/// Faces of an axis-aligned box, outward wound.
pub const BOX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // bottom
    [4, 5, 6, 7], // top
    [0, 1, 5, 4], // y-min
    [1, 2, 6, 5], // x-max
    [2, 3, 7, 6], // y-max
    [3, 0, 4, 7], // x-min
];

pub const BOTTOM: usize = 0;
pub const TOP: usize = 1;

pub fn box_corners(min: [f64; 3], max: [f64; 3]) -> Vec<Point3<f64>> {
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

/// Merge with default options, keeping the report.
pub fn weld(dst: &mut PolyMesh, src: &PolyMesh) -> Result<MergeReport, MergeError> {
    merge_with_options(dst, src, &MergeOptions::default())
}

/// Closed box spanning `min` to `max`.
pub fn cuboid(min: [f64; 3], max: [f64; 3]) -> PolyMesh {
    open_cuboid(min, max, &[])
}

/// Box without the faces listed in `missing`.
pub fn open_cuboid(min: [f64; 3], max: [f64; 3], missing: &[usize]) -> PolyMesh {
    let faces: Vec<Vec<usize>> = BOX_FACES
        .iter()
        .enumerate()
        .filter(|(i, _)| !missing.contains(i))
        .map(|(_, f)| f.to_vec())
        .collect();
    mesh_from_vertex_face_lists(&box_corners(min, max), &faces).unwrap()
}

/// Sum of face areas. Faces are assumed planar.
pub fn surface_area(mesh: &PolyMesh) -> f64 {
    mesh.faces()
        .iter()
        .map(|f| {
            let v = f.vertices();
            let twice_area = (0..v.len()).fold(nalgebra::Vector3::zeros(), |acc, i| {
                let p = mesh.position(v[i]).coords;
                let q = mesh.position(v[(i + 1) % v.len()]).coords;
                acc + p.cross(&q)
            });
            0.5 * twice_area.norm()
        })
        .sum()
}
