//! End-to-end merges of boxes, cups and flaps.

mod common;

use std::collections::BTreeSet;

use common::{cuboid, open_cuboid, surface_area, weld, BOTTOM};
use meshweld::error::MergeError;
use meshweld::merge::{merge, Strategy};
use meshweld::mesh::{mesh_from_vertex_face_lists, PolyMesh};
use nalgebra::Point3;

/// Faces as sorted sets of rounded corner coordinates, independent of ids.
fn face_shapes(mesh: &PolyMesh) -> BTreeSet<Vec<[i64; 3]>> {
    mesh.faces()
        .iter()
        .map(|f| {
            let mut corners: Vec<[i64; 3]> = f
                .vertices()
                .iter()
                .map(|&v| {
                    let p = mesh.position(v);
                    [p.x, p.y, p.z].map(|c| (c * 1000.0).round() as i64)
                })
                .collect();
            corners.sort_unstable();
            corners
        })
        .collect()
}

#[test]
fn test_boxes_sharing_a_face_become_one_solid() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let src = cuboid([0.0, 0.0, 1.0], [1.0, 1.0, 2.0]);

    let report = weld(&mut dst, &src).unwrap();
    assert_eq!(report.strategy, Strategy::ExtrusionPair);
    assert_eq!(dst.num_faces(), 10);
    assert_eq!(dst.num_vertices(), 12);
    assert!(dst.is_manifold());
    assert!((surface_area(&dst) - 10.0).abs() < 1e-9);
}

#[test]
fn test_coplanar_extrusions_truncate_the_longer_one() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 2.0]);
    let src = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);

    let report = weld(&mut dst, &src).unwrap();
    assert_eq!(report.strategy, Strategy::ExtrusionPair);
    assert_eq!(dst.num_faces(), 10);
    assert_eq!(dst.num_vertices(), 12);
    assert!(dst.is_manifold());
    // Same outer surface as the tall box, with the side walls split at z = 1.
    assert!((surface_area(&dst) - 10.0).abs() < 1e-9);
}

#[test]
fn test_disjoint_boxes_are_concatenated() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let src = cuboid([2.0, 0.0, 0.0], [3.0, 1.0, 1.0]);

    let report = weld(&mut dst, &src).unwrap();
    assert_eq!(report.strategy, Strategy::Concatenate);
    assert_eq!(dst.num_faces(), 12);
    assert_eq!(dst.num_vertices(), 16);
    assert!(dst.is_manifold());
}

#[test]
fn test_merging_an_empty_mesh_changes_nothing() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let before = face_shapes(&dst);

    let report = weld(&mut dst, &PolyMesh::new()).unwrap();
    assert_eq!(report.strategy, Strategy::Concatenate);
    assert_eq!(face_shapes(&dst), before);
    assert_eq!(dst.num_vertices(), 8);

    let mut empty = PolyMesh::new();
    merge(&mut empty, &dst).unwrap();
    assert_eq!(face_shapes(&empty), before);
}

#[test]
fn test_merge_order_does_not_change_the_shape() {
    let cases = [
        (cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]), cuboid([0.0, 0.0, 1.0], [1.0, 1.0, 2.0])),
        (cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 2.0]), cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])),
        (cuboid([0.0, 0.0, 0.0], [2.0, 1.0, 1.0]), open_cuboid([0.0, 0.0, 1.0], [1.0, 1.0, 2.0], &[BOTTOM])),
    ];
    for (a, b) in cases {
        let mut ab = a.clone();
        merge(&mut ab, &b).unwrap();
        let mut ba = b.clone();
        merge(&mut ba, &a).unwrap();

        assert_eq!(ab.num_vertices(), ba.num_vertices());
        assert_eq!(face_shapes(&ab), face_shapes(&ba));
    }
}

#[test]
fn test_cup_on_matching_top() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let cup = open_cuboid([0.0, 0.0, 1.0], [1.0, 1.0, 2.0], &[BOTTOM]);

    let report = weld(&mut dst, &cup).unwrap();
    assert_eq!(report.strategy, Strategy::OpenExtrusion);
    assert_eq!(report.bad_edges_before, 4);
    assert_eq!(report.bad_edges_after, 0);
    assert_eq!(dst.num_faces(), 10);
    assert!(dst.is_manifold());
}

#[test]
fn test_cup_on_part_of_an_edge_strip() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
    let cup = open_cuboid([0.0, 0.0, 1.0], [1.0, 1.0, 2.0], &[BOTTOM]);

    let report = weld(&mut dst, &cup).unwrap();
    assert_eq!(report.strategy, Strategy::OpenExtrusion);
    assert_eq!(dst.num_faces(), 11);
    assert_eq!(dst.num_vertices(), 14);
    assert!(dst.is_manifold());
    assert!((surface_area(&dst) - 14.0).abs() < 1e-9);
}

#[test]
fn test_cup_in_a_corner() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 1.0]);
    let cup = open_cuboid([0.0, 0.0, 1.0], [1.0, 1.0, 2.0], &[BOTTOM]);

    let report = weld(&mut dst, &cup).unwrap();
    assert_eq!(report.strategy, Strategy::OpenExtrusion);
    assert_eq!(dst.num_faces(), 11);
    assert!(dst.is_manifold());
    assert!((surface_area(&dst) - 20.0).abs() < 1e-9);
}

#[test]
fn test_cup_hanging_over_the_edge_is_rejected() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let cup = open_cuboid([0.0, 0.0, 1.0], [2.0, 1.0, 2.0], &[BOTTOM]);
    let before = face_shapes(&dst);

    let err = merge(&mut dst, &cup).unwrap_err();
    assert!(matches!(err, MergeError::UnsupportedTopology { .. }));
    assert_eq!(face_shapes(&dst), before);
    assert_eq!(dst.num_vertices(), 8);
}

#[test]
fn test_boxes_touching_along_an_edge_are_rejected() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let src = cuboid([1.0, 1.0, 0.0], [2.0, 2.0, 1.0]);

    match merge(&mut dst, &src) {
        Err(MergeError::UnsupportedTopology { signature, .. }) => {
            assert_eq!(signature.edges, 1);
            assert_eq!(signature.verts, 2);
            assert_eq!(signature.faces, 0);
        }
        other => panic!("expected unsupported topology, got {other:?}"),
    }
    assert_eq!(dst.num_faces(), 6);
}

#[test]
fn test_open_sheets_stitched_along_one_edge() {
    let sheet = |x0: f64, x1: f64, wall: [usize; 4], height: f64| {
        let vertices = [
            [x0, 0.0, 0.0],
            [x1, 0.0, 0.0],
            [x1, 1.0, 0.0],
            [x0, 1.0, 0.0],
            [1.0, 0.0, height],
            [1.0, 1.0, height],
        ]
        .map(|[x, y, z]| Point3::new(x, y, z));
        mesh_from_vertex_face_lists(&vertices, &[vec![0, 1, 2, 3], wall.to_vec()]).unwrap()
    };
    let mut dst = sheet(0.0, 1.0, [1, 2, 5, 4], 1.0);
    let src = sheet(1.0, 2.0, [0, 4, 5, 3], 2.0);

    let report = weld(&mut dst, &src).unwrap();
    assert_eq!(report.strategy, Strategy::EdgeStitch);
    assert_eq!(dst.num_faces(), 3);
    assert!(report.bad_edges_after < report.bad_edges_before);
    // The remaining wall spans z = 1 to z = 2.
    assert!((surface_area(&dst) - 3.0).abs() < 1e-9);
}

#[test]
fn test_truncation_needs_the_shorter_cap() {
    // Two stacked boxes leave a column whose walls are split at z = 1 with
    // no face closing that ring.
    let mut column = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    weld(&mut column, &cuboid([0.0, 0.0, 1.0], [1.0, 1.0, 3.0])).unwrap();
    assert_eq!(column.num_faces(), 10);
    let before = face_shapes(&column);

    let err = weld(&mut column, &cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 2.0])).unwrap_err();
    assert!(
        matches!(err, MergeError::UnsupportedTopology { ref reason, .. } if reason.contains("no far cap")),
        "{err:?}"
    );
    assert!(err.is_recoverable());
    assert_eq!(face_shapes(&column), before);
    assert_eq!(column.num_vertices(), 12);
}

#[test]
fn test_one_bad_cup_rejects_the_whole_merge() {
    let mut dst = cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    weld(&mut dst, &cuboid([3.0, 0.0, 0.0], [4.0, 1.0, 1.0])).unwrap();
    let before = face_shapes(&dst);
    let vertices = dst.num_vertices();

    // The first cup fits its box top, the second hangs past the other one.
    let mut cups = open_cuboid([0.0, 0.0, 1.0], [1.0, 1.0, 2.0], &[BOTTOM]);
    weld(&mut cups, &open_cuboid([3.0, 0.0, 1.0], [5.0, 1.0, 2.0], &[BOTTOM])).unwrap();

    match weld(&mut dst, &cups) {
        Err(MergeError::UnsupportedTopology { reason, .. }) => {
            assert!(reason.contains("1 of 2 boundary loops"), "{reason}");
        }
        other => panic!("expected unsupported topology, got {other:?}"),
    }
    assert_eq!(face_shapes(&dst), before);
    assert_eq!(dst.num_vertices(), vertices);
}
