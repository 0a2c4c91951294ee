//! Classification of the overlap and strategy dispatch.

use std::fmt;

use tracing::{debug, warn};

use super::capture;
use super::context::MergeContext;
use super::options::MergeOptions;
use super::reassemble::{reassemble, verify};
use super::{extrusion, pair, stitch};
use crate::error::MergeError;
use crate::mesh::{Face, PolyMesh, VertexId};

/// How a merge joined its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The meshes did not touch; faces were appended.
    Concatenate,
    /// Shared faces were removed as seams or an extrusion was truncated.
    ExtrusionPair,
    /// An open cup was welded onto faces of a closed mesh.
    OpenExtrusion,
    /// Two open meshes were stitched along their single shared edge.
    EdgeStitch,
    /// Two open meshes were stitched around one main face each.
    DominantFaces,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Concatenate => "concatenate",
            Strategy::ExtrusionPair => "extrusion pair",
            Strategy::OpenExtrusion => "open extrusion",
            Strategy::EdgeStitch => "edge stitch",
            Strategy::DominantFaces => "dominant faces",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Strategy that produced the result.
    pub strategy: Strategy,
    /// Whether the operands swapped roles during classification.
    pub swapped: bool,
    /// Bad edges of both inputs together.
    pub bad_edges_before: usize,
    /// Bad edges of the result.
    pub bad_edges_after: usize,
    /// Vertices in the merged mesh.
    pub num_vertices: usize,
    /// Faces in the merged mesh.
    pub num_faces: usize,
}

/// Merge `src` into `dst` with default options.
///
/// See [`merge_with_options`]. On error `dst` is left exactly as it was.
///
/// # Example
///
/// ```
/// use meshweld::merge::merge;
/// use meshweld::mesh::mesh_from_vertex_face_lists;
/// use nalgebra::Point3;
///
/// let corners = |z0: f64, z1: f64| {
///     let mut v = Vec::new();
///     for z in [z0, z1] {
///         v.extend([
///             Point3::new(0.0, 0.0, z),
///             Point3::new(1.0, 0.0, z),
///             Point3::new(1.0, 1.0, z),
///             Point3::new(0.0, 1.0, z),
///         ]);
///     }
///     v
/// };
/// let faces = vec![
///     vec![0, 3, 2, 1],
///     vec![4, 5, 6, 7],
///     vec![0, 1, 5, 4],
///     vec![1, 2, 6, 5],
///     vec![2, 3, 7, 6],
///     vec![3, 0, 4, 7],
/// ];
///
/// let mut dst = mesh_from_vertex_face_lists(&corners(0.0, 1.0), &faces).unwrap();
/// let src = mesh_from_vertex_face_lists(&corners(1.0, 2.0), &faces).unwrap();
///
/// merge(&mut dst, &src).unwrap();
/// assert_eq!(dst.num_faces(), 10);
/// assert!(dst.is_manifold());
/// ```
pub fn merge(dst: &mut PolyMesh, src: &PolyMesh) -> Result<(), MergeError> {
    merge_with_options(dst, src, &MergeOptions::default()).map(|_| ())
}

/// Merge `src` into `dst`, reporting how.
///
/// `src` is not modified. Its vertices are welded into the vertex pool of
/// `dst` by position, the overlap between the two face sets is classified
/// and resolved, and the merged faces replace those of `dst`. On error `dst`
/// is left exactly as it was.
pub fn merge_with_options(
    dst: &mut PolyMesh,
    src: &PolyMesh,
    options: &MergeOptions,
) -> Result<MergeReport, MergeError> {
    let captured = options
        .active_capture()
        .map(|config| (config, capture::snapshot_inputs(config, dst, src)));

    let snapshot = dst.clone();
    match run(dst, src) {
        Ok(report) => {
            debug!(
                strategy = %report.strategy,
                swapped = report.swapped,
                faces = report.num_faces,
                vertices = report.num_vertices,
                "merge complete"
            );
            if let Some((config, serial)) = captured {
                capture::snapshot_result(config, serial, dst);
            }
            Ok(report)
        }
        Err(e) => {
            *dst = snapshot;
            warn!(error = %e, "merge failed, destination unchanged");
            Err(e)
        }
    }
}

fn run(dst: &mut PolyMesh, src: &PolyMesh) -> Result<MergeReport, MergeError> {
    let src_faces = absorb(dst, src);
    let dst_faces = dst.take_faces();
    let precision = dst.precision();

    let (faces, mut report) = {
        let positions = dst.positions();
        let mut ctx = MergeContext::new(dst_faces, src_faces, positions, precision);
        let before = ctx.bad_edge_total();
        let strategy = resolve(&mut ctx)?;
        let swapped = ctx.swapped;

        let (dst_origin, src_origin) = ctx.into_sides();
        let faces = reassemble(dst_origin, src_origin);
        let after = verify(&faces, positions, before)?;
        let report = MergeReport {
            strategy,
            swapped,
            bad_edges_before: before,
            bad_edges_after: after,
            num_vertices: 0,
            num_faces: faces.len(),
        };
        (faces, report)
    };

    dst.set_faces(faces);
    report.num_vertices = dst.num_vertices();
    Ok(report)
}

/// Weld the vertices of `src` into the pool of `dst` and return the faces of
/// `src` re-indexed into that pool. Faces that collapse are dropped.
fn absorb(dst: &mut PolyMesh, src: &PolyMesh) -> Vec<Face> {
    let remap: Vec<VertexId> = src.positions().iter().map(|&p| dst.add_vertex(p)).collect();
    src.faces()
        .iter()
        .enumerate()
        .filter_map(|(i, face)| {
            let mut welded = Face::new(face.vertices().iter().map(|v| remap[v.index()]).collect());
            welded.dedup_consecutive();
            if welded.len() < 3 {
                warn!(face = i, "src face collapses when welded into dst, dropping it");
                return None;
            }
            Some(welded)
        })
        .collect()
}

/// Pick and run the strategy for the overlap in `ctx`.
fn resolve(ctx: &mut MergeContext<'_>) -> Result<Strategy, MergeError> {
    if ctx.shared.is_disjoint() {
        return Ok(Strategy::Concatenate);
    }

    let src_open = !ctx.src.index().is_manifold();
    let dst_open = !ctx.dst.index().is_manifold();
    debug!(
        src_open,
        dst_open,
        shared_verts = ctx.shared.verts.len(),
        shared_edges = ctx.shared.edges.len(),
        shared_faces = ctx.shared.faces.len(),
        "classifying overlap"
    );

    match (src_open, dst_open) {
        (false, false) => {
            if ctx.src.num_faces() > ctx.dst.num_faces() {
                ctx.swap();
            }
            if !ctx.shared.explained_by_faces(&ctx.src) {
                return Err(ctx.unsupported("closed meshes touch outside of shared faces"));
            }
            pair::merge(ctx)?;
            Ok(Strategy::ExtrusionPair)
        }
        (true, false) | (false, true) => {
            if dst_open {
                ctx.swap();
            }
            extrusion::merge(ctx)?;
            Ok(Strategy::OpenExtrusion)
        }
        (true, true) => match ctx.shared.edges.len() {
            0 => Err(ctx.unsupported("open meshes touch only at vertices")),
            1 => {
                stitch::single_edge(ctx)?;
                Ok(Strategy::EdgeStitch)
            }
            _ if ctx.shared.explained_by_faces(&ctx.src) => {
                pair::merge(ctx)?;
                Ok(Strategy::ExtrusionPair)
            }
            _ => {
                stitch::dominant_faces(ctx)?;
                Ok(Strategy::DominantFaces)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::fixtures::{box_mesh, open_box, BOTTOM};

    #[test]
    fn test_disjoint_meshes_concatenate() {
        let mut dst = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let src = box_mesh([3.0, 0.0, 0.0], [4.0, 1.0, 1.0]);
        let report = merge_with_options(&mut dst, &src, &MergeOptions::default()).unwrap();
        assert_eq!(report.strategy, Strategy::Concatenate);
        assert_eq!((dst.num_vertices(), dst.num_faces()), (16, 12));
    }

    #[test]
    fn test_open_dst_is_swapped() {
        let mut dst = open_box([0.0, 0.0, 1.0], [1.0, 1.0, 2.0], &[BOTTOM]);
        let src = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let report = merge_with_options(&mut dst, &src, &MergeOptions::default()).unwrap();
        assert_eq!(report.strategy, Strategy::OpenExtrusion);
        assert!(report.swapped);
        assert_eq!(report.bad_edges_before, 4);
        assert_eq!(report.bad_edges_after, 0);
        assert_eq!(dst.num_faces(), 10);
    }

    #[test]
    fn test_failed_merge_leaves_dst_unchanged() {
        let mut dst = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        // Shares one edge only.
        let src = box_mesh([1.0, 1.0, 0.0], [2.0, 2.0, 1.0]);
        let before = dst.clone();

        let err = merge(&mut dst, &src).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(dst.faces(), before.faces());
        assert_eq!(dst.num_vertices(), before.num_vertices());
    }

    #[test]
    fn test_collapsed_src_face_is_dropped() {
        let mut coarse = PolyMesh::with_precision(2);
        let mut fine = PolyMesh::with_precision(8);
        let ids: Vec<VertexId> = [[0.0, 0.0, 0.0], [0.001, 0.0, 0.0], [1.0, 1.0, 0.0]]
            .into_iter()
            .map(|[x, y, z]| fine.add_vertex(nalgebra::Point3::new(x, y, z)))
            .collect();
        fine.add_face(Face::new(ids));
        assert!(absorb(&mut coarse, &fine).is_empty());
    }
}
