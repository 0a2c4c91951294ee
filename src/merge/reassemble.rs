//! Rebuilding the merged face list and checking it.

use nalgebra::Point3;
use tracing::warn;

use super::side::Side;
use super::topology::TopologyIndex;
use crate::error::MergeError;
use crate::mesh::Face;

/// Surviving faces of the dst-origin side followed by those of the
/// src-origin side.
pub(crate) fn reassemble(dst_origin: Side, src_origin: Side) -> Vec<Face> {
    let mut faces = dst_origin.into_remaining_faces();
    faces.extend(src_origin.into_remaining_faces());
    faces
}

/// Count bad edges of the merged faces and compare with the inputs.
///
/// A closed result is always accepted. An open result is accepted with a
/// warning as long as it is no worse than the inputs were together.
pub(crate) fn verify(faces: &[Face], positions: &[Point3<f64>], before: usize) -> Result<usize, MergeError> {
    let after = TopologyIndex::build(faces, positions).bad_edge_count();
    if after > before {
        return Err(MergeError::PostMergeInvariant { before, after });
    }
    if after > 0 {
        warn!(before, after, "merged mesh is not closed");
    }
    Ok(after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::fixtures::{box_mesh, open_box, TOP};
    use crate::merge::Role;
    use crate::mesh::FaceId;

    #[test]
    fn test_reassemble_drops_marked_faces_in_origin_order() {
        let dst = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let positions = dst.positions().to_vec();
        let mut dst_side = Side::new(Role::Dst, dst.faces().to_vec(), &positions);
        let src_side = Side::new(Role::Src, vec![Face::from_indices(&[4, 5, 6])], &positions);
        dst_side.mark(FaceId::new(TOP));

        let faces = reassemble(dst_side, src_side);
        assert_eq!(faces.len(), 6);
        assert_eq!(faces[5], Face::from_indices(&[4, 5, 6]));
        assert!(!faces.contains(&dst.faces()[TOP]));
    }

    #[test]
    fn test_verify_bounds_bad_edges() {
        let closed = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        assert_eq!(verify(closed.faces(), closed.positions(), 0), Ok(0));

        let open = open_box([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], &[TOP]);
        assert_eq!(verify(open.faces(), open.positions(), 4), Ok(4));
        assert_eq!(
            verify(open.faces(), open.positions(), 2),
            Err(MergeError::PostMergeInvariant { before: 2, after: 4 })
        );
    }
}
