//! Vector comparisons used when matching edges and faces across meshes.

use nalgebra::Vector3;

/// Cosine threshold for two unit vectors to count as the same direction.
const DIRECTION_TOLERANCE: f64 = 1e-6;

/// Whether `u` and `v` point the same way. Zero vectors never match.
pub fn same_direction(u: &Vector3<f64>, v: &Vector3<f64>) -> bool {
    match (u.try_normalize(f64::EPSILON), v.try_normalize(f64::EPSILON)) {
        (Some(u), Some(v)) => u.dot(&v) >= 1.0 - DIRECTION_TOLERANCE,
        _ => false,
    }
}

/// Whether unit normals `n` and `m` are antiparallel.
pub fn antiparallel(n: &Vector3<f64>, m: &Vector3<f64>) -> bool {
    same_direction(n, &-m)
}

/// Whether `u` and `v` have the same direction and magnitude within `eps`.
pub fn vectors_equal(u: &Vector3<f64>, v: &Vector3<f64>, eps: f64) -> bool {
    (u - v).norm() <= eps
}
