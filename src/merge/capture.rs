//! Golden-file snapshots of merge operands and results.
//!
//! Capture never changes the outcome of a merge: write failures are logged
//! and otherwise ignored.

use tracing::{debug, warn};

use super::options::CaptureConfig;
use crate::io::obj;
use crate::mesh::PolyMesh;

/// Write the two operands and return the serial number of this merge.
pub(crate) fn snapshot_inputs(config: &CaptureConfig, dst: &PolyMesh, src: &PolyMesh) -> usize {
    let serial = config.next_serial();
    write(config, serial, "dst", dst);
    write(config, serial, "src", src);
    serial
}

/// Write the merged mesh of merge `serial`.
pub(crate) fn snapshot_result(config: &CaptureConfig, serial: usize, result: &PolyMesh) {
    write(config, serial, "result", result);
}

fn write(config: &CaptureConfig, serial: usize, stage: &str, mesh: &PolyMesh) {
    let path = config.path(serial, stage);
    match obj::save(mesh, &path) {
        Ok(()) => debug!(path = %path.display(), "captured merge snapshot"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to capture merge snapshot"),
    }
}
