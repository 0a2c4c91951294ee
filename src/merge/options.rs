//! Options for merge calls.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Options for [`crate::merge::merge_with_options`].
#[derive(Debug, Default)]
pub struct MergeOptions {
    /// Golden-file capture of merge inputs and outputs. Disabled when `None`.
    pub capture: Option<CaptureConfig>,
}

impl MergeOptions {
    /// Options with every optional behavior disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable golden-file capture.
    pub fn with_capture(mut self, capture: CaptureConfig) -> Self {
        self.capture = Some(capture);
        self
    }

    /// The capture configuration, if one is set and enabled.
    pub(crate) fn active_capture(&self) -> Option<&CaptureConfig> {
        self.capture.as_ref().filter(|c| c.is_enabled())
    }
}

/// Where and under which name prefix merge snapshots are written.
///
/// Each captured merge gets a serial number; files are named
/// `<prefix>_<serial>_{dst,src,result}.obj`. The counter is atomic, so one
/// configuration can be shared by merges running on several threads.
#[derive(Debug)]
pub struct CaptureConfig {
    dir: PathBuf,
    prefix: String,
    counter: AtomicUsize,
}

impl CaptureConfig {
    /// Capture into `dir` with file names starting with `prefix`.
    /// An empty prefix disables capture.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            counter: AtomicUsize::new(0),
        }
    }

    /// Whether snapshots will be written.
    pub fn is_enabled(&self) -> bool {
        !self.prefix.is_empty()
    }

    /// Directory receiving the snapshots.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Path of the `stage` snapshot of merge number `serial`.
    pub fn path(&self, serial: usize, stage: &str) -> PathBuf {
        self.dir.join(format!("{}_{}_{}.obj", self.prefix, serial, stage))
    }

    pub(crate) fn next_serial(&self) -> usize {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}
