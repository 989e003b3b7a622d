//! Deliverable archive artifacts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file produced by an archival run, ready to hand to a notification sink.
///
/// The path points into the run's staging area; the file is only guaranteed
/// to exist until the staging area is reset for the next channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveArtifact {
    /// Name the file should carry when delivered
    pub file_name: String,

    /// Location on disk
    pub path: PathBuf,

    /// Size in bytes; the authoritative deliverability signal
    pub size: u64,
}

impl ArchiveArtifact {
    pub fn new(file_name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            path: path.into(),
            size,
        }
    }

    /// Whether the artifact fits under `limit` bytes.
    pub fn fits(&self, limit: u64) -> bool {
        self.size <= limit
    }
}
