//! Error types for the archival pipeline.

use chronicler_core::PlatformError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a single channel's archival run.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// History retrieval failed (including access denied)
    #[error("History read failed: {0}")]
    Platform(#[from] PlatformError),

    /// I/O error against a specific path in the staging area
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refused to wipe a directory that isn't ours
    #[error("Refusing to reset {}: directory is not empty and is not a staging area", path.display())]
    ForeignStaging { path: PathBuf },

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Blocking packaging task panicked or was cancelled
    #[error("Packaging task failed: {0}")]
    Task(String),
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the run failed because history access was denied.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ArchiveError::Platform(e) if e.is_forbidden())
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
