//! Per-run scratch space.
//!
//! Layout under `root`:
//!
//! ```text
//! root/
//! ├── .chronicler-staging           <- ownership marker
//! ├── content/                      <- everything in here is zipped
//! │   ├── <channel>_<suffix>        <- transcript
//! │   └── <attachments_dir>/        <- deduplicated attachments
//! └── <channel>_archive.zip
//! ```
//!
//! The zip lives outside `content/` so packaging never sees its own output.
//!
//! `reset` only wipes a root that is missing, empty, or carries the marker.

use crate::error::{ArchiveError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const CONTENT_DIR: &str = "content";
const MARKER: &str = ".chronicler-staging";

/// File naming inside a staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    /// Transcript suffix: `<channel>_<suffix>`
    pub text_log_suffix: String,
    /// Attachment subdirectory name
    pub attachments_dir: String,
}

impl Default for StagingLayout {
    fn default() -> Self {
        Self {
            text_log_suffix: "text_log.txt".into(),
            attachments_dir: "images".into(),
        }
    }
}

/// Handle to one run's staging directory.
///
/// Exclusively owned by a single archiver; two archivers must never share a
/// root.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
    layout: StagingLayout,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>, layout: StagingLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory whose full contents go into the zip.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join(CONTENT_DIR)
    }

    pub fn attachments_dir(&self) -> PathBuf {
        self.content_dir().join(&self.layout.attachments_dir)
    }

    pub fn transcript_name(&self, channel_name: &str) -> String {
        format!(
            "{}_{}",
            file_safe(channel_name),
            self.layout.text_log_suffix
        )
    }

    pub fn transcript_path(&self, channel_name: &str) -> PathBuf {
        self.content_dir().join(self.transcript_name(channel_name))
    }

    pub fn archive_name(&self, channel_name: &str) -> String {
        format!("{}_archive.zip", file_safe(channel_name))
    }

    pub fn archive_path(&self, channel_name: &str) -> PathBuf {
        self.root.join(self.archive_name(channel_name))
    }

    /// Wipe everything under `root` and recreate the empty layout.
    ///
    /// Fails with [`ArchiveError::ForeignStaging`] if `root` holds files but
    /// was never set up by `reset`.
    pub async fn reset(&self) -> Result<()> {
        self.ensure_owned().await?;

        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ArchiveError::io(&self.root, e)),
        }

        let attachments = self.attachments_dir();
        tokio::fs::create_dir_all(&attachments)
            .await
            .map_err(|e| ArchiveError::io(&attachments, e))?;

        let marker = self.root.join(MARKER);
        tokio::fs::write(&marker, b"")
            .await
            .map_err(|e| ArchiveError::io(&marker, e))?;

        debug!(root = %self.root.display(), "Staging area reset");
        Ok(())
    }

    async fn ensure_owned(&self) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(ArchiveError::io(&self.root, e)),
        };

        let marker = self.root.join(MARKER);
        let marked = tokio::fs::try_exists(&marker)
            .await
            .map_err(|e| ArchiveError::io(&marker, e))?;
        let empty = entries
            .next_entry()
            .await
            .map_err(|e| ArchiveError::io(&self.root, e))?
            .is_none();

        if marked || empty {
            Ok(())
        } else {
            Err(ArchiveError::ForeignStaging {
                path: self.root.clone(),
            })
        }
    }
}

/// Channel names come from the platform; keep them from escaping the
/// staging directory.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}
