//! Message and attachment domain types.
//!
//! Messages flow out of a [`HistorySource`](crate::platform::HistorySource)
//! oldest-first and are consumed exactly once by the transcript writer.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// A single message from a channel's history.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// When the message was posted
    pub timestamp: DateTime<Utc>,

    /// Author display name (nickname if set)
    pub author: String,

    /// Plain-text content with mentions already rendered
    pub content: String,

    /// Attachments in the order the platform lists them
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Create a message with no attachments.
    pub fn text(
        timestamp: DateTime<Utc>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    /// Builder-style helper to attach a file.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Filename as uploaded; may collide with other attachments
    pub filename: String,

    /// Where the binary content lives
    pub content: AttachmentContent,
}

/// Reference to an attachment's binary content.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentContent {
    /// Bytes already held in memory
    Inline(Vec<u8>),
    /// A file on local disk (e.g. a platform cache)
    File(PathBuf),
}

impl Attachment {
    pub fn inline(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: AttachmentContent::Inline(data.into()),
        }
    }

    pub fn file(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            content: AttachmentContent::File(path.into()),
        }
    }

    /// Write the content to `dest`, returning the number of bytes written.
    ///
    /// `dest` is created or truncated; callers are responsible for picking a
    /// path that doesn't clobber anything they care about.
    pub async fn save(&self, dest: &Path) -> std::io::Result<u64> {
        match &self.content {
            AttachmentContent::Inline(data) => {
                tokio::fs::write(dest, data).await?;
                Ok(data.len() as u64)
            }
            AttachmentContent::File(src) => tokio::fs::copy(src, dest).await,
        }
    }
}
