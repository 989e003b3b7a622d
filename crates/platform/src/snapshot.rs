//! Snapshot guild adapter.
//!
//! Serves a server's channels, categories, and message history from a JSON
//! snapshot instead of a live gateway connection. Used by the CLI and by
//! integration tests.
//!
//! ```json
//! {
//!   "name": "Puzzle Hunt",
//!   "filesize_limit": 8388608,
//!   "categories": [{ "id": 10, "name": "Round 1" }],
//!   "channels": [{
//!     "id": 11, "name": "meta", "category_id": 10,
//!     "messages": [{
//!       "timestamp": "2021-03-14T15:09:26Z",
//!       "author": "Alice",
//!       "content": "look",
//!       "attachments": [
//!         { "filename": "grid.png", "data_base64": "iVBORw0..." },
//!         { "filename": "notes.pdf", "path": "files/notes.pdf" }
//!       ]
//!     }]
//!   }]
//! }
//! ```
//!
//! Relative attachment paths resolve against the snapshot file's directory.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use chronicler_core::{
    Attachment, CategoryRef, ChannelId, ChannelRef, Directory, HistorySource, HistoryStream,
    Message, PlatformError,
};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct GuildRecord {
    name: String,
    #[serde(default)]
    filesize_limit: Option<u64>,
    #[serde(default)]
    categories: Vec<CategoryRecord>,
    #[serde(default)]
    channels: Vec<ChannelRecord>,
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    id: u64,
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
}

#[derive(Debug, Deserialize)]
struct ChannelRecord {
    id: u64,
    name: String,
    #[serde(default)]
    kind: ChannelKind,
    #[serde(default)]
    category_id: Option<u64>,
    /// Simulates missing read permission
    #[serde(default)]
    forbidden: bool,
    #[serde(default)]
    messages: Vec<MessageRecord>,
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    timestamp: DateTime<Utc>,
    author: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    attachments: Vec<AttachmentRecord>,
}

#[derive(Debug, Deserialize)]
struct AttachmentRecord {
    filename: String,
    #[serde(default)]
    data_base64: Option<String>,
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug)]
struct SnapshotChannel {
    channel: ChannelRef,
    kind: ChannelKind,
    category_id: Option<u64>,
    forbidden: bool,
    messages: Vec<Message>,
}

#[derive(Debug)]
struct SnapshotCategory {
    id: u64,
    name: String,
}

/// A server loaded from a JSON snapshot.
#[derive(Debug)]
pub struct SnapshotGuild {
    name: String,
    filesize_limit: Option<u64>,
    fallback_filesize_limit: u64,
    categories: Vec<SnapshotCategory>,
    channels: Vec<SnapshotChannel>,
}

/// Upload limit for servers without a boost tier.
pub const DEFAULT_FILESIZE_LIMIT: u64 = 8 * 1024 * 1024;

impl SnapshotGuild {
    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self, PlatformError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlatformError::Unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let guild = Self::from_json(&content, base_dir)?;
        info!(
            guild = %guild.name,
            channels = guild.channels.len(),
            categories = guild.categories.len(),
            "Snapshot guild loaded"
        );
        Ok(guild)
    }

    /// Parse a snapshot, resolving relative attachment paths against `base_dir`.
    pub fn from_json(json: &str, base_dir: &Path) -> Result<Self, PlatformError> {
        let record: GuildRecord =
            serde_json::from_str(json).map_err(|e| PlatformError::InvalidData(e.to_string()))?;

        let channels = record
            .channels
            .into_iter()
            .map(|c| convert_channel(c, base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: record.name,
            filesize_limit: record.filesize_limit,
            fallback_filesize_limit: DEFAULT_FILESIZE_LIMIT,
            categories: record
                .categories
                .into_iter()
                .map(|c| SnapshotCategory {
                    id: c.id,
                    name: c.name,
                })
                .collect(),
            channels,
        })
    }

    /// Limit to report when the snapshot doesn't record the server's own.
    pub fn with_fallback_filesize_limit(mut self, limit: u64) -> Self {
        self.fallback_filesize_limit = limit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn find_channel(&self, pred: impl Fn(&SnapshotChannel) -> bool) -> Option<ChannelRef> {
        self.channels
            .iter()
            .find(|c| pred(c))
            .map(|c| c.channel.clone())
    }

    fn category_ref(&self, cat: &SnapshotCategory) -> CategoryRef {
        CategoryRef {
            id: ChannelId(cat.id),
            name: cat.name.clone(),
            text_channels: self
                .channels
                .iter()
                .filter(|c| c.category_id == Some(cat.id) && c.kind == ChannelKind::Text)
                .map(|c| c.channel.clone())
                .collect(),
        }
    }
}

fn convert_channel(record: ChannelRecord, base_dir: &Path) -> Result<SnapshotChannel, PlatformError> {
    let mut messages = record
        .messages
        .into_iter()
        .map(|m| convert_message(m, base_dir))
        .collect::<Result<Vec<_>, _>>()?;
    // History is served oldest-first regardless of snapshot order
    messages.sort_by_key(|m| m.timestamp);

    Ok(SnapshotChannel {
        channel: ChannelRef::new(record.id, record.name),
        kind: record.kind,
        category_id: record.category_id,
        forbidden: record.forbidden,
        messages,
    })
}

fn convert_message(record: MessageRecord, base_dir: &Path) -> Result<Message, PlatformError> {
    let attachments = record
        .attachments
        .into_iter()
        .map(|a| convert_attachment(a, base_dir))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Message {
        timestamp: record.timestamp,
        author: record.author,
        content: record.content,
        attachments,
    })
}

fn convert_attachment(record: AttachmentRecord, base_dir: &Path) -> Result<Attachment, PlatformError> {
    match (record.data_base64, record.path) {
        (Some(data), None) => {
            let bytes = BASE64.decode(data.trim()).map_err(|e| {
                PlatformError::InvalidData(format!("attachment {}: {e}", record.filename))
            })?;
            Ok(Attachment::inline(record.filename, bytes))
        }
        (None, Some(path)) => {
            let path = if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            };
            Ok(Attachment::file(record.filename, path))
        }
        _ => Err(PlatformError::InvalidData(format!(
            "attachment {} needs exactly one of data_base64 or path",
            record.filename
        ))),
    }
}

impl HistorySource for SnapshotGuild {
    fn history<'a>(&'a self, channel: &'a ChannelRef) -> HistoryStream<'a> {
        let Some(found) = self.channels.iter().find(|c| c.channel.id == channel.id) else {
            return stream::once(async move { Err(PlatformError::NotFound(channel.to_string())) })
                .boxed();
        };
        if found.forbidden {
            return stream::once(async move {
                Err(PlatformError::Forbidden {
                    channel: channel.to_string(),
                })
            })
            .boxed();
        }
        stream::iter(found.messages.iter().cloned().map(Ok)).boxed()
    }
}

#[async_trait]
impl Directory for SnapshotGuild {
    async fn channel_by_name(&self, name: &str) -> Result<Option<ChannelRef>, PlatformError> {
        Ok(self.find_channel(|c| c.channel.name == name))
    }

    async fn channel_by_id(&self, id: ChannelId) -> Result<Option<ChannelRef>, PlatformError> {
        Ok(self.find_channel(|c| c.channel.id == id))
    }

    async fn category_by_name(&self, name: &str) -> Result<Option<CategoryRef>, PlatformError> {
        Ok(self
            .categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| self.category_ref(c)))
    }

    async fn category_by_id(&self, id: ChannelId) -> Result<Option<CategoryRef>, PlatformError> {
        Ok(self
            .categories
            .iter()
            .find(|c| c.id == id.0)
            .map(|c| self.category_ref(c)))
    }

    fn filesize_limit(&self) -> u64 {
        self.filesize_limit.unwrap_or(self.fallback_filesize_limit)
    }
}
