//! Platform traits — the seams between the archival pipeline and a chat SDK.
//!
//! A platform adapter implements some or all of these. The pipeline only
//! ever sees the traits.

use crate::channel::{CategoryRef, ChannelId, ChannelRef};
use crate::diagnostic::Notification;
use crate::error::PlatformError;
use crate::message::Message;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Lazy, single-pass, oldest-first message stream.
///
/// Each poll may suspend while the platform fetches the next page. Access
/// failures surface as a `PlatformError::Forbidden` item.
pub type HistoryStream<'a> = BoxStream<'a, Result<Message, PlatformError>>;

/// Source of channel history.
pub trait HistorySource: Send + Sync {
    /// The full, unbounded history of `channel`, oldest message first.
    fn history<'a>(&'a self, channel: &'a ChannelRef) -> HistoryStream<'a>;
}

/// Looks up channels and categories within one server.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn channel_by_name(&self, name: &str) -> Result<Option<ChannelRef>, PlatformError>;

    async fn channel_by_id(&self, id: ChannelId) -> Result<Option<ChannelRef>, PlatformError>;

    async fn category_by_name(&self, name: &str) -> Result<Option<CategoryRef>, PlatformError>;

    async fn category_by_id(&self, id: ChannelId) -> Result<Option<CategoryRef>, PlatformError>;

    /// Maximum file size (bytes) the bot may upload in this server.
    fn filesize_limit(&self) -> u64;
}

/// Delivers notifications back to the requesting user.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), PlatformError>;
}
