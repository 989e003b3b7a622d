//! Archive commands — `archivechannel` and `archivecategory`.
//!
//! Each takes one positional identifier: a channel/category name, a
//! `<#id>` mention, or a bare numeric id. Names are tried first.

use chronicler_archive::{ChannelArchiver, ChannelReport};
use chronicler_core::{
    CategoryRef, ChannelId, ChannelRef, Diagnostic, Directory, HistorySource, Notification,
    NotificationSink, PlatformError, TargetKind,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Which archive command to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ArchiveChannel,
    ArchiveCategory,
}

impl Command {
    /// Look up a command by its chat name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "archivechannel" => Some(Command::ArchiveChannel),
            "archivecategory" => Some(Command::ArchiveCategory),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::ArchiveChannel => "archivechannel",
            Command::ArchiveCategory => "archivecategory",
        }
    }

    fn target(&self) -> TargetKind {
        match self {
            Command::ArchiveChannel => TargetKind::Channel,
            Command::ArchiveCategory => TargetKind::Category,
        }
    }
}

/// What a command invocation did.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Stopped before archiving anything
    Rejected(Diagnostic),
    /// One report per channel attempted
    Archived(Vec<ChannelReport>),
}

/// Parse `<#123>` or `123` into a channel id.
pub fn parse_channel_id(query: &str) -> Option<ChannelId> {
    let trimmed = query.trim();
    let inner = trimmed
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(trimmed);
    inner.parse().ok().map(ChannelId)
}

pub async fn resolve_channel(
    directory: &dyn Directory,
    query: &str,
) -> Result<Option<ChannelRef>, PlatformError> {
    if let Some(channel) = directory.channel_by_name(query).await? {
        return Ok(Some(channel));
    }
    match parse_channel_id(query) {
        Some(id) => directory.channel_by_id(id).await,
        None => Ok(None),
    }
}

pub async fn resolve_category(
    directory: &dyn Directory,
    query: &str,
) -> Result<Option<CategoryRef>, PlatformError> {
    if let Some(category) = directory.category_by_name(query).await? {
        return Ok(Some(category));
    }
    match parse_channel_id(query) {
        Some(id) => directory.category_by_id(id).await,
        None => Ok(None),
    }
}

/// Binds the platform collaborators to an archiver and runs commands.
pub struct ArchiveCommands {
    directory: Arc<dyn Directory>,
    history: Arc<dyn HistorySource>,
    sink: Arc<dyn NotificationSink>,
    archiver: ChannelArchiver,
    size_limit: Option<u64>,
}

impl ArchiveCommands {
    pub fn new(
        directory: Arc<dyn Directory>,
        history: Arc<dyn HistorySource>,
        sink: Arc<dyn NotificationSink>,
        archiver: ChannelArchiver,
    ) -> Self {
        Self {
            directory,
            history,
            sink,
            archiver,
            size_limit: None,
        }
    }

    /// Override the server's upload limit.
    pub fn with_size_limit(mut self, limit: Option<u64>) -> Self {
        self.size_limit = limit;
        self
    }

    /// The limit in force for this invocation.
    pub fn size_limit(&self) -> u64 {
        self.size_limit
            .unwrap_or_else(|| self.directory.filesize_limit())
    }

    /// Run `command` with its positional arguments. Only the first is used.
    pub async fn execute(&mut self, command: Command, args: &[String]) -> CommandOutcome {
        info!(command = command.name(), args = ?args, "Received command");
        let Some(query) = args.first() else {
            return self
                .reject(Diagnostic::MissingArgument {
                    target: command.target(),
                })
                .await;
        };

        match command {
            Command::ArchiveChannel => self.archive_channel(query).await,
            Command::ArchiveCategory => self.archive_category(query).await,
        }
    }

    async fn archive_channel(&mut self, query: &str) -> CommandOutcome {
        let channel = match resolve_channel(self.directory.as_ref(), query).await {
            Ok(Some(channel)) => channel,
            Ok(None) => return self.reject(not_found(TargetKind::Channel, query)).await,
            Err(e) => {
                warn!(query, error = %e, "Channel lookup failed");
                return self.reject(not_found(TargetKind::Channel, query)).await;
            }
        };

        self.notify(Diagnostic::ArchiveStarted {
            target: channel.mention(),
        })
        .await;

        let limit = self.size_limit();
        let report = self
            .archiver
            .run_channel(self.history.as_ref(), self.sink.as_ref(), &channel, limit)
            .await;
        CommandOutcome::Archived(vec![report])
    }

    async fn archive_category(&mut self, query: &str) -> CommandOutcome {
        let category = match resolve_category(self.directory.as_ref(), query).await {
            Ok(Some(category)) => category,
            Ok(None) => return self.reject(not_found(TargetKind::Category, query)).await,
            Err(e) => {
                warn!(query, error = %e, "Category lookup failed");
                return self.reject(not_found(TargetKind::Category, query)).await;
            }
        };

        self.notify(Diagnostic::ArchiveStarted {
            target: category.mention(),
        })
        .await;

        let limit = self.size_limit();
        let reports = self
            .archiver
            .run_category(self.history.as_ref(), self.sink.as_ref(), &category, limit)
            .await;
        CommandOutcome::Archived(reports)
    }

    async fn reject(&self, diagnostic: Diagnostic) -> CommandOutcome {
        self.notify(diagnostic.clone()).await;
        CommandOutcome::Rejected(diagnostic)
    }

    async fn notify(&self, diagnostic: Diagnostic) {
        if let Err(e) = self.sink.send(&Notification::diagnostic(diagnostic)).await {
            warn!(error = %e, "Failed to send notice");
        }
    }
}

fn not_found(target: TargetKind, query: &str) -> Diagnostic {
    Diagnostic::NotFound {
        target,
        query: query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotGuild;
    use async_trait::async_trait;
    use chronicler_archive::{RunState, StagingArea, StagingLayout};
    use std::path::Path;
    use std::sync::Mutex;

    const SNAPSHOT: &str = r#"{
        "name": "Hunt",
        "filesize_limit": 5000000,
        "categories": [{ "id": 10, "name": "Round 1" }],
        "channels": [
            { "id": 11, "name": "meta", "category_id": 10,
              "messages": [{ "timestamp": "2021-03-14T15:09:00Z", "author": "Alice", "content": "hi" }] },
            { "id": 12, "name": "staff", "category_id": 10, "forbidden": true },
            { "id": 13, "name": "answers", "category_id": 10,
              "messages": [{ "timestamp": "2021-03-14T15:09:00Z", "author": "Bob", "content": "42" }] }
        ]
    }"#;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(&self, n: &Notification) -> Result<(), PlatformError> {
            self.sent.lock().unwrap().push(n.clone());
            Ok(())
        }
    }

    fn setup(dir: &tempfile::TempDir) -> (ArchiveCommands, Arc<RecordingSink>) {
        let guild = Arc::new(SnapshotGuild::from_json(SNAPSHOT, Path::new(".")).unwrap());
        let sink = Arc::new(RecordingSink::default());
        let archiver = ChannelArchiver::new(StagingArea::new(
            dir.path().join("stage"),
            StagingLayout::default(),
        ));
        let commands = ArchiveCommands::new(guild.clone(), guild, sink.clone(), archiver);
        (commands, sink)
    }

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_mentions_and_ids() {
        assert_eq!(parse_channel_id("<#123>"), Some(ChannelId(123)));
        assert_eq!(parse_channel_id("456"), Some(ChannelId(456)));
        assert_eq!(parse_channel_id(" 7 "), Some(ChannelId(7)));
        assert_eq!(parse_channel_id("general"), None);
        assert_eq!(parse_channel_id("<#abc>"), None);
    }

    #[test]
    fn command_names_roundtrip() {
        for cmd in [Command::ArchiveChannel, Command::ArchiveCategory] {
            assert_eq!(Command::from_name(cmd.name()), Some(cmd));
        }
        assert_eq!(Command::from_name("archiveall"), None);
    }

    #[tokio::test]
    async fn missing_argument_is_rejected_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let (mut commands, sink) = setup(&dir);

        let outcome = commands.execute(Command::ArchiveCategory, &[]).await;

        assert!(matches!(
            outcome,
            CommandOutcome::Rejected(Diagnostic::MissingArgument {
                target: TargetKind::Category
            })
        ));
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
        assert!(!dir.path().join("stage").exists());
    }

    #[tokio::test]
    async fn unknown_channel_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (mut commands, _sink) = setup(&dir);
        let outcome = commands
            .execute(Command::ArchiveChannel, &args(&["nope"]))
            .await;
        assert!(matches!(
            outcome,
            CommandOutcome::Rejected(Diagnostic::NotFound {
                target: TargetKind::Channel,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn unparseable_category_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (mut commands, _sink) = setup(&dir);
        let outcome = commands
            .execute(Command::ArchiveCategory, &args(&["<#oops>"]))
            .await;
        assert!(matches!(outcome, CommandOutcome::Rejected(Diagnostic::NotFound { .. })));
    }

    #[tokio::test]
    async fn channel_by_mention_is_archived() {
        let dir = tempfile::tempdir().unwrap();
        let (mut commands, sink) = setup(&dir);

        let outcome = commands
            .execute(Command::ArchiveChannel, &args(&["<#11>"]))
            .await;

        let CommandOutcome::Archived(reports) = outcome else {
            panic!("expected archive");
        };
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].state, RunState::Delivered);

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0].diagnostic,
            Some(Diagnostic::ArchiveStarted {
                target: "<#11>".into()
            })
        );
        assert_eq!(sent[1].file.as_ref().unwrap().file_name, "meta_archive.zip");
    }

    #[tokio::test]
    async fn category_sweep_continues_past_forbidden_channel() {
        let dir = tempfile::tempdir().unwrap();
        let (mut commands, sink) = setup(&dir);

        let outcome = commands
            .execute(Command::ArchiveCategory, &args(&["Round 1"]))
            .await;

        let CommandOutcome::Archived(reports) = outcome else {
            panic!("expected archive");
        };
        let states: Vec<_> = reports.iter().map(|r| r.state).collect();
        assert_eq!(
            states,
            [RunState::Delivered, RunState::Failed, RunState::Delivered]
        );

        // start notice + one per channel
        assert_eq!(sink.sent.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn explicit_size_limit_overrides_server() {
        let dir = tempfile::tempdir().unwrap();
        let (commands, _sink) = setup(&dir);
        assert_eq!(commands.size_limit(), 5_000_000);
        let commands = commands.with_size_limit(Some(10));
        assert_eq!(commands.size_limit(), 10);
    }
}
