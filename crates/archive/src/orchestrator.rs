//! Channel archival orchestrator.
//!
//! Drives one channel through
//! `Idle → StagingReset → Transcribing → Packaging → Selecting → Delivered | Failed`
//! and sweeps categories channel by channel. Errors never escape a run: they
//! become diagnostics for the notification sink.

use crate::delivery::{DeliveryDecision, select_delivery};
use crate::error::{ArchiveError, Result};
use crate::packager;
use crate::staging::StagingArea;
use crate::transcript;
use chronicler_core::{
    ArchiveArtifact, CategoryRef, ChannelRef, Diagnostic, HistorySource, Notification,
    NotificationSink, PlatformError,
};
use tracing::{debug, info, warn};

/// Where a single-channel run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    StagingReset,
    Transcribing,
    Packaging,
    Selecting,
    Delivered,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::StagingReset => "staging_reset",
            RunState::Transcribing => "transcribing",
            RunState::Packaging => "packaging",
            RunState::Selecting => "selecting",
            RunState::Delivered => "delivered",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result of one channel's run, as handed to the sink.
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub channel: ChannelRef,
    /// `Delivered` or `Failed`
    pub state: RunState,
    pub notification: Notification,
    /// Set when the sink rejected the notification
    pub delivery_error: Option<PlatformError>,
}

/// Runs the archival pipeline against an exclusively owned staging area.
///
/// `&mut self` on every run enforces one channel at a time per staging area.
pub struct ChannelArchiver {
    staging: StagingArea,
    compression_level: Option<i64>,
    state: RunState,
}

impl ChannelArchiver {
    pub fn new(staging: StagingArea) -> Self {
        Self {
            staging,
            compression_level: None,
            state: RunState::Idle,
        }
    }

    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, channel: &ChannelRef, next: RunState) {
        debug!(channel = %channel, from = %self.state, to = %next, "Archive run transition");
        self.state = next;
    }

    /// Reset, transcribe, package, and select for one channel.
    ///
    /// Leaves the state at `Selecting` on success; the caller decides what
    /// delivery means. On error the state is wherever the failure happened.
    pub async fn archive(
        &mut self,
        history: &dyn HistorySource,
        channel: &ChannelRef,
        size_limit: u64,
    ) -> Result<DeliveryDecision> {
        self.transition(channel, RunState::StagingReset);
        self.staging.reset().await?;

        self.transition(channel, RunState::Transcribing);
        let transcript_path = self.staging.transcript_path(&channel.name);
        let stats = transcript::write_transcript(
            history.history(channel),
            &transcript_path,
            &self.staging.attachments_dir(),
        )
        .await?;
        let transcript = ArchiveArtifact::new(
            self.staging.transcript_name(&channel.name),
            transcript_path,
            stats.bytes,
        );

        self.transition(channel, RunState::Packaging);
        let compressed =
            packager::package(&self.staging, &channel.name, self.compression_level).await?;

        self.transition(channel, RunState::Selecting);
        let decision = select_delivery(channel, size_limit, compressed, transcript);

        info!(
            channel = %channel,
            messages = stats.messages,
            attachments = stats.attachments,
            delivered = decision.artifact.as_ref().map(|a| a.file_name.as_str()).unwrap_or("none"),
            "Channel archived"
        );
        Ok(decision)
    }

    /// Archive one channel and send the outcome to `sink`.
    pub async fn run_channel(
        &mut self,
        history: &dyn HistorySource,
        sink: &dyn NotificationSink,
        channel: &ChannelRef,
        size_limit: u64,
    ) -> ChannelReport {
        let (state, notification) = match self.archive(history, channel, size_limit).await {
            Ok(decision) => (RunState::Delivered, decision.into_notification()),
            Err(e) => {
                warn!(channel = %channel, state = %self.state, error = %e, "Archive run failed");
                (
                    RunState::Failed,
                    Notification::diagnostic(failure_diagnostic(channel, &e)),
                )
            }
        };

        let delivery_error = match sink.send(&notification).await {
            Ok(()) => None,
            Err(e) => {
                warn!(channel = %channel, error = %e, "Failed to deliver notification");
                Some(e)
            }
        };
        self.transition(channel, state);

        ChannelReport {
            channel: channel.clone(),
            state,
            notification,
            delivery_error,
        }
    }

    /// Archive every text channel of `category`, sequentially, in order.
    ///
    /// A failed channel is reported and skipped; the sweep always finishes.
    pub async fn run_category(
        &mut self,
        history: &dyn HistorySource,
        sink: &dyn NotificationSink,
        category: &CategoryRef,
        size_limit: u64,
    ) -> Vec<ChannelReport> {
        info!(
            category = %category,
            channels = category.text_channels.len(),
            "Archiving category"
        );
        let mut reports = Vec::with_capacity(category.text_channels.len());
        for channel in &category.text_channels {
            reports.push(self.run_channel(history, sink, channel, size_limit).await);
        }
        reports
    }
}

/// User-facing diagnostic for a run that didn't reach selection.
pub fn failure_diagnostic(channel: &ChannelRef, err: &ArchiveError) -> Diagnostic {
    if err.is_forbidden() {
        Diagnostic::NoAccess {
            channel: channel.mention(),
        }
    } else {
        Diagnostic::ArchiveFailed {
            channel: channel.mention(),
            reason: err.to_string(),
        }
    }
}
