//! User-facing diagnostics and the notification envelope.
//!
//! Every outcome the requesting user hears about is a [`Diagnostic`].
//! Sinks render them; the pipeline never formats platform embeds itself.

use crate::artifact::ArchiveArtifact;
use serde::{Deserialize, Serialize};

/// How loudly a diagnostic should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Which kind of target a command was asked to archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Channel,
    Category,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Channel => write!(f, "channel"),
            TargetKind::Category => write!(f, "category"),
        }
    }
}

/// A message for the requesting user. `channel` fields hold mention markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    ArchiveStarted { target: String },
    MissingArgument { target: TargetKind },
    NotFound { target: TargetKind, query: String },
    NoAccess { channel: String },
    HistoryTooBig { channel: String, limit: u64, transcript_size: u64 },
    AttachmentsTooBig { channel: String, limit: u64, compressed_size: u64 },
    ArchiveFailed { channel: String, reason: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::ArchiveStarted { .. } => Severity::Info,
            Diagnostic::AttachmentsTooBig { .. } => Severity::Warning,
            Diagnostic::MissingArgument { .. }
            | Diagnostic::NotFound { .. }
            | Diagnostic::NoAccess { .. }
            | Diagnostic::HistoryTooBig { .. }
            | Diagnostic::ArchiveFailed { .. } => Severity::Error,
        }
    }

    /// Short heading, rendered as the embed field name on chat platforms.
    pub fn title(&self) -> String {
        match self {
            Diagnostic::ArchiveStarted { .. } => "Archive Started".into(),
            Diagnostic::MissingArgument { .. } => "ERROR: No argument supplied".into(),
            Diagnostic::NotFound { target, .. } => format!("ERROR: Cannot find {target}"),
            Diagnostic::NoAccess { .. } => "ERROR: No access".into(),
            Diagnostic::HistoryTooBig { .. } => "ERROR: History Too Big".into(),
            Diagnostic::AttachmentsTooBig { .. } => "WARNING: Attachments Too Big".into(),
            Diagnostic::ArchiveFailed { .. } => "ERROR: Archive failed".into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::ArchiveStarted { target } => write!(
                f,
                "Your archiving of {target} has begun! This may take a while. \
                 If I run into any errors, I'll let you know."
            ),
            Diagnostic::MissingArgument { target } => {
                write!(f, "You need to supply a {target} to archive.")
            }
            Diagnostic::NotFound { target, query } => {
                write!(f, "Sorry, I cannot find a {target} with name {query}")
            }
            Diagnostic::NoAccess { channel } => write!(
                f,
                "Sorry! I don't have access to {channel}. You'll need to give me \
                 permission to view the channel if you want to archive it"
            ),
            Diagnostic::HistoryTooBig {
                channel,
                limit,
                transcript_size,
            } => write!(
                f,
                "Sorry about that! The chat log in {channel} is too big for me to send.\n\
                 The max file size I can send in this server is {limit}B, \
                 but the chat log is {transcript_size}B"
            ),
            Diagnostic::AttachmentsTooBig {
                channel,
                limit,
                compressed_size,
            } => write!(
                f,
                "There are too many photos in {channel} for me to send. The max file size \
                 I can send in this server is {limit}B but the zip is {compressed_size}B. \
                 I'll only be able to send you the chat log."
            ),
            Diagnostic::ArchiveFailed { channel, reason } => {
                write!(f, "Archiving {channel} failed: {reason}")
            }
        }
    }
}

/// What a sink delivers to the requesting user: an optional file and an
/// optional diagnostic. Both empty is legal but never produced by the
/// pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub file: Option<ArchiveArtifact>,
    pub diagnostic: Option<Diagnostic>,
}

impl Notification {
    pub fn diagnostic(diagnostic: Diagnostic) -> Self {
        Self {
            file: None,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn file(file: ArchiveArtifact) -> Self {
        Self {
            file: Some(file),
            diagnostic: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_too_big_cites_transcript_size() {
        let d = Diagnostic::HistoryTooBig {
            channel: "<#1>".into(),
            limit: 1000,
            transcript_size: 1200,
        };
        assert_eq!(d.severity(), Severity::Error);
        let body = d.to_string();
        assert!(body.contains("<#1>"));
        assert!(body.contains("1000B"));
        assert!(body.contains("1200B"));
    }

    #[test]
    fn attachments_too_big_is_a_warning() {
        let d = Diagnostic::AttachmentsTooBig {
            channel: "<#1>".into(),
            limit: 1000,
            compressed_size: 1500,
        };
        assert_eq!(d.severity(), Severity::Warning);
        assert!(d.title().starts_with("WARNING"));
        assert!(d.to_string().contains("1500B"));
    }

    #[test]
    fn not_found_names_target_kind() {
        let d = Diagnostic::NotFound {
            target: TargetKind::Category,
            query: "Puzzles".into(),
        };
        assert_eq!(d.title(), "ERROR: Cannot find category");
        assert!(d.to_string().contains("Puzzles"));
    }

    #[test]
    fn diagnostic_serializes_with_kind_tag() {
        let d = Diagnostic::NoAccess {
            channel: "<#9>".into(),
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"kind\":\"no_access\""));
    }
}
