//! # Chronicler Core
//!
//! Domain types, platform traits, and error definitions for the Chronicler
//! channel archiver. This crate knows nothing about zip files or config
//! files. It defines the model the pipeline and the platform adapters
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every chat-platform collaborator (history source, name resolver,
//! notification sink) is a trait here. Adapters live in `chronicler-platform`,
//! the archival pipeline in `chronicler-archive`. Tests swap in stubs freely.

pub mod artifact;
pub mod channel;
pub mod diagnostic;
pub mod error;
pub mod message;
pub mod platform;

// Re-export key types at crate root for ergonomics
pub use artifact::ArchiveArtifact;
pub use channel::{CategoryRef, ChannelId, ChannelRef};
pub use diagnostic::{Diagnostic, Notification, Severity, TargetKind};
pub use error::{Error, PlatformError, Result};
pub use message::{Attachment, AttachmentContent, Message};
pub use platform::{Directory, HistorySource, HistoryStream, NotificationSink};
