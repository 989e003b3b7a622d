//! Chat-platform adapters and the archive command surface for Chronicler.
//!
//! Available pieces:
//! - **Snapshot** — a server served from a JSON snapshot (history + directory)
//! - **Sink** — delivers artifacts to a local directory and the terminal
//! - **Commands** — `archivechannel` / `archivecategory` handlers

pub mod commands;
pub mod sink;
pub mod snapshot;

pub use commands::{ArchiveCommands, Command, CommandOutcome};
pub use sink::DirectorySink;
pub use snapshot::SnapshotGuild;
