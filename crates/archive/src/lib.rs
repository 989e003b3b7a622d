//! Channel archival pipeline for Chronicler.
//!
//! Data flows one way:
//!
//! ```text
//! history stream ─► transcript writer ─┬─► packager ─► delivery selector ─► sink
//!                   file store ────────┘
//! ```
//!
//! - **staging** — per-run scratch directory handle
//! - **file_store** — collision-free attachment saving
//! - **transcript** — streaming log writer
//! - **packager** — deflate zip of the staging area
//! - **delivery** — size-gated artifact selection
//! - **orchestrator** — per-channel state machine and category sweeps

pub mod delivery;
pub mod error;
pub mod file_store;
pub mod orchestrator;
pub mod packager;
pub mod staging;
pub mod transcript;

pub use delivery::{DeliveryDecision, select_delivery};
pub use error::{ArchiveError, Result};
pub use orchestrator::{ChannelArchiver, ChannelReport, RunState};
pub use staging::{StagingArea, StagingLayout};
pub use transcript::{TranscriptStats, write_transcript};
