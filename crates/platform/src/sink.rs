//! Directory sink — delivers notifications to the local terminal and disk.
//!
//! Files are copied out of the staging area into `output_dir` (the staging
//! area is wiped before the next channel runs). An existing file is never
//! replaced: same-named channels land as `name_archive (1).zip` and so on.
//! Diagnostics are printed and logged at a level matching their severity.

use async_trait::async_trait;
use chronicler_archive::file_store;
use chronicler_core::{Diagnostic, Notification, NotificationSink, PlatformError, Severity};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub struct DirectorySink {
    output_dir: PathBuf,
    quiet: bool,
}

impl DirectorySink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            quiet: false,
        }
    }

    /// Suppress terminal output (logging still happens).
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }
}

/// One-line rendering for terminals: `<icon> <title>: <body>`.
pub fn render(diagnostic: &Diagnostic) -> String {
    let icon = match diagnostic.severity() {
        Severity::Info => "📜",
        Severity::Warning => "⚠️ ",
        Severity::Error => "❌",
    };
    format!("{icon} {}: {diagnostic}", diagnostic.title())
}

#[async_trait]
impl NotificationSink for DirectorySink {
    async fn send(&self, notification: &Notification) -> Result<(), PlatformError> {
        if let Some(diagnostic) = &notification.diagnostic {
            match diagnostic.severity() {
                Severity::Info => info!(title = %diagnostic.title(), "{diagnostic}"),
                Severity::Warning => warn!(title = %diagnostic.title(), "{diagnostic}"),
                Severity::Error => error!(title = %diagnostic.title(), "{diagnostic}"),
            }
            if !self.quiet {
                println!("{}", render(diagnostic));
            }
        }

        if let Some(file) = &notification.file {
            tokio::fs::create_dir_all(&self.output_dir)
                .await
                .map_err(|e| {
                    PlatformError::DeliveryFailed(format!(
                        "cannot create {}: {e}",
                        self.output_dir.display()
                    ))
                })?;
            let dest = file_store::free_path(&self.output_dir, &file.file_name)
                .await
                .map_err(|e| {
                    PlatformError::DeliveryFailed(format!("cannot place {}: {e}", file.file_name))
                })?;
            tokio::fs::copy(&file.path, &dest).await.map_err(|e| {
                PlatformError::DeliveryFailed(format!("cannot copy {}: {e}", file.file_name))
            })?;
            info!(file = %file.file_name, bytes = file.size, dest = %dest.display(), "Artifact delivered");
            if !self.quiet {
                println!("📦 {} ({} B) → {}", file.file_name, file.size, dest.display());
            }
        }

        Ok(())
    }
}
