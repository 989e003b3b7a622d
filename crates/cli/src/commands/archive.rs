//! `chronicler channel` / `chronicler category` — run an archive command
//! against a guild snapshot.

use crate::RunArgs;
use chronicler_archive::{ChannelArchiver, RunState, StagingArea, StagingLayout};
use chronicler_config::AppConfig;
use chronicler_core::{Error, Result};
use chronicler_platform::{ArchiveCommands, Command, CommandOutcome, DirectorySink, SnapshotGuild};
use std::sync::Arc;
use tracing::info;

pub async fn run(
    config: &AppConfig,
    command: Command,
    target: Option<String>,
    args: RunArgs,
) -> Result<()> {
    let guild = Arc::new(
        SnapshotGuild::load(&args.guild)?
            .with_fallback_filesize_limit(config.delivery.fallback_filesize_limit),
    );

    let output_dir = args
        .out
        .unwrap_or_else(|| config.delivery.output_dir.clone());
    let staging_dir = args
        .staging
        .unwrap_or_else(|| config.archive.staging_dir.clone());

    let staging = StagingArea::new(
        staging_dir,
        StagingLayout {
            text_log_suffix: config.archive.text_log_suffix.clone(),
            attachments_dir: config.archive.attachments_dir.clone(),
        },
    );
    let archiver =
        ChannelArchiver::new(staging).with_compression_level(config.archive.compression_level);
    let sink = Arc::new(DirectorySink::new(&output_dir));

    let mut commands = ArchiveCommands::new(guild.clone(), guild.clone(), sink, archiver)
        .with_size_limit(args.size_limit);

    info!(
        guild = %guild.name(),
        command = command.name(),
        size_limit = commands.size_limit(),
        "Running archive command"
    );
    let target_args: Vec<String> = target.into_iter().collect();
    match commands.execute(command, &target_args).await {
        CommandOutcome::Rejected(diagnostic) => {
            return Err(Error::Rejected(diagnostic.title()));
        }
        CommandOutcome::Archived(reports) => {
            let failed = reports
                .iter()
                .filter(|r| r.state == RunState::Failed || r.delivery_error.is_some())
                .count();
            println!(
                "\n🗄️  {} channel(s) archived, {} failed. Output: {}",
                reports.len() - failed,
                failed,
                output_dir.display()
            );
        }
    }

    Ok(())
}
