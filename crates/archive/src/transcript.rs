//! Transcript writer.
//!
//! Turns a history stream into a plain-text log, one line per message:
//!
//! ```text
//! [ 03-14-2021, 15:09:26 ]                     Alice: look at this cat.gif
//! ```
//!
//! Attachments are saved through the file store as they're encountered and
//! their final (deduplicated) names appended to the message's line.

use crate::error::{ArchiveError, Result};
use crate::file_store;
use chronicler_core::{Message, PlatformError};
use futures::{Stream, StreamExt};
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

/// Authors are right-justified to this many characters.
pub const AUTHOR_WIDTH: usize = 25;

pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y, %H:%M:%S";

/// What a finished transcript looks like.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscriptStats {
    /// Bytes written to the transcript file
    pub bytes: u64,
    pub messages: u64,
    pub attachments: u64,
}

/// Everything on a message's line before its attachment names.
pub fn format_message(msg: &Message) -> String {
    format!(
        "[ {} ] {:>width$}: {}",
        msg.timestamp.format(TIMESTAMP_FORMAT),
        msg.author,
        msg.content,
        width = AUTHOR_WIDTH
    )
}

/// Drain `history` into `transcript_path`, saving attachments into
/// `attachment_dir`.
///
/// The transcript is truncated first. The stream is consumed one message at
/// a time and never collected.
pub async fn write_transcript<S>(
    mut history: S,
    transcript_path: &Path,
    attachment_dir: &Path,
) -> Result<TranscriptStats>
where
    S: Stream<Item = std::result::Result<Message, PlatformError>> + Unpin,
{
    let file = tokio::fs::File::create(transcript_path)
        .await
        .map_err(|e| ArchiveError::io(transcript_path, e))?;
    let mut out = BufWriter::new(file);
    let mut stats = TranscriptStats::default();

    while let Some(msg) = history.next().await {
        let msg = msg?;
        let mut line = format_message(&msg);

        for attachment in &msg.attachments {
            let saved = file_store::save(attachment, attachment_dir).await?;
            let name = saved
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            line.push(' ');
            line.push_str(&name);
            stats.attachments += 1;
        }
        line.push('\n');

        out.write_all(line.as_bytes())
            .await
            .map_err(|e| ArchiveError::io(transcript_path, e))?;
        stats.bytes += line.len() as u64;
        stats.messages += 1;
    }

    out.flush()
        .await
        .map_err(|e| ArchiveError::io(transcript_path, e))?;

    debug!(
        path = %transcript_path.display(),
        bytes = stats.bytes,
        messages = stats.messages,
        attachments = stats.attachments,
        "Transcript written"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chronicler_core::Attachment;
    use futures::stream;

    fn msg(minute: u32, author: &str, content: &str) -> Message {
        let ts = Utc.with_ymd_and_hms(2021, 3, 14, 15, minute, 26).unwrap();
        Message::text(ts, author, content)
    }

    struct Dirs {
        _tmp: tempfile::TempDir,
        transcript: std::path::PathBuf,
        attachments: std::path::PathBuf,
    }

    fn dirs() -> Dirs {
        let tmp = tempfile::tempdir().unwrap();
        let attachments = tmp.path().join("images");
        std::fs::create_dir(&attachments).unwrap();
        Dirs {
            transcript: tmp.path().join("log.txt"),
            attachments,
            _tmp: tmp,
        }
    }

    #[test]
    fn line_format_pads_author() {
        let line = format_message(&msg(9, "Alice", "hello there"));
        assert_eq!(
            line,
            "[ 03-14-2021, 15:09:26 ]                     Alice: hello there"
        );
    }

    #[test]
    fn long_author_is_not_truncated() {
        let name = "a".repeat(30);
        let line = format_message(&msg(0, &name, "x"));
        assert!(line.contains(&format!(" {name}: x")));
    }

    #[tokio::test]
    async fn one_line_per_message_in_order() {
        let d = dirs();
        let messages: Vec<_> = (0..20)
            .map(|i| Ok(msg(i, "Bob", &format!("message {i}"))))
            .collect();

        let stats = write_transcript(stream::iter(messages), &d.transcript, &d.attachments)
            .await
            .unwrap();

        let text = std::fs::read_to_string(&d.transcript).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 20);
        assert_eq!(stats.messages, 20);
        for (i, line) in lines.iter().enumerate() {
            assert!(line.ends_with(&format!(": message {i}")), "line {i}: {line}");
        }
    }

    #[tokio::test]
    async fn returned_size_matches_file() {
        let d = dirs();
        let messages = vec![Ok(msg(1, "Zoë", "unicode ✓")), Ok(msg(2, "Bob", ""))];
        let stats = write_transcript(stream::iter(messages), &d.transcript, &d.attachments)
            .await
            .unwrap();
        let on_disk = std::fs::metadata(&d.transcript).unwrap().len();
        assert_eq!(stats.bytes, on_disk);
    }

    #[tokio::test]
    async fn attachments_are_saved_and_referenced_by_final_name() {
        let d = dirs();
        let messages = vec![
            Ok(msg(1, "Alice", "first")
                .with_attachment(Attachment::inline("cat.gif", b"one".to_vec()))),
            Ok(msg(2, "Bob", "two cats")
                .with_attachment(Attachment::inline("cat.gif", b"two".to_vec()))
                .with_attachment(Attachment::inline("cat.gif", b"three".to_vec()))),
        ];

        let stats = write_transcript(stream::iter(messages), &d.transcript, &d.attachments)
            .await
            .unwrap();
        assert_eq!(stats.attachments, 3);

        let text = std::fs::read_to_string(&d.transcript).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].ends_with(": first cat.gif"));
        assert!(lines[1].ends_with(": two cats cat (1).gif cat (2).gif"));
        assert_eq!(
            std::fs::read(d.attachments.join("cat (2).gif")).unwrap(),
            b"three"
        );
    }

    #[tokio::test]
    async fn empty_history_writes_empty_file() {
        let d = dirs();
        let stats = write_transcript(
            stream::iter(Vec::<std::result::Result<Message, PlatformError>>::new()),
            &d.transcript,
            &d.attachments,
        )
        .await
        .unwrap();
        assert_eq!(stats, TranscriptStats::default());
        assert_eq!(std::fs::read(&d.transcript).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn forbidden_history_propagates() {
        let d = dirs();
        let messages = vec![Err(PlatformError::Forbidden {
            channel: "#staff".into(),
        })];
        let err = write_transcript(stream::iter(messages), &d.transcript, &d.attachments)
            .await
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn existing_transcript_is_truncated() {
        let d = dirs();
        std::fs::write(&d.transcript, "stale content that is long\n".repeat(10)).unwrap();
        write_transcript(stream::iter(vec![Ok(msg(0, "A", "x"))]), &d.transcript, &d.attachments)
            .await
            .unwrap();
        let text = std::fs::read_to_string(&d.transcript).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
