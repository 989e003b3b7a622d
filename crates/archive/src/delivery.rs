//! Delivery selection.
//!
//! Decides which artifact, if any, can be sent under the server's upload
//! limit. First match wins:
//!
//! | zip ≤ limit | transcript ≤ limit | deliver    | diagnostic          |
//! |-------------|--------------------|------------|---------------------|
//! | yes         | –                  | zip        | none                |
//! | no          | no                 | nothing    | History Too Big     |
//! | no          | yes                | transcript | Attachments Too Big |

use chronicler_core::{ArchiveArtifact, ChannelRef, Diagnostic, Notification};

/// Outcome of delivery selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDecision {
    pub artifact: Option<ArchiveArtifact>,
    pub diagnostic: Option<Diagnostic>,
}

impl DeliveryDecision {
    pub fn into_notification(self) -> Notification {
        Notification {
            file: self.artifact,
            diagnostic: self.diagnostic,
        }
    }
}

pub fn select_delivery(
    channel: &ChannelRef,
    size_limit: u64,
    compressed: ArchiveArtifact,
    transcript: ArchiveArtifact,
) -> DeliveryDecision {
    if compressed.fits(size_limit) {
        return DeliveryDecision {
            artifact: Some(compressed),
            diagnostic: None,
        };
    }

    if !transcript.fits(size_limit) {
        return DeliveryDecision {
            artifact: None,
            diagnostic: Some(Diagnostic::HistoryTooBig {
                channel: channel.mention(),
                limit: size_limit,
                transcript_size: transcript.size,
            }),
        };
    }

    DeliveryDecision {
        diagnostic: Some(Diagnostic::AttachmentsTooBig {
            channel: channel.mention(),
            limit: size_limit,
            compressed_size: compressed.size,
        }),
        artifact: Some(transcript),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifacts(zip: u64, log: u64) -> (ArchiveArtifact, ArchiveArtifact) {
        (
            ArchiveArtifact::new("c_archive.zip", "/s/c_archive.zip", zip),
            ArchiveArtifact::new("c_text_log.txt", "/s/content/c_text_log.txt", log),
        )
    }

    fn channel() -> ChannelRef {
        ChannelRef::new(5, "c")
    }

    #[test]
    fn small_zip_is_delivered() {
        let (zip, log) = artifacts(500, 200);
        let decision = select_delivery(&channel(), 1000, zip.clone(), log);
        assert_eq!(decision.artifact, Some(zip));
        assert_eq!(decision.diagnostic, None);
    }

    #[test]
    fn zip_at_limit_is_delivered() {
        let (zip, log) = artifacts(1000, 1000);
        let decision = select_delivery(&channel(), 1000, zip.clone(), log);
        assert_eq!(decision.artifact, Some(zip));
    }

    #[test]
    fn both_too_big_delivers_nothing() {
        let (zip, log) = artifacts(1500, 1200);
        let decision = select_delivery(&channel(), 1000, zip, log);
        assert_eq!(decision.artifact, None);
        assert_eq!(
            decision.diagnostic,
            Some(Diagnostic::HistoryTooBig {
                channel: "<#5>".into(),
                limit: 1000,
                transcript_size: 1200,
            })
        );
    }

    #[test]
    fn big_zip_falls_back_to_transcript() {
        let (zip, log) = artifacts(1500, 800);
        let decision = select_delivery(&channel(), 1000, zip, log.clone());
        assert_eq!(decision.artifact, Some(log));
        assert_eq!(
            decision.diagnostic,
            Some(Diagnostic::AttachmentsTooBig {
                channel: "<#5>".into(),
                limit: 1000,
                compressed_size: 1500,
            })
        );
    }

    #[test]
    fn limit_comes_from_caller() {
        let (zip, log) = artifacts(1500, 800);
        let generous = select_delivery(&channel(), 50_000_000, zip.clone(), log.clone());
        assert_eq!(generous.artifact, Some(zip.clone()));
        let strict = select_delivery(&channel(), 10, zip, log);
        assert_eq!(strict.artifact, None);
    }

    #[test]
    fn into_notification_carries_both_parts() {
        let (zip, log) = artifacts(1500, 800);
        let n = select_delivery(&channel(), 1000, zip, log.clone()).into_notification();
        assert_eq!(n.file, Some(log));
        assert!(n.diagnostic.is_some());
    }
}
