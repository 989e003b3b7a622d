//! Deduplicating attachment store.
//!
//! Saves attachments into a directory without ever overwriting: a colliding
//! `img.png` becomes `img (1).png`, then `img (2).png`, and so on.
//!
//! The name is split at the *first* dot, so `photo.tar.gz` dedups to
//! `photo (1).tar.gz` and a dotless `README` to `README (1)`.

use crate::error::{ArchiveError, Result};
use chronicler_core::Attachment;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name to try on the `n`th collision (`n == 0` is the original name).
pub fn candidate_name(filename: &str, n: u32) -> String {
    if n == 0 {
        return filename.to_string();
    }
    match filename.split_once('.') {
        Some((stem, ext)) => format!("{stem} ({n}).{ext}"),
        None => format!("{filename} ({n})"),
    }
}

/// First free path for `filename` in `dir`.
pub async fn free_path(dir: &Path, filename: &str) -> Result<PathBuf> {
    let filename = sanitize(filename);
    let mut n = 0;
    loop {
        let path = dir.join(candidate_name(&filename, n));
        let taken = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| ArchiveError::io(&path, e))?;
        if !taken {
            return Ok(path);
        }
        n += 1;
    }
}

/// Save `attachment` into `dir` under a non-colliding name.
pub async fn save(attachment: &Attachment, dir: &Path) -> Result<PathBuf> {
    let path = free_path(dir, &attachment.filename).await?;
    let bytes = attachment
        .save(&path)
        .await
        .map_err(|e| ArchiveError::io(&path, e))?;
    debug!(path = %path.display(), bytes, "Saved attachment");
    Ok(path)
}

/// Attachment names come from arbitrary uploaders.
fn sanitize(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "attachment".into(),
        _ => cleaned,
    }
}
