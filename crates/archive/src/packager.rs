//! Archive packager.
//!
//! Zips the staging area's content directory (transcript + attachments) into
//! a single deflate-compressed archive next to it.

use crate::error::{ArchiveError, Result};
use crate::staging::StagingArea;
use chronicler_core::ArchiveArtifact;
use std::fs::File;
use std::path::Path;
use tracing::info;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Package the staging area for `channel_name`.
///
/// Compression is CPU-bound and uses blocking file I/O, so it runs on the
/// blocking pool.
pub async fn package(
    staging: &StagingArea,
    channel_name: &str,
    compression_level: Option<i64>,
) -> Result<ArchiveArtifact> {
    let source = staging.content_dir();
    let dest = staging.archive_path(channel_name);
    let file_name = staging.archive_name(channel_name);

    let task_dest = dest.clone();
    let (entries, size) = tokio::task::spawn_blocking(move || {
        zip_directory(&source, &task_dest, compression_level)
    })
    .await
    .map_err(|e| ArchiveError::Task(e.to_string()))??;

    info!(
        path = %dest.display(),
        entries,
        bytes = size,
        "Archive packaged"
    );
    Ok(ArchiveArtifact::new(file_name, dest, size))
}

/// Write every file under `source` into a new zip at `dest`.
///
/// Entry names are `/`-separated paths relative to `source`, sorted so the
/// entry order doesn't depend on directory iteration order. Returns the
/// entry count and the archive's size in bytes.
pub fn zip_directory(
    source: &Path,
    dest: &Path,
    compression_level: Option<i64>,
) -> Result<(usize, u64)> {
    let mut entries = Vec::new();
    collect_entries(source, source, &mut entries)?;
    entries.sort();

    let file = File::create(dest).map_err(|e| ArchiveError::io(dest, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(compression_level)
        .unix_permissions(0o644);

    for relative in &entries {
        let full = source.join(relative);
        zip.start_file(relative.as_str(), options)?;
        let mut f = File::open(&full).map_err(|e| ArchiveError::io(&full, e))?;
        std::io::copy(&mut f, &mut zip).map_err(|e| ArchiveError::io(&full, e))?;
    }

    let file = zip.finish()?;
    let size = file
        .metadata()
        .map_err(|e| ArchiveError::io(dest, e))?
        .len();
    Ok((entries.len(), size))
}

fn collect_entries(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    let read = std::fs::read_dir(dir).map_err(|e| ArchiveError::io(dir, e))?;
    for entry in read {
        let entry = entry.map_err(|e| ArchiveError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| ArchiveError::io(&path, e))?;
        if file_type.is_dir() {
            collect_entries(root, &path, out)?;
        } else if file_type.is_file() {
            if let Ok(relative) = path.strip_prefix(root) {
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                out.push(name);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::StagingLayout;
    use std::io::Read;

    fn read_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut entry = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (entry.name().to_string(), data)
            })
            .collect()
    }

    #[tokio::test]
    async fn every_staged_file_becomes_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path().join("stage"), StagingLayout::default());
        staging.reset().await.unwrap();

        let transcript = "line one\nline two\n".repeat(50);
        std::fs::write(staging.transcript_path("general"), &transcript).unwrap();
        std::fs::write(staging.attachments_dir().join("a.png"), vec![7u8; 4096]).unwrap();
        std::fs::write(staging.attachments_dir().join("a (1).png"), b"tiny").unwrap();
        let nested = staging.attachments_dir().join("deep").join("er");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("x.txt"), b"nested").unwrap();

        let original_total = (transcript.len() + 4096 + 4 + 6) as u64;

        let artifact = package(&staging, "general", None).await.unwrap();
        assert_eq!(artifact.file_name, "general_archive.zip");
        assert_eq!(artifact.size, std::fs::metadata(&artifact.path).unwrap().len());

        let entries = read_entries(&artifact.path);
        assert_eq!(entries.len(), 4);
        let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"general_text_log.txt"));
        assert!(names.contains(&"images/a.png"));
        assert!(names.contains(&"images/a (1).png"));
        assert!(names.contains(&"images/deep/er/x.txt"));

        let decompressed: u64 = entries.iter().map(|(_, d)| d.len() as u64).sum();
        assert_eq!(decompressed, original_total);
    }

    #[tokio::test]
    async fn archive_is_not_inside_its_own_source() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path().join("stage"), StagingLayout::default());
        staging.reset().await.unwrap();
        std::fs::write(staging.transcript_path("c"), b"x\n").unwrap();

        package(&staging, "c", Some(9)).await.unwrap();
        let again = package(&staging, "c", Some(9)).await.unwrap();

        let entries = read_entries(&again.path);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "c_text_log.txt");
    }

    #[test]
    fn entries_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("images")).unwrap();
        for name in ["z.txt", "b.txt", "images/m.png", "a.txt"] {
            std::fs::write(src.join(name), name).unwrap();
        }
        let dest = dir.path().join("out.zip");

        let (count, size) = zip_directory(&src, &dest, None).unwrap();
        assert_eq!(count, 4);
        assert!(size > 0);

        let names: Vec<_> = read_entries(&dest).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a.txt", "b.txt", "images/m.png", "z.txt"]);
    }

    #[test]
    fn missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = zip_directory(&dir.path().join("nope"), &dir.path().join("o.zip"), None);
        assert!(matches!(result, Err(ArchiveError::Io { .. })));
    }
}
