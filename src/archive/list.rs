//! Finds archives in a directory.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::snapshot::Timestamp;

#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub playlist_id: String,
    pub captured_at: Timestamp,
    pub entry_count: usize,
    pub unavailable_count: usize,
}

/// List the archives directly inside `dir`, newest first.
///
/// Files that do not parse as archives are skipped.
pub fn list(dir: &Path) -> Vec<ArchiveSummary> {
    let mut archives: Vec<ArchiveSummary> = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .filter_map(|e| match super::read(e.path()) {
            Ok(snapshot) => Some(ArchiveSummary {
                path: e.path().to_path_buf(),
                unavailable_count: snapshot.unavailable_count(),
                entry_count: snapshot.entries.len(),
                captured_at: snapshot.captured_at,
                playlist_id: snapshot.playlist_id,
            }),
            Err(err) => {
                debug!(path = %e.path().display(), error = %err, "skipping file, not an archive");
                None
            }
        })
        .collect();

    archives.sort_by(|a, b| {
        b.captured_at
            .as_secs()
            .cmp(&a.captured_at.as_secs())
            .then_with(|| a.path.cmp(&b.path))
    });

    archives
}

/// Most recent archive of `playlist_id` inside `dir`.
pub fn latest_for(dir: &Path, playlist_id: &str) -> Option<ArchiveSummary> {
    list(dir).into_iter().find(|a| a.playlist_id == playlist_id)
}
