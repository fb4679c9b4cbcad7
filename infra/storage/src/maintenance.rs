use crate::engine::TMP_MARKER;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Temp files younger than this may still belong to a write in progress.
const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now)).await {
        Ok(Sweep { removed, failed }) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up temporary files");
        },
        Err(e) => {
            error!(error = %e, "Temp file cleanup task panicked");
        },
        _ => {},
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Sweep {
    removed: usize,
    failed: usize,
}

fn remove_stale(root: &Path, now: SystemTime) -> Sweep {
    let mut sweep = Sweep::default();

    for entry in WalkDir::new(root).into_iter().flatten() {
        if !is_tmp(&entry) || !is_stale(&entry, now) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => sweep.removed += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Temp file removal failed");
                sweep.failed += 1;
            },
        }
    }

    sweep
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_stale_tmp_files_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("6b6579.doc");
        let tmp = dir.path().join(format!("6b6579.doc{TMP_MARKER}1.1"));
        std::fs::write(&doc, b"keep").unwrap();
        std::fs::write(&tmp, b"partial").unwrap();

        let fresh = remove_stale(dir.path(), SystemTime::now());
        assert_eq!(fresh, Sweep::default());
        assert!(tmp.exists());

        let later = SystemTime::now() + STALE_AFTER + Duration::from_secs(1);
        let swept = remove_stale(dir.path(), later);
        assert_eq!(swept, Sweep { removed: 1, failed: 0 });
        assert!(!tmp.exists());
        assert!(doc.exists());
    }
}
