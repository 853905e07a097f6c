//! Startup directory scan
//!
//! Collects every regular file under the root for the optional
//! upload-everything-present pass before watching begins.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Recursively list the regular files under `root`, sorted by path
///
/// Unreadable subtrees are logged and skipped rather than failing the
/// scan; the caller has already verified the root itself exists.
pub fn scan_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry during startup scan");
                None
            }
        })
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_finds_nested_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub/nested")).unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("sub/b.txt"), b"b").unwrap();
        fs::write(dir.path().join("sub/nested/c.txt"), b"c").unwrap();

        let files = scan_files(dir.path());

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| p.is_file()));
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_scan_excludes_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let files = scan_files(dir.path());
        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let files = scan_files(Path::new("/nonexistent/syncline-root"));
        assert!(files.is_empty());
    }
}
