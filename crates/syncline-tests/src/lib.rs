//! Integration test support for Syncline
//!
//! Shared helpers for exercising the watch → debounce → batch → upload
//! pipeline end to end against a mock HTTP server.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
pub mod test_utils {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Create a file of the given size filled with a repeating byte
    pub fn create_test_file(dir: &TempDir, name: &str, size: usize) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories");
        }
        fs::write(&path, vec![b'A'; size]).expect("failed to write test file");
        path
    }

    /// Wait until the mock server has received `count` requests, or panic
    pub async fn wait_for_requests(server: &wiremock::MockServer, count: usize, timeout: Duration) {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let received = server
                .received_requests()
                .await
                .map(|reqs| reqs.len())
                .unwrap_or(0);
            if received >= count {
                return;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!(
                    "expected {} request(s), saw {} within {:?}",
                    count, received, timeout
                );
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }

    /// Assert that a multipart body references the given filename
    pub fn body_contains_file(body: &[u8], path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        String::from_utf8_lossy(body).contains(&format!("filename=\"{}\"", name))
    }
}
