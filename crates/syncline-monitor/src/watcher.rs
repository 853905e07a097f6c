//! Filesystem watcher adapter
//!
//! Wraps a platform watcher and translates its raw notifications into
//! [`ChangeEvent`]s for the engine. Removed and renamed-from paths are
//! forwarded like any other change; the engine's validation and the flush
//! time missing-file filter sort them out. Access-only notifications are
//! dropped here since they never change file contents.

use notify::event::EventKind;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use syncline_types::{ChangeEvent, ChangeKind, Error, Result};
use tracing::{debug, warn};

/// Watches a directory tree and forwards change events to a sink
///
/// Watching stops when the monitor is dropped.
pub struct DirectoryMonitor {
    // Held for its Drop; the background watch threads stop with it
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl DirectoryMonitor {
    /// Start watching `root`, delivering each change to `sink`
    ///
    /// The sink is called from the watcher's own thread; it must hand the
    /// event off quickly (the engine handle's unbounded send qualifies).
    /// Fails when the root does not exist or the platform watcher cannot
    /// be registered - both are startup-fatal conditions.
    pub fn start<P, F>(root: P, recursive: bool, sink: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(ChangeEvent) + Send + 'static,
    {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::watch(format!(
                "watched root '{}' is not a directory",
                root.display()
            )));
        }

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    let Some(kind) = map_event_kind(&event.kind) else {
                        return;
                    };
                    for path in event.paths {
                        sink(ChangeEvent::new(kind, path));
                    }
                }
                Err(err) => warn!(error = %err, "watcher delivered an error event"),
            }
        })
        .map_err(|err| Error::watch(err.to_string()))?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&root, mode)
            .map_err(|err| Error::watch(err.to_string()))?;

        debug!(root = %root.display(), recursive, "directory watch started");
        Ok(Self {
            _watcher: watcher,
            root,
        })
    }

    /// The watched root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Translate a raw notification kind; `None` means not upload-relevant
fn map_event_kind(kind: &EventKind) -> Option<ChangeKind> {
    use notify::event::ModifyKind;

    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Renamed),
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        EventKind::Access(_) => None,
        EventKind::Any | EventKind::Other => Some(ChangeKind::Modified),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind, RenameMode};
    use std::fs;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_event_kind_mapping() {
        assert_eq!(
            map_event_kind(&EventKind::Create(CreateKind::File)),
            Some(ChangeKind::Created)
        );
        assert_eq!(
            map_event_kind(&EventKind::Modify(ModifyKind::Data(
                notify::event::DataChange::Content
            ))),
            Some(ChangeKind::Modified)
        );
        assert_eq!(
            map_event_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Some(ChangeKind::Renamed)
        );
        assert_eq!(
            map_event_kind(&EventKind::Remove(RemoveKind::File)),
            Some(ChangeKind::Removed)
        );
        assert_eq!(map_event_kind(&EventKind::Access(AccessKind::Read)), None);
    }

    #[test]
    fn test_start_rejects_missing_root() {
        let result = DirectoryMonitor::start("/nonexistent/syncline-root", true, |_| {});
        assert!(matches!(result, Err(Error::Watch { .. })));
    }

    #[test]
    fn test_start_rejects_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, b"x").unwrap();

        let result = DirectoryMonitor::start(&file, true, |_| {});
        assert!(matches!(result, Err(Error::Watch { .. })));
    }

    #[test]
    fn test_create_event_is_forwarded() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel();

        let monitor = DirectoryMonitor::start(dir.path(), true, move |event| {
            let _ = tx.send(event);
        })
        .unwrap();
        assert_eq!(monitor.root(), dir.path());

        let target = dir.path().join("created.txt");
        fs::write(&target, b"hello").unwrap();

        // Platform watchers deliver asynchronously; wait for the first
        // event that references our file.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(event) if event.path == target => break,
                Ok(_) => continue,
                Err(_) if std::time::Instant::now() < deadline => continue,
                Err(err) => panic!("no event for created file: {}", err),
            }
        }
    }
}
