//! Core data types for Syncline
//!
//! Change events flow in from the filesystem watcher, batches flow out to
//! the transport, and [`SyncStats`] keeps score in between.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for upload batches
pub type BatchId = uuid::Uuid;

/// Kind of filesystem change reported by the watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChangeKind {
    /// A file was created
    Created,
    /// A file's contents or metadata changed
    Modified,
    /// A file was removed
    Removed,
    /// A file was renamed (either side of the rename)
    Renamed,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
        };
        f.write_str(name)
    }
}

/// A single filesystem change delivered to the upload pipeline
///
/// Removed and renamed-from paths are enqueued like any other change; a
/// path that no longer exists is filtered out at flush time rather than
/// special-cased here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChangeEvent {
    /// Kind of change
    pub kind: ChangeKind,
    /// Affected path
    pub path: PathBuf,
}

impl ChangeEvent {
    /// Create a new change event
    pub fn new<P: Into<PathBuf>>(kind: ChangeKind, path: P) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// A size-bounded, ordered group of paths sent in one network request
///
/// Invariant: `total_bytes` never exceeds the configured per-batch ceiling,
/// except in the defensive case of a single input that is itself oversized.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Identifier used to correlate log lines for one request
    pub id: BatchId,
    /// Paths in upload order
    pub paths: Vec<PathBuf>,
    /// Cumulative size of all paths, in bytes
    pub total_bytes: u64,
}

impl Batch {
    /// Create a new batch
    pub fn new(paths: Vec<PathBuf>, total_bytes: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            paths,
            total_bytes,
        }
    }

    /// Number of files in the batch
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the batch contains no files
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Per-request counts reported by the receiving server
///
/// The server counts a file part with an empty filename as `failed` without
/// writing it. A 2xx response with a body that does not parse still counts
/// as a successful upload; the receipt is informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UploadReceipt {
    /// Number of file parts in the request
    pub total: u64,
    /// Number of files the server stored
    pub success: u64,
    /// Number of files the server rejected
    pub failed: u64,
}

/// Counters maintained by the sync engine
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyncStats {
    /// Change events received from the watcher
    pub events_seen: u64,
    /// Events rejected during validation
    pub events_rejected: u64,
    /// Flushes executed
    pub flushes: u64,
    /// Batches transmitted successfully
    pub batches_sent: u64,
    /// Batches that failed and were left pending
    pub batches_failed: u64,
    /// Files uploaded successfully
    pub files_uploaded: u64,
    /// Bytes uploaded successfully
    pub bytes_uploaded: u64,
    /// Files dropped by the size filter or the retry cap
    pub files_dropped: u64,
}

impl SyncStats {
    /// Create a new empty statistics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge statistics from another instance
    pub fn merge(&mut self, other: &SyncStats) {
        self.events_seen += other.events_seen;
        self.events_rejected += other.events_rejected;
        self.flushes += other.flushes;
        self.batches_sent += other.batches_sent;
        self.batches_failed += other.batches_failed;
        self.files_uploaded += other.files_uploaded;
        self.bytes_uploaded += other.bytes_uploaded;
        self.files_dropped += other.files_dropped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_creation() {
        let event = ChangeEvent::new(ChangeKind::Created, "/tmp/a.txt");
        assert_eq!(event.kind, ChangeKind::Created);
        assert_eq!(event.path, PathBuf::from("/tmp/a.txt"));
    }

    #[test]
    fn test_change_kind_display() {
        assert_eq!(ChangeKind::Created.to_string(), "created");
        assert_eq!(ChangeKind::Renamed.to_string(), "renamed");
    }

    #[test]
    fn test_batch_ids_are_unique() {
        let a = Batch::new(vec!["x".into()], 1);
        let b = Batch::new(vec!["x".into()], 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_empty_batch() {
        let batch = Batch::new(Vec::new(), 0);
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }
}
