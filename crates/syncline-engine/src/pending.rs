//! Ordered, duplicate-free set of paths awaiting upload
//!
//! The set preserves insertion order so that paths pending the longest are
//! uploaded first within a flush. Re-adding a pending path is a no-op that
//! keeps the original position. The set is owned exclusively by the engine
//! actor; nothing here is shared or locked.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A path waiting to be uploaded, with its failed-attempt count
#[derive(Debug, Clone)]
pub struct PendingEntry {
    /// Path identifying the upload candidate
    pub path: PathBuf,
    /// Number of failed send attempts so far
    pub attempts: u32,
}

/// Insertion-ordered set of upload candidates
#[derive(Debug, Default)]
pub struct PendingSet {
    entries: Vec<PendingEntry>,
    index: HashSet<PathBuf>,
}

impl PendingSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Membership test
    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains(path)
    }

    /// Insert a path if absent
    ///
    /// Returns `false` for a duplicate; the existing entry keeps its
    /// position and attempt count.
    pub fn add(&mut self, path: PathBuf) -> bool {
        if self.index.contains(&path) {
            return false;
        }
        self.index.insert(path.clone());
        self.entries.push(PendingEntry { path, attempts: 0 });
        true
    }

    /// Ordered copy of the pending paths, without mutating the set
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    /// Remove a path if present; no-op otherwise
    pub fn remove(&mut self, path: &Path) -> bool {
        if !self.index.remove(path) {
            return false;
        }
        self.entries.retain(|e| e.path != path);
        true
    }

    /// Record a failed send attempt for a path
    ///
    /// Returns the updated attempt count, or 0 when the path is not
    /// pending (already removed by a concurrent rejection).
    pub fn record_failure(&mut self, path: &Path) -> u32 {
        match self.entries.iter_mut().find(|e| e.path == path) {
            Some(entry) => {
                entry.attempts += 1;
                entry.attempts
            }
            None => 0,
        }
    }
}
