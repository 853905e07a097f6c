//! Size and existence filtering ahead of batching
//!
//! Each path is stat'ed exactly once per flush; the measured size travels
//! with the accepted path so the batcher never reads the filesystem again.

use std::path::PathBuf;
use syncline_types::Error;

/// A path excluded from the current flush, with the reason
///
/// Every rejection is terminal for the path: its condition (missing,
/// oversized, not a regular file) will not change without operator
/// intervention, so the engine drops it rather than retrying.
#[derive(Debug)]
pub struct Rejection {
    /// The excluded path
    pub path: PathBuf,
    /// Why it was excluded
    pub error: Error,
}

/// Rejects paths that are missing, non-regular, or over the size limit
#[derive(Debug, Clone, Copy)]
pub struct SizeFilter {
    max_size: u64,
}

impl SizeFilter {
    /// Create a filter with the given per-file size limit
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    /// Partition paths into accepted `(path, size)` pairs and rejections
    ///
    /// Order of the accepted list matches the input order. A path whose
    /// size equals the limit passes; only strictly larger files are
    /// rejected.
    pub async fn filter(&self, paths: Vec<PathBuf>) -> (Vec<(PathBuf, u64)>, Vec<Rejection>) {
        let mut accepted = Vec::with_capacity(paths.len());
        let mut rejected = Vec::new();

        for path in paths {
            match tokio::fs::metadata(&path).await {
                Ok(meta) if !meta.is_file() => {
                    rejected.push(Rejection {
                        error: Error::NotAFile { path: path.clone() },
                        path,
                    });
                }
                Ok(meta) if meta.len() > self.max_size => {
                    rejected.push(Rejection {
                        error: Error::FileTooLarge {
                            path: path.clone(),
                            size: meta.len(),
                            limit: self.max_size,
                        },
                        path,
                    });
                }
                Ok(meta) => accepted.push((path, meta.len())),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    rejected.push(Rejection {
                        error: Error::FileNotFound { path: path.clone() },
                        path,
                    });
                }
                Err(err) => {
                    rejected.push(Rejection {
                        error: err.into(),
                        path,
                    });
                }
            }
        }

        (accepted, rejected)
    }
}
