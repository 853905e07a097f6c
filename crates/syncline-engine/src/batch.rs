//! Greedy size-bounded batch grouping
//!
//! Single left-to-right pass over pre-measured paths: a batch closes when
//! the next path would push it over the ceiling. No repacking — minimal
//! batch count is traded away for one-pass simplicity.

use std::path::PathBuf;
use syncline_types::Batch;

/// Partitions sized paths into contiguous runs under a byte ceiling
#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    max_batch_bytes: u64,
}

impl Batcher {
    /// Create a batcher with the given per-batch byte ceiling
    pub fn new(max_batch_bytes: u64) -> Self {
        Self { max_batch_bytes }
    }

    /// Group paths into batches, preserving input order
    ///
    /// Every batch satisfies `total_bytes <= max_batch_bytes`, except when
    /// a single input already exceeds the ceiling: such a path becomes a
    /// batch of one. The size filter upstream prevents that case when the
    /// configured limits are consistent; it is handled here so a filter
    /// misconfiguration degrades to an oversized request instead of a
    /// panic.
    pub fn group(&self, sized_paths: Vec<(PathBuf, u64)>) -> Vec<Batch> {
        let mut batches = Vec::new();
        let mut current: Vec<PathBuf> = Vec::new();
        let mut current_bytes: u64 = 0;

        for (path, size) in sized_paths {
            if !current.is_empty() && current_bytes + size > self.max_batch_bytes {
                batches.push(Batch::new(std::mem::take(&mut current), current_bytes));
                current_bytes = 0;
            }
            current.push(path);
            current_bytes += size;
        }

        if !current.is_empty() {
            batches.push(Batch::new(current, current_bytes));
        }

        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paths(sizes: &[u64]) -> Vec<(PathBuf, u64)> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| (PathBuf::from(format!("file{}", i)), s))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_no_batches() {
        let batcher = Batcher::new(100);
        assert!(batcher.group(Vec::new()).is_empty());
    }

    #[test]
    fn test_all_fit_in_one_batch() {
        let batcher = Batcher::new(1_000_000);
        let batches = batcher.group(paths(&[500, 500]));

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[0].total_bytes, 1000);
    }

    #[test]
    fn test_batch_closes_at_ceiling() {
        let batcher = Batcher::new(100);
        let batches = batcher.group(paths(&[60, 40, 1]));

        // 60+40 fills the first batch exactly; the next path starts a new one
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].total_bytes, 100);
        assert_eq!(batches[1].total_bytes, 1);
    }

    #[test]
    fn test_exceeding_path_starts_new_batch() {
        let batcher = Batcher::new(100);
        let batches = batcher.group(paths(&[60, 50]));

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].total_bytes, 60);
        assert_eq!(batches[1].total_bytes, 50);
    }

    #[test]
    fn test_oversized_single_path_gets_own_batch() {
        let batcher = Batcher::new(100);
        let batches = batcher.group(paths(&[10, 500, 10]));

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1].total_bytes, 500);
        assert_eq!(batches[1].len(), 1);
    }

    #[test]
    fn test_order_preserved_across_batches() {
        let batcher = Batcher::new(100);
        let batches = batcher.group(paths(&[80, 80, 80]));

        let flat: Vec<_> = batches.iter().flat_map(|b| b.paths.clone()).collect();
        assert_eq!(
            flat,
            vec![
                PathBuf::from("file0"),
                PathBuf::from("file1"),
                PathBuf::from("file2")
            ]
        );
    }

    proptest! {
        #[test]
        fn test_batch_size_invariant(
            sizes in prop::collection::vec(0u64..10_000, 0..50),
            max in 1u64..20_000,
        ) {
            let batcher = Batcher::new(max);
            let batches = batcher.group(paths(&sizes));

            // Every path appears exactly once, in order
            let flat: Vec<u64> = batches
                .iter()
                .flat_map(|b| b.paths.iter())
                .map(|p| {
                    let idx: usize = p
                        .to_str()
                        .unwrap()
                        .trim_start_matches("file")
                        .parse()
                        .unwrap();
                    sizes[idx]
                })
                .collect();
            prop_assert_eq!(&flat, &sizes);

            for batch in &batches {
                prop_assert!(!batch.is_empty());
                // The ceiling holds unless a single input already exceeds it
                if batch.len() > 1 {
                    prop_assert!(batch.total_bytes <= max);
                }
                prop_assert_eq!(
                    batch.total_bytes,
                    batch.paths.iter().map(|p| {
                        let idx: usize = p
                            .to_str()
                            .unwrap()
                            .trim_start_matches("file")
                            .parse()
                            .unwrap();
                        sizes[idx]
                    }).sum::<u64>()
                );
            }
        }
    }
}
