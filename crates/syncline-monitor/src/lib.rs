//! Filesystem watcher adapter and startup scanner for Syncline
//!
//! This crate sits at the boundary between the platform's change
//! notification mechanism and the upload pipeline: [`DirectoryMonitor`]
//! forwards live changes, [`scan_files`] enumerates what is already there
//! for the optional startup upload pass.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod scan;
pub mod watcher;

pub use scan::scan_files;
pub use watcher::DirectoryMonitor;
