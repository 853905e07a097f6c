//! Core type system and error handling for Syncline
//!
//! This crate provides the foundational types shared across the Syncline
//! workspace:
//!
//! - **Error handling**: structured error types with retry classification
//! - **Core types**: change events, batches, upload receipts, statistics
//! - **Traits**: the async transport boundary used by the upload pipeline
//!
//! # Features
//!
//! - `async`: Enable async trait definitions
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use syncline_types::{Batch, Result};
//!
//! fn example_operation() -> Result<Batch> {
//!     let batch = Batch::new(vec!["a.txt".into(), "b.txt".into()], 1_000);
//!     Ok(batch)
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod result;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use result::Result;
pub use traits::*;
pub use types::*;
