//! Debounced, deduplicating, size-bounded upload pipeline
//!
//! This crate turns a rapid, unbounded stream of filesystem change events
//! into a correctly-ordered, retry-safe sequence of bounded-size batch
//! uploads:
//!
//! - [`PendingSet`]: ordered, duplicate-free paths awaiting upload
//! - [`SizeFilter`]: drops missing and oversized paths, with errors
//! - [`Batcher`]: greedy grouping under a per-batch byte ceiling
//! - [`Debouncer`]: quiet-period flush scheduling
//! - [`SyncEngine`]: the actor that wires them together and drives the
//!   transport, retaining failed batches for later flushes
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use syncline_engine::{EngineConfig, SyncEngine};
//! use syncline_types::{ChangeEvent, ChangeKind};
//!
//! # async fn example(transport: Arc<dyn syncline_types::BatchTransport>) -> syncline_types::Result<()> {
//! let (engine, handle) = SyncEngine::new(EngineConfig::default(), transport)?;
//! let _worker = tokio::spawn(engine.run());
//!
//! handle.send(ChangeEvent::new(ChangeKind::Created, "/data/report.csv"))?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod debounce;
pub mod engine;
pub mod filter;
pub mod pending;

pub use batch::Batcher;
pub use debounce::Debouncer;
pub use engine::{EngineConfig, EngineHandle, FlushReport, SyncEngine};
pub use filter::{Rejection, SizeFilter};
pub use pending::{PendingEntry, PendingSet};
