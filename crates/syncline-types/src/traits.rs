//! Core traits for Syncline operations
//!
//! The transport boundary is the only polymorphic seam in the pipeline:
//! the engine hands a [`Batch`](crate::Batch) to a [`BatchTransport`] and
//! interprets success or failure per batch. Retry is the engine's concern,
//! never the transport's.

#[cfg(feature = "async")]
use crate::{Batch, Result, UploadReceipt};

#[cfg(feature = "async")]
use async_trait::async_trait;

/// Trait for sending one batch of files to the remote endpoint
///
/// Implementations perform exactly one send attempt per call. A failure
/// must leave no file handles open and must not have partially consumed
/// the batch from the caller's point of view; the engine keeps the batch's
/// paths pending and re-attempts them on a later flush.
#[cfg(feature = "async")]
#[async_trait]
pub trait BatchTransport: Send + Sync {
    /// Transmit every file in the batch as a single request
    ///
    /// Success means the transport completed and the endpoint acknowledged
    /// with a 2xx-equivalent response. Any other outcome is an error
    /// carrying the batch's path list.
    async fn send(&self, batch: &Batch) -> Result<UploadReceipt>;
}
