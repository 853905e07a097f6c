//! HTTP batch upload transport for Syncline
//!
//! Implements the engine's [`BatchTransport`](syncline_types::BatchTransport)
//! boundary over multipart HTTP: one request per batch, one part per file.
//! The transport never retries; a failed batch stays pending in the engine
//! and rides the next flush.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod client;

pub use client::{HttpUploader, HttpUploaderBuilder};
