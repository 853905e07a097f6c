//! The sync engine: event ingestion, debounced flushing, per-batch upload
//!
//! The engine is a single-consumer actor. It owns the pending set and the
//! debounce state outright, and is driven by one `select!` loop over the
//! event channel and the flush deadline. Event producers only ever touch
//! an unbounded channel sender, so ingestion never blocks on an in-flight
//! upload; events arriving during a flush buffer in the channel and land
//! in the next flush, each one re-arming the debouncer on ingest.

use crate::batch::Batcher;
use crate::debounce::{self, Debouncer};
use crate::filter::SizeFilter;
use crate::pending::PendingSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use syncline_config::Config;
use syncline_types::{BatchTransport, ChangeEvent, ChangeKind, Error, Result, SyncStats};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Engine tuning parameters
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Quiet period before a flush fires
    pub debounce_interval: Duration,
    /// Re-attempt interval for failed batches; `None` disables the sweep
    pub retry_interval: Option<Duration>,
    /// Per-file size limit in bytes
    pub max_file_size: u64,
    /// Per-batch size ceiling in bytes
    pub max_batch_bytes: u64,
    /// Maximum send attempts per path; 0 retries indefinitely
    pub max_attempts: u32,
}

impl EngineConfig {
    /// Create engine config from the main configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce_interval: config.debounce.interval(),
            retry_interval: config.debounce.retry_interval(),
            max_file_size: config.upload.max_file_size,
            max_batch_bytes: config.upload.max_batch_bytes,
            max_attempts: config.upload.max_attempts,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Outcome of one flush
#[derive(Debug, Clone, Copy, Default)]
pub struct FlushReport {
    /// Files uploaded successfully
    pub uploaded_files: u64,
    /// Bytes uploaded successfully
    pub uploaded_bytes: u64,
    /// Files rejected by the size filter (dropped, not retried)
    pub rejected_files: u64,
    /// Batches that failed and were left pending
    pub failed_batches: u64,
}

/// Sending half of the engine's event channel
///
/// Cheap to clone; handed to the filesystem watcher. Dropping every handle
/// shuts the engine down after a final drain flush.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl EngineHandle {
    /// Deliver a change event to the engine
    pub fn send(&self, event: ChangeEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| Error::other("sync engine is no longer running"))
    }
}

/// Orchestrates the watch → debounce → filter → batch → upload pipeline
pub struct SyncEngine {
    config: EngineConfig,
    transport: Arc<dyn BatchTransport>,
    events: Option<mpsc::UnboundedReceiver<ChangeEvent>>,
    pending: PendingSet,
    debounce: Debouncer,
    retry_at: Option<Instant>,
    stats: SyncStats,
}

impl SyncEngine {
    /// Create an engine and the handle used to feed it events
    pub fn new(
        config: EngineConfig,
        transport: Arc<dyn BatchTransport>,
    ) -> Result<(Self, EngineHandle)> {
        let debounce = Debouncer::new(config.debounce_interval)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let engine = Self {
            config,
            transport,
            events: Some(rx),
            pending: PendingSet::new(),
            debounce,
            retry_at: None,
            stats: SyncStats::new(),
        };

        Ok((engine, EngineHandle { tx }))
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Ordered list of paths currently awaiting upload
    pub fn pending(&self) -> Vec<PathBuf> {
        self.pending.snapshot()
    }

    /// Run the engine until every [`EngineHandle`] has been dropped
    ///
    /// Flush-time errors are reported and swallowed; nothing that happens
    /// during watching terminates the loop. On shutdown a final flush
    /// drains whatever is still pending.
    pub async fn run(mut self) -> Result<SyncStats> {
        let mut events = match self.events.take() {
            Some(rx) => rx,
            None => return Err(Error::other("sync engine already consumed its event channel")),
        };

        loop {
            let wakeup = self.next_wakeup();
            tokio::select! {
                maybe = events.recv() => match maybe {
                    Some(event) => self.ingest(event).await,
                    None => break,
                },
                _ = debounce::wait_until(wakeup) => {
                    self.debounce.disarm();
                    self.retry_at = None;
                    self.flush().await;
                }
            }
        }

        if !self.pending.is_empty() || self.debounce.is_armed() {
            debug!("draining pending uploads before shutdown");
            self.debounce.disarm();
            self.retry_at = None;
            self.flush().await;
        }

        info!(
            uploaded = self.stats.files_uploaded,
            bytes = self.stats.bytes_uploaded,
            "sync engine stopped"
        );
        Ok(self.stats)
    }

    /// Enqueue a set of already-known paths and flush them immediately
    ///
    /// Used for the startup "upload everything present" pass; the quiet
    /// period does not apply.
    pub async fn upload_all<I>(&mut self, paths: I) -> FlushReport
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in paths {
            self.ingest(ChangeEvent::new(ChangeKind::Created, path)).await;
        }
        self.debounce.disarm();
        self.retry_at = None;
        self.flush().await
    }

    /// Earliest of the debounce deadline and the retry-sweep deadline
    fn next_wakeup(&self) -> Option<Instant> {
        match (self.debounce.deadline(), self.retry_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Validate and enqueue one change event, re-arming the debouncer
    async fn ingest(&mut self, event: ChangeEvent) {
        self.stats.events_seen += 1;

        match self.validate(&event.path).await {
            Ok(()) => {
                if self.pending.add(event.path.clone()) {
                    debug!(path = %event.path.display(), kind = %event.kind, "enqueued for upload");
                } else {
                    debug!(path = %event.path.display(), "already pending, position kept");
                }
                // A duplicate is still an accepted event: it must guarantee
                // a future flush for the entry it deduplicated into.
                self.debounce.notify();
            }
            Err(err) => {
                self.stats.events_rejected += 1;
                warn!(path = %event.path.display(), error = %err, "change event rejected");
            }
        }
    }

    /// Reject events for paths that are missing or not regular files
    async fn validate(&self, path: &std::path::Path) -> Result<()> {
        let meta = match tokio::fs::metadata(path).await {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => return Err(err.into()),
        };

        if !meta.is_file() {
            return Err(Error::NotAFile {
                path: path.to_path_buf(),
            });
        }

        Ok(())
    }

    /// Execute one snapshot → filter → batch → upload pass
    ///
    /// Removal from the pending set is per batch, immediately after that
    /// batch's send succeeds: a partially successful flush neither loses
    /// track of failed files nor re-uploads the ones that already made it.
    pub async fn flush(&mut self) -> FlushReport {
        self.stats.flushes += 1;
        let mut report = FlushReport::default();

        let snapshot = self.pending.snapshot();
        if snapshot.is_empty() {
            debug!("flush fired with nothing pending");
            return report;
        }
        debug!(files = snapshot.len(), "flush started");

        let (accepted, rejected) = SizeFilter::new(self.config.max_file_size)
            .filter(snapshot)
            .await;

        for rejection in &rejected {
            self.pending.remove(&rejection.path);
            self.stats.files_dropped += 1;
            report.rejected_files += 1;
            warn!(error = %rejection.error, "file dropped from upload queue");
        }

        let batches = Batcher::new(self.config.max_batch_bytes).group(accepted);

        for batch in batches {
            match self.transport.send(&batch).await {
                Ok(receipt) => {
                    for path in &batch.paths {
                        self.pending.remove(path);
                    }
                    self.stats.batches_sent += 1;
                    self.stats.files_uploaded += batch.len() as u64;
                    self.stats.bytes_uploaded += batch.total_bytes;
                    report.uploaded_files += batch.len() as u64;
                    report.uploaded_bytes += batch.total_bytes;
                    info!(
                        batch = %batch.id,
                        files = batch.len(),
                        bytes = batch.total_bytes,
                        "batch uploaded"
                    );
                    if receipt.failed > 0 {
                        warn!(
                            batch = %batch.id,
                            failed = receipt.failed,
                            "server reported failed files in an accepted batch"
                        );
                    }
                }
                Err(err) => {
                    self.stats.batches_failed += 1;
                    report.failed_batches += 1;
                    warn!(batch = %batch.id, error = %err, "batch upload failed, files stay pending");

                    for path in &batch.paths {
                        let attempts = self.pending.record_failure(path);
                        if self.config.max_attempts > 0 && attempts >= self.config.max_attempts {
                            self.pending.remove(path);
                            self.stats.files_dropped += 1;
                            warn!(
                                path = %path.display(),
                                attempts,
                                "retry budget exhausted, dropping file"
                            );
                        }
                    }
                }
            }
        }

        if report.failed_batches > 0 && !self.pending.is_empty() {
            if let Some(interval) = self.config.retry_interval {
                self.retry_at = Some(Instant::now() + interval);
                debug!(delay = ?interval, "retry sweep scheduled for failed batches");
            }
        }

        report
    }
}
