//! Configuration management for Syncline
//!
//! Supports YAML and TOML configuration files, environment variable
//! overrides (prefix `SYNCLINE`), sensible defaults for every option, and
//! validation of the limits the upload pipeline depends on.
//!
//! # Examples
//!
//! ```rust
//! use syncline_config::{Config, ConfigBuilder};
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_env_prefix("SYNCLINE")
//!     .build()
//!     .expect("failed to load configuration");
//!
//! assert_eq!(config.debounce.interval_ms, 3000);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Main configuration structure for Syncline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Watched directory configuration
    pub watch: WatchConfig,
    /// Upload target and limits
    pub upload: UploadConfig,
    /// Debounce and retry timing
    pub debounce: DebounceConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// Startup-fatal checks: the pipeline's invariants assume a strictly
    /// positive debounce interval and a per-file limit no larger than the
    /// per-batch ceiling (otherwise the size filter could let a path
    /// through that no batch can hold).
    pub fn validate(&self) -> ConfigResult<()> {
        if self.upload.url.trim().is_empty() {
            return Err(ConfigError::missing_required("upload.url"));
        }
        if self.debounce.interval_ms == 0 {
            return Err(ConfigError::validation(
                "Debounce interval must be strictly positive",
            ));
        }
        if self.upload.max_file_size == 0 {
            return Err(ConfigError::validation(
                "Per-file size limit must be greater than 0",
            ));
        }
        if self.upload.max_file_size > self.upload.max_batch_bytes {
            return Err(ConfigError::validation(
                "Per-file size limit must not exceed the per-batch size limit",
            ));
        }
        if self.upload.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "Upload timeout must be greater than 0",
            ));
        }
        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(ConfigError::validation(
                "Log level must be one of: trace, debug, info, warn, error",
            ));
        }
        Ok(())
    }
}

/// Watched directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Root directory to watch
    pub root: PathBuf,
    /// Watch subdirectories recursively
    pub recursive: bool,
    /// Upload every file already present under the root before watching
    pub upload_existing: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            recursive: true,
            upload_existing: false,
        }
    }
}

/// Upload target and transfer limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Target URL for batch uploads
    pub url: String,
    /// Per-file size limit in bytes; larger files are rejected, not split
    pub max_file_size: u64,
    /// Per-batch size ceiling in bytes
    pub max_batch_bytes: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Skip TLS certificate validation (operational trust decision)
    pub accept_invalid_certs: bool,
    /// Maximum send attempts per path; 0 retries indefinitely
    pub max_attempts: u32,
}

impl UploadConfig {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_file_size: 64 * 1024 * 1024,   // 64MB
            max_batch_bytes: 256 * 1024 * 1024, // 256MB
            timeout_secs: 300,
            accept_invalid_certs: false,
            max_attempts: 0,
        }
    }
}

/// Debounce and retry timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet period before a flush fires, in milliseconds
    pub interval_ms: u64,
    /// Re-attempt interval for failed batches, in milliseconds; 0 disables
    pub retry_interval_ms: u64,
}

impl DebounceConfig {
    /// Debounce interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Retry sweep interval, if enabled
    pub fn retry_interval(&self) -> Option<Duration> {
        (self.retry_interval_ms > 0).then(|| Duration::from_millis(self.retry_interval_ms))
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            retry_interval_ms: 30_000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            colored_output: true,
        }
    }
}
