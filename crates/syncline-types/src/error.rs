//! Error types and handling for Syncline
//!
//! Errors fall into two camps that the upload pipeline treats very
//! differently: validation errors (the path itself is unfit for upload and
//! will not become fit on its own) and transfer errors (the send attempt
//! failed and the paths stay pending for a later flush). The [`Error::kind`]
//! and [`Error::is_retryable`] accessors encode that split.

use std::path::PathBuf;

/// Main error type for Syncline operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Path did not exist when it was inspected
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was missing
        path: PathBuf,
    },

    /// Path exists but is not a regular file
    #[error("not a regular file: {path}")]
    NotAFile {
        /// Offending path
        path: PathBuf,
    },

    /// File exceeds the configured per-file size limit
    #[error("file too large: {path} ({size} bytes, limit {limit})")]
    FileTooLarge {
        /// Offending path
        path: PathBuf,
        /// Measured size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// Network-level failure while talking to the remote endpoint
    #[error("network error: {message}")]
    Network {
        /// Error message describing the network issue
        message: String,
    },

    /// The remote endpoint rejected an upload batch
    #[error("upload rejected ({status}): {} file(s) affected", paths.len())]
    Upload {
        /// HTTP status (or 0 when the response never arrived)
        status: u16,
        /// Paths contained in the failed batch
        paths: Vec<PathBuf>,
    },

    /// Operation timed out
    #[error("operation timed out after {seconds} seconds")]
    Timeout {
        /// Number of seconds after which the operation timed out
        seconds: u64,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Filesystem watcher error
    #[error("watch error: {message}")]
    Watch {
        /// Error message describing the watcher issue
        message: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The path is unfit for upload and is dropped without retry
    Validation,
    /// The send attempt failed; affected paths stay pending
    Transfer,
    /// Configuration errors, fatal at startup
    Config,
    /// Watcher errors, fatal at startup
    Watch,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } | Self::NotAFile { .. } | Self::FileTooLarge { .. } => {
                ErrorKind::Validation
            }
            Self::Io { .. } | Self::Network { .. } | Self::Upload { .. } | Self::Timeout { .. } => {
                ErrorKind::Transfer
            }
            Self::Config { .. } => ErrorKind::Config,
            Self::Watch { .. } => ErrorKind::Watch,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Whether the affected paths should stay pending for a later flush
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transfer)
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new watcher error
    pub fn watch<S: Into<String>>(message: S) -> Self {
        Self::Watch {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_error_kind_consistency(message in ".*") {
            let errors = vec![
                Error::Io { message: message.clone() },
                Error::Network { message: message.clone() },
                Error::Config { message: message.clone() },
                Error::Watch { message: message.clone() },
                Error::Other { message: message.clone() },
            ];

            for error in &errors {
                let kind = error.kind();
                match error {
                    Error::Io { .. } | Error::Network { .. } => {
                        prop_assert_eq!(kind, ErrorKind::Transfer);
                        prop_assert!(error.is_retryable());
                    }
                    Error::Config { .. } => prop_assert_eq!(kind, ErrorKind::Config),
                    Error::Watch { .. } => prop_assert_eq!(kind, ErrorKind::Watch),
                    Error::Other { .. } => prop_assert_eq!(kind, ErrorKind::Other),
                    _ => {}
                }
            }
        }

        #[test]
        fn test_timeout_error_properties(seconds in 1u64..3600u64) {
            let error = Error::Timeout { seconds };

            prop_assert_eq!(error.kind(), ErrorKind::Transfer);
            prop_assert!(error.is_retryable());
        }
    }

    #[test]
    fn test_validation_errors_never_retry() {
        let errors = vec![
            Error::FileNotFound {
                path: PathBuf::from("/missing.txt"),
            },
            Error::NotAFile {
                path: PathBuf::from("/some/dir"),
            },
            Error::FileTooLarge {
                path: PathBuf::from("/big.bin"),
                size: 2_000_000,
                limit: 1_000_000,
            },
        ];

        for error in errors {
            assert_eq!(error.kind(), ErrorKind::Validation);
            assert!(!error.is_retryable());
        }
    }

    #[test]
    fn test_upload_error_carries_batch_paths() {
        let error = Error::Upload {
            status: 500,
            paths: vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
        };

        assert_eq!(error.kind(), ErrorKind::Transfer);
        assert!(error.is_retryable());
        assert!(error.to_string().contains("500"));
        assert!(error.to_string().contains("2 file(s)"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "test file");
        let error = Error::from(io_error);

        assert_eq!(error.kind(), ErrorKind::Transfer);
        assert!(error.to_string().contains("test file"));
    }

    #[test]
    fn test_file_too_large_display() {
        let error = Error::FileTooLarge {
            path: PathBuf::from("/data/video.mp4"),
            size: 2_000_000,
            limit: 1_000_000,
        };
        let rendered = error.to_string();
        assert!(rendered.contains("/data/video.mp4"));
        assert!(rendered.contains("2000000"));
        assert!(rendered.contains("1000000"));
    }
}
