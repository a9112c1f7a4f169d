//! Error types for ixp-mirror
//!
//! Every fault in a refresh run belongs to one of a few families: transport,
//! HTTP status, filesystem, JSON decoding, snapshot-log shape, or
//! decompression. Stage drivers catch these at their boundary and report a
//! boolean outcome; no error crosses a driver into the orchestrator. Mapping
//! import failures are not errors at all: the codec reports them in-band as a
//! flag so one bad cache entry degrades to one missing key.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ixp-mirror operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ixp-mirror
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "fanout_workers")
        key: Option<String>,
    },

    /// Network error (connection, DNS, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Remote answered with a non-success HTTP status
    #[error("HTTP status {status} fetching {url}")]
    HttpStatus {
        /// The status code returned by the remote
        status: reqwest::StatusCode,
        /// The URL that was being fetched
        url: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or undecodable JSON body
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL (bad base URL or snapshot name in config)
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Snapshot log did not have the expected tab-delimited layout
    #[error("snapshot log format error: {reason}")]
    LogFormat {
        /// What was wrong with the log contents
        reason: String,
    },

    /// Gzip decompression of a fetched archive failed
    #[error("failed to decompress {}: {reason}", path.display())]
    Decompress {
        /// Path to the archive that could not be decompressed
        path: PathBuf,
        /// Underlying failure description
        reason: String,
    },
}

impl Error {
    /// Construct a configuration error
    pub fn config(message: impl Into<String>, key: Option<&str>) -> Self {
        Self::Config {
            message: message.into(),
            key: key.map(str::to_string),
        }
    }
}
