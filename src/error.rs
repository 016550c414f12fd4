// src/error.rs
// =============================================================================
// Error types for the portfolio pipeline.
//
// The library reports failures through one `thiserror` enum. Almost none of
// them reach the caller of the pipeline: every network-facing step catches
// its own error and degrades to cached or static data. They exist so each
// step can say *why* it fell back, and so tests can assert on it.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for portfolio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while listing repositories, downloading READMEs,
/// or touching the cache.
#[derive(Error, Debug)]
pub enum Error {
    /// The host answered, but not with a success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The requested URL (including the cache-busting parameter).
        url: String,
        /// The status code returned by the host.
        status: u16,
    },

    /// The request never produced a response (DNS, connect, TLS, timeout...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A lookup in a static table found nothing.
    #[error("no entry found for {0}")]
    NotFound(String),

    /// A payload could not be parsed.
    #[error("could not decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The listing succeeded but nothing survived the filter.
    #[error("no repositories left for account {account} after filtering")]
    EmptyListing { account: String },

    /// The key/value store refused an operation.
    #[error("cache error: {0}")]
    Cache(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Filesystem error, with the path being accessed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates an HttpStatus error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Error::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a Transport error.
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a Decode error.
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Decode {
            context: context.into(),
            source,
        }
    }

    /// Creates a Cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Error::Cache(message.into())
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates an Io error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the failures a remote host can cause (bad status or no
    /// response at all).
    pub fn is_network(&self) -> bool {
        matches!(self, Error::HttpStatus { .. } | Error::Transport { .. })
    }
}
