//! Error types for the datasplit-core crate.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for ingestion runs.
#[derive(Debug, Error)]
pub enum DatasplitError {
    /// The download could not complete (unreachable host, timeout, non-2xx status).
    #[error("Transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body arrived but is not valid UTF-8.
    #[error("Response from {url} is not valid UTF-8: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A directory or file under the artifact dir could not be created or written.
    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DatasplitError {
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn decode(url: impl Into<String>, source: std::string::FromUtf8Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from the fetch step.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Decode { .. })
    }
}

impl From<figment::Error> for DatasplitError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
