//! Dataset cache and source errors.

use thiserror::Error;

/// Errors raised by a [`DatasetSource`](super::DatasetSource).
///
/// Cloneable so a failed shared load can be reported to every caller that was
/// waiting on it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    /// The requested resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Local I/O failure.
    #[error("I/O error reading {resource}: {reason}")]
    Io { resource: String, reason: String },

    /// HTTP transport or status failure.
    #[error("HTTP error fetching {url}: {reason}")]
    Http { url: String, reason: String },

    /// Failure reported by an injected loader.
    #[error("Loader error: {0}")]
    Loader(String),
}

/// Errors that can occur while resolving a dataset.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DatasetError {
    /// Tier is not one of the known tier identifiers.
    #[error("Invalid detail tier '{0}'")]
    InvalidTier(String),

    /// Year is neither "all" nor a four-digit year in 2000-2099.
    #[error("Invalid year '{0}': expected \"all\" or 2000-2099")]
    InvalidYear(String),

    /// The upstream source failed.
    #[error("Failed to fetch {resource}: {source}")]
    Source {
        resource: String,
        #[source]
        source: SourceError,
    },

    /// The payload could not be decoded.
    #[error("Failed to decode {resource}: {reason}")]
    Decode { resource: String, reason: String },
}

impl DatasetError {
    /// True for errors caused by rejected caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DatasetError::InvalidTier(_) | DatasetError::InvalidYear(_)
        )
    }
}
