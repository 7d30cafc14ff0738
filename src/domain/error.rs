//! Error types for the book explorer core.
//!
//! This module defines the centralized error type [`BookExplorerError`], a
//! parallel [`ErrorKind`] tag for callers that want to branch on the failure
//! class, and a [`Result`] alias used throughout the crate. Controllers never
//! let these errors escape: they convert them into a message string (plus the
//! kind) on their published state.

use thiserror::Error;

/// Fallback text surfaced when an error renders to an empty message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// The main error type for catalog, storage and configuration operations.
///
/// # Examples
///
/// ```
/// use bookexplorer::domain::{BookExplorerError, ErrorKind};
///
/// let err = BookExplorerError::NotFound("/works/OL1W".to_string());
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert!(err.kind().is_network());
/// ```
#[derive(Debug, Error)]
pub enum BookExplorerError {
    /// Transport failure, timeout, or a non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The catalog answered 404 for the requested key.
    ///
    /// Treated as a network failure by callers that do not care about the
    /// distinction (see [`ErrorKind::is_network`]).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reading or writing the favorites file failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`BookExplorerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Decode,
    NotFound,
    Storage,
    Io,
    Config,
}

impl ErrorKind {
    /// Returns `true` for failures that came from talking to the catalog.
    ///
    /// `NotFound` counts as a network failure.
    #[must_use]
    pub const fn is_network(self) -> bool {
        matches!(self, Self::Network | Self::NotFound)
    }
}

impl BookExplorerError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Renders the error as the human-readable message controllers publish.
    ///
    /// Never returns an empty string.
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for BookExplorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            let target = err
                .url()
                .map_or_else(|| "resource".to_string(), |url| url.path().to_string());
            return Self::NotFound(target);
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Network(err.to_string())
    }
}

/// A specialized `Result` type for book explorer operations.
pub type Result<T> = std::result::Result<T, BookExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(BookExplorerError::Network("x".into()).kind(), ErrorKind::Network);
        assert_eq!(BookExplorerError::Decode("x".into()).kind(), ErrorKind::Decode);
        assert_eq!(BookExplorerError::Storage("x".into()).kind(), ErrorKind::Storage);
        assert_eq!(BookExplorerError::Config("x".into()).kind(), ErrorKind::Config);
    }

    #[test]
    fn not_found_is_a_network_failure() {
        assert!(ErrorKind::NotFound.is_network());
        assert!(ErrorKind::Network.is_network());
        assert!(!ErrorKind::Decode.is_network());
    }

    #[test]
    fn user_message_includes_detail() {
        let err = BookExplorerError::Network("connection refused".into());
        assert_eq!(err.user_message(), "Network error: connection refused");
    }
}
