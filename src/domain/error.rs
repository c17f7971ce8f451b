//! Error types for the applytrack client.
//!
//! This module defines the centralized error type [`TrackerError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! The taxonomy mirrors how failures reach the user: the remote store was
//! unreachable or refused the request ([`TrackerError::Transport`]), it answered
//! with something we could not read ([`TrackerError::Parse`]), or the caller asked
//! for a mutation without the identity it requires ([`TrackerError::Precondition`]).

use thiserror::Error;

/// The main error type for applytrack operations.
///
/// Gateway failures propagate unchanged through the store to the caller. The
/// store never retries and never partially applies a mutation, so any error
/// returned from a store operation means the canonical list is exactly as it
/// was before the attempt.
///
/// # Examples
///
/// ```
/// use applytrack::TrackerError;
///
/// let err = TrackerError::precondition("update requires an id");
/// assert!(err.is_precondition());
/// assert_eq!(err.to_string(), "Precondition failed: update requires an id");
/// ```
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The remote call failed or returned a non-success status.
    ///
    /// `status` is `None` when the request never produced a response
    /// (connection refused, timeout, DNS failure).
    #[error("Transport error during {operation}: {message}")]
    Transport {
        /// Gateway operation that failed (`list`, `create`, ...).
        operation: &'static str,
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Human-readable description of the failure.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A mutation was attempted without the identity or fields it requires.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The credential exchange was rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Reading or writing the durable token store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Builds a [`TrackerError::Transport`] for a response with a non-success status.
    #[must_use]
    pub fn status(operation: &'static str, status: u16) -> Self {
        Self::Transport {
            operation,
            status: Some(status),
            message: format!("remote store answered with status {status}"),
        }
    }

    /// Builds a [`TrackerError::Transport`] for a request that produced no response.
    #[must_use]
    pub fn network(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            status: None,
            message: message.into(),
        }
    }

    /// Builds a [`TrackerError::Precondition`].
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

/// A specialized `Result` type for applytrack operations.
///
/// This is a type alias for `std::result::Result<T, TrackerError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_code_and_operation() {
        let err = TrackerError::status("list", 503);
        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "Transport error during list: remote store answered with status 503"
        );
        match err {
            TrackerError::Transport { status, .. } => assert_eq!(status, Some(503)),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn io_errors_convert() {
        let err: TrackerError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, TrackerError::Io(_)));
        assert!(!err.is_transport());
    }
}
