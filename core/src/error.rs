//! Error types for the hospital API client.
//!
//! # Design
//! Every failure the request primitive observes is folded into one of four
//! `ApiErrorKind`s and surfaced as a value inside `ApiResponse`, never as a
//! panic. `ApiError` is the typed form of that failure for callers that
//! prefer `Result` and `?`.

use std::fmt;

use thiserror::Error;

/// Message used when a failure carries no text of its own.
pub const GENERIC_NETWORK_ERROR: &str = "Network error";

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The backend could not be reached (offline, DNS, refused connection).
    Transport,
    /// The response was not the JSON envelope the client expects.
    ProtocolMismatch,
    /// The backend answered with a non-2xx status or `success: false`.
    Application,
    /// Anything else, e.g. a request body that failed to serialize.
    Unknown,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiErrorKind::Transport => "transport",
            ApiErrorKind::ProtocolMismatch => "protocol_mismatch",
            ApiErrorKind::Application => "application",
            ApiErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A classified failure with its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind,
            message: if message.trim().is_empty() {
                GENERIC_NETWORK_ERROR.to_string()
            } else {
                message
            },
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::ProtocolMismatch, message)
    }

    pub fn application(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Application, message).with_status(status)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unknown, message)
    }
}

/// Failure reported by a `Transport` before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Unable to connect to API server at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("{0}")]
    Failed(String),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unreachable { .. } => ApiError::transport(err.to_string()),
            TransportError::Failed(message) => ApiError::unknown(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_falls_back_to_network_error() {
        let err = ApiError::unknown("   ");
        assert_eq!(err.message, GENERIC_NETWORK_ERROR);
        assert_eq!(err.to_string(), "Network error");
    }

    #[test]
    fn unreachable_transport_error_names_the_url() {
        let err: ApiError = TransportError::Unreachable {
            url: "http://localhost:5000/api/patients".to_string(),
            reason: "connection refused".to_string(),
        }
        .into();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert!(err.message.contains("http://localhost:5000/api/patients"));
        assert!(err.status.is_none());
    }

    #[test]
    fn failed_transport_error_is_unknown() {
        let err: ApiError = TransportError::Failed(String::new()).into();
        assert_eq!(err.kind, ApiErrorKind::Unknown);
        assert_eq!(err.message, GENERIC_NETWORK_ERROR);
    }
}
