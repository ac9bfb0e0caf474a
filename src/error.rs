//! Error types for station-link
//!
//! This module provides the error taxonomy surfaced by the service:
//! - Guard errors raised before any network activity (`NotReady`, `NotLoggedIn`)
//! - Validation errors from request shaping (two-factor parameters, empty URI lists)
//! - Transport errors passed through from the HTTP layer
//! - User-visible [`Notice`] values derived from any of the above

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for station-link operations
pub type Result<T> = std::result::Result<T, Error>;

/// Server API codes that mean the session id is missing, expired or was revoked
const SESSION_ERROR_CODES: [i64; 4] = [105, 106, 107, 119];

/// Main error type for station-link
#[derive(Debug, Error)]
pub enum Error {
    /// No base URL has been configured for the transport
    #[error("service not ready: no server url configured")]
    NotReady,

    /// The operation requires an active session
    #[error("not logged in: a valid session is required")]
    NotLoggedIn,

    /// Request parameters were rejected before any network call
    #[error("validation error: {message}")]
    Validation {
        /// The offending field (e.g., "otp_code")
        field: Option<String>,
        /// Human-readable error message
        message: String,
    },

    /// Network or HTTP-layer failure
    #[error("transport error: {0}")]
    Transport(TransportError),

    /// Settings error with context about which key is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the settings issue
        message: String,
        /// The settings key that caused the error (e.g., "connection.port")
        key: Option<String>,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The service was disposed and no longer accepts operations
    #[error("service disposed")]
    Disposed,

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Transport-level failures, opaque to the service beyond their message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout...
    #[error("network failure: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("unexpected HTTP status {status}")]
    Http {
        /// HTTP status code returned by the server
        status: u16,
    },

    /// The server answered with `success: false` and an API error code
    #[error("server error code {code}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Api {
        /// API error code
        code: i64,
        /// Optional server-provided message
        message: Option<String>,
    },

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request was abandoned before it completed
    #[error("request cancelled")]
    Cancelled,
}

impl TransportError {
    /// Whether the server rejected the request because of the session
    pub fn is_session_error(&self) -> bool {
        matches!(self, TransportError::Api { code, .. } if SESSION_ERROR_CODES.contains(code))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            TransportError::Http {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            TransportError::Malformed(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

impl From<TransportError> for Error {
    /// Session rejections become [`Error::NotLoggedIn`]; everything else stays opaque.
    fn from(e: TransportError) -> Self {
        if e.is_session_error() {
            Error::NotLoggedIn
        } else {
            Error::Transport(e)
        }
    }
}

impl Error {
    /// Create a validation error for a specific field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Whether this error should prompt the user to log in again
    pub fn is_login_required(&self) -> bool {
        match self {
            Error::NotLoggedIn => true,
            Error::Transport(e) => e.is_session_error(),
            _ => false,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::NotReady => "not_ready",
            Error::NotLoggedIn => "not_logged_in",
            Error::Validation { .. } => "validation_error",
            Error::Transport(e) if e.is_session_error() => "session_expired",
            Error::Transport(TransportError::Cancelled) => "cancelled",
            Error::Transport(_) => "transport_error",
            Error::Config { .. } => "config_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::Disposed => "disposed",
            Error::Other(_) => "internal_error",
        }
    }
}

/// A user-visible error notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Short title (e.g., "Failed to pause task")
    pub title: String,
    /// Human-readable message
    pub message: String,
    /// Optional context line (source page, server url...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Notice {
    /// Create a notice without context
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            context: None,
        }
    }

    /// Attach a context line
    pub fn with_context(mut self, context: Option<impl Into<String>>) -> Self {
        self.context = context.map(Into::into);
        self
    }

    /// Build the notice shown when `operation` failed with `error`
    pub fn from_error(operation: &str, error: &Error) -> Self {
        Self::new(format!("Failed to {operation}"), error.to_string())
    }
}
