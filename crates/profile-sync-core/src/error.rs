//! Error types for the profile sync system
//!
//! This module defines all error types used throughout the workspace.
//! Every failure aborts the run; nothing here is retried.

use thiserror::Error;

/// Result type alias for profile sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the profile sync system
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed username, detected before any network call
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Contact has neither an email nor an alternate handle
    #[error("Invalid contact: {0}")]
    InvalidContact(String),

    /// Non-2xx response or connection-level failure from an external system
    #[error("Transport error ({system}{}): {message}", status_suffix(.status))]
    Transport {
        /// External system name (e.g. "github", "freshdesk")
        system: String,
        /// HTTP status, absent for connection failures and timeouts
        status: Option<u16>,
        /// Error message, including the response body when available
        message: String,
    },

    /// Response body does not have the expected shape
    #[error("Malformed response from {system}: {message}")]
    MalformedResponse {
        /// External system name
        system: String,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(", status {}", s)).unwrap_or_default()
}

impl Error {
    /// Create an invalid identifier error
    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    /// Create an invalid contact error
    pub fn invalid_contact(msg: impl Into<String>) -> Self {
        Self::InvalidContact(msg.into())
    }

    /// Create a transport error for a non-2xx response
    pub fn http_status(system: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            system: system.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a transport error for a rejected request, classified by status
    ///
    /// # Parameters
    ///
    /// - `system`: External system name
    /// - `status`: HTTP status of the response
    /// - `action`: What was attempted (e.g. "Contact lookup")
    /// - `body`: Response body, kept for diagnosis
    pub fn rejected(system: impl Into<String>, status: u16, action: &str, body: &str) -> Self {
        let reason = match status {
            401 | 403 => "authentication failed: invalid API token or insufficient permissions",
            404 => "not found",
            409 => "conflict",
            429 => "rate limit exceeded",
            500..=599 => "server error",
            _ => "request rejected",
        };
        Self::http_status(system, status, format!("{} failed, {}: {}", action, reason, body))
    }

    /// Create a transport error for a failure that produced no response
    pub fn connection(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            system: system.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            system: system.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status carried by a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this error came from talking to an external system
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
