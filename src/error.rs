// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! Expiry and token decode failures are recovered locally by ending the
//! session; everything else is handed back to the caller.

use crate::storage::StorageError;

/// Errors returned by the API client and session layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No usable session, or the server answered 401. The session has
    /// already been cleared by the time this is returned.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// Any other non-2xx response.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body is not the expected JSON.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid user record: {0}")]
    InvalidUser(String),
}

impl ClientError {
    /// Fallback message when the error body carries nothing usable.
    pub fn generic_http_message(status: u16) -> String {
        format!("HTTP error {}", status)
    }

    /// Check if the error ended the session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::SessionExpired => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
