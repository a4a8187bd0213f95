//! Client error types

use crate::types::ApiEnvelope;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, timeout or protocol error
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status; the raw body text is kept for
    /// message extraction, alongside a best-effort envelope parse.
    #[error("server error {status}: {raw}")]
    Status {
        status: u16,
        raw: String,
        envelope: Option<ApiEnvelope>,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The session guard classified the response as expired and has
    /// already taken over; callers must not surface this as a generic
    /// error.
    #[error("session expired")]
    SessionExpired,
}

impl ClientError {
    /// Create error from an HTTP status code and raw body text.
    pub fn from_status(status: reqwest::StatusCode, raw: String) -> Self {
        let envelope = serde_json::from_str::<ApiEnvelope>(&raw).ok();
        Self::Status {
            status: status.as_u16(),
            raw,
            envelope,
        }
    }

    /// HTTP status associated with this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(error) => error.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed envelope carried by the failure body, when one exists.
    pub fn envelope(&self) -> Option<&ApiEnvelope> {
        match self {
            Self::Status { envelope, .. } => envelope.as_ref(),
            _ => None,
        }
    }

    /// Raw response text carried by the failure body, when one exists.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Status { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Whether this failure means the session has expired: a hard 401, a
    /// body carrying the `requiresLogin` flag, or a failure the guard has
    /// already classified.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::SessionExpired => true,
            _ => {
                self.status() == Some(401)
                    || self.envelope().is_some_and(|e| e.requires_login)
            }
        }
    }
}
