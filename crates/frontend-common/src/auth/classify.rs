//! Response classification
//!
//! A failure reaching the guard is sometimes a raw transport outcome and
//! sometimes an already-parsed API envelope; [`ResponseLike`] normalizes
//! both shapes so [`classify`] stays a pure predicate.

use garage_http::{ApiEnvelope, ClientError};

/// Outcome of classifying a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Hard 401, or a body carrying `requiresLogin: true`.
    Unauthorized,
    /// Everything else; the generic error path applies.
    Other,
}

/// Either a transport-level outcome or an already-parsed API envelope.
#[derive(Debug, Clone)]
pub enum ResponseLike {
    Transport {
        status: Option<u16>,
        envelope: Option<ApiEnvelope>,
    },
    Parsed(ApiEnvelope),
}

impl ResponseLike {
    /// Normalize a dispatcher error into a classifiable response.
    pub fn from_error(error: &ClientError) -> Self {
        match error {
            // Already classified upstream; keep it unauthorized.
            ClientError::SessionExpired => Self::Transport {
                status: Some(401),
                envelope: None,
            },
            other => Self::Transport {
                status: other.status(),
                envelope: other.envelope().cloned(),
            },
        }
    }

    fn requires_login(&self) -> bool {
        match self {
            Self::Transport { envelope, .. } => {
                envelope.as_ref().is_some_and(|e| e.requires_login)
            }
            Self::Parsed(envelope) => envelope.requires_login,
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Parsed(_) => Some(200),
        }
    }
}

impl From<ApiEnvelope> for ResponseLike {
    fn from(envelope: ApiEnvelope) -> Self {
        Self::Parsed(envelope)
    }
}

/// Pure predicate: is this response an authentication expiry?
pub fn classify(response: &ResponseLike) -> Classification {
    if response.status() == Some(401) || response.requires_login() {
        Classification::Unauthorized
    } else {
        Classification::Other
    }
}
