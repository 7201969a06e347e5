use thiserror::Error;

use crate::ceremony::CeremonyError;

/// Errors that can occur when talking to the remote authority.
///
/// These never escape the boolean-returning public operations; they feed the
/// error normalizer and the guard-facing `try_*` variants.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Network-level failure, no response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote authority answered with an error status
    #[error("Remote rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Remote {
        status: u16,
        code: Option<String>,
        message: Option<String>,
        request_id: Option<String>,
    },

    /// Malformed response or missing correlation field on our side of the wire
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The platform credential API rejected the ceremony
    #[error("Ceremony error: {0}")]
    Ceremony(#[from] CeremonyError),

    /// Error converting between data formats using Serde
    #[error("Json conversion(Serde) error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Uniform failure descriptor built from heterogeneous transport and server
/// errors. One lives in the client's "last error" slot for UI consumption
/// and is overwritten by every subsequent failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedApiError {
    /// Machine-readable error code from the response body, if any
    pub code: Option<String>,
    /// Best available human-readable message
    pub message: String,
    /// Correlation id from the body or the `x-request-id` header
    pub request_id: Option<String>,
    /// `message`, with `(request_id: …)` appended when one is known
    pub display_message: String,
}

impl ParsedApiError {
    /// Normalize an [`AuthError`]. Message priority: structured body message,
    /// raw error text, then the caller-supplied context string.
    pub fn from_error(error: &AuthError, fallback_message: &str) -> Self {
        let (code, message, request_id) = match error {
            AuthError::Remote {
                status,
                code,
                message,
                request_id,
            } => {
                let message = message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("HTTP {status}"));
                (code.clone(), message, request_id.clone())
            }
            AuthError::Transport(raw) if !raw.is_empty() => (None, raw.clone(), None),
            AuthError::Transport(_) => (None, fallback_message.to_string(), None),
            other => (None, other.to_string(), None),
        };

        let display_message = match &request_id {
            Some(id) => format!("{message} (request_id: {id})"),
            None => message.clone(),
        };

        Self {
            code,
            message,
            request_id,
            display_message,
        }
    }
}
