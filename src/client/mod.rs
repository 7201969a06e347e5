//! Stateless operations layer over the remote authority.
//!
//! Every public operation is async, never panics, and converts failure into
//! a boolean or empty-sentinel result plus an updated [`ParsedApiError`] in
//! the last-error slot. The `try_*` variants expose the underlying
//! [`AuthError`] to the route guard, which must tell "could not determine"
//! apart from "determined false".

mod auth;
mod errors;
mod passkey;
mod request;
mod tokens;
mod types;

use std::sync::{Arc, Mutex};

use crate::ceremony::CredentialCeremony;
use crate::config::ClientConfig;
use crate::session::{SessionCache, TokenStore};

pub use errors::{AuthError, ParsedApiError};
pub use types::{
    ApiToken, ApiTokenLog, ApiTokenLogPage, CleanupResponse, CreateTokenResponse,
    PasskeyCredential, SecurityLog, SecurityLogLevel, SecurityLogPage, SecurityLogQuery,
    TokenLogQuery,
};

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    session: SessionCache,
    token: Arc<dyn TokenStore>,
    ceremony: Arc<dyn CredentialCeremony>,
    last_error: Mutex<Option<ParsedApiError>>,
}

/// Client for the remote auth authority. Cheap to clone; clones share the
/// session cache, token slot and last-error slot.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<ClientInner>,
}

impl AuthClient {
    pub fn new(
        config: ClientConfig,
        session: SessionCache,
        token: Arc<dyn TokenStore>,
        ceremony: Arc<dyn CredentialCeremony>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                config,
                session,
                token,
                ceremony,
                last_error: Mutex::new(None),
            }),
        }
    }

    pub fn session(&self) -> &SessionCache {
        &self.inner.session
    }

    /// The most recent normalized failure, if the last operation failed.
    pub fn last_error(&self) -> Option<ParsedApiError> {
        self.inner
            .last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Display text of the last failure, or `fallback_message` when the last
    /// operation succeeded.
    pub fn last_error_display(&self, fallback_message: &str) -> String {
        self.last_error()
            .map(|e| e.display_message)
            .unwrap_or_else(|| fallback_message.to_string())
    }

    fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    fn url(&self, path: &str) -> String {
        self.inner.config.api_url(path)
    }

    fn clear_last_error(&self) {
        *self
            .inner
            .last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Normalize, log and cache a failure under its operation context label.
    fn capture_error(&self, context: &str, error: &AuthError) -> ParsedApiError {
        let parsed = ParsedApiError::from_error(error, context);
        tracing::error!(
            code = parsed.code.as_deref(),
            request_id = parsed.request_id.as_deref(),
            "{context}: {}",
            parsed.display_message
        );
        *self
            .inner
            .last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(parsed.clone());
        parsed
    }
}
