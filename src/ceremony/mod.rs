//! Capability seam over the platform credential API.
//!
//! The auth client hands a server-issued challenge payload to this trait and
//! gets back the signed assertion (login) or attestation (registration) to
//! forward verbatim to the finish endpoint. Each call is stateless and
//! single-shot: a rejection or user cancellation is final for that ceremony.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the platform credential API during a ceremony.
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// The user dismissed or timed out the credential prompt
    #[error("Ceremony cancelled by user")]
    Cancelled,

    /// The platform rejected the challenge payload or the operation
    #[error("Platform credential error: {0}")]
    Platform(String),
}

/// One WebAuthn challenge/response exchange.
///
/// Challenge payloads and ceremony results are opaque JSON; the client never
/// inspects them, it only round-trips them between the remote authority and
/// the platform.
#[async_trait]
pub trait CredentialCeremony: Send + Sync {
    /// Produce a signed assertion for a login challenge.
    async fn get_assertion(&self, public_key: Value) -> Result<Value, CeremonyError>;

    /// Produce an attestation for a registration challenge.
    async fn get_attestation(&self, public_key: Value) -> Result<Value, CeremonyError>;
}
