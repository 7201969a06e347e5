//! anzu-auth-client - Session authority for the Anzu web frontend
//!
//! This crate decides, on every navigation, whether the caller may proceed,
//! and orchestrates the password and WebAuthn passkey login ceremonies
//! against the remote authority. It owns the TTL-cached authentication
//! state, the route-guard decision logic, and the begin/ceremony/finish
//! protocol for passkey login and registration.

mod ceremony;
mod client;
mod config;
mod guard;
mod session;

pub use ceremony::{CeremonyError, CredentialCeremony};
pub use client::{
    ApiToken, ApiTokenLog, ApiTokenLogPage, AuthClient, AuthError, CleanupResponse,
    CreateTokenResponse, ParsedApiError, PasskeyCredential, SecurityLog, SecurityLogLevel,
    SecurityLogPage, SecurityLogQuery, TokenLogQuery,
};
pub use config::{ANZU_API_PREFIX, ClientConfig};
pub use guard::{Decision, RouteGuard, ROUTE_GALLERY, ROUTE_LOGIN, ROUTE_SETUP};
pub use session::{InitState, MemoryTokenStore, SessionCache, TokenStore, AUTH_CACHE_TTL};
