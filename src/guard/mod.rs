//! Per-navigation access decision.
//!
//! Evaluated before rendering a target route; the outcome is either
//! [`Decision::Allow`] or a redirect. Failures never propagate; an
//! unreachable or rejecting backend degrades to a redirect toward `/login`
//! or `/setup`. The TTL cache only spares a validation round-trip for a
//! recently confirmed session; the server stays authoritative.

use crate::client::AuthClient;
use crate::session::InitState;

pub const ROUTE_LOGIN: &str = "/login";
pub const ROUTE_SETUP: &str = "/setup";
pub const ROUTE_GALLERY: &str = "/gallery";

/// Outcome of a navigation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Render the requested route
    Allow,
    /// Navigate to the contained path instead
    Redirect(String),
}

impl Decision {
    pub(crate) fn redirect(path: &str) -> Self {
        Self::Redirect(path.to_string())
    }
}

fn is_public(path: &str) -> bool {
    path == ROUTE_LOGIN || path == ROUTE_SETUP
}

/// Route guard over the shared session cache and auth client.
#[derive(Clone)]
pub struct RouteGuard {
    client: AuthClient,
}

impl RouteGuard {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    /// Decide whether navigation to `path` may proceed.
    pub async fn before_navigate(&self, path: &str) -> Decision {
        let session = self.client.session();

        // Resolve the tri-state init flag before anything else. An
        // unreachable backend is not the same as "not initialized".
        if session.initialized() == InitState::Unknown
            && self.client.try_check_init(None).await.is_err()
        {
            session.reset_auth();
            return if is_public(path) {
                Decision::Allow
            } else {
                tracing::debug!(path, "init status unavailable, redirecting to login");
                Decision::redirect(ROUTE_LOGIN)
            };
        }

        if session.initialized() == InitState::Uninitialized {
            session.reset_auth();
            return if path == ROUTE_SETUP {
                Decision::Allow
            } else {
                Decision::redirect(ROUTE_SETUP)
            };
        }

        // Setup is done; its page must not be reachable again
        if path == ROUTE_SETUP {
            return Decision::redirect(ROUTE_LOGIN);
        }

        if path == ROUTE_LOGIN {
            return match self.client.try_validate(None).await {
                Ok(()) => {
                    session.set_authenticated(true);
                    Decision::redirect(ROUTE_GALLERY)
                }
                Err(_) => {
                    session.reset_auth();
                    Decision::Allow
                }
            };
        }

        if session.is_valid() {
            tracing::debug!(path, "auth cache hit, skipping remote validation");
            return Decision::Allow;
        }

        match self.client.try_validate(None).await {
            Ok(()) => {
                session.set_authenticated(true);
                Decision::Allow
            }
            Err(_) => {
                session.reset_auth();
                Decision::redirect(ROUTE_LOGIN)
            }
        }
    }
}
