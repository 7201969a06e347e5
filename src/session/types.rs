use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

/// How long a confirmed authentication stays fresh before the route guard
/// must re-query the remote authority.
pub const AUTH_CACHE_TTL: Duration = Duration::milliseconds(5 * 60 * 1000);

/// Whether the backend has completed first-run setup.
///
/// `Unknown` until the first successful status check of the application
/// session; the route guard resolves it before making any other decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Unknown,
    Initialized,
    Uninitialized,
}

#[derive(Debug)]
struct SessionState {
    initialized: InitState,
    authenticated: bool,
    last_validated_at: Option<DateTime<Utc>>,
}

/// Process-wide cache of the last known authentication and setup state.
///
/// A cheap `Clone` handle shared by the auth client and the route guard.
/// All reads and writes are synchronous, total, and immediately visible to
/// subsequent reads; the only mutation paths are [`set_initialized`],
/// [`set_authenticated`] and [`reset_auth`].
///
/// [`set_initialized`]: SessionCache::set_initialized
/// [`set_authenticated`]: SessionCache::set_authenticated
/// [`reset_auth`]: SessionCache::reset_auth
#[derive(Debug, Clone)]
pub struct SessionCache {
    inner: Arc<Mutex<SessionState>>,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                initialized: InitState::Unknown,
                authenticated: false,
                last_validated_at: None,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        // Writers never panic while holding the lock, but recover anyway
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn initialized(&self) -> InitState {
        self.state().initialized
    }

    pub fn authenticated(&self) -> bool {
        self.state().authenticated
    }

    pub fn last_validated_at(&self) -> Option<DateTime<Utc>> {
        self.state().last_validated_at
    }

    pub fn set_initialized(&self, initialized: bool) {
        self.state().initialized = if initialized {
            InitState::Initialized
        } else {
            InitState::Uninitialized
        };
    }

    /// Record the latest auth outcome, stamping `last_validated_at` with the
    /// call time. The stamp is overwritten on every call.
    pub fn set_authenticated(&self, authenticated: bool) {
        let mut state = self.state();
        state.authenticated = authenticated;
        state.last_validated_at = Some(Utc::now());
    }

    /// Clear the authenticated flag and its timestamp. Idempotent.
    pub fn reset_auth(&self) {
        let mut state = self.state();
        state.authenticated = false;
        state.last_validated_at = None;
    }

    /// True only while the last confirmed authentication is younger than
    /// [`AUTH_CACHE_TTL`]. Purely a read; never touches the network.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub(crate) fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let state = self.state();
        if !state.authenticated {
            return false;
        }
        match state.last_validated_at {
            Some(validated_at) => now - validated_at < AUTH_CACHE_TTL,
            None => false,
        }
    }
}
