use std::sync::{Arc, Mutex};

/// Persisted slot for the `auth_token` cookie value.
///
/// The remote authority is session-cookie based; the bearer token it returns
/// from login is never kept. Every auth transition clears this slot, so the
/// only observable states are "absent" and whatever an embedder seeded it
/// with before the first transition.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, value: Option<String>);

    fn clear(&self) {
        self.set(None);
    }
}

/// In-memory [`TokenStore`] for native embedders and tests. Browser builds
/// substitute a cookie-backed implementation.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set(&self, value: Option<String>) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = value;
    }
}
