mod token;
mod types;

pub use token::{MemoryTokenStore, TokenStore};
pub use types::{InitState, SessionCache, AUTH_CACHE_TTL};
