//! Central configuration for the anzu-auth-client crate

use std::sync::LazyLock;

use url::Url;

/// Routing prefix applied uniformly to every API path
///
/// All auth endpoints are mounted under this prefix on the remote authority.
/// Default: "/kotori"
pub static ANZU_API_PREFIX: LazyLock<String> = LazyLock::new(|| {
    normalize_prefix(&std::env::var("ANZU_API_PREFIX").unwrap_or_else(|_| "/kotori".to_string()))
});

/// Connection settings for the remote authority.
///
/// Holds the base origin and the routing prefix under which every auth
/// endpoint is mounted. Embedders construct one explicitly; [`ClientConfig::from_env`]
/// reads `ANZU_API_ORIGIN` and `ANZU_API_PREFIX`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    origin: Url,
    prefix: String,
}

impl ClientConfig {
    pub fn new(origin: Url, prefix: &str) -> Self {
        Self {
            origin,
            prefix: normalize_prefix(prefix),
        }
    }

    /// Build from `ANZU_API_ORIGIN` and `ANZU_API_PREFIX`.
    pub fn from_env() -> Result<Self, url::ParseError> {
        let origin = std::env::var("ANZU_API_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Ok(Self {
            origin: Url::parse(&origin)?,
            prefix: ANZU_API_PREFIX.clone(),
        })
    }

    /// Absolute URL for an API path, with the routing prefix applied.
    pub(crate) fn api_url(&self, path: &str) -> String {
        let joined = join_path(&self.prefix, path);
        format!("{}{}", self.origin.as_str().trim_end_matches('/'), joined)
    }
}

/// Collapse a raw prefix to either "" or "/segment[/...]" with no trailing slash.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return String::new();
    }
    let with_leading = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    with_leading.trim_end_matches('/').to_string()
}

fn join_path(prefix: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}/{path}")
    }
}
