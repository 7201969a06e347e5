use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request bodies

#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SetupRequest<'a> {
    pub(super) password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) setup_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChangePasswordRequest<'a> {
    pub(super) current_password: &'a str,
    pub(super) new_password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateTokenRequest<'a> {
    pub(super) name: &'a str,
    pub(super) ip_allowlist: &'a [String],
    pub(super) token_type: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CleanupRequest {
    pub(super) days: u32,
}

/// Response bodies

#[derive(Debug, Deserialize)]
pub(super) struct StatusResponse {
    #[serde(default)]
    pub(super) initialized: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct PasskeyExistsResponse {
    #[serde(default)]
    pub(super) has_passkey: bool,
}

/// Begin-response of a passkey ceremony. Both the challenge payload and the
/// correlation id are optional on the wire; the client aborts locally when
/// either is missing.
#[derive(Debug, Deserialize)]
pub(super) struct PasskeyBeginResponse {
    pub(super) session_id: Option<String>,
    pub(super) assertion: Option<ChallengeEnvelope>,
    pub(super) creation: Option<ChallengeEnvelope>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChallengeEnvelope {
    #[serde(rename = "publicKey")]
    pub(super) public_key: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PasskeyListResponse {
    #[serde(default)]
    pub(super) credentials: Vec<PasskeyCredential>,
}

/// A registered passkey credential as listed by the remote authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasskeyCredential {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "CredentialID")]
    pub credential_id: String,
    #[serde(rename = "UserAgent")]
    pub user_agent: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "DeviceName")]
    pub device_name: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// An API token as listed by the remote authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub ip_allowlist: Vec<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used_ip: String,
    pub created_at: DateTime<Utc>,
}

/// Returned once at token creation; `raw_token` is never shown again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTokenResponse {
    pub token: ApiToken,
    pub raw_token: String,
}

/// One access-log entry of an API token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTokenLog {
    pub id: u64,
    pub token_id: u64,
    pub token_name: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub action: String,
    pub method: String,
    pub path: String,
    pub ip_address: String,
    #[serde(default)]
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

/// One page of API-token access logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTokenLogPage {
    #[serde(default)]
    pub data: Vec<ApiTokenLog>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

/// Result of a token-log cleanup run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub deleted: u64,
    pub cutoff: DateTime<Utc>,
}

/// Severity of a security-event log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLogLevel {
    Info,
    Warning,
    Error,
}

/// One security-event log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityLog {
    pub id: u64,
    pub category: String,
    pub level: SecurityLogLevel,
    pub action: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub ip_address: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// One page of security-event logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityLogPage {
    #[serde(default)]
    pub data: Vec<SecurityLog>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

/// Pagination and filter parameters for the token-log listing.
#[derive(Debug, Clone)]
pub struct TokenLogQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub start_date: String,
    pub end_date: String,
    /// Token type filter, sent as the `type` query parameter
    pub kind: String,
}

impl Default for TokenLogQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            search: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            kind: String::new(),
        }
    }
}

impl TokenLogQuery {
    pub(super) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("search", self.search.clone()),
            ("start_date", self.start_date.clone()),
            ("end_date", self.end_date.clone()),
            ("type", self.kind.clone()),
        ]
    }
}

/// Pagination and filter parameters for the security-log listing.
#[derive(Debug, Clone)]
pub struct SecurityLogQuery {
    pub page: u32,
    pub page_size: u32,
    pub failed_only: bool,
    pub search: String,
    pub start_date: String,
    pub end_date: String,
    /// Category filter, sent as the `type` query parameter
    pub kind: String,
}

impl Default for SecurityLogQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            failed_only: false,
            search: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            kind: String::new(),
        }
    }
}

impl SecurityLogQuery {
    pub(super) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("failed_only", self.failed_only.to_string()),
            ("search", self.search.clone()),
            ("start_date", self.start_date.clone()),
            ("end_date", self.end_date.clone()),
            ("type", self.kind.clone()),
        ]
    }
}
