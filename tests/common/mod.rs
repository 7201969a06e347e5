//! In-process stand-in for the remote authority, plus a scripted ceremony
//! double. Each test spins up its own server on an ephemeral port and points
//! a client at it through the `/kotori` routing prefix.

// Each test binary uses a different slice of this harness
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Json;
use serde_json::{Value, json};
use url::Url;

use anzu_auth_client::{
    AuthClient, CeremonyError, ClientConfig, CredentialCeremony, MemoryTokenStore, SessionCache,
    TokenStore,
};

pub struct ServerState {
    pub login_ok: AtomicBool,
    pub status_initialized: AtomicBool,
    pub status_fails: AtomicBool,
    pub validate_ok: AtomicBool,
    pub validate_calls: AtomicUsize,
    pub setup_ok: AtomicBool,
    pub logout_ok: AtomicBool,
    pub begin_body: Mutex<Value>,
    pub expected_session_id: Mutex<String>,
    pub expected_ceremony_result: Mutex<Value>,
    pub finish_calls: AtomicUsize,
    pub primary_delete_ok: AtomicBool,
    pub fallback_delete_ok: AtomicBool,
    pub primary_delete_calls: AtomicUsize,
    pub fallback_delete_calls: AtomicUsize,
    pub logs_ok: AtomicBool,
    /// When set, rejections omit `request_id` from the body so only the
    /// `x-request-id` response header identifies the request
    pub reject_without_body_request_id: AtomicBool,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            login_ok: AtomicBool::new(true),
            status_initialized: AtomicBool::new(true),
            status_fails: AtomicBool::new(false),
            validate_ok: AtomicBool::new(true),
            validate_calls: AtomicUsize::new(0),
            setup_ok: AtomicBool::new(true),
            logout_ok: AtomicBool::new(true),
            begin_body: Mutex::new(Value::Null),
            expected_session_id: Mutex::new("sess-123".to_string()),
            expected_ceremony_result: Mutex::new(Value::Null),
            finish_calls: AtomicUsize::new(0),
            primary_delete_ok: AtomicBool::new(true),
            fallback_delete_ok: AtomicBool::new(true),
            primary_delete_calls: AtomicUsize::new(0),
            fallback_delete_calls: AtomicUsize::new(0),
            logs_ok: AtomicBool::new(true),
            reject_without_body_request_id: AtomicBool::new(false),
        }
    }
}

fn rejection(state: &ServerState) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("x-request-id", "req-hdr-1".parse().unwrap());
    let mut body = json!({
        "code": "unauthorized",
        "message": "invalid credentials",
        "request_id": "req-1",
    });
    if state.reject_without_body_request_id.load(Ordering::SeqCst) {
        body.as_object_mut().unwrap().remove("request_id");
    }
    (StatusCode::UNAUTHORIZED, headers, Json(body)).into_response()
}

async fn login(State(state): State<Arc<ServerState>>) -> Response {
    if state.login_ok.load(Ordering::SeqCst) {
        Json(json!({"token": "issued-token"})).into_response()
    } else {
        rejection(&state)
    }
}

async fn status(State(state): State<Arc<ServerState>>) -> Response {
    if state.status_fails.load(Ordering::SeqCst) {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    } else {
        Json(json!({"initialized": state.status_initialized.load(Ordering::SeqCst)}))
            .into_response()
    }
}

async fn setup(State(state): State<Arc<ServerState>>, Json(body): Json<Value>) -> Response {
    if body.get("password").and_then(Value::as_str).is_none() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if state.setup_ok.load(Ordering::SeqCst) {
        StatusCode::OK.into_response()
    } else {
        rejection(&state)
    }
}

async fn change_password(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Response {
    if body.get("current_password").and_then(Value::as_str).is_none()
        || body.get("new_password").and_then(Value::as_str).is_none()
    {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if state.setup_ok.load(Ordering::SeqCst) {
        StatusCode::OK.into_response()
    } else {
        rejection(&state)
    }
}

async fn logout(State(state): State<Arc<ServerState>>) -> Response {
    if state.logout_ok.load(Ordering::SeqCst) {
        StatusCode::OK.into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

async fn validate(State(state): State<Arc<ServerState>>) -> Response {
    state.validate_calls.fetch_add(1, Ordering::SeqCst);
    if state.validate_ok.load(Ordering::SeqCst) {
        StatusCode::OK.into_response()
    } else {
        rejection(&state)
    }
}

async fn passkey_begin(State(state): State<Arc<ServerState>>) -> Response {
    Json(state.begin_body.lock().unwrap().clone()).into_response()
}

async fn passkey_finish(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.finish_calls.fetch_add(1, Ordering::SeqCst);
    let expected_session = state.expected_session_id.lock().unwrap().clone();
    let session_header = headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if session_header != expected_session {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if body != *state.expected_ceremony_result.lock().unwrap() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(json!({"token": "issued-token"})).into_response()
}

async fn delete_primary(
    State(state): State<Arc<ServerState>>,
    Path(_id): Path<String>,
) -> Response {
    state.primary_delete_calls.fetch_add(1, Ordering::SeqCst);
    if state.primary_delete_ok.load(Ordering::SeqCst) {
        StatusCode::OK.into_response()
    } else {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    }
}

async fn delete_fallback(
    State(state): State<Arc<ServerState>>,
    Path(_id): Path<String>,
) -> Response {
    state.fallback_delete_calls.fetch_add(1, Ordering::SeqCst);
    if state.fallback_delete_ok.load(Ordering::SeqCst) {
        StatusCode::OK.into_response()
    } else {
        rejection(&state)
    }
}

async fn list_passkeys(State(state): State<Arc<ServerState>>) -> Response {
    if !state.logs_ok.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "credentials": [{
            "ID": 1,
            "CredentialID": "cred-1",
            "UserAgent": "Mozilla/5.0",
            "IPAddress": "127.0.0.1",
            "DeviceName": "laptop",
            "CreatedAt": "2026-01-01T00:00:00Z",
            "UpdatedAt": "2026-01-02T00:00:00Z",
        }],
        "count": 1,
    }))
    .into_response()
}

async fn token_logs(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> Response {
    if !state.logs_ok.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let page = query
        .get("page")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);
    Json(json!({
        "data": [{
            "id": 7,
            "token_id": 3,
            "token_name": "ci",
            "token_type": "readonly",
            "action": "download",
            "method": "GET",
            "path": "/img/a.png",
            "ip_address": "10.0.0.5",
            "user_agent": "curl/8",
            "created_at": "2026-02-01T12:00:00Z",
        }],
        "total": 1,
        "page": page,
        "size": 20,
    }))
    .into_response()
}

async fn cleanup_logs_primary(State(state): State<Arc<ServerState>>) -> Response {
    state.primary_delete_calls.fetch_add(1, Ordering::SeqCst);
    if state.primary_delete_ok.load(Ordering::SeqCst) {
        Json(json!({"deleted": 4, "cutoff": "2026-01-15T00:00:00Z"})).into_response()
    } else {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    }
}

async fn cleanup_logs_fallback(State(state): State<Arc<ServerState>>) -> Response {
    state.fallback_delete_calls.fetch_add(1, Ordering::SeqCst);
    if state.fallback_delete_ok.load(Ordering::SeqCst) {
        Json(json!({"deleted": 4, "cutoff": "2026-01-15T00:00:00Z"})).into_response()
    } else {
        rejection(&state)
    }
}

async fn create_token(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Response {
    if !state.logs_ok.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
    Json(json!({
        "token": {
            "id": 3,
            "name": name,
            "ip_allowlist": body.get("ip_allowlist").cloned().unwrap_or(json!([])),
            "last_used_at": null,
            "last_used_ip": "",
            "created_at": "2026-02-01T12:00:00Z",
        },
        "raw_token": "anzu_secret_raw",
    }))
    .into_response()
}

async fn list_tokens(State(state): State<Arc<ServerState>>) -> Response {
    if !state.logs_ok.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!([{
        "id": 3,
        "name": "ci",
        "ip_allowlist": ["10.0.0.0/8"],
        "last_used_at": "2026-02-03T09:00:00Z",
        "last_used_ip": "10.0.0.5",
        "created_at": "2026-02-01T12:00:00Z",
    }]))
    .into_response()
}

async fn security_logs(State(state): State<Arc<ServerState>>) -> Response {
    if !state.logs_ok.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "data": [{
            "id": 11,
            "category": "auth",
            "level": "warning",
            "action": "login_failed",
            "message": "bad password",
            "ip_address": "10.0.0.6",
            "username": "admin",
            "created_at": "2026-02-02T08:30:00Z",
        }],
        "total": 1,
        "page": 1,
        "size": 20,
    }))
    .into_response()
}

fn router(state: Arc<ServerState>) -> Router {
    let auth = Router::new()
        .route("/login", post(login))
        .route("/status", get(status))
        .route("/setup", post(setup))
        .route("/logout", post(logout))
        .route("/validate", get(validate))
        .route("/change-password", post(change_password))
        .route("/passkey/login/begin", get(passkey_begin))
        .route("/passkey/login/finish", post(passkey_finish))
        .route("/passkey/register/begin", get(passkey_begin))
        .route("/passkey/register/finish", post(passkey_finish))
        .route("/passkeys", get(list_passkeys))
        .route("/passkeys/{id}", delete(delete_primary))
        .route("/passkeys/{id}/delete", post(delete_fallback))
        .route("/tokens", post(create_token).get(list_tokens))
        .route("/tokens/{id}", delete(delete_primary))
        .route("/tokens/{id}/delete", post(delete_fallback))
        .route(
            "/tokens/logs",
            get(token_logs).delete(cleanup_logs_primary),
        )
        .route("/tokens/logs/cleanup", post(cleanup_logs_fallback))
        .route("/security/logs", get(security_logs))
        .with_state(state);

    Router::new().nest("/kotori/api/v1/auth", auth)
}

/// Bind the stand-in authority on an ephemeral port and return its origin.
pub async fn start_server(state: Arc<ServerState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });
    format!("http://{addr}")
}

pub struct ScriptedCeremony {
    pub result: Value,
    pub cancel: bool,
    pub seen_challenge: Mutex<Option<Value>>,
}

impl ScriptedCeremony {
    pub fn succeeding(result: Value) -> Self {
        Self {
            result,
            cancel: false,
            seen_challenge: Mutex::new(None),
        }
    }

    pub fn cancelling() -> Self {
        Self {
            result: Value::Null,
            cancel: true,
            seen_challenge: Mutex::new(None),
        }
    }

    fn run(&self, public_key: Value) -> Result<Value, CeremonyError> {
        *self.seen_challenge.lock().unwrap() = Some(public_key);
        if self.cancel {
            Err(CeremonyError::Cancelled)
        } else {
            Ok(self.result.clone())
        }
    }
}

#[async_trait]
impl CredentialCeremony for ScriptedCeremony {
    async fn get_assertion(&self, public_key: Value) -> Result<Value, CeremonyError> {
        self.run(public_key)
    }

    async fn get_attestation(&self, public_key: Value) -> Result<Value, CeremonyError> {
        self.run(public_key)
    }
}

pub struct Harness {
    pub client: AuthClient,
    pub session: SessionCache,
    pub token_store: MemoryTokenStore,
    pub ceremony: Arc<ScriptedCeremony>,
}

/// Wire a client to `origin` with a fresh session cache, a shared in-memory
/// token slot and the given ceremony double.
pub fn build_client(origin: &str, ceremony: ScriptedCeremony) -> Harness {
    let session = SessionCache::new();
    let token_store = MemoryTokenStore::new();
    let ceremony = Arc::new(ceremony);
    let config = ClientConfig::new(Url::parse(origin).expect("test origin"), "/kotori");
    let client = AuthClient::new(
        config,
        session.clone(),
        Arc::new(token_store.clone()),
        ceremony.clone(),
    );
    Harness {
        client,
        session,
        token_store,
        ceremony,
    }
}

/// Seed the token slot so tests can observe it being cleared.
pub fn seed_token(harness: &Harness) {
    harness.token_store.set(Some("stale-token".to_string()));
}
