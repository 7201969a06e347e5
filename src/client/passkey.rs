//! Passkey ceremony orchestration and credential management.
//!
//! Both ceremonies follow the same two-phase protocol: a begin call yields a
//! challenge payload and a correlation `session_id`; the platform ceremony
//! signs the challenge; the finish call carries the signed result with the
//! session id echoed in the `X-Session-ID` header. Finish is never attempted
//! unless begin and the local ceremony both succeeded, and the session id
//! sent is exactly the one begin issued for this call.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::AuthClient;
use super::errors::AuthError;
use super::request::RequestPlan;
use super::types::{
    PasskeyBeginResponse, PasskeyCredential, PasskeyExistsResponse, PasskeyListResponse,
};

const X_SESSION_ID: HeaderName = HeaderName::from_static("x-session-id");

impl AuthClient {
    /// Passkey login. On success the token slot is cleared and the session
    /// cache is marked authenticated; any failure resets the auth state.
    pub async fn login_with_passkey(&self) -> bool {
        self.clear_last_error();
        match self.passkey_login_flow().await {
            Ok(()) => true,
            Err(error) => {
                self.capture_error("Passkey login failed", &error);
                self.inner.session.reset_auth();
                false
            }
        }
    }

    async fn passkey_login_flow(&self) -> Result<(), AuthError> {
        let begin = self
            .passkey_begin("/api/v1/auth/passkey/login/begin")
            .await?;
        let (session_id, public_key) = begin_fields(
            begin.session_id,
            begin.assertion.and_then(|a| a.public_key),
        )?;

        let assertion = self.inner.ceremony.get_assertion(public_key).await?;

        self.passkey_finish("/api/v1/auth/passkey/login/finish", &session_id, assertion)
            .await?;
        self.inner.token.clear();
        self.inner.session.set_authenticated(true);
        Ok(())
    }

    /// Register a new passkey for the already-authenticated user. Success
    /// does not touch the session cache; registration is not a login.
    pub async fn register_passkey(&self) -> bool {
        self.clear_last_error();
        match self.passkey_register_flow().await {
            Ok(()) => true,
            Err(error) => {
                self.capture_error("Passkey registration failed", &error);
                false
            }
        }
    }

    async fn passkey_register_flow(&self) -> Result<(), AuthError> {
        let begin = self
            .passkey_begin("/api/v1/auth/passkey/register/begin")
            .await?;
        let (session_id, public_key) =
            begin_fields(begin.session_id, begin.creation.and_then(|c| c.public_key))?;

        let attestation = self.inner.ceremony.get_attestation(public_key).await?;

        self.passkey_finish(
            "/api/v1/auth/passkey/register/finish",
            &session_id,
            attestation,
        )
        .await?;
        Ok(())
    }

    async fn passkey_begin(&self, path: &str) -> Result<PasskeyBeginResponse, AuthError> {
        let response = self.execute(RequestPlan::get(self.url(path))).await?;
        response
            .json()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))
    }

    async fn passkey_finish(
        &self,
        path: &str,
        session_id: &str,
        result: Value,
    ) -> Result<(), AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_SESSION_ID,
            HeaderValue::from_str(session_id).map_err(|_| {
                AuthError::Protocol("session_id is not a valid header value".to_string())
            })?,
        );
        let plan = RequestPlan::post(self.url(path))
            .json_value(result)
            .headers(headers);
        self.execute(plan).await?;
        Ok(())
    }

    /// List the registered passkey credentials; empty on failure.
    pub async fn list_passkeys(&self) -> Vec<PasskeyCredential> {
        self.clear_last_error();
        let result = async {
            let response = self
                .execute(RequestPlan::get(self.url("/api/v1/auth/passkeys")))
                .await?;
            let list: PasskeyListResponse = response
                .json()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;
            Ok::<_, AuthError>(list.credentials)
        }
        .await;
        match result {
            Ok(credentials) => credentials,
            Err(error) => {
                self.capture_error("List passkeys failed", &error);
                Vec::new()
            }
        }
    }

    /// Delete a passkey credential, falling back from `DELETE` to a `POST`
    /// on the `/delete` sub-path for deployments whose infrastructure blocks
    /// the canonical verb.
    pub async fn delete_passkey(&self, credential_id: &str) -> bool {
        self.clear_last_error();
        let plans = vec![
            RequestPlan::delete(self.url(&format!("/api/v1/auth/passkeys/{credential_id}"))),
            RequestPlan::post(self.url(&format!("/api/v1/auth/passkeys/{credential_id}/delete"))),
        ];
        match self.execute_with_fallback(plans).await {
            Ok(_) => true,
            Err(error) => {
                self.capture_error("Delete passkey failed", &error);
                false
            }
        }
    }

    /// Whether at least one passkey exists for the account.
    pub async fn check_passkey_exists(&self) -> bool {
        self.clear_last_error();
        let result = async {
            let response = self
                .execute(RequestPlan::get(self.url("/api/v1/auth/passkeys/check")))
                .await?;
            let exists: PasskeyExistsResponse = response
                .json()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;
            Ok::<_, AuthError>(exists.has_passkey)
        }
        .await;
        match result {
            Ok(has_passkey) => has_passkey,
            Err(error) => {
                self.capture_error("Check passkey exists failed", &error);
                false
            }
        }
    }
}

/// Reject a begin-response that is missing either correlation field. The
/// ceremony never starts and finish is never called in that case.
fn begin_fields(
    session_id: Option<String>,
    public_key: Option<Value>,
) -> Result<(String, Value), AuthError> {
    let session_id = session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::Protocol("no session_id in begin response".to_string()))?;
    let public_key = public_key
        .filter(|v| !v.is_null())
        .ok_or_else(|| AuthError::Protocol("no publicKey in begin response".to_string()))?;
    Ok((session_id, public_key))
}
