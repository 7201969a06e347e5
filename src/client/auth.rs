use http::HeaderMap;

use super::AuthClient;
use super::errors::AuthError;
use super::request::RequestPlan;
use super::types::{ChangePasswordRequest, LoginRequest, SetupRequest, StatusResponse};
use crate::guard::{Decision, ROUTE_LOGIN};

impl AuthClient {
    /// Password login. On success the token slot is cleared (the session
    /// cookie is the credential of record) and the session cache is marked
    /// authenticated.
    pub async fn login(&self, password: &str) -> bool {
        self.clear_last_error();
        match self.try_login(password).await {
            Ok(()) => true,
            Err(error) => {
                self.capture_error("Login failed", &error);
                self.inner.session.reset_auth();
                false
            }
        }
    }

    async fn try_login(&self, password: &str) -> Result<(), AuthError> {
        let plan = RequestPlan::post(self.url("/api/v1/auth/login"))
            .json(&LoginRequest { password })?;
        self.execute(plan).await?;
        self.inner.token.clear();
        self.inner.session.set_authenticated(true);
        Ok(())
    }

    /// Whether the backend has completed first-run setup. Failure to reach
    /// the backend yields `false`; the route guard uses [`try_check_init`]
    /// instead when it needs to tell the two apart.
    ///
    /// `headers` carries forwarded request headers (e.g. cookies) during
    /// server-side rendering.
    ///
    /// [`try_check_init`]: AuthClient::try_check_init
    pub async fn check_init(&self, headers: Option<HeaderMap>) -> bool {
        self.try_check_init(headers).await.unwrap_or(false)
    }

    pub async fn try_check_init(&self, headers: Option<HeaderMap>) -> Result<bool, AuthError> {
        self.clear_last_error();
        let mut plan = RequestPlan::get(self.url("/api/v1/auth/status"));
        if let Some(headers) = headers {
            plan = plan.headers(headers);
        }
        match self.fetch_status(plan).await {
            Ok(initialized) => {
                self.inner.session.set_initialized(initialized);
                Ok(initialized)
            }
            Err(error) => {
                self.capture_error("Check init failed", &error);
                Err(error)
            }
        }
    }

    async fn fetch_status(&self, plan: RequestPlan) -> Result<bool, AuthError> {
        let response = self.execute(plan).await?;
        let status: StatusResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(status.initialized)
    }

    /// First-run setup with the initial admin password.
    pub async fn setup(&self, password: &str, setup_token: Option<&str>) -> bool {
        self.clear_last_error();
        let result = async {
            let plan = RequestPlan::post(self.url("/api/v1/auth/setup")).json(&SetupRequest {
                password,
                setup_token,
            })?;
            self.execute(plan).await
        }
        .await;
        match result {
            Ok(_) => true,
            Err(error) => {
                self.capture_error("Setup failed", &error);
                false
            }
        }
    }

    /// Best-effort remote logout followed by unconditional local cleanup.
    /// Never fails from the caller's perspective; the returned decision is
    /// the post-logout navigation target.
    pub async fn logout(&self) -> Decision {
        self.clear_last_error();
        let plan = RequestPlan::post(self.url("/api/v1/auth/logout"));
        if let Err(error) = self.execute(plan).await {
            tracing::warn!("Logout request failed: {error}");
        }
        self.inner.token.clear();
        self.inner.session.reset_auth();
        Decision::redirect(ROUTE_LOGIN)
    }

    /// Ask the remote authority whether the current session cookie is still
    /// good, updating the session cache either way.
    ///
    /// Unlike the other operations this does not touch the last-error slot:
    /// a failed validation is an expected outcome of every guarded
    /// navigation, not something for the UI to report. [`last_error`] keeps
    /// whatever the previous operation left there.
    ///
    /// [`last_error`]: AuthClient::last_error
    pub async fn validate(&self, headers: Option<HeaderMap>) -> bool {
        match self.try_validate(headers).await {
            Ok(()) => {
                self.inner.session.set_authenticated(true);
                true
            }
            Err(_) => {
                self.inner.session.reset_auth();
                false
            }
        }
    }

    /// Raw validation probe for the route guard; touches neither the session
    /// cache nor the last-error slot.
    pub(crate) async fn try_validate(&self, headers: Option<HeaderMap>) -> Result<(), AuthError> {
        let mut plan = RequestPlan::get(self.url("/api/v1/auth/validate"));
        if let Some(headers) = headers {
            plan = plan.headers(headers);
        }
        self.execute(plan).await?;
        Ok(())
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> bool {
        self.clear_last_error();
        let result = async {
            let plan = RequestPlan::post(self.url("/api/v1/auth/change-password")).json(
                &ChangePasswordRequest {
                    current_password,
                    new_password,
                },
            )?;
            self.execute(plan).await
        }
        .await;
        match result {
            Ok(_) => true,
            Err(error) => {
                self.capture_error("Change password failed", &error);
                false
            }
        }
    }
}
