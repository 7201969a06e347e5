//! API-token management and audit-log listings.

use super::AuthClient;
use super::errors::AuthError;
use super::request::RequestPlan;
use super::types::{
    ApiToken, ApiTokenLogPage, CleanupRequest, CleanupResponse, CreateTokenRequest,
    CreateTokenResponse, SecurityLogPage, SecurityLogQuery, TokenLogQuery,
};

impl AuthClient {
    /// Mint a new API token. The raw token value in the response is shown
    /// exactly once.
    pub async fn create_api_token(
        &self,
        name: &str,
        ip_allowlist: &[String],
        token_type: &str,
    ) -> Option<CreateTokenResponse> {
        self.clear_last_error();
        let result = async {
            let plan = RequestPlan::post(self.url("/api/v1/auth/tokens")).json(
                &CreateTokenRequest {
                    name,
                    ip_allowlist,
                    token_type,
                },
            )?;
            let response = self.execute(plan).await?;
            response
                .json::<CreateTokenResponse>()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))
        }
        .await;
        match result {
            Ok(created) => Some(created),
            Err(error) => {
                self.capture_error("Create API token failed", &error);
                None
            }
        }
    }

    /// List all API tokens; empty on failure.
    pub async fn list_api_tokens(&self) -> Vec<ApiToken> {
        self.clear_last_error();
        let result = async {
            let response = self
                .execute(RequestPlan::get(self.url("/api/v1/auth/tokens")))
                .await?;
            response
                .json::<Vec<ApiToken>>()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))
        }
        .await;
        match result {
            Ok(tokens) => tokens,
            Err(error) => {
                self.capture_error("List API tokens failed", &error);
                Vec::new()
            }
        }
    }

    /// Delete an API token, with the `/delete` sub-path POST fallback.
    pub async fn delete_api_token(&self, id: u64) -> bool {
        self.clear_last_error();
        let plans = vec![
            RequestPlan::delete(self.url(&format!("/api/v1/auth/tokens/{id}"))),
            RequestPlan::post(self.url(&format!("/api/v1/auth/tokens/{id}/delete"))),
        ];
        match self.execute_with_fallback(plans).await {
            Ok(_) => true,
            Err(error) => {
                self.capture_error("Delete API token failed", &error);
                false
            }
        }
    }

    /// One page of token access logs; an empty page echoing the requested
    /// page/size on failure.
    pub async fn list_api_token_logs(&self, query: &TokenLogQuery) -> ApiTokenLogPage {
        self.clear_last_error();
        let result = async {
            let plan =
                RequestPlan::get(self.url("/api/v1/auth/tokens/logs")).query(query.to_pairs());
            let response = self.execute(plan).await?;
            response
                .json::<ApiTokenLogPage>()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))
        }
        .await;
        match result {
            Ok(page) => page,
            Err(error) => {
                self.capture_error("List API token logs failed", &error);
                ApiTokenLogPage {
                    data: Vec::new(),
                    total: 0,
                    page: query.page,
                    size: query.page_size,
                }
            }
        }
    }

    /// Purge token logs older than `days`. Tries `DELETE …/logs?days=` first,
    /// then the `POST …/logs/cleanup` fallback.
    pub async fn cleanup_api_token_logs(&self, days: u32) -> Option<CleanupResponse> {
        self.clear_last_error();
        let result = async {
            let plans = vec![
                RequestPlan::delete(self.url("/api/v1/auth/tokens/logs"))
                    .query(vec![("days", days.to_string())]),
                RequestPlan::post(self.url("/api/v1/auth/tokens/logs/cleanup"))
                    .json(&CleanupRequest { days })?,
            ];
            let response = self.execute_with_fallback(plans).await?;
            response
                .json::<CleanupResponse>()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))
        }
        .await;
        match result {
            Ok(cleaned) => Some(cleaned),
            Err(error) => {
                self.capture_error("Cleanup API token logs failed", &error);
                None
            }
        }
    }

    /// One page of security-event logs; an empty page sentinel on failure.
    pub async fn list_security_logs(&self, query: &SecurityLogQuery) -> SecurityLogPage {
        self.clear_last_error();
        let result = async {
            let plan =
                RequestPlan::get(self.url("/api/v1/auth/security/logs")).query(query.to_pairs());
            let response = self.execute(plan).await?;
            response
                .json::<SecurityLogPage>()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))
        }
        .await;
        match result {
            Ok(page) => page,
            Err(error) => {
                self.capture_error("List security logs failed", &error);
                SecurityLogPage {
                    data: Vec::new(),
                    total: 0,
                    page: query.page,
                    size: query.page_size,
                }
            }
        }
    }
}
