use http::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::AuthClient;
use super::errors::AuthError;

/// One planned HTTP attempt. Delete-style operations build an ordered list
/// of these (canonical verb first, `/delete` sub-path fallback second) and
/// hand it to [`AuthClient::execute_with_fallback`]; first success wins.
#[derive(Debug)]
pub(super) struct RequestPlan {
    pub(super) method: Method,
    pub(super) url: String,
    pub(super) body: Option<Value>,
    pub(super) query: Vec<(&'static str, String)>,
    pub(super) headers: HeaderMap,
}

impl RequestPlan {
    pub(super) fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            body: None,
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    pub(super) fn get(url: String) -> Self {
        Self::new(Method::GET, url)
    }

    pub(super) fn post(url: String) -> Self {
        Self::new(Method::POST, url)
    }

    pub(super) fn delete(url: String) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub(super) fn json<T: Serialize>(mut self, body: &T) -> Result<Self, AuthError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub(super) fn json_value(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(super) fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub(super) fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl AuthClient {
    /// Send one planned request. A 2xx response is returned as-is; anything
    /// else becomes an [`AuthError`] with the structured error body and the
    /// `x-request-id` header folded in.
    pub(super) async fn execute(&self, plan: RequestPlan) -> Result<reqwest::Response, AuthError> {
        let mut request = self.http().request(plan.method, &plan.url);
        if !plan.query.is_empty() {
            request = request.query(&plan.query);
        }
        if !plan.headers.is_empty() {
            request = request.headers(plan.headers);
        }
        if let Some(body) = &plan.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let header_request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        // Error bodies are `{code, message, request_id}`; tolerate anything else
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let field = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Err(AuthError::Remote {
            status: status.as_u16(),
            code: field("code"),
            message: field("message"),
            request_id: field("request_id").or(header_request_id),
        })
    }

    /// Try each plan in order; the first success wins and intermediate
    /// failures are only logged. The error of the final attempt is returned
    /// when every plan fails.
    pub(super) async fn execute_with_fallback(
        &self,
        plans: Vec<RequestPlan>,
    ) -> Result<reqwest::Response, AuthError> {
        let total = plans.len();
        let mut last_error = AuthError::Protocol("no request plans".to_string());
        for (attempt, plan) in plans.into_iter().enumerate() {
            let url = plan.url.clone();
            match self.execute(plan).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    if attempt + 1 < total {
                        tracing::debug!(%url, %error, "request attempt failed, trying fallback");
                    }
                    last_error = error;
                }
            }
        }
        Err(last_error)
    }
}
