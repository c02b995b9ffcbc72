//! HTTP transport for the catalog backend.
//!
//! A thin JSON client over `reqwest`. It knows nothing about sessions: callers
//! pass the authorization headers for each request, and a 401 response is
//! reported as [`ApiError::Unauthorized`] so the session layer can react.

mod types;

pub(crate) use types::{LoginRequest, TokenResponse, VerifyResponse};

use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ConsoleConfig;
use types::{ErrorDetail, ErrorPayload};

/// Fallback message when a failure payload carries no usable detail.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the credential (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a success response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// JSON client for the catalog backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("hostdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url(&config.api_url),
            }),
        })
    }

    /// Backend base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: HeaderMap,
    ) -> Result<T, ApiError> {
        debug!(method = "GET", path, "backend request");
        let response = self
            .inner
            .client
            .get(self.url(path))
            .headers(headers)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Execute a POST request and parse the response.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(method = "POST", path, "backend request");
        let response = self
            .inner
            .client
            .post(self.url(path))
            .headers(headers)
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Execute a POST request, discarding the response body.
    pub(crate) async fn post_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<(), ApiError> {
        debug!(method = "POST", path, "backend request");
        let response = self
            .inner
            .client
            .post(self.url(path))
            .headers(headers)
            .json(body)
            .send()
            .await?;
        handle_empty(response).await
    }

    /// Execute a PUT request, discarding the response body.
    pub(crate) async fn put<B: Serialize + Sync>(
        &self,
        path: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<(), ApiError> {
        debug!(method = "PUT", path, "backend request");
        let response = self
            .inner
            .client
            .put(self.url(path))
            .headers(headers)
            .json(body)
            .send()
            .await?;
        handle_empty(response).await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(&self, path: &str, headers: HeaderMap) -> Result<(), ApiError> {
        debug!(method = "DELETE", path, "backend request");
        let response = self
            .inner
            .client
            .delete(self.url(path))
            .headers(headers)
            .send()
            .await?;
        handle_empty(response).await
    }
}

fn base_url(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

/// Handle API response and parse JSON.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    if response.status().is_success() {
        return response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
    }

    Err(parse_error(response).await)
}

/// Accept any success status, ignoring the body.
async fn handle_empty(response: reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        return Ok(());
    }

    Err(parse_error(response).await)
}

/// Parse an error response from the backend.
async fn parse_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = detail_message(&body)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
        })
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized(message);
    }

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Extract the human-readable `detail` of a failure payload.
///
/// `detail` is either a string or a list of `{msg}` objects; list messages
/// are joined with "; ".
#[must_use]
pub fn detail_message(body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    let message = match payload.detail? {
        ErrorDetail::Message(message) => message,
        ErrorDetail::Items(items) => items
            .into_iter()
            .map(|item| item.msg)
            .filter(|msg| !msg.trim().is_empty())
            .collect::<Vec<_>>()
            .join("; "),
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}
