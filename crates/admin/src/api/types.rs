//! Wire types for the authentication endpoints and failure payloads.

use serde::{Deserialize, Serialize};

/// `POST /login` body.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST /login` success body.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// `GET /verify-token` body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct VerifyResponse {
    #[serde(default)]
    pub valid: bool,
}

/// Failure payload: `{"detail": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
    Message(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorItem {
    #[serde(default)]
    pub msg: String,
}
