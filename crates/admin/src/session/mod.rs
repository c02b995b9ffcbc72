//! Session management: the process-wide bearer token.
//!
//! # State machine
//!
//! ```text
//! Unauthenticated --(restore ok | login ok)--> Authenticated
//! Authenticated --(logout | 401 on any call)--> Unauthenticated
//! ```
//!
//! Every mutation bumps an epoch. Work that started under an older epoch
//! (a slow token verification, a request that raced a new login) must not
//! overwrite the newer state.

mod token_store;

pub use token_store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore, TokenStoreError};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiClient, ApiError, LoginRequest, TokenResponse, VerifyResponse};
use crate::error::AdminError;

/// Message shown when a login failure carries no detail.
const LOGIN_FAILED: &str = "Login failed";

/// Owner of the bearer token.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    tokens: Box<dyn TokenStore>,
    state: RwLock<SessionState>,
    restored: AtomicBool,
    verifying: AtomicBool,
}

#[derive(Default)]
struct SessionState {
    token: Option<SecretString>,
    epoch: u64,
}

/// Clears the verifying flag even if the restore future is dropped.
struct VerifyingGuard<'a>(&'a AtomicBool);

impl<'a> VerifyingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for VerifyingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("token", &state.token.as_ref().map(|_| "[REDACTED]"))
            .field("epoch", &state.epoch)
            .field("verifying", &self.is_verifying())
            .finish()
    }
}

impl SessionStore {
    /// Create an unauthenticated session backed by `tokens`.
    #[must_use]
    pub fn new(api: ApiClient, tokens: Box<dyn TokenStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api,
                tokens,
                state: RwLock::new(SessionState::default()),
                restored: AtomicBool::new(false),
                verifying: AtomicBool::new(false),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a token is currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Whether a persisted token is being verified.
    #[must_use]
    pub fn is_verifying(&self) -> bool {
        self.inner.verifying.load(Ordering::SeqCst)
    }

    /// Current session epoch.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.read().epoch
    }

    /// `Authorization: Bearer <token>` when authenticated, empty otherwise.
    #[must_use]
    pub fn auth_header(&self) -> HeaderMap {
        bearer_headers(self.read().token.as_ref())
    }

    /// Headers and epoch captured together, or `None` when unauthenticated.
    pub(crate) fn authorization(&self) -> Option<(HeaderMap, u64)> {
        let state = self.read();
        let token = state.token.as_ref()?;
        Some((bearer_headers(Some(token)), state.epoch))
    }

    /// Restore the persisted session.
    ///
    /// Runs at most once per process; later calls report the current state
    /// without I/O. Returns whether the session is authenticated.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> bool {
        if self.inner.restored.swap(true, Ordering::SeqCst) {
            return self.is_authenticated();
        }

        let token = match self.inner.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No persisted token");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                return false;
            }
        };

        let started_at = self.epoch();
        let verified = {
            let _guard = VerifyingGuard::start(&self.inner.verifying);
            self.inner
                .api
                .get::<VerifyResponse>("/verify-token", bearer_headers(Some(&token)))
                .await
        };

        let mut state = self.write();
        if state.epoch != started_at {
            debug!("Session changed during verification; discarding result");
            return state.token.is_some();
        }

        match verified {
            Ok(VerifyResponse { valid: true }) => {
                state.token = Some(token);
                state.epoch += 1;
                info!("Restored persisted session");
                true
            }
            Ok(VerifyResponse { valid: false }) => {
                drop(state);
                info!("Persisted token is no longer valid");
                self.discard_persisted();
                false
            }
            Err(e) => {
                drop(state);
                warn!(error = %e, "Token verification failed");
                self.discard_persisted();
                false
            }
        }
    }

    /// Log in with operator credentials.
    ///
    /// # Errors
    ///
    /// Returns `LoginRejected` with the backend's message when the credentials
    /// are refused, or `NetworkOrServer` when the backend is unreachable.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), AdminError> {
        let request = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        let response: TokenResponse = self
            .inner
            .api
            .post("/login", HeaderMap::new(), &request)
            .await
            .map_err(login_error)?;

        if response.access_token.is_empty() {
            return Err(AdminError::LoginRejected(LOGIN_FAILED.to_string()));
        }
        let token = SecretString::from(response.access_token);

        if let Err(e) = self.inner.tokens.save(&token) {
            warn!(error = %e, "Failed to persist token; session lasts for this process only");
        }

        let mut state = self.write();
        state.token = Some(token);
        state.epoch += 1;
        self.inner.restored.store(true, Ordering::SeqCst);
        info!("Logged in");
        Ok(())
    }

    /// Drop the session and its persisted token. Idempotent.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        {
            let mut state = self.write();
            state.token = None;
            state.epoch += 1;
        }
        self.discard_persisted();
        debug!("Logged out");
    }

    /// Log out in response to a rejected credential, unless the session has
    /// changed since `epoch`. Returns whether the session was cleared.
    pub(crate) fn expire(&self, epoch: u64) -> bool {
        {
            let mut state = self.write();
            if state.epoch != epoch {
                debug!(epoch, current = state.epoch, "Ignoring 401 from an older session");
                return false;
            }
            state.token = None;
            state.epoch += 1;
        }
        self.discard_persisted();
        warn!("Session rejected by the backend; logged out");
        true
    }

    /// Take `token` as the current session without verifying it.
    #[cfg(test)]
    pub(crate) fn adopt(&self, token: &str) -> u64 {
        let mut state = self.write();
        state.token = Some(SecretString::from(token.to_owned()));
        state.epoch += 1;
        state.epoch
    }

    fn discard_persisted(&self) {
        if let Err(e) = self.inner.tokens.clear() {
            warn!(error = %e, "Failed to remove persisted token");
        }
    }
}

fn bearer_headers(token: Option<&SecretString>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let Some(token) = token else {
        return headers;
    };
    match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
        Ok(mut value) => {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Err(_) => warn!("Token contains characters not allowed in a header"),
    }
    headers
}

fn login_error(error: ApiError) -> AdminError {
    match error {
        ApiError::Unauthorized(message) | ApiError::Status { message, .. } => {
            AdminError::LoginRejected(if message.is_empty() {
                LOGIN_FAILED.to_string()
            } else {
                message
            })
        }
        other => AdminError::from(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use url::Url;

    use super::*;
    use crate::config::ConsoleConfig;

    /// Points at a port nothing listens on; tests here never reach it.
    fn session(tokens: MemoryTokenStore) -> SessionStore {
        let config = ConsoleConfig::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            PathBuf::from("/nonexistent/session.json"),
        );
        SessionStore::new(ApiClient::new(&config).unwrap(), Box::new(tokens))
    }

    #[tokio::test]
    async fn test_restore_without_token_is_unauthenticated() {
        let session = session(MemoryTokenStore::new());
        assert!(!session.restore().await);
        assert!(!session.is_authenticated());
        assert!(session.auth_header().is_empty());
        assert!(!session.is_verifying());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let session = session(MemoryTokenStore::with_token("tok"));
        let before = session.epoch();
        session.logout();
        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.epoch(), before + 2);
        assert!(session.inner.tokens.load().unwrap().is_none());
    }

    #[test]
    fn test_auth_header_is_sensitive() {
        let token = SecretString::from("tok-123".to_string());
        let headers = bearer_headers(Some(&token));
        let value = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer tok-123");
        assert!(value.is_sensitive());
        assert!(bearer_headers(None).is_empty());
    }

    #[test]
    fn test_expire_ignores_older_epoch() {
        let session = session(MemoryTokenStore::new());
        {
            let mut state = session.write();
            state.token = Some(SecretString::from("tok".to_string()));
            state.epoch = 5;
        }
        assert!(!session.expire(4));
        assert!(session.is_authenticated());
        assert!(session.expire(5));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_error_messages() {
        let err = login_error(ApiError::Unauthorized("Incorrect username or password".into()));
        assert_eq!(
            err.to_string(),
            "Login failed: Incorrect username or password"
        );
        let err = login_error(ApiError::Status {
            status: 422,
            message: String::new(),
        });
        assert!(matches!(err, AdminError::LoginRejected(ref m) if m == LOGIN_FAILED));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = session(MemoryTokenStore::new());
        session.write().token = Some(SecretString::from("tok-secret".to_string()));
        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok-secret"));
    }
}
