//! Authenticated catalog operations.
//!
//! Every call follows the same contract:
//! 1. An authenticated session is required; otherwise the call fails with
//!    [`AdminError::Unauthenticated`] before any I/O.
//! 2. The bearer header is attached.
//! 3. A 401 logs the session out and clears every cache.
//! 4. A successful write invalidates the affected cache slice; the next read
//!    re-fetches.
//! 5. One network write per call, never retried.

mod categories;
mod company;
mod plans;

pub(crate) use company::COMPANY_PATH;
pub(crate) use plans::PLANS_PATH;

use std::future::Future;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use secrecy::SecretString;
use tracing::{info, instrument, warn};
use url::Url;

use crate::api::{ApiClient, ApiError};
use crate::cache::CatalogCache;
use crate::config::ConsoleConfig;
use crate::error::AdminError;
use crate::public::PublicClient;
use crate::registry::SchemaRegistry;
use crate::session::{FileTokenStore, SessionStore, TokenStore};

/// Origin used only to run item paths through URL path encoding.
const PATH_ORIGIN: &str = "http://backend.invalid";

/// Path of item `id` within `collection`, with `id` encoded as exactly one
/// segment.
///
/// Empty, `.` and `..` IDs are rejected; they would address the collection
/// or its parent.
fn item_path(collection: &str, id: &str) -> Result<String, AdminError> {
    if matches!(id, "" | "." | "..") {
        return Err(AdminError::InvalidId(id.to_string()));
    }
    let mut url = Url::parse(PATH_ORIGIN).map_err(|_| AdminError::InvalidId(id.to_string()))?;
    url.set_path(collection);
    url.path_segments_mut()
        .map_err(|()| AdminError::InvalidId(id.to_string()))?
        .push(id);
    Ok(url.path().to_string())
}

/// Proof that the operator acknowledged a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionConfirmed(());

impl DeletionConfirmed {
    /// Interpret an interactive answer. Only "y" or "yes" confirm.
    #[must_use]
    pub fn from_answer(answer: &str) -> Option<Self> {
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes").then_some(Self(()))
    }

    /// Confirmation given up front, e.g. with `--yes`.
    #[must_use]
    pub const fn assumed() -> Self {
        Self(())
    }
}

/// Gateway for authenticated catalog operations.
///
/// Owns the session, the schema registry and the catalog cache; all three
/// live exactly as long as the gateway.
#[derive(Clone)]
pub struct AdminGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    api: ApiClient,
    session: SessionStore,
    registry: SchemaRegistry,
    cache: CatalogCache,
}

impl AdminGateway {
    /// Build a gateway persisting the token at `config.token_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, AdminError> {
        Self::new(config, Box::new(FileTokenStore::new(&config.token_path)))
    }

    /// Build a gateway with an explicit token store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ConsoleConfig, tokens: Box<dyn TokenStore>) -> Result<Self, AdminError> {
        let api = ApiClient::new(config)?;
        let cache = CatalogCache::new(config.cache_capacity);
        let session = SessionStore::new(api.clone(), tokens);
        let registry = SchemaRegistry::new(api.clone(), cache.clone(), config.empty_catalog);

        Ok(Self {
            inner: Arc::new(GatewayInner {
                api,
                session,
                registry,
                cache,
            }),
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Client for the unauthenticated endpoints, sharing this gateway's
    /// connection pool.
    #[must_use]
    pub fn public(&self) -> PublicClient {
        PublicClient::new(self.inner.api.clone())
    }

    /// Restore the persisted session and, when it is valid, load the
    /// categories and plans.
    ///
    /// Returns whether the session is authenticated.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> bool {
        let restored = self.inner.session.restore().await;
        if restored {
            self.initial_load().await;
        }
        restored
    }

    /// Log in and start from empty caches.
    ///
    /// # Errors
    ///
    /// Returns `LoginRejected` or `NetworkOrServer`; the session stays
    /// unauthenticated.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), AdminError> {
        self.inner.session.login(username, password).await?;
        self.inner.cache.clear().await;
        Ok(())
    }

    /// Log out and drop all cached catalog data. Idempotent.
    pub async fn logout(&self) {
        self.inner.session.logout();
        self.inner.cache.clear().await;
    }

    async fn initial_load(&self) {
        // Degraded listings are logged by the registry.
        if let Err(e) = self.list_categories().await {
            warn!(error = %e, "Initial category load failed");
        }
        if let Err(e) = self.list_plans().await {
            warn!(error = %e, "Initial plan load failed");
        }
    }

    /// Headers and session epoch, or `Unauthenticated` without any I/O.
    fn authorized(&self) -> Result<(HeaderMap, u64), AdminError> {
        self.inner
            .session
            .authorization()
            .ok_or(AdminError::Unauthenticated)
    }

    /// The session captured at `epoch` was rejected: log out and clear.
    async fn expire(&self, epoch: u64) -> AdminError {
        if self.inner.session.expire(epoch) {
            self.inner.cache.clear().await;
        }
        AdminError::Unauthenticated
    }

    /// Run one authenticated request.
    async fn call<T, F, Fut>(&self, request: F) -> Result<T, AdminError>
    where
        F: FnOnce(ApiClient, HeaderMap) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let (headers, epoch) = self.authorized()?;
        self.send(epoch, request(self.inner.api.clone(), headers))
            .await
    }

    /// Await a request issued under `epoch`, handling credential rejection.
    async fn send<T>(
        &self,
        epoch: u64,
        request: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, AdminError> {
        match request.await {
            Ok(value) => Ok(value),
            Err(ApiError::Unauthorized(message)) => {
                info!(%message, "Backend rejected the session");
                Err(self.expire(epoch).await)
            }
            Err(e) => Err(e.into()),
        }
    }
}
