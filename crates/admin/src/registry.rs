//! Schema registry: the canonical in-memory set of categories.
//!
//! A failed listing never surfaces as an error. The registry keeps its cache
//! empty and serves the built-in categories in degraded mode, so the console
//! stays usable while the backend is down. Backend data is never overwritten
//! with the built-in set.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use hostdeck_core::bootstrap::default_categories;
use hostdeck_core::{Category, conformance, sort_for_display};
use reqwest::header::HeaderMap;
use tracing::{debug, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::cache::{CacheKey, CacheValue, CatalogCache};

/// Categories endpoint.
pub(crate) const CATEGORIES_PATH: &str = "/admin/categories";

/// What to show when the backend answers with an empty category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCatalogPolicy {
    /// Serve the built-in categories, flagged as degraded.
    #[default]
    UseDefaults,
    /// Show the empty list as is.
    ShowEmpty,
}

impl FromStr for EmptyCatalogPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "defaults" | "use_defaults" => Ok(Self::UseDefaults),
            "empty" | "show_empty" => Ok(Self::ShowEmpty),
            other => Err(format!("expected 'defaults' or 'empty', got '{other}'")),
        }
    }
}

/// Why the backend listing could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaUnavailable {
    /// The backend rejected the credential.
    Unauthorized,
    /// The request failed or the response could not be read.
    FetchFailed(String),
    /// The backend has no categories.
    EmptyCatalog,
}

impl fmt::Display for SchemaUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => f.write_str("credential rejected"),
            Self::FetchFailed(message) => write!(f, "category listing failed: {message}"),
            Self::EmptyCatalog => f.write_str("no categories defined"),
        }
    }
}

/// Where a listing came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Backend,
    BuiltinDefaults(SchemaUnavailable),
}

/// A category listing, ordered by `display_order` then `id`.
#[derive(Debug, Clone)]
pub struct CategoryListing {
    pub categories: Arc<Vec<Category>>,
    pub source: CatalogSource,
}

impl CategoryListing {
    /// True when the built-in categories are being served.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.source, CatalogSource::BuiltinDefaults(_))
    }

    /// Active category matching a plan type key.
    #[must_use]
    pub fn schema_for(&self, plan_type: &str) -> Option<&Category> {
        conformance::schema_for(&self.categories, plan_type)
    }

    fn builtin(reason: SchemaUnavailable) -> Self {
        let mut categories = default_categories();
        sort_for_display(&mut categories);
        Self {
            categories: Arc::new(categories),
            source: CatalogSource::BuiltinDefaults(reason),
        }
    }
}

/// Holder of the category set.
#[derive(Clone)]
pub struct SchemaRegistry {
    api: ApiClient,
    cache: CatalogCache,
    policy: EmptyCatalogPolicy,
}

impl SchemaRegistry {
    #[must_use]
    pub(crate) const fn new(api: ApiClient, cache: CatalogCache, policy: EmptyCatalogPolicy) -> Self {
        Self { api, cache, policy }
    }

    /// Current categories, fetched on first use and cached until invalidated.
    #[instrument(skip(self, auth))]
    pub(crate) async fn list_categories(&self, auth: &HeaderMap) -> CategoryListing {
        if let Some(categories) = self.cache.categories().await {
            return self.apply_policy(categories);
        }

        let generation = self.cache.generation(CacheKey::Categories);
        let raw = match self
            .api
            .get::<Vec<serde_json::Value>>(CATEGORIES_PATH, auth.clone())
            .await
        {
            Ok(raw) => raw,
            Err(ApiError::Unauthorized(_)) => {
                return CategoryListing::builtin(SchemaUnavailable::Unauthorized);
            }
            Err(e) => {
                warn!(error = %e, "Category listing unavailable; serving built-in categories");
                return CategoryListing::builtin(SchemaUnavailable::FetchFailed(e.to_string()));
            }
        };

        let categories = Arc::new(parse_categories(raw));
        self.cache
            .insert_if_current(
                CacheKey::Categories,
                generation,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;
        self.apply_policy(categories)
    }

    /// Drop the cached categories; the next listing re-fetches.
    pub(crate) async fn invalidate(&self) {
        self.cache.invalidate(CacheKey::Categories).await;
    }

    fn apply_policy(&self, categories: Arc<Vec<Category>>) -> CategoryListing {
        if categories.is_empty() && self.policy == EmptyCatalogPolicy::UseDefaults {
            debug!("Backend has no categories; serving built-in categories");
            return CategoryListing::builtin(SchemaUnavailable::EmptyCatalog);
        }
        CategoryListing {
            categories,
            source: CatalogSource::Backend,
        }
    }
}

/// Deserialize categories one by one, skipping those that violate their
/// invariants.
fn parse_categories(raw: Vec<serde_json::Value>) -> Vec<Category> {
    let mut categories: Vec<Category> = raw
        .into_iter()
        .filter_map(|value| {
            let id = value
                .get("id")
                .or_else(|| value.get("_id"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("<unknown>")
                .to_string();
            serde_json::from_value(value)
                .map_err(|e| warn!(category = %id, error = %e, "Skipping invalid category"))
                .ok()
        })
        .collect();
    sort_for_display(&mut categories);
    categories
}
