//! In-memory catalog cache.
//!
//! Entries have no TTL; they live until a write or logout invalidates them.
//! Each key carries a generation counter so a fetch that started before an
//! invalidation cannot repopulate the cache with stale data.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hostdeck_core::{Category, Plan};
use moka::future::Cache;
use tracing::debug;

/// Cache slices.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    Plans,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    /// Categories as returned by the backend, possibly empty.
    Categories(Arc<Vec<Category>>),
    Plans(Arc<Vec<Plan>>),
}

/// Shared catalog cache.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Arc<CatalogCacheInner>,
}

struct CatalogCacheInner {
    cache: Cache<CacheKey, CacheValue>,
    categories_generation: AtomicU64,
    plans_generation: AtomicU64,
}

impl CatalogCache {
    /// Create a cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Arc::new(CatalogCacheInner {
                cache: Cache::builder().max_capacity(capacity).build(),
                categories_generation: AtomicU64::new(0),
                plans_generation: AtomicU64::new(0),
            }),
        }
    }

    fn counter(&self, key: CacheKey) -> &AtomicU64 {
        match key {
            CacheKey::Categories => &self.inner.categories_generation,
            CacheKey::Plans => &self.inner.plans_generation,
        }
    }

    /// Current generation of `key`. Capture it before fetching.
    #[must_use]
    pub fn generation(&self, key: CacheKey) -> u64 {
        self.counter(key).load(Ordering::SeqCst)
    }

    /// Cached categories, if present.
    pub async fn categories(&self) -> Option<Arc<Vec<Category>>> {
        match self.inner.cache.get(&CacheKey::Categories).await {
            Some(CacheValue::Categories(categories)) => {
                debug!("Cache hit for categories");
                Some(categories)
            }
            _ => None,
        }
    }

    /// Cached plans, if present.
    pub async fn plans(&self) -> Option<Arc<Vec<Plan>>> {
        match self.inner.cache.get(&CacheKey::Plans).await {
            Some(CacheValue::Plans(plans)) => {
                debug!("Cache hit for plans");
                Some(plans)
            }
            _ => None,
        }
    }

    /// Store `value` unless `key` was invalidated after `generation` was
    /// captured. Returns whether the value was kept.
    pub async fn insert_if_current(&self, key: CacheKey, generation: u64, value: CacheValue) -> bool {
        if self.generation(key) != generation {
            debug!(?key, "Discarding stale fetch result");
            return false;
        }
        self.inner.cache.insert(key, value).await;

        // An invalidation may have landed between the check and the insert.
        if self.generation(key) != generation {
            self.inner.cache.invalidate(&key).await;
            debug!(?key, "Discarding stale fetch result");
            return false;
        }
        true
    }

    /// Drop one slice.
    pub async fn invalidate(&self, key: CacheKey) {
        self.counter(key).fetch_add(1, Ordering::SeqCst);
        self.inner.cache.invalidate(&key).await;
        debug!(?key, "Cache invalidated");
    }

    /// Drop everything.
    pub async fn clear(&self) {
        self.inner.categories_generation.fetch_add(1, Ordering::SeqCst);
        self.inner.plans_generation.fetch_add(1, Ordering::SeqCst);
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
        debug!("Cache cleared");
    }
}
