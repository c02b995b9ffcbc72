//! Category operations.

use hostdeck_core::{CategoryDraft, CategoryId};
use tracing::instrument;

use super::{AdminGateway, DeletionConfirmed, item_path};
use crate::error::AdminError;
use crate::registry::{CATEGORIES_PATH, CatalogSource, CategoryListing, SchemaUnavailable};

fn category_path(id: &CategoryId) -> Result<String, AdminError> {
    item_path(CATEGORIES_PATH, id.as_str())
}

impl AdminGateway {
    /// Current categories.
    ///
    /// A backend failure yields the built-in categories in degraded mode
    /// rather than an error; only a rejected credential fails.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when there is no session or the backend
    /// rejects it.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<CategoryListing, AdminError> {
        let (headers, epoch) = self.authorized()?;
        let listing = self.inner.registry.list_categories(&headers).await;
        if listing.source == CatalogSource::BuiltinDefaults(SchemaUnavailable::Unauthorized) {
            return Err(self.expire(epoch).await);
        }
        Ok(listing)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` before any I/O if the draft is incomplete.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<(), AdminError> {
        self.authorized()?;
        draft.check()?;

        self.call(|api, headers| async move { api.post_unit(CATEGORIES_PATH, headers, draft).await })
            .await?;
        self.inner.registry.invalidate().await;
        Ok(())
    }

    /// Replace a category.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` or `InvalidId` before any I/O if the draft
    /// is incomplete or the ID cannot be addressed.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        draft: &CategoryDraft,
    ) -> Result<(), AdminError> {
        self.authorized()?;
        draft.check()?;

        let path = category_path(id)?;
        self.call(|api, headers| async move { api.put(&path, headers, draft).await })
            .await?;
        self.inner.registry.invalidate().await;
        Ok(())
    }

    /// Permanently delete a category.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated`, `InvalidId` or `NetworkOrServer`.
    #[instrument(skip(self, _confirmed), fields(id = %id))]
    pub async fn delete_category(
        &self,
        id: &CategoryId,
        _confirmed: DeletionConfirmed,
    ) -> Result<(), AdminError> {
        let path = category_path(id)?;
        self.call(|api, headers| async move { api.delete(&path, headers).await })
            .await?;
        self.inner.registry.invalidate().await;
        Ok(())
    }
}
