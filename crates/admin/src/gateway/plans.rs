//! Plan operations.
//!
//! Drafts are checked against their category before anything is sent. A
//! plan whose category no longer exists can still be updated unconstrained;
//! a new plan must reference an active category.

use std::sync::Arc;

use hostdeck_core::conformance::{self, PlanDraft};
use hostdeck_core::{Plan, PlanId, PlanInput, Violations};
use tracing::instrument;

use super::{AdminGateway, DeletionConfirmed, item_path};
use crate::cache::{CacheKey, CacheValue};
use crate::error::AdminError;

pub(crate) const PLANS_PATH: &str = "/hosting-plans";

fn plan_path(id: &PlanId) -> Result<String, AdminError> {
    item_path(PLANS_PATH, id.as_str())
}

impl AdminGateway {
    /// Current plans, cached until a plan write or logout.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `NetworkOrServer`.
    #[instrument(skip(self))]
    pub async fn list_plans(&self) -> Result<Arc<Vec<Plan>>, AdminError> {
        let (headers, epoch) = self.authorized()?;
        if let Some(plans) = self.inner.cache.plans().await {
            return Ok(plans);
        }

        let generation = self.inner.cache.generation(CacheKey::Plans);
        let plans: Vec<Plan> = self
            .send(epoch, self.inner.api.get(PLANS_PATH, headers))
            .await?;
        let plans = Arc::new(plans);
        self.inner
            .cache
            .insert_if_current(CacheKey::Plans, generation, CacheValue::Plans(Arc::clone(&plans)))
            .await;
        Ok(plans)
    }

    /// Validate a draft for a new plan without sending it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `ValidationFailed`.
    pub async fn check_new_plan(&self, draft: &PlanDraft) -> Result<PlanInput, AdminError> {
        let listing = self.list_categories().await?;
        let schema = listing.schema_for(&draft.plan_type);

        let mut violations = Vec::new();
        if !draft.plan_type.trim().is_empty()
            && let Err(found) = conformance::check_plan_type(&listing.categories, draft)
        {
            violations.extend(found.into_vec());
        }
        let validated = conformance::validate(schema, draft);
        if let Err(found) = &validated {
            violations.extend(found.iter().cloned());
        }
        Violations::into_result(violations)?;
        Ok(validated?)
    }

    /// Validate a draft for an existing plan without sending it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `ValidationFailed`.
    pub async fn check_plan_update(&self, draft: &PlanDraft) -> Result<PlanInput, AdminError> {
        let listing = self.list_categories().await?;
        Ok(conformance::validate(listing.schema_for(&draft.plan_type), draft)?)
    }

    /// Create a plan.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated`, `ValidationFailed` (nothing sent) or
    /// `NetworkOrServer`.
    #[instrument(skip(self, draft), fields(plan_name = %draft.plan_name))]
    pub async fn create_plan(&self, draft: &PlanDraft) -> Result<(), AdminError> {
        let input = self.check_new_plan(draft).await?;

        self.call(|api, headers| async move { api.post_unit(PLANS_PATH, headers, &input).await })
            .await?;
        self.inner.cache.invalidate(CacheKey::Plans).await;
        Ok(())
    }

    /// Update a plan.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `NetworkOrServer`. `ValidationFailed` and
    /// `InvalidId` mean nothing was sent.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update_plan(&self, id: &PlanId, draft: &PlanDraft) -> Result<(), AdminError> {
        let input = self.check_plan_update(draft).await?;

        let path = plan_path(id)?;
        self.call(|api, headers| async move { api.put(&path, headers, &input).await })
            .await?;
        self.inner.cache.invalidate(CacheKey::Plans).await;
        Ok(())
    }

    /// Permanently delete a plan.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated`, `InvalidId` or `NetworkOrServer`.
    #[instrument(skip(self, _confirmed), fields(id = %id))]
    pub async fn delete_plan(
        &self,
        id: &PlanId,
        _confirmed: DeletionConfirmed,
    ) -> Result<(), AdminError> {
        let path = plan_path(id)?;
        self.call(|api, headers| async move { api.delete(&path, headers).await })
            .await?;
        self.inner.cache.invalidate(CacheKey::Plans).await;
        Ok(())
    }
}
