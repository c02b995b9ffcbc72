//! Unauthenticated read client for the public endpoints.
//!
//! Used by the console to show what visitors see. Nothing here touches the
//! session or the catalog cache.

use chrono::Utc;
use hostdeck_core::{
    CompanyInfo, ContactMessage, LegalContent, LegalDocument, Plan, PromoCode, SystemStatus,
};
use reqwest::header::HeaderMap;
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::error::AdminError;
use crate::gateway::{COMPANY_PATH, PLANS_PATH};

/// Client for the public endpoints.
#[derive(Clone)]
pub struct PublicClient {
    api: ApiClient,
}

impl PublicClient {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Plans as listed publicly.
    ///
    /// # Errors
    ///
    /// Returns `NetworkOrServer` if the request fails.
    #[instrument(skip(self))]
    pub async fn plans(&self) -> Result<Vec<Plan>, AdminError> {
        Ok(self.api.get(PLANS_PATH, HeaderMap::new()).await?)
    }

    /// Company info.
    ///
    /// # Errors
    ///
    /// Returns `NetworkOrServer` if the request fails.
    #[instrument(skip(self))]
    pub async fn company_info(&self) -> Result<CompanyInfo, AdminError> {
        Ok(self.api.get(COMPANY_PATH, HeaderMap::new()).await?)
    }

    /// Terms of service or privacy policy.
    ///
    /// # Errors
    ///
    /// Returns `NetworkOrServer` if the request fails.
    #[instrument(skip(self), fields(document = %document))]
    pub async fn legal_content(&self, document: LegalDocument) -> Result<LegalContent, AdminError> {
        let path = format!("/content/{document}");
        Ok(self.api.get(&path, HeaderMap::new()).await?)
    }

    /// Promo codes visible at `placement` right now.
    ///
    /// # Errors
    ///
    /// Returns `NetworkOrServer` if the request fails.
    #[instrument(skip(self))]
    pub async fn promo_codes(&self, placement: &str) -> Result<Vec<PromoCode>, AdminError> {
        let codes: Vec<PromoCode> = self.api.get("/promo-codes", HeaderMap::new()).await?;
        let now = Utc::now();
        Ok(codes
            .into_iter()
            .filter(|code| code.is_visible_at(placement, now))
            .collect())
    }

    /// Service status board.
    ///
    /// # Errors
    ///
    /// Returns `NetworkOrServer` if the request fails.
    #[instrument(skip(self))]
    pub async fn system_status(&self) -> Result<SystemStatus, AdminError> {
        Ok(self.api.get("/system-status", HeaderMap::new()).await?)
    }

    /// Submit a contact message. The outcome is logged, never retried.
    #[instrument(skip(self, message), fields(email = %message.email))]
    pub async fn submit_contact(&self, message: &ContactMessage) {
        match self.api.post_unit("/contact", HeaderMap::new(), message).await {
            Ok(()) => info!("Contact message submitted"),
            Err(e) => warn!(error = %e, "Contact message not delivered"),
        }
    }
}
