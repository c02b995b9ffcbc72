//! Company info operations. The backend has no create or delete for it.

use hostdeck_core::CompanyInfo;
use tracing::instrument;

use super::AdminGateway;
use crate::error::AdminError;

pub(crate) const COMPANY_PATH: &str = "/company-info";

impl AdminGateway {
    /// Current company info.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `NetworkOrServer`.
    #[instrument(skip(self))]
    pub async fn company_info(&self) -> Result<CompanyInfo, AdminError> {
        self.call(|api, headers| async move { api.get(COMPANY_PATH, headers).await })
            .await
    }

    /// Replace company info. Unknown fields read earlier are sent back as is.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `NetworkOrServer`.
    #[instrument(skip(self, info))]
    pub async fn update_company_info(&self, info: &CompanyInfo) -> Result<(), AdminError> {
        self.call(|api, headers| async move { api.put(COMPANY_PATH, headers, info).await })
            .await
    }
}
