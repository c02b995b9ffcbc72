//! Company info commands.

use std::path::Path;

use hostdeck_core::CompanyInfo;
use tracing::info;

use super::{CliError, Console, read_yaml};

pub async fn show(console: &Console) -> Result<(), CliError> {
    console.require_session().await?;
    let company = console.gateway.company_info().await?;
    console.emit(&company)
}

/// Replace company info. Keys the console does not model are passed through.
pub async fn update(console: &Console, file: &Path) -> Result<(), CliError> {
    let company: CompanyInfo = read_yaml(file)?;
    console.require_session().await?;

    console.gateway.update_company_info(&company).await?;
    info!("Company info updated");
    console.line("Updated company info")
}
