//! Commands for the unauthenticated endpoints.

use std::path::Path;

use hostdeck_core::{ContactMessage, LegalDocument};

use super::{CliError, Console, read_yaml};

pub async fn content(console: &Console, document: &str) -> Result<(), CliError> {
    let document: LegalDocument = document.parse().map_err(CliError::Input)?;

    let content = console.gateway.public().legal_content(document).await?;
    if console.json() {
        return console.emit(&content);
    }
    console.line(&content.title)?;
    console.line("")?;
    console.line(&content.content)
}

pub async fn promos(console: &Console, placement: &str) -> Result<(), CliError> {
    let codes = console.gateway.public().promo_codes(placement).await?;
    if console.json() {
        return console.emit(&codes);
    }
    for code in &codes {
        console.line(format!(
            "{:<16} {:<10} {}",
            code.code,
            code.discount.as_deref().unwrap_or("-"),
            code.description,
        ))?;
    }
    Ok(())
}

pub async fn status(console: &Console) -> Result<(), CliError> {
    let status = console.gateway.public().system_status().await?;
    if console.json() {
        return console.emit(&status);
    }
    console.line(format!(
        "Overall: {}",
        status.overall.as_deref().unwrap_or("unknown")
    ))?;
    for service in &status.services {
        console.line(format!(
            "  {:<24} {:<12} {}",
            service.name,
            service.status,
            service.uptime.as_deref().unwrap_or(""),
        ))?;
    }
    Ok(())
}

/// Send a contact message. Delivery failures are logged, not returned.
pub async fn contact(console: &Console, file: &Path) -> Result<(), CliError> {
    let message: ContactMessage = read_yaml(file)?;
    console.gateway.public().submit_contact(&message).await;
    Ok(())
}
