//! Category commands.

use std::path::Path;

use hostdeck_admin::{CatalogSource, CategoryListing};
use hostdeck_core::conformance;
use hostdeck_core::{Category, CategoryDraft, CategoryId};
use tracing::{info, warn};

use super::{CliError, Console, confirm_deletion, read_yaml};

/// List categories in display order.
pub async fn list(console: &Console) -> Result<(), CliError> {
    console.require_session().await?;
    let listing = console.gateway.list_categories().await?;
    report_source(&listing);

    if console.json() {
        return console.emit(&*listing.categories);
    }
    for category in listing.categories.iter() {
        console.line(format!(
            "{:>3}  {:<24} {:<18} {}{}",
            category.display_order,
            category.id,
            category.plan_type_key(),
            category.name,
            if category.is_active { "" } else { " (inactive)" },
        ))?;
    }
    Ok(())
}

/// Show one category, looked up by ID or plan type key.
pub async fn show(console: &Console, needle: &str) -> Result<(), CliError> {
    console.require_session().await?;
    let listing = console.gateway.list_categories().await?;
    report_source(&listing);

    let category = find(&listing, needle)
        .ok_or_else(|| CliError::NotFound(format!("category {needle}")))?;
    console.emit(category)
}

/// List the editor fields a plan of `plan_type` shows, in order.
pub async fn fields(console: &Console, plan_type: &str) -> Result<(), CliError> {
    console.require_session().await?;
    let listing = console.gateway.list_categories().await?;
    report_source(&listing);

    let category = listing
        .schema_for(plan_type)
        .ok_or_else(|| CliError::NotFound(format!("active category for plan type {plan_type}")))?;
    for field in conformance::fields_for(category) {
        console.line(format!("{:<20} {field}", field.key()))?;
    }
    Ok(())
}

/// Create a category from a YAML draft.
pub async fn create(console: &Console, file: &Path) -> Result<(), CliError> {
    let draft: CategoryDraft = read_yaml(file)?;
    console.require_session().await?;

    console.gateway.create_category(&draft).await?;
    info!(name = %draft.name, "Category created");
    console.line(format!("Created category {}", draft.name))
}

/// Replace a category from a YAML draft.
pub async fn update(console: &Console, id: &str, file: &Path) -> Result<(), CliError> {
    let draft: CategoryDraft = read_yaml(file)?;
    console.require_session().await?;

    let id = CategoryId::new(id);
    console.gateway.update_category(&id, &draft).await?;
    info!(%id, "Category updated");
    console.line(format!("Updated category {id}"))
}

/// Delete a category after confirmation.
pub async fn delete(console: &Console, id: &str, assume_yes: bool) -> Result<(), CliError> {
    console.require_session().await?;
    let id = CategoryId::new(id);
    let confirmed = confirm_deletion(&format!("category {id}"), assume_yes)?;

    console.gateway.delete_category(&id, confirmed).await?;
    info!(%id, "Category deleted");
    console.line(format!("Deleted category {id}"))
}

fn find<'a>(listing: &'a CategoryListing, needle: &str) -> Option<&'a Category> {
    listing
        .categories
        .iter()
        .find(|category| category.id.as_str() == needle)
        .or_else(|| {
            listing
                .categories
                .iter()
                .find(|category| category.plan_type_key().to_string() == needle)
        })
}

fn report_source(listing: &CategoryListing) {
    if let CatalogSource::BuiltinDefaults(reason) = &listing.source {
        warn!(%reason, "Showing built-in categories");
    }
}
