//! Plan commands.
//!
//! Drafts are read as YAML with every value as it would be typed into the
//! editor; numbers and prices are parsed and checked against the plan's
//! category before anything is sent.

use std::path::Path;

use hostdeck_admin::AdminError;
use hostdeck_core::conformance::PlanDraft;
use hostdeck_core::{PlanId, PlanInput, Violations};
use tracing::info;

use super::{CliError, Console, confirm_deletion, read_yaml};

/// List plans, optionally only those of one plan type.
pub async fn list(console: &Console, plan_type: Option<&str>) -> Result<(), CliError> {
    console.require_session().await?;
    let plans = console.gateway.list_plans().await?;

    let selected: Vec<_> = plans
        .iter()
        .filter(|plan| plan_type.is_none_or(|key| plan.plan_type == key))
        .collect();

    if console.json() {
        return console.emit(&selected);
    }
    for plan in selected {
        console.line(format!(
            "{:<10} {:<18} {:>10}  {}{}",
            plan.id,
            plan.plan_type,
            plan.base_price,
            plan.plan_name,
            if plan.popular { " *" } else { "" },
        ))?;
    }
    Ok(())
}

/// Show one plan in the draft shape `plans update` accepts.
pub async fn show(console: &Console, id: &str) -> Result<(), CliError> {
    console.require_session().await?;
    let plans = console.gateway.list_plans().await?;

    let plan = plans
        .iter()
        .find(|plan| plan.id.as_str() == id)
        .ok_or_else(|| CliError::NotFound(format!("plan {id}")))?;
    console.emit(&PlanDraft::from(plan))
}

/// Validate a draft and print the normalized plan or every violation.
pub async fn check(console: &Console, file: &Path, as_update: bool) -> Result<(), CliError> {
    let draft: PlanDraft = read_yaml(file)?;
    console.require_session().await?;

    let checked = if as_update {
        console.gateway.check_plan_update(&draft).await
    } else {
        console.gateway.check_new_plan(&draft).await
    };

    match checked {
        Ok(input) => emit_input(console, &input),
        Err(AdminError::ValidationFailed(violations)) => {
            report(console, &violations)?;
            Err(AdminError::ValidationFailed(violations).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Create a plan from a YAML draft.
pub async fn create(console: &Console, file: &Path) -> Result<(), CliError> {
    let draft: PlanDraft = read_yaml(file)?;
    console.require_session().await?;

    submitted(console, console.gateway.create_plan(&draft).await)?;
    info!(plan_name = %draft.plan_name, "Plan created");
    console.line(format!("Created plan {}", draft.plan_name))
}

/// Update a plan from a YAML draft.
pub async fn update(console: &Console, id: &str, file: &Path) -> Result<(), CliError> {
    let draft: PlanDraft = read_yaml(file)?;
    console.require_session().await?;

    let id = PlanId::new(id);
    submitted(console, console.gateway.update_plan(&id, &draft).await)?;
    info!(%id, "Plan updated");
    console.line(format!("Updated plan {id}"))
}

/// Delete a plan after confirmation.
pub async fn delete(console: &Console, id: &str, assume_yes: bool) -> Result<(), CliError> {
    console.require_session().await?;
    let id = PlanId::new(id);
    let confirmed = confirm_deletion(&format!("plan {id}"), assume_yes)?;

    console.gateway.delete_plan(&id, confirmed).await?;
    info!(%id, "Plan deleted");
    console.line(format!("Deleted plan {id}"))
}

fn submitted(console: &Console, result: Result<(), AdminError>) -> Result<(), CliError> {
    if let Err(AdminError::ValidationFailed(violations)) = &result {
        report(console, violations)?;
    }
    Ok(result?)
}

fn report(console: &Console, violations: &Violations) -> Result<(), CliError> {
    for violation in violations.iter() {
        console.line(format!("  {violation}"))?;
    }
    Ok(())
}

fn emit_input(console: &Console, input: &PlanInput) -> Result<(), CliError> {
    console.line("Draft is valid:")?;
    console.emit(input)
}
