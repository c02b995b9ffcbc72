//! Category, plan and company operations against the mock backend.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use axum::http::StatusCode;
use hostdeck_admin::{AdminError, AdminGateway, CatalogSource, DeletionConfirmed, SchemaUnavailable};
use hostdeck_core::conformance::PlanDraft;
use hostdeck_core::{CategoryId, FieldId, PlanId, ViolationReason};
use hostdeck_integration_tests::{MockBackend, PASSWORD, USERNAME};
use secrecy::SecretString;

async fn logged_in(backend: &MockBackend) -> AdminGateway {
    let gateway = backend.gateway();
    gateway
        .login(USERNAME, &SecretString::from(PASSWORD.to_string()))
        .await
        .unwrap();
    backend.clear_requests();
    gateway
}

fn shared_draft(disk_gb: &str) -> PlanDraft {
    PlanDraft {
        plan_name: "Pro".into(),
        plan_type: "ssd_shared".into(),
        base_price: "$9.99".into(),
        disk_gb: disk_gb.into(),
        features: "Free SSL\n\nDaily backups\n".into(),
        attributes: BTreeMap::from([(FieldId::Websites, "3".to_string())]),
        ..PlanDraft::default()
    }
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_categories_listed_in_display_order() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let listing = gateway.list_categories().await.unwrap();
    assert_eq!(listing.source, CatalogSource::Backend);
    let ids: Vec<_> = listing.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["cat-shared", "cat-vps"]);
}

#[tokio::test]
async fn test_category_failure_serves_builtin_then_recovers() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;
    backend.state().category_failure = Some(StatusCode::INTERNAL_SERVER_ERROR);

    let listing = gateway.list_categories().await.unwrap();
    assert!(listing.is_degraded());
    assert!(matches!(
        listing.source,
        CatalogSource::BuiltinDefaults(SchemaUnavailable::FetchFailed(_))
    ));
    assert!(listing.schema_for("ssd_shared").is_some());
    assert!(gateway.session().is_authenticated());

    // Degraded listings are not cached
    backend.state().category_failure = None;
    let listing = gateway.list_categories().await.unwrap();
    assert_eq!(listing.source, CatalogSource::Backend);
    assert_eq!(listing.categories[0].id.as_str(), "cat-shared");
}

#[tokio::test]
async fn test_empty_catalog_falls_back_to_builtin() {
    let backend = MockBackend::start().await;
    backend.state().categories.clear();
    let gateway = logged_in(&backend).await;

    let listing = gateway.list_categories().await.unwrap();
    assert_eq!(
        listing.source,
        CatalogSource::BuiltinDefaults(SchemaUnavailable::EmptyCatalog)
    );
    assert!(!listing.categories.is_empty());
}

#[tokio::test]
async fn test_invalid_category_is_skipped() {
    let backend = MockBackend::start().await;
    backend.state().categories.push(serde_json::json!({
        "_id": "cat-broken",
        "name": "Broken",
        "type": "shared",
        "sub_type": "hdd",
        "resource_specs": {"disk_space": {"min": "100 GB", "max": "5 GB"}}
    }));
    let gateway = logged_in(&backend).await;

    let listing = gateway.list_categories().await.unwrap();
    assert_eq!(listing.categories.len(), 2);
    assert!(listing.categories.iter().all(|c| c.id.as_str() != "cat-broken"));
}

#[tokio::test]
async fn test_category_write_invalidates_listing() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let listing = gateway.list_categories().await.unwrap();
    let mut draft = listing.categories[0].to_draft();
    draft.name = "SSD Shared Plus".into();
    draft.display_order = 5;

    gateway.create_category(&draft).await.unwrap();
    let listing = gateway.list_categories().await.unwrap();

    assert_eq!(backend.count("GET", "/admin/categories"), 2);
    assert_eq!(listing.categories.len(), 3);
    assert_eq!(listing.categories[2].name, "SSD Shared Plus");
}

#[tokio::test]
async fn test_incomplete_category_draft_is_not_sent() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let listing = gateway.list_categories().await.unwrap();
    let mut draft = listing.categories[0].to_draft();
    draft.name = "  ".into();

    let err = gateway
        .update_category(&CategoryId::new("cat-shared"), &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::ValidationFailed(v) if v.contains("name", ViolationReason::Required)));
    assert_eq!(backend.count("PUT", "/admin/categories/cat-shared"), 0);
}

#[tokio::test]
async fn test_delete_category() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    gateway
        .delete_category(&CategoryId::new("cat-vps"), DeletionConfirmed::assumed())
        .await
        .unwrap();

    let listing = gateway.list_categories().await.unwrap();
    assert_eq!(listing.categories.len(), 1);
}

// =============================================================================
// Plans
// =============================================================================

#[tokio::test]
async fn test_disk_above_max_is_rejected_before_sending() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let err = gateway.create_plan(&shared_draft("150")).await.unwrap_err();

    let AdminError::ValidationFailed(violations) = err else {
        panic!("expected validation failure, got {err}");
    };
    assert!(violations.contains("disk_space", ViolationReason::ExceedsMax));
    assert_eq!(backend.count("POST", "/hosting-plans"), 0);
}

#[tokio::test]
async fn test_every_violation_is_reported() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let mut draft = shared_draft("2");
    draft.base_price = "abc".into();
    draft.attributes.insert(FieldId::Websites, "50".into());

    let err = gateway.check_new_plan(&draft).await.unwrap_err();
    let AdminError::ValidationFailed(violations) = err else {
        panic!("expected validation failure, got {err}");
    };
    assert!(violations.contains("base_price", ViolationReason::NotANumber));
    assert!(violations.contains("disk_space", ViolationReason::BelowMin));
    assert!(violations.contains("websites", ViolationReason::ExceedsMax));
}

#[tokio::test]
async fn test_new_plan_needs_active_category() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let mut draft = shared_draft("10");
    draft.plan_type = "dedicated".into();

    let err = gateway.create_plan(&draft).await.unwrap_err();
    assert!(matches!(err, AdminError::ValidationFailed(v) if v.contains("plan_type", ViolationReason::UnknownCategory)));
    assert_eq!(backend.count("POST", "/hosting-plans"), 0);
}

#[tokio::test]
async fn test_create_plan_sends_normalized_payload() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    assert_eq!(gateway.list_plans().await.unwrap().len(), 1);
    gateway.create_plan(&shared_draft("50")).await.unwrap();

    let requests = backend.requests();
    let posted = requests
        .iter()
        .find(|request| request.method == "POST" && request.path == "/hosting-plans")
        .and_then(|request| request.body.clone())
        .unwrap();
    assert_eq!(posted["plan_name"], "Pro");
    assert_eq!(posted["disk_gb"], 50);
    assert_eq!(posted["features"], serde_json::json!(["Free SSL", "Daily backups"]));
    assert_eq!(posted["attributes"]["websites"], 3);
    assert!(posted["supported_games"].is_null());

    // The plan cache was invalidated by the write
    let plans = gateway.list_plans().await.unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(backend.count("GET", "/hosting-plans"), 2);
}

#[tokio::test]
async fn test_legacy_plan_update_is_unconstrained() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let mut draft = shared_draft("999");
    draft.plan_type = "reseller".into();

    gateway
        .update_plan(&PlanId::new("plan-1"), &draft)
        .await
        .unwrap();
    assert_eq!(backend.count("PUT", "/hosting-plans/plan-1"), 1);
}

#[tokio::test]
async fn test_existing_plan_round_trips_through_draft() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let plans = gateway.list_plans().await.unwrap();
    let draft = PlanDraft::from(&plans[0]);
    let input = gateway.check_plan_update(&draft).await.unwrap();

    assert_eq!(input, plans[0].input());
}

#[tokio::test]
async fn test_server_error_surfaces_status_and_keeps_session() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let err = gateway
        .delete_plan(&PlanId::new("missing"), DeletionConfirmed::assumed())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NetworkOrServer { status: Some(404), .. }));
    assert!(gateway.session().is_authenticated());
}

#[tokio::test]
async fn test_plan_id_stays_one_path_segment() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let err = gateway
        .delete_plan(&PlanId::new("../plan-1"), DeletionConfirmed::assumed())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NetworkOrServer { status: Some(404), .. }));
    assert_eq!(backend.count("DELETE", "/hosting-plans/..%2Fplan-1"), 1);
    assert_eq!(gateway.list_plans().await.unwrap().len(), 1);

    let err = gateway
        .delete_category(&CategoryId::new(".."), DeletionConfirmed::assumed())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::InvalidId(_)));
    assert_eq!(backend.count("DELETE", "/admin/categories"), 0);
}

#[tokio::test]
async fn test_delete_plan_invalidates_cache() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    gateway.list_plans().await.unwrap();
    gateway
        .delete_plan(&PlanId::new("plan-1"), DeletionConfirmed::assumed())
        .await
        .unwrap();
    assert!(gateway.list_plans().await.unwrap().is_empty());
}

// =============================================================================
// Company info
// =============================================================================

#[tokio::test]
async fn test_company_update_preserves_unknown_fields() {
    let backend = MockBackend::start().await;
    let gateway = logged_in(&backend).await;

    let mut company = gateway.company_info().await.unwrap();
    company.phone = "+1 555 0199".into();
    gateway.update_company_info(&company).await.unwrap();

    let stored = backend.state().company.clone();
    assert_eq!(stored["phone"], "+1 555 0199");
    assert_eq!(stored["founded"], 2011);
}
