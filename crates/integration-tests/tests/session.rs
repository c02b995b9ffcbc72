//! Session lifecycle against the mock backend.

#![allow(clippy::unwrap_used)]

use hostdeck_admin::{AdminError, AdminGateway, DeletionConfirmed, FileTokenStore, TokenStore};
use hostdeck_core::conformance::PlanDraft;
use hostdeck_core::{CategoryId, PlanId};
use hostdeck_integration_tests::{MockBackend, PASSWORD, TOKEN, USERNAME};
use secrecy::SecretString;

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

#[tokio::test]
async fn test_login_attaches_bearer_token() {
    let backend = MockBackend::start().await;
    let gateway = backend.gateway();

    gateway.login(USERNAME, &password(PASSWORD)).await.unwrap();
    assert!(gateway.session().is_authenticated());

    gateway.list_plans().await.unwrap();
    let requests = backend.requests();
    let listing = requests
        .iter()
        .find(|request| request.path == "/hosting-plans")
        .unwrap();
    assert_eq!(listing.authorization.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn test_login_rejection_carries_backend_detail() {
    let backend = MockBackend::start().await;
    let gateway = backend.gateway();

    let err = gateway
        .login(USERNAME, &password("wrong"))
        .await
        .unwrap_err();

    match err {
        AdminError::LoginRejected(message) => {
            assert_eq!(message, "Incorrect username or password");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn test_restore_without_token_sends_nothing() {
    let backend = MockBackend::start().await;
    let gateway = backend.gateway();

    assert!(!gateway.restore().await);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_restore_valid_token_loads_catalog() {
    let backend = MockBackend::start().await;
    let gateway = backend.gateway_with_token(TOKEN);

    assert!(gateway.restore().await);
    assert!(gateway.session().is_authenticated());
    assert_eq!(backend.count("GET", "/verify-token"), 1);
    assert_eq!(backend.count("GET", "/admin/categories"), 1);
    assert_eq!(backend.count("GET", "/hosting-plans"), 1);

    // Served from cache afterwards
    gateway.list_plans().await.unwrap();
    gateway.list_categories().await.unwrap();
    assert_eq!(backend.count("GET", "/hosting-plans"), 1);
    assert_eq!(backend.count("GET", "/admin/categories"), 1);
}

#[tokio::test]
async fn test_restore_rejected_token_runs_once() {
    let backend = MockBackend::start().await;
    backend.state().revoked = true;
    let gateway = backend.gateway_with_token(TOKEN);

    assert!(!gateway.restore().await);
    assert!(!gateway.restore().await);
    assert!(!gateway.session().is_authenticated());
    assert_eq!(backend.count("GET", "/verify-token"), 1);
    assert_eq!(backend.count("GET", "/admin/categories"), 0);
}

#[tokio::test]
async fn test_unauthenticated_operations_send_nothing() {
    let backend = MockBackend::start().await;
    let gateway = backend.gateway();

    let draft = PlanDraft {
        plan_name: "Pro".into(),
        plan_type: "ssd_shared".into(),
        base_price: "9.99".into(),
        ..PlanDraft::default()
    };

    assert!(matches!(gateway.list_plans().await, Err(AdminError::Unauthenticated)));
    assert!(matches!(gateway.list_categories().await, Err(AdminError::Unauthenticated)));
    assert!(matches!(gateway.company_info().await, Err(AdminError::Unauthenticated)));
    assert!(matches!(
        gateway.create_plan(&draft).await,
        Err(AdminError::Unauthenticated)
    ));
    assert!(matches!(
        gateway.update_plan(&PlanId::new("plan-1"), &draft).await,
        Err(AdminError::Unauthenticated)
    ));
    assert!(matches!(
        gateway
            .delete_category(&CategoryId::new("cat-shared"), DeletionConfirmed::assumed())
            .await,
        Err(AdminError::Unauthenticated)
    ));

    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_revoked_session_is_logged_out() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("session.json");
    let gateway = AdminGateway::from_config(&backend.config(token_path.clone())).unwrap();
    gateway.login(USERNAME, &password(PASSWORD)).await.unwrap();
    gateway.list_plans().await.unwrap();
    assert!(FileTokenStore::new(&token_path).load().unwrap().is_some());

    backend.state().revoked = true;
    let err = gateway.list_categories().await.unwrap_err();
    assert!(matches!(err, AdminError::Unauthenticated));
    assert!(!gateway.session().is_authenticated());
    assert!(FileTokenStore::new(&token_path).load().unwrap().is_none());

    // Nothing further leaves the process, cached plans included
    backend.clear_requests();
    assert!(matches!(gateway.list_plans().await, Err(AdminError::Unauthenticated)));
    assert!(matches!(gateway.company_info().await, Err(AdminError::Unauthenticated)));
    assert!(backend.requests().is_empty());

    // The next process has nothing to restore
    backend.state().revoked = false;
    let restarted = AdminGateway::from_config(&backend.config(token_path)).unwrap();
    assert!(!restarted.restore().await);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_revoked_session_rejects_writes() {
    let backend = MockBackend::start().await;
    let gateway = backend.gateway();
    gateway.login(USERNAME, &password(PASSWORD)).await.unwrap();

    backend.state().revoked = true;
    let err = gateway
        .delete_plan(&PlanId::new("plan-1"), DeletionConfirmed::assumed())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Unauthenticated));
    assert!(!gateway.session().is_authenticated());
    assert_eq!(backend.count("DELETE", "/hosting-plans/plan-1"), 1);
}

#[tokio::test]
async fn test_relogin_refetches_after_revocation() {
    let backend = MockBackend::start().await;
    let gateway = backend.gateway();
    gateway.login(USERNAME, &password(PASSWORD)).await.unwrap();
    gateway.list_plans().await.unwrap();

    backend.state().revoked = true;
    assert!(matches!(gateway.list_categories().await, Err(AdminError::Unauthenticated)));
    assert!(!gateway.session().is_authenticated());

    backend.state().revoked = false;
    gateway.login(USERNAME, &password(PASSWORD)).await.unwrap();
    gateway.list_plans().await.unwrap();
    gateway.list_categories().await.unwrap();
    assert_eq!(backend.count("GET", "/hosting-plans"), 2);
    assert_eq!(backend.count("GET", "/admin/categories"), 2);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let backend = MockBackend::start().await;
    let gateway = backend.gateway();
    gateway.login(USERNAME, &password(PASSWORD)).await.unwrap();

    gateway.logout().await;
    gateway.logout().await;
    assert!(!gateway.session().is_authenticated());
    assert!(gateway.session().auth_header().is_empty());
}

#[tokio::test]
async fn test_file_session_survives_restart() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = backend.config(dir.path().join("hostdeck").join("session.json"));

    let first = AdminGateway::from_config(&config).unwrap();
    first.login(USERNAME, &password(PASSWORD)).await.unwrap();

    let second = AdminGateway::from_config(&config).unwrap();
    assert!(second.restore().await);

    second.logout().await;
    let third = AdminGateway::from_config(&config).unwrap();
    assert!(!third.restore().await);
}
