//! Unauthenticated endpoints against the mock backend.

#![allow(clippy::unwrap_used)]

use hostdeck_core::{ContactMessage, LegalDocument};
use hostdeck_integration_tests::MockBackend;

#[tokio::test]
async fn test_public_reads_send_no_credentials() {
    let backend = MockBackend::start().await;
    let public = backend.gateway().public();

    let plans = public.plans().await.unwrap();
    assert_eq!(plans.len(), 1);
    let company = public.company_info().await.unwrap();
    assert_eq!(company.name, "Hostdeck");

    assert!(
        backend
            .requests()
            .iter()
            .all(|request| request.authorization.is_none())
    );
}

#[tokio::test]
async fn test_promo_codes_filtered_by_placement_and_expiry() {
    let backend = MockBackend::start().await;
    let public = backend.gateway().public();

    let codes = public.promo_codes("pricing").await.unwrap();
    let names: Vec<_> = codes.iter().map(|code| code.code.as_str()).collect();
    assert_eq!(names, ["WELCOME10"]);
}

#[tokio::test]
async fn test_legal_content_and_status() {
    let backend = MockBackend::start().await;
    let public = backend.gateway().public();

    let terms = public.legal_content(LegalDocument::Terms).await.unwrap();
    assert_eq!(terms.title, "Terms of Service");
    assert_eq!(backend.count("GET", "/content/terms"), 1);

    let status = public.system_status().await.unwrap();
    assert_eq!(status.overall.as_deref(), Some("operational"));
    assert_eq!(status.services.len(), 2);
}

#[tokio::test]
async fn test_contact_is_sent_once_even_when_rejected() {
    let backend = MockBackend::start().await;
    let public = backend.gateway().public();

    let message = ContactMessage {
        name: "Ada".into(),
        email: String::new(),
        subject: "Hello".into(),
        message: "Is IPv6 included?".into(),
    };
    public.submit_contact(&message).await;

    assert_eq!(backend.count("POST", "/contact"), 1);
}
