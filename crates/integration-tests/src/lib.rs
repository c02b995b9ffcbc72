//! Integration tests for Hostdeck.
//!
//! Tests drive a real [`AdminGateway`] against [`MockBackend`], an in-process
//! axum server that mimics the catalog backend: bearer auth, category and
//! plan collections, company info and the public endpoints. Every request it
//! receives is recorded so tests can assert on what was (or was not) sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hostdeck-integration-tests
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use hostdeck_admin::{AdminGateway, ConsoleConfig, MemoryTokenStore};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "correct horse";
pub const TOKEN: &str = "tok-1";

/// A request as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Mutable backend state. Tests tweak it through [`MockBackend::state`].
#[derive(Debug)]
pub struct BackendState {
    /// Token issued on login and accepted afterwards.
    pub token: String,
    /// Reject every credential, as after a server-side revocation.
    pub revoked: bool,
    pub categories: Vec<Value>,
    /// Fail category listings with this status.
    pub category_failure: Option<StatusCode>,
    pub plans: Vec<Value>,
    pub company: Value,
    pub requests: Vec<RecordedRequest>,
    next_id: u64,
}

impl BackendState {
    fn seeded() -> Self {
        Self {
            token: TOKEN.to_string(),
            revoked: false,
            categories: vec![shared_category(), vps_category()],
            category_failure: None,
            plans: vec![json!({
                "_id": "plan-1",
                "plan_name": "Starter",
                "plan_type": "ssd_shared",
                "base_price": 4.99,
                "disk_gb": 10,
                "features": ["Free SSL"],
                "popular": true,
                "attributes": {"websites": 1, "ssl_certificate": true}
            })],
            company: json!({
                "name": "Hostdeck",
                "email": "hello@hostdeck.test",
                "phone": "+1 555 0100",
                "address": "1 Rack Row",
                "founded": 2011
            }),
            requests: Vec::new(),
            next_id: 100,
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.token);
        !self.revoked
            && headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value == expected)
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// The seeded shared category: disk 5 to 100 GB, websites 1 to 10.
#[must_use]
pub fn shared_category() -> Value {
    json!({
        "_id": "cat-shared",
        "name": "SSD Shared",
        "type": "shared",
        "sub_type": "ssd",
        "resource_specs": {
            "disk_space": {"min": "5 GB", "max": "100 GB", "default": "10 GB"}
        },
        "validation_rules": {
            "websites": {"min": 1, "max": 10, "default": 1}
        },
        "category_fields": ["websites", "ssl_certificate"],
        "is_active": true,
        "display_order": 1
    })
}

/// The seeded VPS category.
#[must_use]
pub fn vps_category() -> Value {
    json!({
        "_id": "cat-vps",
        "name": "Cloud VPS",
        "type": "vps",
        "sub_type": "standard",
        "resource_specs": {
            "cpu": {"min": "1 vCPU", "max": "8 vCPU", "default": "2 vCPU"},
            "ram": {"min": "1 GB", "max": "32 GB", "default": "4 GB"}
        },
        "category_fields": ["root_access", "os_choice"],
        "is_active": true,
        "display_order": 2
    })
}

type Shared = Arc<Mutex<BackendState>>;

/// In-process catalog backend on an ephemeral loopback port.
pub struct MockBackend {
    url: Url,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend seeded with two categories, one plan and company info.
    ///
    /// # Panics
    ///
    /// Panics if the loopback listener cannot be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::seeded()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        let app = router(Arc::clone(&state));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let url = Url::parse(&format!("http://{addr}")).expect("Invalid mock backend URL");
        Self { url, state, server }
    }

    #[must_use]
    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// Console configuration pointing at this backend.
    #[must_use]
    pub fn config(&self, token_path: impl Into<PathBuf>) -> ConsoleConfig {
        ConsoleConfig::new(self.url(), token_path.into())
    }

    /// Gateway with an empty in-memory token store.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn gateway(&self) -> AdminGateway {
        self.gateway_with(MemoryTokenStore::new())
    }

    /// Gateway whose token store already holds `token`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn gateway_with_token(&self, token: &str) -> AdminGateway {
        self.gateway_with(MemoryTokenStore::with_token(token))
    }

    fn gateway_with(&self, tokens: MemoryTokenStore) -> AdminGateway {
        AdminGateway::new(&self.config("unused-session.json"), Box::new(tokens))
            .expect("Failed to build gateway")
    }

    /// Lock the backend state for inspection or tweaking.
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// Number of recorded requests with `method` and `path`.
    #[must_use]
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/verify-token", get(verify_token))
        .route("/admin/categories", get(list_categories).post(create_category))
        .route(
            "/admin/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/hosting-plans", get(list_plans).post(create_plan))
        .route("/hosting-plans/{id}", put(update_plan).delete(delete_plan))
        .route("/company-info", get(company_info).put(update_company_info))
        .route("/content/{document}", get(legal_content))
        .route("/promo-codes", get(promo_codes))
        .route("/system-status", get(system_status))
        .route("/contact", post(contact))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, usize::MAX).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    lock(&state).requests.push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        authorization: parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&bytes).ok(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

// =============================================================================
// Auth
// =============================================================================

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let state = lock(&state);
    let accepted = body["username"] == USERNAME && body["password"] == PASSWORD;
    if !accepted {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }
    Json(json!({ "access_token": state.token, "token_type": "bearer" })).into_response()
}

async fn verify_token(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if lock(&state).authorized(&headers) {
        Json(json!({ "valid": true, "username": USERNAME })).into_response()
    } else {
        unauthorized()
    }
}

// =============================================================================
// Collections
// =============================================================================

enum Collection {
    Categories,
    Plans,
}

impl Collection {
    fn items(self, state: &mut BackendState) -> &mut Vec<Value> {
        match self {
            Self::Categories => &mut state.categories,
            Self::Plans => &mut state.plans,
        }
    }

    const fn prefix(&self) -> &'static str {
        match self {
            Self::Categories => "cat",
            Self::Plans => "plan",
        }
    }
}

fn insert(state: &Shared, headers: &HeaderMap, collection: Collection, mut body: Value) -> Response {
    let mut state = lock(state);
    if !state.authorized(headers) {
        return unauthorized();
    }
    let id = state.next_id(collection.prefix());
    body["_id"] = json!(id);
    collection.items(&mut state).push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

fn replace(
    state: &Shared,
    headers: &HeaderMap,
    collection: Collection,
    id: &str,
    mut body: Value,
) -> Response {
    let mut state = lock(state);
    if !state.authorized(headers) {
        return unauthorized();
    }
    body["_id"] = json!(id);
    match collection.items(&mut state).iter_mut().find(|item| item["_id"] == id) {
        Some(item) => {
            *item = body;
            Json(json!({ "message": "updated" })).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Not found"),
    }
}

fn remove(state: &Shared, headers: &HeaderMap, collection: Collection, id: &str) -> Response {
    let mut state = lock(state);
    if !state.authorized(headers) {
        return unauthorized();
    }
    let items = collection.items(&mut state);
    let before = items.len();
    items.retain(|item| item["_id"] != id);
    if items.len() == before {
        return detail(StatusCode::NOT_FOUND, "Not found");
    }
    Json(json!({ "message": "deleted" })).into_response()
}

async fn list_categories(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if let Some(status) = state.category_failure {
        return detail(status, "Category store unavailable");
    }
    Json(state.categories.clone()).into_response()
}

async fn create_category(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    insert(&state, &headers, Collection::Categories, body)
}

async fn update_category(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    replace(&state, &headers, Collection::Categories, &id, body)
}

async fn delete_category(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    remove(&state, &headers, Collection::Categories, &id)
}

/// Plans are readable anonymously; a presented credential must still be valid.
async fn list_plans(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    if headers.contains_key(header::AUTHORIZATION) && !state.authorized(&headers) {
        return unauthorized();
    }
    Json(state.plans.clone()).into_response()
}

async fn create_plan(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    insert(&state, &headers, Collection::Plans, body)
}

async fn update_plan(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    replace(&state, &headers, Collection::Plans, &id, body)
}

async fn delete_plan(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    remove(&state, &headers, Collection::Plans, &id)
}

// =============================================================================
// Company and public content
// =============================================================================

async fn company_info(State(state): State<Shared>) -> Response {
    Json(lock(&state).company.clone()).into_response()
}

async fn update_company_info(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.company = body;
    Json(json!({ "message": "updated" })).into_response()
}

async fn legal_content(Path(document): Path<String>) -> Response {
    match document.as_str() {
        "terms" => Json(json!({ "title": "Terms of Service", "content": "Be nice." }))
            .into_response(),
        "privacy" => Json(json!({ "title": "Privacy Policy", "content": "We keep little." }))
            .into_response(),
        _ => detail(StatusCode::NOT_FOUND, "Not found"),
    }
}

async fn promo_codes() -> Response {
    Json(json!([
        {
            "code": "WELCOME10",
            "description": "10% off the first month",
            "discount": "10%",
            "placement": "pricing",
            "is_active": true
        },
        {
            "code": "RETIRED",
            "description": "Old campaign",
            "placement": "pricing",
            "is_active": false
        },
        {
            "code": "EXPIRED",
            "description": "Ended campaign",
            "placement": "pricing",
            "is_active": true,
            "expires_at": "2001-01-01T00:00:00Z"
        },
        {
            "code": "HOMEPAGE",
            "description": "Homepage banner",
            "placement": "homepage",
            "is_active": true
        }
    ]))
    .into_response()
}

async fn system_status() -> Response {
    Json(json!({
        "overall": "operational",
        "services": [
            { "name": "Web Hosting", "status": "operational", "uptime": "99.99%" },
            { "name": "Email", "status": "degraded" }
        ]
    }))
    .into_response()
}

async fn contact(Json(body): Json<Value>) -> Response {
    if body["email"].as_str().is_none_or(str::is_empty) {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "email is required");
    }
    Json(json!({ "message": "received" })).into_response()
}
