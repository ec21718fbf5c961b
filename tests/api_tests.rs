use console_gate::{
    AppConfig, AppState, FileStore, PolicyTable, SessionStore, create_router,
    guard::NavigationOutcome,
    models::{NavigationDecision, SessionResponse},
    storage::StorageState,
};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    // Keeps the session file alive for the lifetime of the spawned server.
    _dir: tempfile::TempDir,
}

/// Boots the full gate (file-backed storage, console policy table, real router)
/// on an ephemeral port and returns its address.
async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let storage = Arc::new(
        FileStore::open(dir.path().join("session.json"))
            .await
            .expect("Failed to open session file"),
    ) as StorageState;
    let session = Arc::new(SessionStore::initialize(storage).await);

    let state = AppState {
        session,
        policies: Arc::new(PolicyTable::console_routes()),
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        _dir: dir,
    }
}

async fn resolve(client: &reqwest::Client, app: &TestApp, route: &str) -> NavigationDecision {
    client
        .get(format!("{}/navigate/{}", app.address, route))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .expect("decision body")
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_session_lifecycle_over_http() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Fresh gate: anonymous projection, protected navigation goes to login.
    let session: SessionResponse = client
        .get(format!("{}/session", app.address))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert!(!session.authenticated);

    let decision = resolve(&client, &app, "statistics").await;
    assert_eq!(decision.outcome, NavigationOutcome::RedirectToLogin);
    assert_eq!(decision.redirect_to.as_deref(), Some("/login"));

    // Login success boundary, with a non-ASCII role crossing the wire.
    let response = client
        .post(format!("{}/session", app.address))
        .json(&serde_json::json!({
            "token": "t1",
            "username": "张伟",
            "role": "超级管理员"
        }))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
    let session: SessionResponse = response.json().await.unwrap();
    assert!(session.authenticated);
    assert_eq!(session.username, "张伟");
    assert_eq!(session.role, "超级管理员");

    // The super admin reaches the restricted view.
    let decision = resolve(&client, &app, "statistics").await;
    assert_eq!(decision.outcome, NavigationOutcome::Allow);
    assert_eq!(decision.redirect_to, None);

    // Logout: idempotent 204, then protected navigation goes back to login.
    for _ in 0..2 {
        let response = client
            .delete(format!("{}/session", app.address))
            .send()
            .await
            .expect("req fail");
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
    }

    let decision = resolve(&client, &app, "statistics").await;
    assert_eq!(decision.outcome, NavigationOutcome::RedirectToLogin);
}

#[tokio::test]
async fn test_role_restriction_over_http() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/session", app.address))
        .json(&serde_json::json!({
            "token": "t1",
            "username": "operator",
            "role": "操作员"
        }))
        .send()
        .await
        .expect("req fail");

    // Permitted view.
    let decision = resolve(&client, &app, "sqlGenerator").await;
    assert_eq!(decision.outcome, NavigationOutcome::Allow);

    // Super-admin-only view: authenticated but unauthorized, so the landing
    // route is the fallback.
    let decision = resolve(&client, &app, "userManagement").await;
    assert_eq!(decision.outcome, NavigationOutcome::RedirectToLanding);
    assert_eq!(decision.redirect_to.as_deref(), Some("/resource-center"));

    // Login stays reachable regardless.
    let decision = resolve(&client, &app, "login").await;
    assert_eq!(decision.outcome, NavigationOutcome::Allow);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/navigate/noSuchView", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejected_session_boundary_over_http() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/session", app.address))
        .json(&serde_json::json!({
            "token": "expired",
            "username": "u",
            "role": "操作员"
        }))
        .send()
        .await
        .expect("req fail");

    // The transport layer reports a 401 from the backend API.
    let decision: NavigationDecision = client
        .post(format!("{}/session/rejected", app.address))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(decision.outcome, NavigationOutcome::RedirectToLogin);
    assert_eq!(decision.redirect_to.as_deref(), Some("/login"));

    // The session is gone for every subsequent reader.
    let session: SessionResponse = client
        .get(format!("{}/session", app.address))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert!(!session.authenticated);

    let decision = resolve(&client, &app, "sqlGenerator").await;
    assert_eq!(decision.outcome, NavigationOutcome::RedirectToLogin);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api-docs/openapi.json", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());

    let doc: serde_json::Value = response.json().await.unwrap();
    assert!(doc["paths"]["/session"].is_object());
    assert!(doc["paths"]["/navigate/{route}"].is_object());
}
