use crate::{
    AppState, guard,
    guard::NavigationOutcome,
    models::{CreateSessionRequest, NavigationDecision, SessionResponse},
    session::Identity,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// --- Helpers ---

/// Projects an identity into the wire shape. The token never leaves the gate.
fn session_response(identity: &Identity) -> SessionResponse {
    SessionResponse {
        authenticated: identity.is_authenticated(),
        username: identity.username().to_string(),
        role: identity.role().to_string(),
    }
}

// --- Handlers ---

/// get_session
///
/// [Session Route] Returns the current in-memory identity projection. The frontend
/// header bar reads this on mount to display the username and role.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Current session projection", body = SessionResponse))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let identity = state.session.current();
    Json(session_response(&identity))
}

/// create_session
///
/// [Session Route] The login-success callback boundary. The external login flow,
/// having obtained a credential, hands `(token, username, role)` to the store,
/// which overwrites all three fields atomically in memory and writes them through.
///
/// A persistence failure answers 500; the in-memory identity has already moved at
/// that point (the store performs no rollback), which the next successful mutation
/// repairs.
#[utoipa::path(
    post,
    path = "/session",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session established", body = SessionResponse),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, StatusCode> {
    state
        .session
        .set_identity(&payload.token, &payload.username, &payload.role)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to persist session identity");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let identity = state.session.current();
    Ok(Json(session_response(&identity)))
}

/// delete_session
///
/// [Session Route] Logout. Clears the identity and removes the persisted fields.
/// Idempotent: deleting an absent session is still 204.
#[utoipa::path(
    delete,
    path = "/session",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn delete_session(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    state.session.clear_identity().await.map_err(|e| {
        tracing::error!(error = %e, "failed to clear persisted session");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// reject_session
///
/// [Session Route] The transport-layer 401 callback boundary. When the console's
/// HTTP client sees an authorization-rejected response from the backend API, it
/// reports it here: the session is cleared and the answer is always the
/// redirect-to-login decision.
///
/// Unlike `delete_session`, a failed storage clear does not change the response.
/// The navigation must resolve either way, so the failure is logged and the
/// redirect stands; the in-memory identity is already Anonymous.
#[utoipa::path(
    post,
    path = "/session/rejected",
    responses((status = 200, description = "Session invalidated, redirect to login", body = NavigationDecision))
)]
pub async fn reject_session(State(state): State<AppState>) -> Json<NavigationDecision> {
    if let Err(e) = state.session.clear_identity().await {
        tracing::warn!(error = %e, "session clear failed during 401 handling");
    }

    Json(NavigationDecision {
        outcome: NavigationOutcome::RedirectToLogin,
        redirect_to: Some(state.policies.login_path().to_string()),
    })
}

/// resolve_navigation
///
/// [Navigation Route] The guard endpoint. Evaluates whether the current session
/// may reach the named route and returns the three-way decision for the frontend
/// router to act on.
///
/// The identity snapshot is re-read from persisted storage on every call (there is
/// no change notification from the store), then the decision itself is pure.
/// A name outside the policy table is 404: a typo must be distinguishable from an
/// authorized view.
#[utoipa::path(
    get,
    path = "/navigate/{route}",
    params(("route" = String, Path, description = "Declared route name, e.g. userManagement")),
    responses(
        (status = 200, description = "Navigation decision", body = NavigationDecision),
        (status = 404, description = "Unknown route name")
    )
)]
pub async fn resolve_navigation(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> Result<Json<NavigationDecision>, StatusCode> {
    if state.policies.lookup(&route).is_none() && !state.policies.is_login(&route) {
        return Err(StatusCode::NOT_FOUND);
    }

    let identity = state.session.persisted().await;
    let outcome = guard::evaluate(&state.policies, &route, &identity);

    let redirect_to = match outcome {
        NavigationOutcome::Allow => None,
        NavigationOutcome::RedirectToLogin => Some(state.policies.login_path().to_string()),
        NavigationOutcome::RedirectToLanding => Some(state.policies.landing_path().to_string()),
    };

    tracing::debug!(route = %route, outcome = ?outcome, authenticated = identity.is_authenticated(),
        "navigation resolved");

    Ok(Json(NavigationDecision {
        outcome,
        redirect_to,
    }))
}
