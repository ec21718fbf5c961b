use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Session Router Module
///
/// Defines the session-state surface of the gate. These endpoints are the only
/// writers of the Session Store; the navigation module only ever reads it.
///
/// The two POST endpoints are the external callback boundaries: `/session` is
/// invoked by the login flow on success, `/session/rejected` by the transport
/// layer when the backend API answers 401.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        // GET /session
        // The current identity projection (authenticated flag, username, role).
        // The token is never included.
        //
        // POST /session
        // Login-success boundary: establishes the identity and persists it.
        //
        // DELETE /session
        // Logout: clears the identity. Idempotent.
        .route(
            "/session",
            get(handlers::get_session)
                .post(handlers::create_session)
                .delete(handlers::delete_session),
        )
        // POST /session/rejected
        // Transport-layer 401 boundary: clears the identity and always answers
        // with the redirect-to-login decision.
        .route("/session/rejected", post(handlers::reject_session))
}
