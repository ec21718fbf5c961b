use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Navigation Router Module
///
/// Defines the guard surface: one read-only endpoint the frontend router calls
/// before every route transition. It never mutates the Session Store.
pub fn navigation_routes() -> Router<AppState> {
    Router::new()
        // GET /navigate/{route}
        // Evaluates the named route's policy against the persisted identity and
        // returns the three-way decision (allow / redirect-to-login /
        // redirect-to-landing) with the concrete redirect path when applicable.
        // Unknown route names answer 404.
        .route("/navigate/{route}", get(handlers::resolve_navigation))
}
