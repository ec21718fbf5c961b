use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Operational endpoints with no session interaction.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
}
