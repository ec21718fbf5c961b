/// Router Module Index
///
/// Organizes the gate's HTTP surface into per-concern modules. Each module owns
/// one slice of the API and nothing else, so the session-state surface and the
/// navigation-decision surface cannot bleed into each other.

/// Operational endpoints (liveness probe). No session interaction.
pub mod public;

/// Session lifecycle: the identity projection, the login-success boundary, the
/// logout, and the transport-layer 401 boundary.
pub mod session;

/// Navigation resolution: the guard endpoint the frontend router consults before
/// every route transition.
pub mod navigation;
