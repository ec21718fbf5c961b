use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::guard::NavigationOutcome;

// --- Response Payloads (Output Schemas) ---

/// SessionResponse
///
/// The identity projection returned to the console frontend. The credential token
/// is deliberately absent: the frontend supplied it at login and never needs to
/// read it back, so the gate does not echo it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SessionResponse {
    /// True when a full identity (token, username, role) is present.
    pub authenticated: bool,
    /// Display name, empty string when unauthenticated.
    pub username: String,
    /// Role label, empty string when unauthenticated.
    pub role: String,
}

/// NavigationDecision
///
/// The guard's answer for one navigation attempt, as an explicit value for the
/// frontend router to act on.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavigationDecision {
    pub outcome: NavigationOutcome,
    /// The concrete path to navigate to instead, present exactly when the outcome
    /// is a redirect (the login path or the landing path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateSessionRequest
///
/// Input payload for the login-success boundary (POST /session). The external
/// login flow supplies the issued token together with the user's display name and
/// role. The gate treats all three as opaque strings.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateSessionRequest {
    #[schema(example = "eyJhbGciOi...")]
    pub token: String,
    #[schema(example = "zhang.wei")]
    pub username: String,
    #[schema(example = "超级管理员")]
    pub role: String,
}
