use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::policy::PolicyTable;
use crate::session::Identity;

/// NavigationOutcome
///
/// The three-way result of evaluating a navigation attempt. The guard always
/// resolves to exactly one of these; the caller (the frontend router) performs the
/// actual navigation side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum NavigationOutcome {
    /// The session may reach the requested route.
    Allow,
    /// The session is not authenticated and the route requires it.
    RedirectToLogin,
    /// The session is authenticated but its role is not permitted on the route.
    RedirectToLanding,
}

/// evaluate
///
/// The navigation-authorization decision procedure. Pure over its inputs: the
/// declared policy table, the target route name, and a snapshot of the persisted
/// identity. Never errors; every input resolves to one outcome.
///
/// Rule order is load-bearing:
/// 1. The login route is allowed unconditionally, before anything else is looked
///    at. A broken or absent session must still be able to reach login, or the
///    redirect in rule 2 would loop forever.
/// 2. Authentication: a route requiring auth with an unauthenticated session
///    redirects to login. Checked strictly before roles, so an unauthenticated
///    session is never bounced to the landing route.
/// 3. Authorization: a role-restricted route with a session whose role is not in
///    the list redirects to the default landing route.
/// 4. Everything else is allowed, including routes not declared in the table.
pub fn evaluate(table: &PolicyTable, target: &str, identity: &Identity) -> NavigationOutcome {
    if table.is_login(target) {
        return NavigationOutcome::Allow;
    }

    let Some(entry) = table.lookup(target) else {
        // Undeclared route: nothing to enforce. The HTTP surface answers 404 for
        // these before consulting the guard; the guard itself stays total.
        return NavigationOutcome::Allow;
    };

    if entry.policy.requires_auth && !identity.is_authenticated() {
        return NavigationOutcome::RedirectToLogin;
    }

    if let Some(roles) = &entry.policy.roles {
        if !roles.iter().any(|r| r == identity.role()) {
            return NavigationOutcome::RedirectToLanding;
        }
    }

    NavigationOutcome::Allow
}
