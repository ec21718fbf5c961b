use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// RoutePolicy
///
/// The access policy an individual route declares. Both fields are optional in
/// effect: `requires_auth: false` together with `roles: None` means the route is
/// checked by nobody (the login route is declared this way).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutePolicy {
    /// When true, the route is only reachable with an authenticated session.
    pub requires_auth: bool,
    /// When Some, the route is additionally restricted to sessions whose role is
    /// in the list (exact string match). None means any authenticated identity.
    pub roles: Option<Vec<String>>,
}

impl RoutePolicy {
    /// A route gated on authentication only.
    pub fn authenticated() -> Self {
        Self {
            requires_auth: true,
            roles: None,
        }
    }

    /// A route gated on authentication and restricted to the given role labels.
    pub fn restricted_to<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requires_auth: true,
            roles: Some(roles.into_iter().map(Into::into).collect()),
        }
    }
}

/// RouteEntry
///
/// One declared console route: the path the frontend mounts it at, plus its policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,
    pub policy: RoutePolicy,
}

/// PolicyTable
///
/// The static per-route access policy, declared once at startup and consulted by
/// the Navigation Guard on every navigation attempt. Routes are keyed by name.
/// The table also designates two distinguished routes:
/// - the login route, which the guard allows unconditionally, and
/// - the default landing route, the fallback target for authenticated sessions
///   whose role is not permitted on the route they asked for. Its own policy must
///   not restrict roles, so it stays reachable for every authenticated identity.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: HashMap<String, RouteEntry>,
    login_route: String,
    landing_route: String,
}

impl PolicyTable {
    pub fn new(login_route: impl Into<String>, landing_route: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            login_route: login_route.into(),
            landing_route: landing_route.into(),
        }
    }

    /// Declares a route. Redeclaring a name overwrites the previous entry.
    pub fn declare(
        mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        policy: RoutePolicy,
    ) -> Self {
        self.entries.insert(
            name.into(),
            RouteEntry {
                path: path.into(),
                policy,
            },
        );
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&RouteEntry> {
        self.entries.get(name)
    }

    pub fn is_login(&self, name: &str) -> bool {
        name == self.login_route
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn landing_route(&self) -> &str {
        &self.landing_route
    }

    /// Path of the login route, for building redirect targets.
    pub fn login_path(&self) -> &str {
        self.entries
            .get(&self.login_route)
            .map(|e| e.path.as_str())
            .unwrap_or("/login")
    }

    /// Path of the default landing route, for building redirect targets.
    pub fn landing_path(&self) -> &str {
        self.entries
            .get(&self.landing_route)
            .map(|e| e.path.as_str())
            .unwrap_or("/")
    }

    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

// Role labels used by the console. Free-form strings as far as the gate is
// concerned; listed here once so the table below stays readable.
pub const ROLE_INTERNAL: &str = "内部用户";
pub const ROLE_OPERATOR: &str = "操作员";
pub const ROLE_ADMIN: &str = "普通管理员";
pub const ROLE_SUPER_ADMIN: &str = "超级管理员";
pub const ROLE_REGULAR: &str = "普通用户";

impl PolicyTable {
    /// console_routes
    ///
    /// The console's route declarations. Login is unpoliced (the guard must be
    /// able to send anyone there); the resource center doubles as the landing
    /// route and therefore restricts no roles; everything else is role-gated.
    pub fn console_routes() -> Self {
        Self::new("login", "resourceCenter")
            .declare("login", "/login", RoutePolicy::default())
            .declare(
                "sqlGenerator",
                "/sql-generator",
                RoutePolicy::restricted_to([
                    ROLE_INTERNAL,
                    ROLE_OPERATOR,
                    ROLE_ADMIN,
                    ROLE_SUPER_ADMIN,
                ]),
            )
            .declare(
                "userManagement",
                "/user-management",
                RoutePolicy::restricted_to([ROLE_SUPER_ADMIN]),
            )
            .declare(
                "statistics",
                "/statistics",
                RoutePolicy::restricted_to([ROLE_SUPER_ADMIN]),
            )
            .declare(
                "branchManagement",
                "/branch-management",
                RoutePolicy::restricted_to([ROLE_SUPER_ADMIN]),
            )
            .declare(
                "dataQuery",
                "/data-query",
                RoutePolicy::restricted_to([ROLE_INTERNAL, ROLE_SUPER_ADMIN]),
            )
            .declare(
                "resourceCenter",
                "/resource-center",
                RoutePolicy::authenticated(),
            )
            .declare(
                "systemConfig",
                "/system-config",
                RoutePolicy::restricted_to([ROLE_SUPER_ADMIN]),
            )
    }
}
