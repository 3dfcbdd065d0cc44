//! Edge gate configuration.

use crate::routes::{API_ROOT, RouteTable};

/// Default sign-in page.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Default page shown for role-gated paths the user may not see.
pub const DEFAULT_NOT_FOUND_PATH: &str = "/not-found";

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub routes: RouteTable,
    pub login_path: String,
    pub not_found_path: String,
}

impl GateConfig {
    pub fn new(routes: RouteTable, login_path: &str, not_found_path: &str) -> Self {
        Self {
            routes,
            login_path: login_path.to_string(),
            not_found_path: not_found_path.to_string(),
        }
    }

    /// Whether the gate inspects `path` at all: the application root and
    /// anything below it, except the API.
    pub fn is_gated(&self, path: &str) -> bool {
        is_under(path, self.routes.root()) && !is_under(path, API_ROOT)
    }
}

/// Segment-aware prefix test: `/dashboard` covers `/dashboard/x` but not
/// `/dashboard-archive`.
fn is_under(path: &str, root: &str) -> bool {
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || root.ends_with('/'),
        None => false,
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new(
            RouteTable::dashboard(),
            DEFAULT_LOGIN_PATH,
            DEFAULT_NOT_FOUND_PATH,
        )
    }
}
