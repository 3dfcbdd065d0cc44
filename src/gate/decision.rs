//! The gate's verdict for one navigation.

use axum::response::{IntoResponse, Redirect, Response};
use tracing::{debug, info, warn};

use super::config::GateConfig;
use crate::jwt;
use crate::session::Role;

/// Outcome of checking a request against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Serve the page unmodified
    Allow,
    /// No usable credential: send the user to sign in
    Login,
    /// Role not permitted: present the page as nonexistent
    NotFound,
}

/// Decide whether `path` may be served to the holder of `credential`.
///
/// Unlike [`jwt::is_expired`], a payload that cannot be decoded is an
/// invalid session here.
pub fn evaluate(config: &GateConfig, path: &str, credential: Option<&str>) -> GateDecision {
    let Some(token) = credential else {
        debug!(path = %path, "No credential, redirecting to login");
        return GateDecision::Login;
    };

    let payload = match jwt::decode(token) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(path = %path, error = %e, "Undecodable credential, redirecting to login");
            return GateDecision::Login;
        }
    };

    let Some(rule) = config.routes.rule_for(path) else {
        return GateDecision::Allow;
    };

    let role = payload.role.as_deref().and_then(Role::parse);
    if rule.allows(role) {
        GateDecision::Allow
    } else {
        info!(
            path = %path,
            role = payload.role.as_deref().unwrap_or("<none>"),
            "Role not permitted, presenting not found"
        );
        GateDecision::NotFound
    }
}

/// Redirect issued by the gate.
#[derive(Debug)]
pub struct GateRedirect {
    pub location: String,
}

impl IntoResponse for GateRedirect {
    fn into_response(self) -> Response {
        Redirect::temporary(&self.location).into_response()
    }
}
