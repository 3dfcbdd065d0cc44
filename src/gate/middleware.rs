//! Axum middleware running the gate before dashboard pages are served.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::config::GateConfig;
use super::cookie::extract_credential;
use super::decision::{GateDecision, GateRedirect, evaluate};

/// Gate every dashboard navigation. Requests outside the dashboard root, and
/// API calls, pass through untouched.
pub async fn edge_gate(
    State(config): State<Arc<GateConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !config.is_gated(path) {
        return next.run(request).await;
    }

    let decision = evaluate(&config, path, extract_credential(request.headers()));
    match decision {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Login => GateRedirect {
            location: config.login_path.clone(),
        }
        .into_response(),
        GateDecision::NotFound => GateRedirect {
            location: config.not_found_path.clone(),
        }
        .into_response(),
    }
}
