//! Page shells served behind the edge gate.
//!
//! The dashboard UI itself is rendered client-side; the server only hands out
//! the document that boots it.

use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

const LOGIN_HTML: &str = "<!doctype html>\
<html><head><meta charset=\"utf-8\"><title>Sign in</title></head>\
<body><main id=\"login\"></main></body></html>";

const DASHBOARD_HTML: &str = "<!doctype html>\
<html><head><meta charset=\"utf-8\"><title>Dashboard</title></head>\
<body><main id=\"dashboard\"></main></body></html>";

const NOT_FOUND_HTML: &str = "<!doctype html>\
<html><head><meta charset=\"utf-8\"><title>Page not found</title></head>\
<body><main><h1>Page not found</h1></main></body></html>";

fn no_store(body: &'static str) -> Response {
    ([(header::CACHE_CONTROL, "no-store")], Html(body)).into_response()
}

pub async fn login_page() -> Response {
    no_store(LOGIN_HTML)
}

pub async fn dashboard_page() -> Response {
    no_store(DASHBOARD_HTML)
}

/// Target of role-mismatch redirects. Served with 200 so the redirect lands.
pub async fn not_found_page() -> Response {
    no_store(NOT_FOUND_HTML)
}

pub async fn fallback() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}
