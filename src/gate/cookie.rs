//! Credential extraction from request headers.

use axum::http::{HeaderMap, header};

use crate::session::TOKEN_COOKIE_NAME;

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// The request's credential: the `token` cookie, else the bearer header.
pub fn extract_credential(headers: &HeaderMap) -> Option<&str> {
    get_cookie(headers, TOKEN_COOKIE_NAME)
        .filter(|token| !token.is_empty())
        .or_else(|| bearer_token(headers))
}
