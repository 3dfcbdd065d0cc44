//! Cookie projection of the stored credential, read by the edge gate.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Cookie name carrying the raw credential.
pub const TOKEN_COOKIE_NAME: &str = "token";

/// Session cookie lifetime: 24 hours
pub const SESSION_COOKIE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Cross-site policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Sent on same-site requests and top-level navigations.
    Lax,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub max_age: Duration,
    pub same_site: SameSite,
}

impl SessionCookie {
    /// The credential cookie as written on login.
    pub fn for_token(token: &str) -> Self {
        Self {
            name: TOKEN_COOKIE_NAME.to_string(),
            value: token.to_string(),
            path: "/".to_string(),
            max_age: SESSION_COOKIE_MAX_AGE,
            same_site: SameSite::Lax,
        }
    }
}

/// Where the credential cookie lives (a browser jar, an HTTP client jar, ...).
pub trait CookieChannel: Send + Sync {
    fn set(&self, cookie: SessionCookie);
    /// Current value of `name`, if present and not past its max-age.
    fn get(&self, name: &str) -> Option<String>;
    fn remove(&self, name: &str);
}

/// In-process cookie jar that honours max-age.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, (SessionCookie, Instant)>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live cookies rendered as a `Cookie` request header.
    pub fn cookie_header(&self) -> Option<String> {
        let cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let pairs: Vec<String> = cookies
            .values()
            .filter(|(cookie, set_at)| now.duration_since(*set_at) < cookie.max_age)
            .map(|(cookie, _)| format!("{}={}", cookie.name, cookie.value))
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// The stored cookie with its attributes, expired or not.
    pub fn raw(&self, name: &str) -> Option<SessionCookie> {
        let cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        cookies.get(name).map(|(cookie, _)| cookie.clone())
    }
}

impl CookieChannel for MemoryCookieJar {
    fn set(&self, cookie: SessionCookie) {
        let mut cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        cookies.insert(cookie.name.clone(), (cookie, Instant::now()));
    }

    fn get(&self, name: &str) -> Option<String> {
        let cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        let (cookie, set_at) = cookies.get(name)?;
        if set_at.elapsed() < cookie.max_age {
            Some(cookie.value.clone())
        } else {
            None
        }
    }

    fn remove(&self, name: &str) {
        let mut cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        cookies.remove(name);
    }
}
