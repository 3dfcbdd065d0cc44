#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use examdesk::client::{AuthBackend, AuthStore, BackendError, LoginRequest, LoginResponse};
use examdesk::session::{MemoryCookieJar, MemoryStorage, Profile, Role, SessionStore};
use jsonwebtoken::{EncodingKey, Header};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Password the fake backend accepts.
pub const GOOD_PASSWORD: &str = "correct horse";

const SIGNING_SECRET: &[u8] = b"test-signing-secret-for-testing";

pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs() as i64
}

/// Mint a signed token for `role` expiring `exp_offset` seconds from now.
pub fn mint(role: &str, exp_offset: i64) -> String {
    let claims = serde_json::json!({
        "sub": "user-1",
        "role": role,
        "exp": now_secs() + exp_offset,
    });
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SIGNING_SECRET),
    )
    .expect("Failed to sign token")
}

pub fn profile_for(email: &str, role: Role) -> Profile {
    Profile {
        id: "user-1".to_string(),
        name: "Test User".to_string(),
        email: email.to_string(),
        role,
    }
}

/// Role the fake backend assigns, chosen by email local part.
fn role_for_email(email: &str) -> Role {
    match email.split('@').next().unwrap_or_default() {
        "admin" => Role::Admin,
        "prof" => Role::Professor,
        _ => Role::Student,
    }
}

async fn fake_login(Json(request): Json<LoginRequest>) -> Response {
    if request.password != GOOD_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "statusCode": 401,
                "message": "Invalid credentials",
            })),
        )
            .into_response();
    }

    let role = role_for_email(&request.email);
    Json(LoginResponse {
        access_token: mint(role.as_str(), 3600),
        user: profile_for(&request.email, role),
    })
    .into_response()
}

/// Login handler of a backend that issues numeric user ids.
async fn numeric_id_login(Json(request): Json<LoginRequest>) -> Response {
    Json(serde_json::json!({
        "accessToken": mint("ADMIN", 3600),
        "user": {
            "id": 17,
            "name": "Numeric User",
            "email": request.email,
            "role": "ADMIN",
        },
    }))
    .into_response()
}

/// A running fake REST backend.
pub struct FakeBackend {
    pub base_url: Url,
    /// Same backend, issuing numeric user ids
    pub numeric_ids_url: Url,
    pub addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start the fake backend on a random port, mounted under `/api`.
pub async fn start_fake_backend() -> FakeBackend {
    let app = Router::new()
        .nest("/api", Router::new().route("/auth/login", post(fake_login)))
        .nest(
            "/numeric",
            Router::new().route("/auth/login", post(numeric_id_login)),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    FakeBackend {
        base_url: Url::parse(&format!("http://{}/api", addr)).expect("Invalid URL"),
        numeric_ids_url: Url::parse(&format!("http://{}/numeric", addr)).expect("Invalid URL"),
        addr,
        handle,
    }
}

/// Backend stub for tests that never log in.
pub struct OfflineBackend;

impl AuthBackend for OfflineBackend {
    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        Err(BackendError::Transport("offline".to_string()))
    }
}

/// Auth store over in-memory storage, returning the storage and jar for inspection.
pub fn memory_auth_store<B: AuthBackend>(
    backend: B,
) -> (AuthStore<B>, Arc<MemoryStorage>, Arc<MemoryCookieJar>) {
    let storage = Arc::new(MemoryStorage::new());
    let jar = Arc::new(MemoryCookieJar::new());
    let sessions = SessionStore::new(storage.clone(), jar.clone());
    (AuthStore::new(backend, sessions), storage, jar)
}

/// Build a GET request carrying an optional `Cookie` header.
pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("Failed to build request")
}

/// The `Location` header of a response, if any.
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
