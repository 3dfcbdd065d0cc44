//! Login endpoint client.

use std::future::Future;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::session::Profile;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login: the issued credential and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: Profile,
}

/// The backend's authentication surface.
pub trait AuthBackend: Send + Sync {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, BackendError>> + Send;
}

/// Talks to the REST backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    client: reqwest::Client,
    login_url: Url,
}

impl HttpAuthBackend {
    /// `base` is the API root; the login endpoint is `auth/login` beneath it.
    pub fn new(base: &Url) -> Result<Self, BackendError> {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(client: reqwest::Client, base: &Url) -> Result<Self, BackendError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let login_url = base
            .join("auth/login")
            .map_err(|e| BackendError::InvalidResponse(format!("Invalid backend URL: {}", e)))?;
        Ok(Self { client, login_url })
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }
}

/// Error body returned by the backend on rejection.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<serde_json::Value>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        match self.message {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            Some(serde_json::Value::Array(items)) => {
                let parts: Vec<String> = items
                    .into_iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => self.error.filter(|e| !e.is_empty()),
        }
    }
}

/// Message shown when the backend rejects a login without explaining why.
pub const DEFAULT_LOGIN_FAILURE: &str = "Login failed";

impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let response = self
            .client
            .post(self.login_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string());
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

/// Errors that can occur while calling the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend answered with a non-success status
    Rejected { status: u16, message: String },
    /// Request never produced a response
    Transport(String),
    /// Success response that could not be understood
    InvalidResponse(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Rejected { status, message } => {
                write!(f, "Backend rejected request ({}): {}", status, message)
            }
            BackendError::Transport(e) => write!(f, "Unable to reach backend: {}", e),
            BackendError::InvalidResponse(e) => write!(f, "Invalid backend response: {}", e),
        }
    }
}

impl std::error::Error for BackendError {}
