//! Auth state machine driving login, logout and periodic re-validation.
//!
//! ```text
//! Anonymous --login--> Authenticating --ok--> Authenticated
//!     ^                      |                     |
//!     |                      +--rejected--> Failed |
//!     +---------- logout / expired session --------+
//! ```
//!
//! State changes are published through a `watch` channel; consumers subscribe
//! rather than reading a global.

use tokio::sync::watch;
use tracing::{error, info, warn};

use super::backend::{AuthBackend, BackendError, LoginRequest};
use super::state::{AuthPhase, AuthState};
use crate::jwt;
use crate::session::{Profile, SessionStore, StorageError};

/// Outcome of [`AuthStore::check_auth_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    /// Nothing stored
    Anonymous,
    /// Stored session adopted
    Restored,
    /// Stored credential is past its `exp`; the session was logged out
    Expired,
    /// Stored session was unusable; the session was logged out
    Invalid,
    /// Storage could not be read; state left as it was
    Unreadable,
}

/// Owner of the in-memory session state.
pub struct AuthStore<B> {
    backend: B,
    sessions: SessionStore,
    state: watch::Sender<AuthState>,
}

impl<B: AuthBackend> AuthStore<B> {
    pub fn new(backend: B, sessions: SessionStore) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            backend,
            sessions,
            state,
        }
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Sign in with the backend and persist the resulting session.
    ///
    /// A rejection leaves the session store untouched and moves the state to
    /// [`AuthPhase::Failed`] with the backend's message. Concurrent logins are
    /// not serialized; the last one to resolve wins.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, AuthError> {
        info!(email = %email, "Login started");
        self.state.send_modify(|state| {
            state.phase = AuthPhase::Authenticating;
            state.error = None;
        });

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match self.backend.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                let err = AuthError::from(e);
                warn!(email = %email, error = %err, "Login failed");
                self.state.send_replace(AuthState::failed(err.message()));
                return Err(err);
            }
        };

        if let Err(e) = self.sessions.save(&response.access_token, &response.user) {
            error!(error = %e, "Failed to persist session");
            let err = AuthError::Storage(e);
            self.state.send_replace(AuthState::failed(err.message()));
            return Err(err);
        }

        info!(user = %response.user.id, role = %response.user.role, "Login succeeded");
        let profile = response.user.clone();
        self.state.send_replace(AuthState {
            phase: AuthPhase::Authenticated,
            profile: Some(response.user),
            token: Some(response.access_token),
            error: None,
        });
        Ok(profile)
    }

    /// Drop the session locally. Never fails; storage errors are logged.
    pub fn logout(&self) {
        if let Err(e) = self.sessions.clear() {
            error!(error = %e, "Failed to clear stored session");
        }
        self.state.send_replace(AuthState::default());
        info!("Logged out");
    }

    /// Re-validate the stored session against the in-memory state.
    ///
    /// Stored sessions whose credential is provably expired are logged out.
    /// Undecodable credentials are kept, matching [`jwt::is_expired`].
    pub fn check_auth_state(&self) -> SessionCheck {
        let token = match self.sessions.token() {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Failed to read stored credential");
                return SessionCheck::Unreadable;
            }
        };

        let Some(token) = token else {
            self.state.send_if_modified(|state| {
                if state.is_authenticated() {
                    *state = AuthState::default();
                    true
                } else {
                    false
                }
            });
            return SessionCheck::Anonymous;
        };

        if jwt::is_expired(&token) {
            warn!("Stored session expired, logging out");
            self.logout();
            return SessionCheck::Expired;
        }

        match self.sessions.load() {
            Ok(Some(session)) => {
                let restored = AuthState::authenticated(session);
                self.state.send_if_modified(|state| {
                    if *state == restored {
                        false
                    } else {
                        *state = restored;
                        true
                    }
                });
                SessionCheck::Restored
            }
            Ok(None) => {
                warn!("Stored session incomplete, logging out");
                self.logout();
                SessionCheck::Invalid
            }
            Err(StorageError::Corrupt(e)) => {
                warn!(error = %e, "Stored profile unreadable, logging out");
                self.logout();
                SessionCheck::Invalid
            }
            Err(e) => {
                error!(error = %e, "Failed to read stored session");
                SessionCheck::Unreadable
            }
        }
    }
}

/// Errors returned by [`AuthStore::login`].
#[derive(Debug)]
pub enum AuthError {
    /// Backend rejected the credentials
    Authentication(String),
    /// Backend could not be reached or answered nonsense
    Network(String),
    /// Session could not be persisted
    Storage(StorageError),
}

impl AuthError {
    /// Text suitable for showing to the user.
    pub fn message(&self) -> String {
        match self {
            AuthError::Authentication(message) => message.clone(),
            AuthError::Network(_) => "Unable to reach the server".to_string(),
            AuthError::Storage(_) => "Unable to save the session".to_string(),
        }
    }
}

impl From<BackendError> for AuthError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Rejected { message, .. } => AuthError::Authentication(message),
            other => AuthError::Network(other.to_string()),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Authentication(message) => write!(f, "Authentication failed: {}", message),
            AuthError::Network(e) => write!(f, "{}", e),
            AuthError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {}
