//! In-memory authentication state.

use crate::session::{Profile, Session};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    Failed,
}

/// Snapshot published to every subscriber of the auth store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub profile: Option<Profile>,
    pub token: Option<String>,
    /// Message from the last failed login
    pub error: Option<String>,
}

impl AuthState {
    pub fn authenticated(session: Session) -> Self {
        Self {
            phase: AuthPhase::Authenticated,
            profile: Some(session.profile),
            token: Some(session.token),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            phase: AuthPhase::Failed,
            profile: None,
            token: None,
            error: Some(message.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }
}
