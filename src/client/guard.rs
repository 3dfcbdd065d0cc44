//! Client-side guard around protected views.
//!
//! Complements the edge gate for paths it lets through without a role rule:
//! the guard only checks that a session exists.

use tokio::sync::watch;
use tracing::debug;

use super::state::AuthState;
use crate::session::Profile;

/// Performs client-side navigation.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// What a guarded subtree should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView {
    /// Signed in: render the protected content for this user
    Protected(Profile),
    /// Not signed in: render nothing
    Blank,
}

pub struct ClientGuard {
    state: watch::Receiver<AuthState>,
    login_path: String,
}

impl ClientGuard {
    pub fn new(state: watch::Receiver<AuthState>, login_path: impl Into<String>) -> Self {
        Self {
            state,
            login_path: login_path.into(),
        }
    }

    /// Current view. Never exposes protected content without a session.
    pub fn view(&self) -> GuardView {
        let state = self.state.borrow();
        match (&state.profile, state.is_authenticated()) {
            (Some(profile), true) => GuardView::Protected(profile.clone()),
            _ => GuardView::Blank,
        }
    }

    /// Redirect on mount if signed out, then every time the session drops.
    /// Returns when the auth store goes away.
    pub async fn watch<N: Navigator>(mut self, navigator: N) {
        let mut authenticated = self.state.borrow_and_update().is_authenticated();
        if !authenticated {
            debug!(to = %self.login_path, "Guard mounted without session");
            navigator.redirect(&self.login_path);
        }

        while self.state.changed().await.is_ok() {
            let now = self.state.borrow_and_update().is_authenticated();
            if authenticated && !now {
                debug!(to = %self.login_path, "Session ended, leaving protected view");
                navigator.redirect(&self.login_path);
            }
            authenticated = now;
        }
    }
}
