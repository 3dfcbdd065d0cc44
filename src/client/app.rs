//! Top-level client lifecycle: owns the auth store and its refresh timers.

use std::sync::Arc;

use tracing::info;

use super::backend::AuthBackend;
use super::guard::ClientGuard;
use super::machine::{AuthStore, SessionCheck};
use super::refresh::{RefreshLoop, RefreshSchedule};

pub struct ClientApp<B> {
    store: Arc<AuthStore<B>>,
    refresh: RefreshLoop,
    login_path: String,
}

impl<B: AuthBackend + 'static> ClientApp<B> {
    /// Rehydrate the session left by a previous run and start re-validation.
    /// Must be called inside a runtime.
    pub fn mount(
        store: AuthStore<B>,
        schedule: RefreshSchedule,
        login_path: impl Into<String>,
    ) -> Self {
        let store = Arc::new(store);
        let restored = store.check_auth_state();
        info!(outcome = ?restored, "Client mounted");
        let refresh = RefreshLoop::start(store.clone(), schedule);
        Self {
            store,
            refresh,
            login_path: login_path.into(),
        }
    }

    pub fn store(&self) -> &Arc<AuthStore<B>> {
        &self.store
    }

    /// A guard bound to this app's auth state.
    pub fn guard(&self) -> ClientGuard {
        ClientGuard::new(self.store.subscribe(), self.login_path.clone())
    }

    /// Run a re-validation immediately, outside the schedule.
    pub fn revalidate(&self) -> SessionCheck {
        self.store.check_auth_state()
    }

    /// Tear down: cancel the refresh timers.
    pub fn shutdown(self) {
        self.refresh.cancel();
        info!("Client shut down");
    }
}
