//! Client side of the session: login against the backend, in-memory auth
//! state, the view guard and the periodic refresh.

mod app;
mod backend;
mod guard;
mod machine;
mod refresh;
mod state;

pub use app::ClientApp;
pub use backend::{
    AuthBackend, BackendError, DEFAULT_LOGIN_FAILURE, HttpAuthBackend, LoginRequest,
    LoginResponse,
};
pub use guard::{ClientGuard, GuardView, Navigator};
pub use machine::{AuthError, AuthStore, SessionCheck};
pub use refresh::{CHECK_INTERVAL, INITIAL_CHECK_DELAY, RefreshLoop, RefreshSchedule};
pub use state::{AuthPhase, AuthState};
