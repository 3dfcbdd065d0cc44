//! Edge gate: rejects dashboard navigations that lack a usable credential or
//! a sufficient role, before any page is rendered.
//!
//! Missing or undecodable credentials redirect to the login page. A role that
//! is not on a path's allow-list redirects to the not-found page, so gated
//! areas do not reveal that they exist.

mod config;
mod cookie;
mod decision;
mod middleware;

pub use config::{DEFAULT_LOGIN_PATH, DEFAULT_NOT_FOUND_PATH, GateConfig};
pub use cookie::{bearer_token, extract_credential, get_cookie};
pub use decision::{GateDecision, GateRedirect, evaluate};
pub use middleware::edge_gate;
