//! Client-side session persistence.
//!
//! The credential and profile are kept in a key-value [`Storage`] under the
//! `token` and `user` keys, and the credential is mirrored into a cookie so
//! the edge gate can see it on navigation.

mod cookie;
mod storage;
mod store;
mod types;

pub use cookie::{
    CookieChannel, MemoryCookieJar, SESSION_COOKIE_MAX_AGE, SameSite, SessionCookie,
    TOKEN_COOKIE_NAME,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{SessionStore, TOKEN_KEY, USER_KEY};
pub use types::{Profile, Role, Session};
