//! Durable session persistence: credential, profile and the credential cookie.

use std::sync::Arc;

use tracing::{error, warn};

use super::cookie::{CookieChannel, SessionCookie, TOKEN_COOKIE_NAME};
use super::storage::{Storage, StorageError};
use super::types::{Profile, Session};

/// Storage key of the raw credential.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the serialized profile.
pub const USER_KEY: &str = "user";

/// Process-wide session persistence shared by the auth store and the guard.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    cookies: Arc<dyn CookieChannel>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>, cookies: Arc<dyn CookieChannel>) -> Self {
        Self { storage, cookies }
    }

    /// Persist a freshly issued session.
    ///
    /// The profile is written before the credential. If the credential write
    /// fails the previous profile is put back, so whatever credential remains
    /// stored still has the profile it was saved with.
    pub fn save(&self, token: &str, profile: &Profile) -> Result<(), StorageError> {
        let user = serde_json::to_string(profile)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        let previous = self.storage.get(USER_KEY)?;
        self.storage.set(USER_KEY, &user)?;

        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            warn!(error = %e, "Failed to store credential, rolling back profile");
            let rollback = match previous {
                Some(previous) => self.storage.set(USER_KEY, &previous),
                None => self.storage.remove(USER_KEY),
            };
            if let Err(rollback) = rollback {
                error!(error = %rollback, "Failed to roll back stored profile");
            }
            return Err(e);
        }

        self.cookies.set(SessionCookie::for_token(token));
        Ok(())
    }

    /// The stored credential, without its profile.
    pub fn token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(TOKEN_KEY)
    }

    /// The stored session, if both halves are present.
    ///
    /// A credential without a profile yields `None`; a profile that cannot be
    /// parsed is reported as [`StorageError::Corrupt`].
    pub fn load(&self) -> Result<Option<Session>, StorageError> {
        let Some(token) = self.storage.get(TOKEN_KEY)? else {
            return Ok(None);
        };
        let Some(user) = self.storage.get(USER_KEY)? else {
            warn!("Stored credential has no profile");
            return Ok(None);
        };
        let profile: Profile =
            serde_json::from_str(&user).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        Ok(Some(Session { token, profile }))
    }

    /// Remove credential, profile and cookie. Clearing an empty store is a no-op.
    ///
    /// The cookie is always dropped. The profile is only removed once the
    /// credential is gone, so a credential that cannot be removed keeps its
    /// profile.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.storage.remove(TOKEN_KEY);
        self.cookies.remove(TOKEN_COOKIE_NAME);
        token?;
        self.storage.remove(USER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryCookieJar, MemoryStorage, Role};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn profile() -> Profile {
        Profile {
            id: "1".to_string(),
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            role: Role::Admin,
        }
    }

    fn memory_store() -> (SessionStore, Arc<MemoryStorage>, Arc<MemoryCookieJar>) {
        let storage = Arc::new(MemoryStorage::new());
        let jar = Arc::new(MemoryCookieJar::new());
        (SessionStore::new(storage.clone(), jar.clone()), storage, jar)
    }

    /// Storage that refuses to write or remove the credential key on demand.
    #[derive(Default)]
    struct RejectToken {
        inner: MemoryStorage,
        fail: AtomicBool,
    }

    impl RejectToken {
        fn rejects(&self, key: &str) -> Result<(), StorageError> {
            if key == TOKEN_KEY && self.fail.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            Ok(())
        }
    }

    impl Storage for RejectToken {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.rejects(key)?;
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.rejects(key)?;
            self.inner.remove(key)
        }
    }

    fn student() -> Profile {
        Profile {
            id: "2".to_string(),
            name: "Alan".to_string(),
            email: "alan@example.com".to_string(),
            role: Role::Student,
        }
    }

    #[test]
    fn test_save_then_load() {
        let (store, _, jar) = memory_store();
        store.save("a.b.c", &profile()).unwrap();

        let session = store.load().unwrap().unwrap();
        assert_eq!(session.token, "a.b.c");
        assert_eq!(session.profile, profile());
        assert_eq!(jar.get(TOKEN_COOKIE_NAME).as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_save_writes_lax_day_long_cookie() {
        let (store, _, jar) = memory_store();
        store.save("a.b.c", &profile()).unwrap();

        let cookie = jar.raw(TOKEN_COOKIE_NAME).unwrap();
        assert_eq!(cookie.max_age.as_secs(), 86400);
        assert_eq!(cookie.same_site, crate::session::SameSite::Lax);
        assert_eq!(cookie.path, "/");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (store, storage, jar) = memory_store();
        store.save("a.b.c", &profile()).unwrap();

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert_eq!(jar.get(TOKEN_COOKIE_NAME), None);
    }

    #[test]
    fn test_failed_credential_write_leaves_nothing_behind() {
        let storage = Arc::new(RejectToken::default());
        storage.fail.store(true, Ordering::SeqCst);
        let jar = Arc::new(MemoryCookieJar::new());
        let store = SessionStore::new(storage.clone(), jar.clone());

        assert!(store.save("a.b.c", &profile()).is_err());
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(jar.get(TOKEN_COOKIE_NAME), None);
    }

    #[test]
    fn test_failed_credential_write_keeps_previous_session() {
        let storage = Arc::new(RejectToken::default());
        let jar = Arc::new(MemoryCookieJar::new());
        let store = SessionStore::new(storage.clone(), jar.clone());
        store.save("old.tok.en", &profile()).unwrap();

        storage.fail.store(true, Ordering::SeqCst);
        assert!(store.save("new.tok.en", &student()).is_err());

        let session = store.load().unwrap().expect("previous session intact");
        assert_eq!(session.token, "old.tok.en");
        assert_eq!(session.profile, profile());
        assert_eq!(jar.get(TOKEN_COOKIE_NAME).as_deref(), Some("old.tok.en"));
    }

    #[test]
    fn test_failed_credential_removal_keeps_profile() {
        let storage = Arc::new(RejectToken::default());
        let jar = Arc::new(MemoryCookieJar::new());
        let store = SessionStore::new(storage.clone(), jar.clone());
        store.save("a.b.c", &profile()).unwrap();

        storage.fail.store(true, Ordering::SeqCst);
        assert!(store.clear().is_err());

        let session = store.load().unwrap().expect("credential still has its profile");
        assert_eq!(session.token, "a.b.c");
        assert_eq!(jar.get(TOKEN_COOKIE_NAME), None);
    }

    #[test]
    fn test_credential_without_profile_loads_nothing() {
        let (store, storage, _) = memory_store();
        storage.set(TOKEN_KEY, "a.b.c").unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.token().unwrap().as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_corrupt_profile() {
        let (store, storage, _) = memory_store();
        storage.set(TOKEN_KEY, "a.b.c").unwrap();
        storage.set(USER_KEY, "{\"id\":").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Corrupt(_))));
    }
}
