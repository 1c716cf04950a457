//! Session store — persisted bearer token + cached user record.
//!
//! The store sits on top of a plain key/value [`Storage`] and owns exactly
//! two keys: [`TOKEN_KEY`] for the bearer token and [`USER_KEY`] for the
//! serialized [`CurrentUser`]. There is no expiry tracking; a stale token
//! surfaces as an authorization error on the next API call.
//!
//! Backends:
//! - [`MemoryStorage`] — process-local, always available.
//! - [`FileStorage`] — JSON file on disk (`native` feature).
//! - [`WebStorage`] — browser `localStorage` (`wasm` feature).

pub mod memory;

#[cfg(feature = "native")]
pub mod file;

#[cfg(feature = "wasm")]
pub mod web;

pub use memory::MemoryStorage;

#[cfg(feature = "native")]
pub use file::FileStorage;

#[cfg(feature = "wasm")]
pub use web::WebStorage;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::error::SessionError;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "accessToken";

/// Storage key holding the serialized current-user record.
pub const USER_KEY: &str = "currentUser";

/// Minimal key/value persistence used by [`SessionStore`].
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// The cached user record, as persisted under [`USER_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub name: String,
    pub role: Role,
}

/// An authenticated session: who is logged in and the token they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<i64>,
    pub username: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    fn user_record(&self) -> CurrentUser {
        CurrentUser {
            id: self.user_id,
            username: self.username.clone(),
            name: self.username.clone(),
            role: self.role,
        }
    }
}

/// Persists and restores the [`Session`].
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// A store backed by fresh in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persist token and user record.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let record = serde_json::to_string(&session.user_record())?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        self.storage.set(USER_KEY, &record)?;
        Ok(())
    }

    /// The last-saved session, if both keys are present.
    ///
    /// An unreadable user record or backing store clears both keys and
    /// yields `None`.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        match self.read() {
            Ok(session) => Ok(session),
            Err(SessionError::Corrupt(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable stored session");
                self.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn read(&self) -> Result<Option<Session>, SessionError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let record = self.storage.get(USER_KEY)?;

        let (Some(token), Some(record)) = (token, record) else {
            return Ok(None);
        };

        let user: CurrentUser = serde_json::from_str(&record)?;
        Ok(Some(Session {
            user_id: user.id,
            username: user.username,
            role: user.role,
            token,
        }))
    }

    /// Remove both keys, regardless of prior state.
    pub fn clear(&self) -> Result<(), SessionError> {
        let user = self.storage.remove(USER_KEY);
        let token = self.storage.remove(TOKEN_KEY);
        user.and(token)
    }

    /// The raw bearer token, if any.
    pub fn token(&self) -> Result<Option<String>, SessionError> {
        self.storage.get(TOKEN_KEY)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_session() -> Session {
        Session {
            user_id: Some(1),
            username: "adm".to_string(),
            role: Role::Admin,
            token: "tok-123".to_string(),
        }
    }

    #[test]
    fn test_save_then_load() {
        let store = SessionStore::in_memory();
        store.save(&admin_session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(admin_session()));
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_load_empty() {
        let store = SessionStore::in_memory();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_load_requires_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        let store = SessionStore::new(storage);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_user_record_shape() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.save(&admin_session()).unwrap();
        let raw = storage.get(USER_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["username"], "adm");
        assert_eq!(value["name"], "adm");
        assert_eq!(value["role"], "admin");
        assert!(value.get("token").is_none());
    }

    #[test]
    fn test_corrupt_record_clears_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();
        let store = SessionStore::new(storage.clone());

        assert_eq!(store.load().unwrap(), None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear_always_removes_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());

        // Nothing stored yet.
        store.clear().unwrap();

        // Only a token.
        storage.set(TOKEN_KEY, "tok").unwrap();
        store.clear().unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

        // Full session.
        store.save(&admin_session()).unwrap();
        store.clear().unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }
}
