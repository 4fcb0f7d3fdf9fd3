//! Observable session state mirrored to persistent storage.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::storage::{SessionStorage, Slot};
use crate::api::User;
use crate::error::Result;
use crate::token;

/// Snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// Explicit user request.
    User,
    /// The token's expiry claim passed.
    Expired,
    /// The server rejected the token.
    Unauthorized,
}

struct Inner {
    state: watch::Sender<SessionState>,
    storage: Arc<dyn SessionStorage>,
}

/// Shared handle to the session.
///
/// Clones share the same state. Observers receive every change through
/// [`SessionStore::subscribe`].
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore {
    /// Restore the session persisted in `storage`.
    ///
    /// Both slots must be present and non-empty and the user must parse;
    /// anything else is purged and the store starts logged out.
    pub fn hydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = Self::read_persisted(storage.as_ref());
        if restored.is_none() {
            Self::purge(storage.as_ref());
        }
        let state = restored.unwrap_or_default();
        let (tx, _rx) = watch::channel(state);
        Self {
            inner: Arc::new(Inner { state: tx, storage }),
        }
    }

    fn read_persisted(storage: &dyn SessionStorage) -> Option<SessionState> {
        let token = match storage.get(Slot::Token) {
            Ok(t) => t.filter(|t| !t.is_empty())?,
            Err(e) => {
                warn!("Could not read stored token: {}", e);
                return None;
            }
        };
        let user_json = match storage.get(Slot::User) {
            Ok(u) => u.filter(|u| !u.is_empty())?,
            Err(e) => {
                warn!("Could not read stored user: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some(SessionState {
                token: Some(token),
                user: Some(user),
            }),
            Err(e) => {
                warn!("Discarding stored session, user data is invalid: {}", e);
                None
            }
        }
    }

    fn purge(storage: &dyn SessionStorage) {
        for slot in [Slot::Token, Slot::User] {
            if let Err(e) = storage.remove(slot) {
                warn!("Failed to clear stored {}: {}", slot.key(), e);
            }
        }
    }

    /// Start a new session and persist it.
    pub fn login(&self, token: impl Into<String>, user: User) -> Result<()> {
        let token = token.into();
        let storage = &self.inner.storage;
        storage.set(Slot::Token, &token)?;
        storage.set(Slot::User, &serde_json::to_string(&user)?)?;

        info!(email = %user.email, "logged in");
        self.inner.state.send_replace(SessionState {
            token: Some(token),
            user: Some(user),
        });
        Ok(())
    }

    /// End the session. Never fails; storage errors are only logged.
    pub fn logout(&self) {
        self.logout_with_reason(LogoutReason::User);
    }

    pub(crate) fn logout_with_reason(&self, reason: LogoutReason) {
        Self::purge(self.inner.storage.as_ref());
        let previous = self.inner.state.send_replace(SessionState::default());
        if previous.is_authenticated() {
            info!(?reason, "logged out");
        }
    }

    /// Replace the cached profile, keeping the token.
    pub fn update_user(&self, user: User) -> Result<()> {
        self.inner
            .storage
            .set(Slot::User, &serde_json::to_string(&user)?)?;
        self.inner.state.send_modify(|state| state.user = Some(user));
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Whether the current token is decodable and not yet expired.
    pub fn is_token_valid(&self) -> bool {
        self.is_token_valid_at(chrono::Utc::now().timestamp())
    }

    pub fn is_token_valid_at(&self, now: i64) -> bool {
        self.token()
            .is_some_and(|t| token::is_token_valid_at(&t, now))
    }
}

#[cfg(test)]
pub(crate) fn sample_user(email: &str) -> User {
    use chrono::TimeZone;
    User {
        id: "665f1c".to_string(),
        email: email.to_string(),
        full_name: "Ada Lovelace".to_string(),
        created_at: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;
    use crate::token::make_token;

    fn empty_store() -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (SessionStore::hydrate(storage.clone()), storage)
    }

    #[test]
    fn test_login_then_logout() {
        let (store, storage) = empty_store();
        assert!(!store.is_authenticated());

        let user = sample_user("ada@example.com");
        store.login("t0k3n", user.clone()).unwrap();

        let state = store.snapshot();
        assert_eq!(state.token.as_deref(), Some("t0k3n"));
        assert_eq!(state.user.as_ref(), Some(&user));
        assert!(state.is_authenticated());
        assert_eq!(storage.get(Slot::Token).unwrap().as_deref(), Some("t0k3n"));
        assert!(storage.get(Slot::User).unwrap().is_some());

        store.logout();
        let state = store.snapshot();
        assert_eq!(state.token, None);
        assert_eq!(state.user, None);
        assert!(!state.is_authenticated());
        assert_eq!(storage.get(Slot::Token).unwrap(), None);
        assert_eq!(storage.get(Slot::User).unwrap(), None);
    }

    #[test]
    fn test_update_user_keeps_token() {
        let (store, storage) = empty_store();
        store.login("t", sample_user("a@x.io")).unwrap();

        let mut renamed = sample_user("a@x.io");
        renamed.full_name = "Ada King".to_string();
        store.update_user(renamed.clone()).unwrap();

        assert_eq!(store.token().as_deref(), Some("t"));
        assert_eq!(store.user(), Some(renamed));
        let stored = storage.get(Slot::User).unwrap().unwrap();
        assert!(stored.contains("Ada King"));
    }

    #[test]
    fn test_hydrate_restores_session() {
        let storage = Arc::new(MemoryStorage::new());
        let user = sample_user("ada@example.com");
        storage.set(Slot::Token, "persisted").unwrap();
        storage
            .set(Slot::User, &serde_json::to_string(&user).unwrap())
            .unwrap();

        let store = SessionStore::hydrate(storage);
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("persisted"));
        assert_eq!(store.user(), Some(user));
    }

    #[test]
    fn test_hydrate_purges_bad_user() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(Slot::Token, "persisted").unwrap();
        storage.set(Slot::User, "{not json").unwrap();

        let store = SessionStore::hydrate(storage.clone());
        assert!(!store.is_authenticated());
        assert_eq!(storage.get(Slot::Token).unwrap(), None);
        assert_eq!(storage.get(Slot::User).unwrap(), None);
    }

    #[test]
    fn test_hydrate_purges_half_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(Slot::Token, "orphan").unwrap();

        let store = SessionStore::hydrate(storage.clone());
        assert!(!store.is_authenticated());
        assert_eq!(storage.get(Slot::Token).unwrap(), None);
    }

    #[test]
    fn test_hydrate_purges_empty_token() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(Slot::Token, "").unwrap();
        storage
            .set(Slot::User, &serde_json::to_string(&sample_user("a@x.io")).unwrap())
            .unwrap();

        let store = SessionStore::hydrate(storage.clone());
        assert!(!store.is_authenticated());
        assert_eq!(store.user(), None);
        assert_eq!(storage.get(Slot::User).unwrap(), None);
    }

    #[test]
    fn test_token_validity() {
        let (store, _) = empty_store();
        assert!(!store.is_token_valid_at(0));

        store.login(make_token(500), sample_user("a@x.io")).unwrap();
        assert!(store.is_token_valid_at(499));
        assert!(!store.is_token_valid_at(500));

        store.login("garbage", sample_user("a@x.io")).unwrap();
        assert!(!store.is_token_valid_at(0));
    }

    #[test]
    fn test_subscribers_see_changes() {
        let (store, _) = empty_store();
        let mut rx = store.subscribe();
        assert!(!rx.borrow_and_update().is_authenticated());

        store.login("t", sample_user("a@x.io")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        store.logout();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_authenticated());
    }

    #[test]
    fn test_clones_share_state() {
        let (store, _) = empty_store();
        let other = store.clone();
        store.login("t", sample_user("a@x.io")).unwrap();
        assert!(other.is_authenticated());
    }
}
