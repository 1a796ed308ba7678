//! Owned session with a defined lifecycle.
//!
//! A [`SessionHandle`] is built once at process start from a
//! [`CredentialStore`] and shared (by `Arc`) with everything that needs the
//! tokens. It is the only writer of the store's session keys.
//!
//! Memory is authoritative: every mutation is applied in memory first and
//! then mirrored to the store while the write lock is still held. A store
//! failure is reported to the caller but never leaves the in-memory session
//! half-updated.
//!
//! Refresh results are applied with [`SessionHandle::rotate_tokens`] and
//! [`SessionHandle::expire_if`], which only take effect if the session still
//! holds the refresh token the refresh was started with.

use crate::error::{AuthError, Result};
use crate::providers::{CredentialKey, CredentialStore};
use crate::state::{Session, SessionStatus, TokenPair, UserSummary};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;

/// Process-wide session shared between the HTTP client and its callers.
pub struct SessionHandle {
    store: Arc<dyn CredentialStore>,
    state: RwLock<Session>,
    status: watch::Sender<SessionStatus>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("authenticated", &self.is_authenticated())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Load the session persisted in `store`.
    ///
    /// A store holding only one of the two tokens is repaired by removing
    /// both; an undecodable user entry is dropped. A user without tokens is
    /// discarded as well.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    pub fn load(store: Arc<dyn CredentialStore>) -> Result<Self> {
        let access = store.get(CredentialKey::AccessToken)?;
        let refresh = store.get(CredentialKey::RefreshToken)?;
        let raw_user = store.get(CredentialKey::User)?;

        let tokens = match (access, refresh) {
            (Some(access), Some(refresh)) => Some(TokenPair::new(access, refresh)),
            (None, None) => None,
            _ => {
                tracing::warn!("Stored credentials hold only one token, discarding both");
                store.remove_all(&CredentialKey::ALL)?;
                None
            }
        };

        let user = match (&tokens, raw_user) {
            (Some(_), Some(raw)) => match decode_user(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping undecodable stored user");
                    store.remove(CredentialKey::User)?;
                    None
                }
            },
            (None, Some(_)) => {
                store.remove(CredentialKey::User)?;
                None
            }
            (_, None) => None,
        };

        let session = Session { tokens, user };
        let status = if session.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        };

        tracing::debug!(authenticated = session.is_authenticated(), "Session loaded");

        let (status, _) = watch::channel(status);

        Ok(Self {
            store,
            state: RwLock::new(session),
            status,
        })
    }

    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Current access token, if signed in.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token().map(str::to_string)
    }

    /// Current refresh token, if signed in.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token().map(str::to_string)
    }

    /// Signed-in user, if known.
    #[must_use]
    pub fn user(&self) -> Option<UserSummary> {
        self.read().user.clone()
    }

    /// `true` when a token pair is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Latest lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Subscribe to lifecycle changes.
    ///
    /// Receivers observe [`SessionStatus::Expired`] when a refresh fails and
    /// the user has to sign in again.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Install a freshly issued session (login).
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written; the in-memory session
    /// is updated regardless.
    pub fn set_auth(&self, user: UserSummary, tokens: TokenPair) -> Result<()> {
        let encoded_user = encode_user(&user)?;
        let mut state = self.write();
        state.user = Some(user);
        state.tokens = Some(tokens.clone());
        self.status.send_replace(SessionStatus::Authenticated);

        self.store.set_all(&[
            (CredentialKey::User, encoded_user.as_str()),
            (CredentialKey::AccessToken, tokens.access_token.as_str()),
            (CredentialKey::RefreshToken, tokens.refresh_token.as_str()),
        ])
    }

    /// Replace the stored user summary, keeping the tokens.
    ///
    /// # Errors
    ///
    /// Returns error if there is no active session or the store cannot be
    /// written.
    pub fn set_user(&self, user: UserSummary) -> Result<()> {
        let encoded_user = encode_user(&user)?;
        let mut state = self.write();
        if !state.is_authenticated() {
            return Err(AuthError::InternalError(
                "cannot attach a user to a signed-out session".to_string(),
            ));
        }
        state.user = Some(user);
        self.store.set(CredentialKey::User, &encoded_user)
    }

    /// Swap in a refreshed token pair.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written; the in-memory session
    /// is updated regardless.
    pub fn update_tokens(&self, tokens: TokenPair) -> Result<()> {
        let mut state = self.write();
        state.tokens = Some(tokens.clone());
        self.status.send_replace(SessionStatus::Authenticated);
        persist_tokens(self.store.as_ref(), &tokens)
    }

    /// Swap in a refreshed token pair, but only if the session still holds
    /// `expected_refresh`.
    ///
    /// Returns `Ok(false)` and changes nothing when the session was signed
    /// out or replaced since the refresh token was read.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written; the in-memory session
    /// is updated regardless.
    pub fn rotate_tokens(&self, expected_refresh: &str, tokens: TokenPair) -> Result<bool> {
        let mut state = self.write();
        if state.refresh_token() != Some(expected_refresh) {
            return Ok(false);
        }
        state.tokens = Some(tokens.clone());
        self.status.send_replace(SessionStatus::Authenticated);
        persist_tokens(self.store.as_ref(), &tokens).map(|()| true)
    }

    /// Clear the session after an explicit logout.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be cleared; the in-memory session
    /// is cleared regardless.
    pub fn sign_out(&self) -> Result<()> {
        self.clear(&mut self.write(), SessionStatus::Anonymous)
    }

    /// Clear the session because it can no longer be refreshed.
    ///
    /// Publishes [`SessionStatus::Expired`].
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be cleared; the in-memory session
    /// is cleared regardless.
    pub fn expire(&self) -> Result<()> {
        self.clear(&mut self.write(), SessionStatus::Expired)
    }

    /// Expire the session only if it still holds `expected_refresh`
    /// (`None`: still holds no tokens).
    ///
    /// Returns `Ok(false)` and changes nothing when the session was signed
    /// out or replaced in the meantime.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be cleared; the in-memory session
    /// is cleared regardless.
    pub fn expire_if(&self, expected_refresh: Option<&str>) -> Result<bool> {
        let mut state = self.write();
        if state.refresh_token() != expected_refresh {
            return Ok(false);
        }
        self.clear(&mut state, SessionStatus::Expired).map(|()| true)
    }

    /// Store writes happen under the write guard so a concurrent mutation
    /// cannot interleave between memory and disk.
    fn clear(&self, state: &mut Session, status: SessionStatus) -> Result<()> {
        *state = Session::default();
        self.status.send_replace(status);

        self.store.remove_all(&CredentialKey::ALL)
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn persist_tokens(store: &dyn CredentialStore, tokens: &TokenPair) -> Result<()> {
    store.set_all(&[
        (CredentialKey::AccessToken, tokens.access_token.as_str()),
        (CredentialKey::RefreshToken, tokens.refresh_token.as_str()),
    ])
}

fn encode_user(user: &UserSummary) -> Result<String> {
    serde_json::to_string(user).map_err(|e| AuthError::InternalError(e.to_string()))
}

fn decode_user(raw: &str) -> Result<UserSummary> {
    serde_json::from_str(raw).map_err(|e| AuthError::MalformedCredential {
        key: CredentialKey::User.as_str(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockCredentialStore;
    use crate::state::Role;

    fn admin() -> UserSummary {
        UserSummary::new("admin", Role::Admin)
    }

    fn handle(store: &MockCredentialStore) -> SessionHandle {
        SessionHandle::load(Arc::new(store.clone())).unwrap()
    }

    #[test]
    fn test_empty_store_loads_anonymous() {
        let session = handle(&MockCredentialStore::new());

        assert!(!session.is_authenticated());
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert_eq!(session.snapshot(), Session::default());
    }

    #[test]
    fn test_set_auth_persists_all_keys() {
        let store = MockCredentialStore::new();
        let session = handle(&store);

        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();

        assert_eq!(session.access_token().as_deref(), Some("T1"));
        assert_eq!(session.status(), SessionStatus::Authenticated);
        let entries = store.get_all();
        assert_eq!(entries[&CredentialKey::AccessToken], "T1");
        assert_eq!(entries[&CredentialKey::RefreshToken], "R1");
        assert_eq!(
            entries[&CredentialKey::User],
            r#"{"username":"admin","role":"ADMIN"}"#
        );
    }

    #[test]
    fn test_reload_reconstructs_session() {
        let store = MockCredentialStore::new();
        handle(&store)
            .set_auth(admin(), TokenPair::new("a", "b"))
            .unwrap();

        let reloaded = handle(&store);
        assert_eq!(
            reloaded.snapshot(),
            Session::new(Some(admin()), TokenPair::new("a", "b"))
        );
        assert_eq!(reloaded.status(), SessionStatus::Authenticated);
    }

    #[test]
    fn test_half_written_store_is_repaired() {
        let store = MockCredentialStore::with_entries(&[
            (CredentialKey::AccessToken, "T1"),
            (CredentialKey::User, r#"{"username":"admin","role":"ADMIN"}"#),
        ]);

        let session = handle(&store);

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_undecodable_user_is_dropped() {
        let store = MockCredentialStore::with_entries(&[
            (CredentialKey::AccessToken, "T1"),
            (CredentialKey::RefreshToken, "R1"),
            (CredentialKey::User, "{not json"),
        ]);

        let session = handle(&store);

        assert!(session.is_authenticated());
        assert!(session.user().is_none());
        assert!(!store.get_all().contains_key(&CredentialKey::User));
    }

    #[test]
    fn test_update_tokens_keeps_user() {
        let store = MockCredentialStore::new();
        let session = handle(&store);
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();

        session.update_tokens(TokenPair::new("T2", "R2")).unwrap();

        assert_eq!(session.user(), Some(admin()));
        assert_eq!(session.refresh_token().as_deref(), Some("R2"));
        assert_eq!(store.get_all()[&CredentialKey::AccessToken], "T2");
    }

    #[test]
    fn test_expire_clears_and_signals() {
        let store = MockCredentialStore::new();
        let session = handle(&store);
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();
        let mut status = session.subscribe();

        session.expire().unwrap();

        assert!(!session.is_authenticated());
        assert!(store.is_empty());
        assert!(status.has_changed().unwrap());
        assert_eq!(*status.borrow_and_update(), SessionStatus::Expired);
    }

    #[test]
    fn test_sign_out_is_anonymous() {
        let session = handle(&MockCredentialStore::new());
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();

        session.sign_out().unwrap();

        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert_eq!(session.snapshot(), Session::default());
    }

    #[test]
    fn test_store_failure_still_updates_memory() {
        let store = MockCredentialStore::new();
        let session = handle(&store);
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();
        store.fail_writes(true);

        assert!(session.update_tokens(TokenPair::new("T2", "R2")).is_err());
        assert_eq!(session.access_token().as_deref(), Some("T2"));

        assert!(session.expire().is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_rotate_tokens_applies_to_same_session() {
        let store = MockCredentialStore::new();
        let session = handle(&store);
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();

        assert!(session.rotate_tokens("R1", TokenPair::new("T2", "R2")).unwrap());

        assert_eq!(session.access_token().as_deref(), Some("T2"));
        assert_eq!(store.get_all()[&CredentialKey::RefreshToken], "R2");
    }

    #[test]
    fn test_rotate_tokens_after_sign_out_is_discarded() {
        let store = MockCredentialStore::new();
        let session = handle(&store);
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();
        session.sign_out().unwrap();

        assert!(!session.rotate_tokens("R1", TokenPair::new("T2", "R2")).unwrap());

        assert!(!session.is_authenticated());
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(store.is_empty());
    }

    #[test]
    fn test_rotate_tokens_after_relogin_is_discarded() {
        let store = MockCredentialStore::new();
        let session = handle(&store);
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();
        session.set_auth(admin(), TokenPair::new("T9", "R9")).unwrap();

        assert!(!session.rotate_tokens("R1", TokenPair::new("T2", "R2")).unwrap());

        assert_eq!(session.access_token().as_deref(), Some("T9"));
        assert_eq!(store.get_all()[&CredentialKey::AccessToken], "T9");
    }

    #[test]
    fn test_expire_if_after_relogin_keeps_new_session() {
        let store = MockCredentialStore::new();
        let session = handle(&store);
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();
        session.set_auth(admin(), TokenPair::new("T9", "R9")).unwrap();

        assert!(!session.expire_if(Some("R1")).unwrap());

        assert_eq!(session.refresh_token().as_deref(), Some("R9"));
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(store.get_all()[&CredentialKey::RefreshToken], "R9");
    }

    #[test]
    fn test_expire_if_matching_session_expires() {
        let store = MockCredentialStore::new();
        let session = handle(&store);
        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();

        assert!(session.expire_if(Some("R1")).unwrap());

        assert_eq!(session.status(), SessionStatus::Expired);
        assert!(store.is_empty());
    }

    #[test]
    fn test_expire_if_none_only_matches_empty_session() {
        let session = handle(&MockCredentialStore::new());
        assert!(session.expire_if(None).unwrap());
        assert_eq!(session.status(), SessionStatus::Expired);

        session.set_auth(admin(), TokenPair::new("T1", "R1")).unwrap();
        assert!(!session.expire_if(None).unwrap());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_set_user_requires_session() {
        let session = handle(&MockCredentialStore::new());
        assert!(session.set_user(admin()).is_err());
    }
}
