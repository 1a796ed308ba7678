//! Credential store trait.
//!
//! Durable key/value storage for the three session entries. The store is
//! opaque to the session: it only has to survive a process restart.

use crate::error::Result;

/// Keys persisted by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    /// Bearer access token.
    AccessToken,
    /// Refresh token.
    RefreshToken,
    /// JSON-encoded [`UserSummary`](crate::UserSummary).
    User,
}

impl CredentialKey {
    /// Every key, in persistence order.
    pub const ALL: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::User];

    /// Storage name of the key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
        }
    }
}

/// Credential store.
///
/// # Implementation Notes
///
/// - Calls are synchronous and cheap; they are never made while a lock
///   guarding async state is held across an `.await`.
/// - `set_all` / `remove_all` must apply every entry or none when the
///   backend can express that. The session relies on them to keep the
///   access and refresh tokens together on disk.
pub trait CredentialStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be read.
    fn get(&self, key: CredentialKey) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be written.
    fn set(&self, key: CredentialKey, value: &str) -> Result<()>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be written.
    fn remove(&self, key: CredentialKey) -> Result<()>;

    /// Write several values in one operation.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be written.
    fn set_all(&self, entries: &[(CredentialKey, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(*key, value)?;
        }
        Ok(())
    }

    /// Delete several values in one operation.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be written.
    fn remove_all(&self, keys: &[CredentialKey]) -> Result<()> {
        for key in keys {
            self.remove(*key)?;
        }
        Ok(())
    }
}
