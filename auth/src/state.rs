//! Session state types.
//!
//! All types are `Clone` so callers can take cheap snapshots of the
//! session without holding any lock.

use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// Tokens
// ═══════════════════════════════════════════════════════════════════════

/// Access/refresh token pair issued by the backend.
///
/// The two tokens only ever travel together: a session either holds a full
/// pair or nothing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived bearer token attached to protected requests.
    pub access_token: String,

    /// Long-lived token exchanged for a fresh pair.
    pub refresh_token: String,
}

impl TokenPair {
    /// Create a new token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Token values must never end up in logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// User
// ═══════════════════════════════════════════════════════════════════════

/// Role of the signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Editorial access (news, tags).
    Editor,
    /// Any role name this client does not know about.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Get the backend role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Editor => "EDITOR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a backend role name, tolerating the `ROLE_` prefix.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        let name = name.strip_prefix("ROLE_").unwrap_or(name);
        match name.to_ascii_uppercase().as_str() {
            "ADMIN" => Self::Admin,
            "EDITOR" => Self::Editor,
            _ => Self::Unknown,
        }
    }
}

/// Summary of the signed-in user kept alongside the tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Login name.
    pub username: String,

    /// Effective role.
    pub role: Role,
}

impl UserSummary {
    /// Create a new user summary.
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Client-side session.
///
/// # Examples
///
/// ```
/// # use newsdesk_auth::{Session, TokenPair};
/// let session = Session::default();
/// assert!(!session.is_authenticated());
///
/// let session = Session::new(None, TokenPair::new("T1", "R1"));
/// assert_eq!(session.access_token(), Some("T1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Token pair, present iff the session is authenticated.
    pub tokens: Option<TokenPair>,

    /// Signed-in user, if known.
    pub user: Option<UserSummary>,
}

impl Session {
    /// Create an authenticated session.
    #[must_use]
    pub const fn new(user: Option<UserSummary>, tokens: TokenPair) -> Self {
        Self {
            tokens: Some(tokens),
            user,
        }
    }

    /// `true` when a token pair is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    /// Current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }

    /// Current refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.refresh_token.as_str())
    }
}

/// Lifecycle signal published whenever the session changes hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No credentials held; the user never signed in or signed out.
    Anonymous,
    /// A token pair is held.
    Authenticated,
    /// Credentials were revoked by a failed refresh. The application must
    /// send the user back to the login entry point.
    Expired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_name() {
        assert_eq!(Role::from_name("ADMIN"), Role::Admin);
        assert_eq!(Role::from_name("ROLE_EDITOR"), Role::Editor);
        assert_eq!(Role::from_name("editor"), Role::Editor);
        assert_eq!(Role::from_name("REPORTER"), Role::Unknown);
    }

    #[test]
    fn test_user_summary_json_shape() {
        let user = UserSummary::new("admin", Role::Admin);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"username": "admin", "role": "ADMIN"}));

        let parsed: UserSummary =
            serde_json::from_str(r#"{"username":"x","role":"MODERATOR"}"#).unwrap();
        assert_eq!(parsed.role, Role::Unknown);
    }

    #[test]
    fn test_token_pair_debug_is_redacted() {
        let pair = TokenPair::new("secret-access", "secret-refresh");
        let rendered = format!("{pair:?}");
        assert!(!rendered.contains("secret"));
    }
}
