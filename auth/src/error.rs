//! Error types for session and credential storage operations.

use thiserror::Error;

/// Result type alias for session and credential operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failures raised while loading, persisting, or clearing credentials.
///
/// None of these carry token values: messages are safe to log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backing credential store could not be read or written.
    #[error("Credential storage error: {0}")]
    StorageError(String),

    /// A stored credential exists but cannot be decoded.
    #[error("Malformed stored credential `{key}`: {reason}")]
    MalformedCredential {
        /// Store key holding the bad value
        key: &'static str,
        /// Decoder message
        reason: String,
    },

    /// Internal invariant violated (should not be exposed to users).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// Returns `true` if the error came from the durable store rather than
    /// from in-memory session handling.
    ///
    /// # Examples
    ///
    /// ```
    /// # use newsdesk_auth::AuthError;
    /// assert!(AuthError::StorageError("disk full".into()).is_storage_error());
    /// assert!(!AuthError::InternalError("oops".into()).is_storage_error());
    /// ```
    pub const fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::StorageError(_) | Self::MalformedCredential { .. }
        )
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::StorageError(error.to_string())
    }
}
