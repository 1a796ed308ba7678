//! Error types for the newsdesk API client.

use newsdesk_auth::AuthError;
use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur when talking to the newsdesk backend.
///
/// The client recovers exactly one failure locally (a 401 on a protected
/// request, via token refresh). Everything else reaches the caller as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response reached the client (connect failure, reset, timeout).
    #[error("Network error{}: {source}", timeout_suffix(.timeout))]
    Network {
        /// `true` if the configured request timeout elapsed
        timeout: bool,
        /// Transport error
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Message from the error body, or the canonical reason
        message: String,
    },

    /// The session could not be restored by a refresh. The caller must send
    /// the user back to the login entry point.
    #[error("Session expired, sign in again")]
    Unauthenticated,

    /// A 2xx body did not have the shape the endpoint declared.
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The request could not be built (body serialisation, multipart).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing persisted credentials failed.
    #[error(transparent)]
    Credentials(#[from] AuthError),
}

const fn timeout_suffix(timeout: &bool) -> &'static str {
    if *timeout { " (timed out)" } else { "" }
}

impl ApiError {
    /// HTTP status, for [`ApiError::Http`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` for a transport failure caused by the request timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { timeout: true, .. })
    }

    /// `true` when the user has to sign in again.
    #[must_use]
    pub const fn requires_reauth(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// `true` for a 401 response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    pub(crate) fn transport(source: reqwest::Error) -> Self {
        Self::Network {
            timeout: source.is_timeout(),
            source,
        }
    }

    /// Build an [`ApiError::Http`] from a failed response body.
    ///
    /// Uses the `message` field of a JSON error body when present, then a
    /// short plain-text body, then the canonical status reason.
    pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            error: Option<String>,
        }

        let from_json = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty());

        let message = from_json.unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if !text.is_empty() && text.len() <= 512 && !text.starts_with('{') {
                text.to_string()
            } else {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Request failed")
                    .to_string()
            }
        });

        Self::Http { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_body() {
        let err = ApiError::from_response(400, br#"{"message":"Tag code is required"}"#);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "HTTP 400: Tag code is required");
    }

    #[test]
    fn test_message_falls_back_to_reason() {
        let err = ApiError::from_response(403, b"");
        assert_eq!(err.to_string(), "HTTP 403: Forbidden");

        let err = ApiError::from_response(500, br#"{"timestamp":"2024-01-01"}"#);
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn test_plain_text_body_is_kept() {
        let err = ApiError::from_response(429, b"Too many login attempts");
        assert_eq!(err.to_string(), "HTTP 429: Too many login attempts");
    }

    #[test]
    fn test_classification() {
        assert!(ApiError::from_response(401, b"").is_unauthorized());
        assert!(ApiError::Unauthenticated.requires_reauth());
        assert!(!ApiError::Unauthenticated.is_timeout());
    }
}
