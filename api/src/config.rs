//! Client configuration.

use crate::error::{ApiError, Result};
use std::time::Duration;

/// Backend base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Per-request timeout used when nothing is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "NEWSDESK_API_BASE_URL";

/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "NEWSDESK_HTTP_TIMEOUT_SECS";

/// Environment variable overriding the `User-Agent` header.
pub const USER_AGENT_ENV: &str = "NEWSDESK_USER_AGENT";

/// Configuration for [`AuthenticatedHttpClient`](crate::AuthenticatedHttpClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash (e.g.
    /// "https://news.example.com/api/v1"). Request paths are appended to it.
    pub base_url: String,

    /// Upper bound for every outbound call, the refresh call included.
    ///
    /// Default: 15 seconds
    pub timeout: Duration,

    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for `base_url` with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Read the configuration from the environment.
    ///
    /// Unset variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the timeout is not a positive integer
    /// or the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ApiError::Config(format!("{TIMEOUT_ENV} must be a positive integer, got `{raw}`"))
                })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        if let Ok(user_agent) = std::env::var(USER_AGENT_ENV) {
            config = config.with_user_agent(user_agent);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(base_url.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that the configuration can be used to build a client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://, got `{}`",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(ApiError::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Absolute URL for a backend-relative `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("newsdesk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

fn normalize_base_url(base_url: String) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new("https://news.example.com/api/v1/")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("tests");

        assert_eq!(config.base_url, "https://news.example.com/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_joining() {
        let config = ClientConfig::new("http://localhost:8080/api/v1");
        assert_eq!(
            config.url("/admin/news"),
            "http://localhost:8080/api/v1/admin/news"
        );
        assert_eq!(
            config.url("public/news"),
            "http://localhost:8080/api/v1/public/news"
        );
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::new("ftp://example.com").validate().is_err());
        assert!(
            ClientConfig::default()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
