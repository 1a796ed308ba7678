//! Credential storage configuration.
//!
//! Values come from the application (usually via the environment), never
//! from hardcoded paths inside the library.

use crate::stores::FileCredentialStore;
use std::path::PathBuf;

/// Environment variable overriding the credential file location.
pub const CREDENTIALS_PATH_ENV: &str = "NEWSDESK_CREDENTIALS_PATH";

/// File name used under the default directory.
const DEFAULT_FILE_NAME: &str = "credentials.json";

/// Directory (relative to `$HOME`) used when no path is configured.
const DEFAULT_DIR: &str = ".newsdesk";

/// Credential file configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Location of the credential file.
    ///
    /// Default: `$HOME/.newsdesk/credentials.json`, or
    /// `./.newsdesk/credentials.json` when `HOME` is unset.
    pub path: PathBuf,
}

impl StoreConfig {
    /// Create a configuration for an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the configuration from `NEWSDESK_CREDENTIALS_PATH`, falling back
    /// to the default location.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var_os(CREDENTIALS_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }

    /// Set the credential file location.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Open the file-backed store described by this configuration.
    #[must_use]
    pub fn open(&self) -> FileCredentialStore {
        FileCredentialStore::new(self.path.clone())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let base = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
        Self {
            path: base.join(DEFAULT_DIR).join(DEFAULT_FILE_NAME),
        }
    }
}
