//! File-based credential store implementation.
//!
//! Credentials are kept in a single JSON object keyed by
//! [`CredentialKey::as_str`]:
//!
//! ```json
//! { "accessToken": "…", "refreshToken": "…", "user": "{\"username\":\"admin\",\"role\":\"ADMIN\"}" }
//! ```
//!
//! Every write rewrites the whole document into a sibling temporary file and
//! renames it over the original, so a crash mid-write leaves either the old
//! or the new document and never a torn one. On Unix the file is created
//! with mode `0600`.
//!
//! # Example
//!
//! ```no_run
//! use newsdesk_auth::providers::{CredentialKey, CredentialStore};
//! use newsdesk_auth::stores::FileCredentialStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileCredentialStore::new("/tmp/newsdesk/credentials.json");
//! store.set(CredentialKey::AccessToken, "T1")?;
//! assert_eq!(store.get(CredentialKey::AccessToken)?.as_deref(), Some("T1"));
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::providers::{CredentialKey, CredentialStore};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

type Document = BTreeMap<String, String>;

/// Credential store backed by a JSON file.
///
/// Operations within one process are serialised by an internal mutex.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Create a store for `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            AuthError::StorageError(format!(
                "credential file {} is not a JSON object: {e}",
                self.path.display()
            ))
        })
    }

    fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_vec_pretty(document)
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = open_private(&tmp_path)?;
            file.write_all(&contents)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::trace!(path = %self.path.display(), entries = document.len(), "credential file written");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Document)) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read_document()?;
        apply(&mut document);
        self.write_document(&document)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read_document()?;
        Ok(document.remove(key.as_str()))
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        self.update(|document| {
            document.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: CredentialKey) -> Result<()> {
        self.update(|document| {
            document.remove(key.as_str());
        })
    }

    fn set_all(&self, entries: &[(CredentialKey, &str)]) -> Result<()> {
        self.update(|document| {
            for (key, value) in entries {
                document.insert(key.as_str().to_string(), (*value).to_string());
            }
        })
    }

    fn remove_all(&self, keys: &[CredentialKey]) -> Result<()> {
        self.update(|document| {
            for key in keys {
                document.remove(key.as_str());
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/credentials.json"));

        assert!(store.get(CredentialKey::AccessToken).unwrap().is_none());
        // Removing from a missing file creates an empty document
        store.remove(CredentialKey::User).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        FileCredentialStore::new(&path)
            .set_all(&[(CredentialKey::AccessToken, "T1"), (CredentialKey::RefreshToken, "R1")])
            .unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.get(CredentialKey::AccessToken).unwrap().as_deref(), Some("T1"));
        assert_eq!(reopened.get(CredentialKey::RefreshToken).unwrap().as_deref(), Some("R1"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["accessToken"], "T1");
        assert!(!dir.path().join("credentials.json.tmp").exists());
    }

    #[test]
    fn test_remove_all_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        store.set(CredentialKey::User, "{}").unwrap();
        store.set(CredentialKey::AccessToken, "T1").unwrap();
        store.remove_all(&[CredentialKey::AccessToken]).unwrap();

        assert!(store.get(CredentialKey::AccessToken).unwrap().is_none());
        assert_eq!(store.get(CredentialKey::User).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let err = FileCredentialStore::new(&path)
            .get(CredentialKey::AccessToken)
            .unwrap_err();
        assert!(err.is_storage_error());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.set(CredentialKey::AccessToken, "T1").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
