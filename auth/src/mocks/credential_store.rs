//! Mock credential store for testing.

use crate::error::{AuthError, Result};
use crate::providers::{CredentialKey, CredentialStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock credential store.
///
/// In-memory store. Clones share the same entries, so a test can keep one
/// clone for assertions and hand another to the session. Writes can be made
/// to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct MockCredentialStore {
    entries: Arc<Mutex<HashMap<CredentialKey, String>>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MockCredentialStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock store pre-populated with entries.
    #[must_use]
    pub fn with_entries(entries: &[(CredentialKey, &str)]) -> Self {
        let store = Self::new();
        {
            let mut guard = store.lock();
            for (key, value) in entries {
                guard.insert(*key, (*value).to_string());
            }
        }
        store
    }

    /// Make every subsequent write fail (for testing).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful write operations (for testing).
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Get all stored entries (for testing).
    #[must_use]
    pub fn get_all(&self) -> HashMap<CredentialKey, String> {
        self.lock().clone()
    }

    /// `true` if nothing is stored (for testing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CredentialKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::StorageError("mock store is read-only".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl CredentialStore for MockCredentialStore {
    fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        Ok(self.lock().get(&key).cloned())
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        self.check_writable()?;
        self.lock().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: CredentialKey) -> Result<()> {
        self.check_writable()?;
        self.lock().remove(&key);
        Ok(())
    }

    fn set_all(&self, entries: &[(CredentialKey, &str)]) -> Result<()> {
        self.check_writable()?;
        let mut guard = self.lock();
        for (key, value) in entries {
            guard.insert(*key, (*value).to_string());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[CredentialKey]) -> Result<()> {
        self.check_writable()?;
        let mut guard = self.lock();
        for key in keys {
            guard.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MockCredentialStore::new();

        store.set(CredentialKey::AccessToken, "T1").unwrap();
        assert_eq!(
            store.get(CredentialKey::AccessToken).unwrap().as_deref(),
            Some("T1")
        );

        store.remove(CredentialKey::AccessToken).unwrap();
        assert!(store.get(CredentialKey::AccessToken).unwrap().is_none());

        // Removing a missing key is fine
        store.remove(CredentialKey::User).unwrap();
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MockCredentialStore::new();
        let other = store.clone();

        other
            .set_all(&[(CredentialKey::AccessToken, "T1"), (CredentialKey::RefreshToken, "R1")])
            .unwrap();

        assert_eq!(store.get_all().len(), 2);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_fail_writes_leaves_entries_untouched() {
        let store = MockCredentialStore::with_entries(&[(CredentialKey::AccessToken, "T1")]);
        store.fail_writes(true);

        assert!(store.set(CredentialKey::AccessToken, "T2").is_err());
        assert!(store.remove_all(&CredentialKey::ALL).is_err());
        assert_eq!(
            store.get(CredentialKey::AccessToken).unwrap().as_deref(),
            Some("T1")
        );
    }
}
