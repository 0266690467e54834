//! Credential file storage.
//!
//! The bearer token issued by the authentication collaborator is kept in
//! `~/.config/kotoba/secret.json`. This module only reads it and, on a 401,
//! force-invalidates it; issuing tokens is out of scope.

use crate::storage::atomic_json::AtomicJsonFile;
use kotoba_core::sync::CredentialProvider;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// On-disk shape of `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SecretConfig {
    /// Bearer token for the persistence/reply service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// File-backed implementation of [`CredentialProvider`].
///
/// The token is cached in memory after the first read; `invalidate()`
/// clears both the cached copy and the stored one.
pub struct FileCredentialStore {
    file: Arc<AtomicJsonFile<SecretConfig>>,
    cached: Mutex<Option<String>>,
}

impl FileCredentialStore {
    /// Creates a store over the given secret file path and reads the token
    /// once. A missing or unreadable file simply means no credential.
    pub fn new(path: PathBuf) -> Self {
        let file = AtomicJsonFile::<SecretConfig>::new(path);
        let token = match file.load() {
            Ok(Some(config)) => config.token,
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("[Credentials] Failed to read secret file: {}", e);
                None
            }
        };
        Self {
            file: Arc::new(file),
            cached: Mutex::new(token),
        }
    }

    /// Creates a store over the default secret path.
    pub fn new_default() -> kotoba_core::Result<Self> {
        Ok(Self::new(crate::paths::KotobaPaths::secret_file()?))
    }
}

impl CredentialProvider for FileCredentialStore {
    fn token(&self) -> Option<String> {
        self.cached.lock().expect("credential lock poisoned").clone()
    }

    /// Forced invalidation after a 401: drops the cached token and clears
    /// it from the secret file (best effort).
    fn invalidate(&self) {
        self.cached
            .lock()
            .expect("credential lock poisoned")
            .take();

        if let Err(e) = self.file.save(&SecretConfig { token: None }) {
            tracing::warn!("[Credentials] Failed to clear stored token: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_means_no_token() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp_dir.path().join("secret.json"));
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_reads_stored_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"token": "abc123"}"#).unwrap();

        let store = FileCredentialStore::new(path);
        assert_eq!(store.token(), Some("abc123".to_string()));
    }

    #[test]
    fn test_invalidate_clears_memory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"token": "abc123"}"#).unwrap();

        let store = FileCredentialStore::new(path.clone());
        store.invalidate();
        assert_eq!(store.token(), None);

        // A fresh store sees the cleared file.
        let reloaded = FileCredentialStore::new(path);
        assert_eq!(reloaded.token(), None);
    }

    #[test]
    fn test_unreadable_file_recovers_as_no_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileCredentialStore::new(path);
        assert_eq!(store.token(), None);
    }
}
