//! Durable state cache backed by an atomic JSON file.

use crate::storage::atomic_json::{AtomicJsonError, AtomicJsonFile};
use async_trait::async_trait;
use kotoba_core::error::{KotobaError, Result};
use kotoba_core::state::CachedState;
use kotoba_core::sync::CacheRepository;
use std::path::PathBuf;
use std::sync::Arc;

/// File-backed implementation of [`CacheRepository`].
///
/// A cache that fails to parse is treated as absent: the caller falls back
/// to defaults and the corrupt file is overwritten on the next save. Startup
/// is never blocked by a bad cache.
#[derive(Clone)]
pub struct FileCacheRepository {
    file: Arc<AtomicJsonFile<CachedState>>,
}

impl FileCacheRepository {
    /// Creates a repository over the given cache file path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    /// Creates a repository over the default, schema-version-qualified
    /// cache path.
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(crate::paths::KotobaPaths::cache_file()?))
    }
}

#[async_trait]
impl CacheRepository for FileCacheRepository {
    async fn load(&self) -> Result<Option<CachedState>> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| KotobaError::internal(format!("Failed to join task: {}", e)))?;

        match loaded {
            Ok(state) => Ok(state),
            Err(AtomicJsonError::JsonError(e)) => {
                tracing::warn!(
                    "[Cache] Corruption detected in {}, using defaults: {}",
                    self.file.path().display(),
                    e
                );
                Ok(None)
            }
            Err(e) => Err(KotobaError::io(e.to_string())),
        }
    }

    async fn save(&self, state: &CachedState) -> Result<()> {
        let file = self.file.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || file.save(&state))
            .await
            .map_err(|e| KotobaError::internal(format!("Failed to join task: {}", e)))?
            .map_err(|e| KotobaError::io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kotoba_core::seed;
    use kotoba_core::settings::Settings;
    use tempfile::TempDir;

    fn sample_state() -> CachedState {
        CachedState {
            settings: Settings::default(),
            known_vocab: seed::seed_vocabulary(),
            sessions: Vec::new(),
            active_session_id: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileCacheRepository::new(temp_dir.path().join("state.json"));

        let state = sample_state();
        repo.save(&state).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_missing_cache_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileCacheRepository::new(temp_dir.path().join("missing.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_cache_recovers_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "{definitely not json").unwrap();

        let repo = FileCacheRepository::new(path);
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_corrupt_cache() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "garbage").unwrap();

        let repo = FileCacheRepository::new(path);
        repo.save(&sample_state()).await.unwrap();
        assert!(repo.load().await.unwrap().is_some());
    }
}
