//! Unified path management for kotoba's local files.
//!
//! All local state lives under the platform config directory:
//!
//! ```text
//! ~/.config/kotoba/            # Config directory
//! ├── state_v17.json           # Durable state cache (schema-version-qualified)
//! └── secret.json              # Bearer credential
//! ```
//!
//! The cache file name carries [`CACHE_SCHEMA_VERSION`], so bumping the
//! version orphans the old file instead of migrating it.
//!
//! [`CACHE_SCHEMA_VERSION`]: kotoba_core::state::CACHE_SCHEMA_VERSION

use kotoba_core::error::{KotobaError, Result};
use kotoba_core::state::CACHE_SCHEMA_VERSION;
use std::path::PathBuf;

/// Unified path management for kotoba.
pub struct KotobaPaths;

impl KotobaPaths {
    /// Returns the kotoba configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`KotobaError::Config`] if the platform config directory
    /// cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("kotoba"))
            .ok_or_else(|| KotobaError::config("Cannot find config directory"))
    }

    /// Returns the path to the durable state cache file.
    pub fn cache_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(format!("state_{}.json", CACHE_SCHEMA_VERSION)))
    }

    /// Returns the path to the credential file.
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_is_version_qualified() {
        let path = KotobaPaths::cache_file().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, format!("state_{}.json", CACHE_SCHEMA_VERSION));
    }
}
