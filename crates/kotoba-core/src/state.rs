//! The durable local snapshot.
//!
//! The whole client state persists as a single versioned record. Bumping
//! [`CACHE_SCHEMA_VERSION`] deliberately invalidates older persisted shapes
//! (the file name is version-qualified) rather than migrating them.

use crate::session::Session;
use crate::settings::Settings;
use crate::vocab::VocabularyItem;
use serde::{Deserialize, Serialize};

/// Version qualifier for the cache file name. Bump to invalidate old data.
pub const CACHE_SCHEMA_VERSION: &str = "v17";

/// The single record written to the local durable cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CachedState {
    pub settings: Settings,
    pub known_vocab: Vec<VocabularyItem>,
    pub sessions: Vec<Session>,
    pub active_session_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_round_trip() {
        let state = CachedState {
            settings: Settings::default(),
            known_vocab: seed::seed_vocabulary(),
            sessions: Vec::new(),
            active_session_id: Some("s-1".to_string()),
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: CachedState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_missing_fields_default() {
        let state: CachedState = serde_json::from_str("{}").unwrap();
        assert!(state.sessions.is_empty());
        assert!(state.active_session_id.is_none());
        assert_eq!(state.settings, Settings::default());
    }
}
