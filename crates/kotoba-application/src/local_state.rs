//! The authoritative local snapshot.
//!
//! All three stores live behind one lock and every mutation goes through a
//! single write section that replaces the snapshot as a whole, so two
//! mutations triggered in the same tick cannot interleave and lose an
//! update. The remote copy is a best-effort mirror of this state, never
//! the other way around.

use kotoba_core::seed;
use kotoba_core::session::SessionStore;
use kotoba_core::settings::Settings;
use kotoba_core::state::CachedState;
use kotoba_core::vocab::VocabularyLedger;

/// Everything the client owns locally: sessions, the vocabulary ledger,
/// and the settings record.
#[derive(Debug, Clone)]
pub struct LocalState {
    pub sessions: SessionStore,
    pub ledger: VocabularyLedger,
    pub settings: Settings,
}

impl LocalState {
    /// First-launch state: one seeded conversation, the greeting
    /// vocabulary, default settings.
    pub fn seeded() -> Self {
        Self {
            sessions: SessionStore::seeded(),
            ledger: VocabularyLedger::from_items(seed::seed_vocabulary()),
            settings: Settings::default(),
        }
    }

    /// Restores state from a cached record. Empty or partially missing
    /// slices fall back to their seeded defaults; a stale active pointer
    /// is tolerated by the session store.
    pub fn from_cache(cached: CachedState) -> Self {
        let ledger = if cached.known_vocab.is_empty() {
            VocabularyLedger::from_items(seed::seed_vocabulary())
        } else {
            VocabularyLedger::from_items(cached.known_vocab)
        };
        Self {
            sessions: SessionStore::from_parts(cached.sessions, cached.active_session_id),
            ledger,
            settings: cached.settings,
        }
    }

    /// Snapshot for the durable cache.
    pub fn to_cached(&self) -> CachedState {
        CachedState {
            settings: self.settings.clone(),
            known_vocab: self.ledger.items().to_vec(),
            sessions: self.sessions.sessions().to_vec(),
            active_session_id: self.sessions.active_session_id().map(String::from),
        }
    }
}

impl Default for LocalState {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_state() {
        let state = LocalState::seeded();
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.ledger.len(), 5);
        assert_eq!(state.settings, Settings::default());
    }

    #[test]
    fn test_cache_round_trip() {
        let state = LocalState::seeded();
        let restored = LocalState::from_cache(state.to_cached());
        assert_eq!(restored.sessions.sessions(), state.sessions.sessions());
        assert_eq!(restored.ledger, state.ledger);
        assert_eq!(restored.settings, state.settings);
    }

    #[test]
    fn test_empty_cache_slices_fall_back_to_seeds() {
        let state = LocalState::from_cache(CachedState::default());
        assert_eq!(state.sessions.len(), 1);
        assert!(!state.ledger.is_empty());
    }
}
