//! Best-effort remote mirroring.
//!
//! The mirror runs after the local commit and is never awaited by the
//! user-visible flow. Failures are logged, never surfaced, and never roll
//! back local state.

use kotoba_core::session::Session;
use kotoba_core::settings::Settings;
use kotoba_core::sync::RemoteStore;
use kotoba_core::vocab::VocabularyItem;
use std::sync::Arc;

/// Fire-and-forget writer to the remote persistence service.
#[derive(Clone)]
pub struct RemoteMirror {
    remote: Arc<dyn RemoteStore>,
}

impl RemoteMirror {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Mirrors a session save.
    pub async fn save_session(&self, session: &Session) {
        if let Err(e) = self.remote.save_session(session).await {
            tracing::warn!("[RemoteMirror] Failed to save session {}: {}", session.id, e);
        }
    }

    /// Mirrors a session deletion.
    pub async fn delete_session(&self, session_id: &str) {
        if let Err(e) = self.remote.delete_session(session_id).await {
            tracing::warn!(
                "[RemoteMirror] Failed to delete session {}: {}",
                session_id,
                e
            );
        }
    }

    /// Mirrors a batch of vocabulary items, one request awaited after
    /// another. Sequential on purpose: batch latency stays linear in the
    /// number of new terms and the service sees writes in ledger order.
    pub async fn save_vocab_items(&self, items: &[VocabularyItem]) {
        for item in items {
            if let Err(e) = self.remote.save_vocab_item(item).await {
                tracing::warn!(
                    "[RemoteMirror] Failed to save vocab item '{}': {}",
                    item.term,
                    e
                );
            }
        }
    }

    /// Mirrors a settings replacement.
    pub async fn save_settings(&self, settings: &Settings) {
        if let Err(e) = self.remote.save_settings(settings).await {
            tracing::warn!("[RemoteMirror] Failed to save settings: {}", e);
        }
    }
}
