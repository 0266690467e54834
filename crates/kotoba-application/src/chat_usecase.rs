//! Chat use case: one user turn from send to persisted reply.
//!
//! Every mutation follows the same two-phase pattern:
//!
//! 1. **Local commit** - the in-memory snapshot is updated under the write
//!    lock and flushed to the durable cache. This phase is synchronous from
//!    the caller's point of view and its result is authoritative.
//! 2. **Remote mirror** - the mutation is replayed against the persistence
//!    service in a spawned task that nobody awaits. Failures are logged,
//!    never surfaced, and never roll anything back.

use crate::local_state::LocalState;
use crate::mirror::RemoteMirror;
use kotoba_core::error::Result;
use kotoba_core::reply::StructuredReply;
use kotoba_core::session::{Message, Session, SessionStore};
use kotoba_core::settings::Settings;
use kotoba_core::sync::{CacheRepository, CredentialProvider, RemoteStore, ReplyService};
use kotoba_core::vocab::{VocabularyDraft, VocabularyItem, VocabularyLedger};
use std::sync::Arc;
use tokio::sync::RwLock;

/// How many of the most recent ledger terms accompany a reply request.
const VOCAB_CONTEXT_TERMS: usize = 100;

/// Orchestrates chat turns over the local state and the remote boundary.
pub struct ChatUseCase {
    /// The authoritative local snapshot; all mutation goes through this lock
    state: Arc<RwLock<LocalState>>,
    /// Durable local cache
    cache: Arc<dyn CacheRepository>,
    /// The AI tutor reply boundary
    reply_service: Arc<dyn ReplyService>,
    /// Fire-and-forget writer to the persistence service
    mirror: RemoteMirror,
    /// Read side of the persistence service (auth-failure reload)
    remote: Arc<dyn RemoteStore>,
    /// Bearer credential holder, force-invalidated on 401
    credentials: Arc<dyn CredentialProvider>,
}

impl ChatUseCase {
    /// Creates the use case and restores local state from the durable
    /// cache. A missing or corrupt cache seeds first-launch defaults;
    /// startup never blocks on the remote service.
    pub async fn load(
        cache: Arc<dyn CacheRepository>,
        reply_service: Arc<dyn ReplyService>,
        remote: Arc<dyn RemoteStore>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let state = match cache.load().await {
            Ok(Some(cached)) => LocalState::from_cache(cached),
            Ok(None) => LocalState::seeded(),
            Err(e) => {
                tracing::warn!("[ChatUseCase] Cache load failed, seeding defaults: {}", e);
                LocalState::seeded()
            }
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            cache,
            reply_service,
            mirror: RemoteMirror::new(remote.clone()),
            remote,
            credentials,
        }
    }

    // ========================================================================
    // Turn pipeline
    // ========================================================================

    /// Runs one user turn against a session.
    ///
    /// Appends the user message optimistically, fetches the tutor reply,
    /// merges vocabulary candidates when auto-add is on, and appends the
    /// assistant message. Returns the appended assistant message - on a
    /// transport or shape failure that is an inline `is_error` notice and
    /// the call still succeeds.
    ///
    /// # Errors
    ///
    /// - [`KotobaError::ReplyPending`] when a reply is already outstanding
    ///   for this session (rejected, not queued)
    /// - [`KotobaError::NotFound`] for an unknown session id
    /// - [`KotobaError::Auth`] when the service rejects the credential; the
    ///   token is invalidated and state reloaded before this returns
    ///
    /// [`KotobaError::ReplyPending`]: kotoba_core::KotobaError::ReplyPending
    /// [`KotobaError::NotFound`]: kotoba_core::KotobaError::NotFound
    /// [`KotobaError::Auth`]: kotoba_core::KotobaError::Auth
    pub async fn send_message(&self, session_id: &str, text: &str) -> Result<Message> {
        // Phase 1: optimistic local commit of the user message, gate held.
        {
            let mut state = self.state.write().await;
            state.sessions.begin_turn(session_id, text)?;
        }
        self.commit_local().await;

        // The request context is derived from the snapshot at request time;
        // ledger mutations while the fetch is in flight cannot affect it.
        let (level_context, vocab_context, auto_add) = {
            let state = self.state.read().await;
            (
                state.settings.target_level.prompt_context().to_string(),
                state.ledger.recent_terms(VOCAB_CONTEXT_TERMS).join(", "),
                state.settings.auto_add_vocab,
            )
        };

        match self
            .reply_service
            .fetch_reply(text, &level_context, &vocab_context)
            .await
        {
            Ok(reply) => {
                let (message, new_items, session) = {
                    let mut state = self.state.write().await;
                    let new_items = if auto_add {
                        upsert_candidates(&mut state.ledger, &reply)
                    } else {
                        Vec::new()
                    };

                    let message = Message::assistant(reply);
                    state.sessions.append_message(session_id, message.clone());
                    state.sessions.finish_turn(session_id);
                    let session = state.sessions.get(session_id).cloned();
                    (message, new_items, session)
                };
                self.commit_local().await;

                let mirror = self.mirror.clone();
                tokio::spawn(async move {
                    if let Some(session) = session {
                        mirror.save_session(&session).await;
                    }
                    mirror.save_vocab_items(&new_items).await;
                });

                Ok(message)
            }
            Err(e) if e.is_auth() => {
                {
                    let mut state = self.state.write().await;
                    state.sessions.finish_turn(session_id);
                }
                tracing::warn!("[ChatUseCase] Credential rejected, reloading state: {}", e);
                self.credentials.invalidate();
                self.reload_from_remote().await;
                self.commit_local().await;
                Err(e)
            }
            Err(e) => {
                // Transport and shape failures surface as a normal message
                // in the conversation; ledger and settings are untouched
                // and the session stays usable.
                let message = Message::error(e.to_string());
                {
                    let mut state = self.state.write().await;
                    state.sessions.append_message(session_id, message.clone());
                    state.sessions.finish_turn(session_id);
                }
                self.commit_local().await;
                Ok(message)
            }
        }
    }

    // ========================================================================
    // Session operations
    // ========================================================================

    /// Creates a fresh conversation and sets it active.
    pub async fn create_session(&self) -> Session {
        let session = {
            let mut state = self.state.write().await;
            state.sessions.create_session().clone()
        };
        self.commit_local().await;

        let mirror = self.mirror.clone();
        let mirrored = session.clone();
        tokio::spawn(async move {
            mirror.save_session(&mirrored).await;
        });

        session
    }

    /// Deletes a session. Returns `false` (and does nothing) when it is the
    /// last remaining one or the id is unknown.
    pub async fn delete_session(&self, session_id: &str) -> bool {
        let deleted = {
            let mut state = self.state.write().await;
            state.sessions.delete_session(session_id)
        };
        if !deleted {
            return false;
        }
        self.commit_local().await;

        let mirror = self.mirror.clone();
        let id = session_id.to_string();
        tokio::spawn(async move {
            mirror.delete_session(&id).await;
        });

        true
    }

    /// Updates the active pointer. The pointer is a local display concern
    /// and is not mirrored.
    pub async fn select_session(&self, session_id: &str) -> bool {
        let selected = {
            let mut state = self.state.write().await;
            state.sessions.select_session(session_id)
        };
        if selected {
            self.commit_local().await;
        }
        selected
    }

    // ========================================================================
    // Vocabulary operations
    // ========================================================================

    /// Merges one sighting into the ledger (word-inspector add).
    pub async fn add_to_vocab(&self, draft: VocabularyDraft) -> VocabularyItem {
        let item = {
            let mut state = self.state.write().await;
            state.ledger.upsert(draft).clone()
        };
        self.commit_local().await;

        let mirror = self.mirror.clone();
        let mirrored = item.clone();
        tokio::spawn(async move {
            mirror.save_vocab_items(std::slice::from_ref(&mirrored)).await;
        });

        item
    }

    /// Adds a hand-entered term with no reply context.
    pub async fn manual_add(&self, term: &str) -> VocabularyItem {
        self.add_to_vocab(VocabularyDraft::manual(term)).await
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Replaces the settings record wholesale.
    pub async fn update_settings(&self, settings: Settings) {
        {
            let mut state = self.state.write().await;
            state.settings = settings.clone();
        }
        self.commit_local().await;

        let mirror = self.mirror.clone();
        tokio::spawn(async move {
            mirror.save_settings(&settings).await;
        });
    }

    // ========================================================================
    // Two-phase primitives
    // ========================================================================

    /// Phase 1: flushes the current snapshot to the durable cache. A cache
    /// write failure is logged and never interrupts the interaction.
    pub async fn commit_local(&self) {
        let cached = {
            let state = self.state.read().await;
            state.to_cached()
        };
        if let Err(e) = self.cache.save(&cached).await {
            tracing::warn!("[ChatUseCase] Failed to persist local state: {}", e);
        }
    }

    /// Pulls sessions, vocabulary, and settings from the remote store,
    /// replacing each local slice only when its fetch succeeds with a
    /// usable shape. Used after credential invalidation.
    pub async fn reload_from_remote(&self) -> Result<()> {
        let sessions = self.remote.fetch_sessions().await;
        let vocab = self.remote.fetch_vocab().await;
        let settings = self.remote.fetch_settings().await;

        let mut state = self.state.write().await;

        match sessions {
            Ok(list) if !list.is_empty() => {
                state.sessions = SessionStore::from_parts(list, None);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("[ChatUseCase] Session reload failed, keeping local: {}", e),
        }

        match vocab {
            Ok(items) if !items.is_empty() => {
                state.ledger = VocabularyLedger::from_items(items);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("[ChatUseCase] Vocab reload failed, keeping local: {}", e),
        }

        match settings {
            Ok(s) => state.settings = s,
            Err(e) => tracing::warn!("[ChatUseCase] Settings reload failed, keeping local: {}", e),
        }

        Ok(())
    }

    // ========================================================================
    // Snapshot reads
    // ========================================================================

    /// The active session (always resolves).
    pub async fn active_session(&self) -> Session {
        self.state.read().await.sessions.active().clone()
    }

    /// All sessions in collection order.
    pub async fn sessions(&self) -> Vec<Session> {
        self.state.read().await.sessions.sessions().to_vec()
    }

    /// The ledger's items in insertion order.
    pub async fn vocab_items(&self) -> Vec<VocabularyItem> {
        self.state.read().await.ledger.items().to_vec()
    }

    /// The current settings record.
    pub async fn settings(&self) -> Settings {
        self.state.read().await.settings.clone()
    }
}

/// Runs candidate extraction against the snapshot's known terms and merges
/// every draft. Returns the distinct items the batch created or touched,
/// in ledger order of first sighting.
fn upsert_candidates(ledger: &mut VocabularyLedger, reply: &StructuredReply) -> Vec<VocabularyItem> {
    let known = ledger.known_terms();
    let mut touched: Vec<String> = Vec::new();
    for draft in VocabularyLedger::extract_candidates(reply, &known) {
        let term = draft.term.clone();
        ledger.upsert(draft);
        if !touched.contains(&term) {
            touched.push(term);
        }
    }
    touched
        .iter()
        .filter_map(|term| ledger.get(term).cloned())
        .collect()
}
