//! Boundary traits for the remote services and the local durable cache.
//!
//! The traits live in the core crate and are implemented by the
//! infrastructure/interaction crates, so the application layer can be
//! exercised against in-memory fakes.

use crate::error::Result;
use crate::reply::StructuredReply;
use crate::session::Session;
use crate::settings::Settings;
use crate::state::CachedState;
use crate::vocab::VocabularyItem;
use async_trait::async_trait;

/// The AI tutor reply service, consumed as an opaque request/response
/// boundary.
#[async_trait]
pub trait ReplyService: Send + Sync {
    /// Requests a structured reply to a user message.
    ///
    /// # Errors
    ///
    /// - [`KotobaError::Transport`] for network failures and non-2xx,
    ///   non-401 statuses
    /// - [`KotobaError::Auth`] for a 401 rejection
    /// - [`KotobaError::Shape`] when the body is not a structured reply
    ///
    /// [`KotobaError::Transport`]: crate::KotobaError::Transport
    /// [`KotobaError::Auth`]: crate::KotobaError::Auth
    /// [`KotobaError::Shape`]: crate::KotobaError::Shape
    async fn fetch_reply(
        &self,
        message: &str,
        level_context: &str,
        vocab_context: &str,
    ) -> Result<StructuredReply>;
}

/// The remote persistence service. Writes are issued after the local
/// optimistic mutation and are best-effort: callers log failures, never
/// roll back. The remote copy is last-write-wins with no version check.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn save_session(&self, session: &Session) -> Result<()>;
    async fn delete_session(&self, session_id: &str) -> Result<()>;
    async fn save_vocab_item(&self, item: &VocabularyItem) -> Result<()>;
    async fn save_settings(&self, settings: &Settings) -> Result<()>;
    async fn fetch_sessions(&self) -> Result<Vec<Session>>;
    async fn fetch_vocab(&self) -> Result<Vec<VocabularyItem>>;
    async fn fetch_settings(&self) -> Result<Settings>;
}

/// The local durable cache holding the single versioned state record.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// Loads the cached record. A missing or corrupt cache yields
    /// `Ok(None)` - corruption is recovered with defaults, never surfaced.
    async fn load(&self) -> Result<Option<CachedState>>;

    /// Persists the record.
    async fn save(&self, state: &CachedState) -> Result<()>;
}

/// Holder of the bearer credential for authenticated remote calls.
///
/// Issuance and validation belong to the authentication collaborator; the
/// core only reads the token and force-invalidates it on a 401.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<String>;
    fn invalidate(&self);
}
