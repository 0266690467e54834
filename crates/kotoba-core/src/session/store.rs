//! The session store: an ordered collection of conversations and the
//! active-session pointer.

use super::model::{Message, Session, TurnState};
use crate::error::{KotobaError, Result};
use crate::seed;
use uuid::Uuid;

/// Owns every session and the active-session pointer.
///
/// Invariant: the collection is never empty. The store seeds a default
/// session on construction and refuses to delete the last remaining one,
/// so `active()` always resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStore {
    sessions: Vec<Session>,
    active_session_id: Option<String>,
}

impl SessionStore {
    /// Creates a store with one seeded conversation.
    pub fn seeded() -> Self {
        let greeting = seed::greeting_message("Hello! Let's practice Japanese.");
        let session = Session::new(Uuid::new_v4().to_string(), "New Conversation", greeting);
        let active = session.id.clone();
        Self {
            sessions: vec![session],
            active_session_id: Some(active),
        }
    }

    /// Restores a store from cached sessions. An empty list falls back to
    /// the seeded default; a stale active pointer is tolerated (reads fall
    /// back to the first session).
    pub fn from_parts(sessions: Vec<Session>, active_session_id: Option<String>) -> Self {
        if sessions.is_empty() {
            return Self::seeded();
        }
        Self {
            sessions,
            active_session_id,
        }
    }

    /// Creates a fresh conversation, seeds it with a greeting, and sets it
    /// active. New sessions are appended at the end of the collection.
    pub fn create_session(&mut self) -> &Session {
        let title = format!("Conversation {}", self.sessions.len() + 1);
        let greeting = seed::greeting_message("Hello! Let's practice Japanese.");
        let session = Session::new(Uuid::new_v4().to_string(), title, greeting);
        self.active_session_id = Some(session.id.clone());
        self.sessions.push(session);
        self.sessions.last().expect("just pushed")
    }

    /// Removes a session. Refused (returns `false`) when it is the last
    /// remaining one or the id is unknown. If the removed session was
    /// active, the first remaining session becomes active.
    pub fn delete_session(&mut self, id: &str) -> bool {
        if self.sessions.len() <= 1 {
            return false;
        }
        let Some(index) = self.sessions.iter().position(|s| s.id == id) else {
            return false;
        };
        self.sessions.remove(index);
        if self.active_session_id.as_deref() == Some(id) {
            self.active_session_id = Some(self.sessions[0].id.clone());
        }
        true
    }

    /// Appends a message to a session's history. Silent no-op when the id
    /// does not resolve; prior entries are never altered.
    pub fn append_message(&mut self, session_id: &str, message: Message) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) {
            session.messages.push(message);
        }
    }

    /// Updates the active pointer. Returns `false` for an unknown id.
    pub fn select_session(&mut self, id: &str) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.active_session_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// The active session, falling back to the first in collection order
    /// when the stored pointer is stale or absent. Always succeeds under
    /// the non-empty invariant.
    pub fn active(&self) -> &Session {
        self.active_session_id
            .as_deref()
            .and_then(|id| self.get(id))
            .unwrap_or(&self.sessions[0])
    }

    /// Id of the active session (with the same fallback as [`active`]).
    ///
    /// [`active`]: Self::active
    pub fn active_id(&self) -> &str {
        &self.active().id
    }

    /// Opens a turn: appends the user message and flips the session's gate
    /// to `AwaitingReply` in one step.
    ///
    /// # Errors
    ///
    /// - [`KotobaError::NotFound`] for an unknown session id
    /// - [`KotobaError::ReplyPending`] when a reply is already outstanding
    ///   for this session (the send is rejected, not queued)
    pub fn begin_turn(&mut self, session_id: &str, text: impl Into<String>) -> Result<()> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| KotobaError::not_found("session", session_id))?;

        if session.turn_state == TurnState::AwaitingReply {
            return Err(KotobaError::ReplyPending(session_id.to_string()));
        }

        session.messages.push(Message::user(text));
        session.turn_state = TurnState::AwaitingReply;
        Ok(())
    }

    /// Closes a turn: resets the session's gate to `Idle`. No-op for an
    /// unknown id (the session may have been deleted mid-flight).
    pub fn finish_turn(&mut self, session_id: &str) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) {
            session.turn_state = TurnState::Idle;
        }
    }

    /// Looks up a session by id.
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The persisted active pointer, which may be stale.
    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    /// Consumes the store, yielding its sessions and active pointer.
    pub fn into_parts(self) -> (Vec<Session>, Option<String>) {
        (self.sessions, self.active_session_id)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::seeded()
    }
}
