//! Session domain model.
//!
//! A session is one conversation with the tutor: an append-only sequence of
//! user and assistant messages plus the per-session turn gate.

use crate::reply::StructuredReply;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Message payload: either raw text (user messages and error notices) or a
/// structured tutor reply.
///
/// Untagged on the wire so the persisted shape matches the remote service:
/// user messages are plain strings, assistant replies are objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Reply(StructuredReply),
    Text(String),
}

impl MessageContent {
    /// Returns the structured reply, if this content carries one.
    pub fn as_reply(&self) -> Option<&StructuredReply> {
        match self {
            Self::Reply(reply) => Some(reply),
            Self::Text(_) => None,
        }
    }

    /// Returns the raw text, if this content carries one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Reply(_) => None,
        }
    }
}

/// One entry in a session's message history.
///
/// Messages are append-only: once written they are never edited or removed.
/// No role-alternation rule is enforced; any role may follow any other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: MessageContent,
    /// Marks an inline failure notice (a failed reply fetch shown in the
    /// conversation rather than as a dialog).
    #[serde(default, rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    /// Creates a user message wrapping raw text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(text.into()),
            is_error: false,
        }
    }

    /// Creates an assistant message wrapping a structured reply.
    pub fn assistant(reply: StructuredReply) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Reply(reply),
            is_error: false,
        }
    }

    /// Creates an assistant-side error notice for a failed reply fetch.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Text(text.into()),
            is_error: true,
        }
    }
}

/// Per-session turn gate.
///
/// At most one reply request may be outstanding per session. The gate is
/// part of the session data itself and is transitioned atomically with the
/// user-message append, so the invariant cannot be bypassed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingReply,
}

/// One conversation with the tutor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Append-only message history
    pub messages: Vec<Message>,
    /// Runtime-only turn gate; never persisted
    #[serde(skip)]
    pub turn_state: TurnState,
}

impl Session {
    /// Creates a session seeded with one assistant greeting message.
    pub fn new(id: impl Into<String>, title: impl Into<String>, greeting: Message) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: vec![greeting],
            turn_state: TurnState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::{Segment, SegmentFunction};

    #[test]
    fn test_user_message_serializes_as_string_content() {
        let msg = Message::user("こんにちは");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "こんにちは");
        assert!(json.get("isError").is_none());
    }

    #[test]
    fn test_assistant_message_serializes_reply_object() {
        let reply = StructuredReply {
            segments: vec![Segment {
                text: "猫".into(),
                reading: "ねこ".into(),
                meaning: "cat".into(),
                explanation: None,
                function: SegmentFunction::Noun,
            }],
            english: "Cat".into(),
            grammar_point: None,
        };
        let msg = Message::assistant(reply);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"]["segments"][0]["text"], "猫");
    }

    #[test]
    fn test_error_message_round_trip() {
        let msg = Message::error("API Error: 500");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["isError"], true);

        let back: Message = serde_json::from_value(json).unwrap();
        assert!(back.is_error);
        assert_eq!(back.content.as_text(), Some("API Error: 500"));
    }

    #[test]
    fn test_turn_state_is_not_persisted() {
        let mut session = Session::new("s-1", "Conversation 1", Message::error("x"));
        session.turn_state = TurnState::AwaitingReply;

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.turn_state, TurnState::Idle);
    }
}
