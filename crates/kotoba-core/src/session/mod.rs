//! Session domain: conversations, messages, and the session store.

pub mod model;
pub mod store;

pub use model::{Message, MessageContent, MessageRole, Session, TurnState};
pub use store::SessionStore;
