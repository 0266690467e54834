//! Kotoba core domain: sessions, the vocabulary ledger, settings, and the
//! boundary traits for remote sync and the local durable cache.

pub mod coerce;
pub mod error;
pub mod reply;
pub mod seed;
pub mod session;
pub mod settings;
pub mod state;
pub mod sync;
pub mod vocab;

// Re-export common error type
pub use error::{KotobaError, Result};
