//! Vocabulary domain: the ledger and its items.

pub mod ledger;
pub mod model;

pub use ledger::VocabularyLedger;
pub use model::{VocabularyDraft, VocabularyItem};
