//! Vocabulary domain model.

use serde::{Deserialize, Serialize};

/// One entry in the personal vocabulary ledger.
///
/// `term` is the unique key within the ledger. All mutation goes through the
/// ledger's merge-upsert; `examples` and a non-empty `explanation` are never
/// destructively overwritten. The core never deletes an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    /// Unique identifier (UUID format, or `default-N` for seed entries)
    pub id: String,
    /// Surface form, unique across the ledger
    pub term: String,
    /// Reading in hiragana/katakana
    pub reading: String,
    /// English meaning
    pub meaning: String,
    /// Grammar/usage note; empty string when none is known
    #[serde(default)]
    pub explanation: String,
    /// Sentences this term was encountered in (set semantics, exact-string
    /// dedup, insertion order)
    #[serde(default)]
    pub examples: Vec<String>,
    /// Mastery level (starts at 1; progression is driven elsewhere)
    pub mastery: u32,
    /// Creation timestamp, epoch milliseconds
    #[serde(rename = "addedAt")]
    pub added_at: i64,
}

/// Input to a ledger upsert: the term's fields plus the sentence it was
/// sighted in. Produced by candidate extraction or a manual add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyDraft {
    pub term: String,
    pub reading: String,
    pub meaning: String,
    /// Empty string when the sighting carried no note
    pub explanation: String,
    /// Example sentence for this sighting
    pub example: String,
}

impl VocabularyDraft {
    /// Draft for a hand-entered term with no reply context.
    pub fn manual(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            reading: "?".into(),
            meaning: "Manual Entry".into(),
            explanation: String::new(),
            example: "Manual Entry".into(),
        }
    }
}
