//! The vocabulary ledger: a deduplicated, insertion-ordered store of terms.

use super::model::{VocabularyDraft, VocabularyItem};
use crate::reply::{StructuredReply, reconstruct_sentence};
use std::collections::HashSet;
use uuid::Uuid;

/// Holds every vocabulary item the user has encountered or added.
///
/// Invariant: `term` is unique across the ledger. All mutation goes through
/// [`VocabularyLedger::upsert`], which merges rather than overwrites, so the
/// invariant holds for any call sequence and re-applying the same sighting
/// is idempotent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocabularyLedger {
    items: Vec<VocabularyItem>,
}

impl VocabularyLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger from already-deduplicated items (cache restore or
    /// seed data). Later duplicates of a term are merged into the first
    /// occurrence so a malformed cache cannot break the uniqueness invariant.
    pub fn from_items(items: Vec<VocabularyItem>) -> Self {
        let mut ledger = Self::new();
        for item in items {
            match ledger.position(&item.term) {
                None => ledger.items.push(item),
                Some(i) => merge_into(&mut ledger.items[i], &item.explanation, item.examples),
            }
        }
        ledger
    }

    /// Inserts a new term or merges a sighting into an existing one.
    ///
    /// - Absent: created with `mastery = 1`, `added_at = now`, and the
    ///   sighting's sentence as its first example.
    /// - Present: `examples` gains the sighting's sentence (exact-string
    ///   dedup); a non-empty incoming explanation replaces the stored one,
    ///   an empty one never erases it; all other fields are retained.
    ///
    /// Returns the merged record.
    pub fn upsert(&mut self, draft: VocabularyDraft) -> &VocabularyItem {
        match self.position(&draft.term) {
            Some(i) => {
                merge_into(&mut self.items[i], &draft.explanation, vec![draft.example]);
                &self.items[i]
            }
            None => {
                self.items.push(VocabularyItem {
                    id: Uuid::new_v4().to_string(),
                    term: draft.term,
                    reading: draft.reading,
                    meaning: draft.meaning,
                    explanation: draft.explanation,
                    examples: vec![draft.example],
                    mastery: 1,
                    added_at: chrono::Utc::now().timestamp_millis(),
                });
                self.items.last().expect("just pushed")
            }
        }
    }

    /// Filters a reply down to vocabulary drafts worth adding: segments
    /// whose function is noun/verb/adjective and whose text is not already
    /// a known term.
    ///
    /// Pure and read-only. A term appearing twice in one reply yields
    /// duplicate-but-identical drafts; the ledger's upsert collapses them.
    pub fn extract_candidates(
        reply: &StructuredReply,
        known_terms: &HashSet<String>,
    ) -> Vec<VocabularyDraft> {
        let sentence = reconstruct_sentence(&reply.segments);
        reply
            .segments
            .iter()
            .filter(|s| s.function.is_vocabulary() && !known_terms.contains(&s.text))
            .map(|s| VocabularyDraft {
                term: s.text.clone(),
                reading: s.reading.clone(),
                meaning: s.meaning.clone(),
                explanation: s.explanation.clone().unwrap_or_default(),
                example: sentence.clone(),
            })
            .collect()
    }

    /// All known terms, for candidate suppression.
    pub fn known_terms(&self) -> HashSet<String> {
        self.items.iter().map(|v| v.term.clone()).collect()
    }

    /// The most recent `n` terms by insertion order, oldest first. This is
    /// the vocabulary context sent with every reply request.
    pub fn recent_terms(&self, n: usize) -> Vec<String> {
        let start = self.items.len().saturating_sub(n);
        self.items[start..].iter().map(|v| v.term.clone()).collect()
    }

    /// Looks up an item by exact term.
    pub fn get(&self, term: &str) -> Option<&VocabularyItem> {
        self.position(term).map(|i| &self.items[i])
    }

    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the ledger, yielding its items in insertion order.
    pub fn into_items(self) -> Vec<VocabularyItem> {
        self.items
    }

    fn position(&self, term: &str) -> Option<usize> {
        self.items.iter().position(|v| v.term == term)
    }
}

/// Applies the merge rules to an existing item: example set-union plus
/// non-erasing explanation replacement.
fn merge_into(existing: &mut VocabularyItem, explanation: &str, examples: Vec<String>) {
    for example in examples {
        if !existing.examples.contains(&example) {
            existing.examples.push(example);
        }
    }
    if !explanation.is_empty() {
        existing.explanation = explanation.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::{Segment, SegmentFunction};
    use serde_json::json;

    fn draft(term: &str, explanation: &str, example: &str) -> VocabularyDraft {
        VocabularyDraft {
            term: term.into(),
            reading: "よみ".into(),
            meaning: "meaning".into(),
            explanation: explanation.into(),
            example: example.into(),
        }
    }

    fn sample_reply() -> StructuredReply {
        StructuredReply::from_value(&json!({
            "segments": [
                {"text": "猫", "reading": "ねこ", "meaning": "cat", "function": "noun"},
                {"text": "は", "reading": "は", "meaning": "topic marker", "function": "particle"},
                {"text": "可愛い", "reading": "かわいい", "meaning": "cute", "function": "adjective"}
            ],
            "english": "The cat is cute."
        }))
        .unwrap()
    }

    #[test]
    fn test_upsert_creates_new_item() {
        let mut ledger = VocabularyLedger::new();
        let item = ledger.upsert(draft("猫", "", "猫は可愛い"));
        assert_eq!(item.term, "猫");
        assert_eq!(item.mastery, 1);
        assert_eq!(item.examples, ["猫は可愛い"]);
        assert!(!item.id.is_empty());
    }

    #[test]
    fn test_term_uniqueness_across_upserts() {
        let mut ledger = VocabularyLedger::new();
        ledger.upsert(draft("猫", "", "a"));
        ledger.upsert(draft("猫", "", "b"));
        ledger.upsert(draft("犬", "", "c"));
        ledger.upsert(draft("猫", "", "d"));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.items().iter().filter(|v| v.term == "猫").count(), 1);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut ledger = VocabularyLedger::new();
        ledger.upsert(draft("猫", "note", "a"));
        let once = ledger.clone();
        ledger.upsert(draft("猫", "note", "a"));
        assert_eq!(ledger, once);
    }

    #[test]
    fn test_example_union() {
        let mut ledger = VocabularyLedger::new();
        ledger.upsert(draft("猫", "", "first"));
        ledger.upsert(draft("猫", "", "second"));
        ledger.upsert(draft("猫", "", "first"));
        assert_eq!(ledger.get("猫").unwrap().examples, ["first", "second"]);
    }

    #[test]
    fn test_empty_explanation_never_erases() {
        let mut ledger = VocabularyLedger::new();
        ledger.upsert(draft("猫", "a useful note", "a"));
        ledger.upsert(draft("猫", "", "b"));
        assert_eq!(ledger.get("猫").unwrap().explanation, "a useful note");
    }

    #[test]
    fn test_non_empty_explanation_replaces() {
        let mut ledger = VocabularyLedger::new();
        ledger.upsert(draft("猫", "old", "a"));
        ledger.upsert(draft("猫", "new", "b"));
        assert_eq!(ledger.get("猫").unwrap().explanation, "new");
    }

    #[test]
    fn test_merge_retains_original_fields() {
        let mut ledger = VocabularyLedger::new();
        let (id, added_at) = {
            let item = ledger.upsert(draft("猫", "", "a"));
            (item.id.clone(), item.added_at)
        };
        let mut second = draft("猫", "", "b");
        second.reading = "different".into();
        second.meaning = "different".into();
        ledger.upsert(second);

        let item = ledger.get("猫").unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.added_at, added_at);
        assert_eq!(item.reading, "よみ");
        assert_eq!(item.meaning, "meaning");
    }

    #[test]
    fn test_extract_candidates_filters_functions() {
        let drafts = VocabularyLedger::extract_candidates(&sample_reply(), &HashSet::new());
        let terms: Vec<&str> = drafts.iter().map(|d| d.term.as_str()).collect();
        assert_eq!(terms, ["猫", "可愛い"]);
        assert!(drafts.iter().all(|d| d.example == "猫は可愛い"));
    }

    #[test]
    fn test_extract_candidates_suppresses_known_terms() {
        let known: HashSet<String> = ["猫".to_string()].into();
        let drafts = VocabularyLedger::extract_candidates(&sample_reply(), &known);
        let terms: Vec<&str> = drafts.iter().map(|d| d.term.as_str()).collect();
        assert_eq!(terms, ["可愛い"]);
    }

    #[test]
    fn test_duplicate_terms_in_one_reply_collapse_at_upsert() {
        let reply = StructuredReply::from_value(&json!({
            "segments": [
                {"text": "猫", "reading": "ねこ", "meaning": "cat", "function": "noun"},
                {"text": "と", "function": "particle"},
                {"text": "猫", "reading": "ねこ", "meaning": "cat", "function": "noun"}
            ],
            "english": "Cat and cat."
        }))
        .unwrap();

        let drafts = VocabularyLedger::extract_candidates(&reply, &HashSet::new());
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0], drafts[1]);

        let mut ledger = VocabularyLedger::new();
        for d in drafts {
            ledger.upsert(d);
        }
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_recent_terms_truncates_to_most_recent() {
        let mut ledger = VocabularyLedger::new();
        for i in 0..5 {
            ledger.upsert(draft(&format!("term{}", i), "", "x"));
        }
        assert_eq!(ledger.recent_terms(3), ["term2", "term3", "term4"]);
        assert_eq!(ledger.recent_terms(100).len(), 5);
    }

    #[test]
    fn test_from_items_merges_cache_duplicates() {
        let seed = crate::seed::seed_vocabulary();
        let mut doubled = seed.clone();
        doubled.extend(seed);
        let ledger = VocabularyLedger::from_items(doubled);
        assert_eq!(ledger.len(), 5);
    }
}
