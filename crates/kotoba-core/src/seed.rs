//! First-launch seed data.
//!
//! Every new conversation opens with the same greeting sentence, and a fresh
//! ledger is seeded with that sentence's vocabulary so the tutor has known
//! terms to build on from the very first turn.

use crate::reply::{Segment, SegmentFunction, StructuredReply, reconstruct_sentence};
use crate::session::Message;
use crate::vocab::VocabularyItem;
use once_cell::sync::Lazy;

/// Segments of the greeting sentence: こんにちは！日本語を練習しましょう。
static GREETING_SEGMENTS: Lazy<Vec<Segment>> = Lazy::new(|| {
    vec![
        Segment {
            text: "こんにちは".into(),
            reading: "こんにちは".into(),
            meaning: "Hello".into(),
            explanation: Some("A standard greeting used during the day.".into()),
            function: SegmentFunction::Greeting,
        },
        Segment {
            text: "！".into(),
            reading: String::new(),
            meaning: String::new(),
            explanation: None,
            function: SegmentFunction::Punctuation,
        },
        Segment {
            text: "日本語".into(),
            reading: "にほんご".into(),
            meaning: "Japanese language".into(),
            explanation: None,
            function: SegmentFunction::Noun,
        },
        Segment {
            text: "を".into(),
            reading: "を".into(),
            meaning: "Object Marker".into(),
            explanation: Some("Indicates the direct object of the verb.".into()),
            function: SegmentFunction::Particle,
        },
        Segment {
            text: "練習".into(),
            reading: "れんしゅう".into(),
            meaning: "practice".into(),
            explanation: None,
            function: SegmentFunction::Noun,
        },
        Segment {
            text: "しましょう".into(),
            reading: "しましょう".into(),
            meaning: "let's do".into(),
            explanation: Some("Volitional form of 'suru'.".into()),
            function: SegmentFunction::Verb,
        },
        Segment {
            text: "。".into(),
            reading: String::new(),
            meaning: String::new(),
            explanation: None,
            function: SegmentFunction::Punctuation,
        },
    ]
});

/// Builds the assistant greeting that seeds a new session.
pub fn greeting_message(english: impl Into<String>) -> Message {
    Message::assistant(StructuredReply {
        segments: GREETING_SEGMENTS.clone(),
        english: english.into(),
        grammar_point: None,
    })
}

/// Builds the vocabulary a fresh ledger starts with: every non-punctuation
/// greeting segment, with the greeting sentence as its first example.
pub fn seed_vocabulary() -> Vec<VocabularyItem> {
    let sentence = reconstruct_sentence(&GREETING_SEGMENTS);
    GREETING_SEGMENTS
        .iter()
        .filter(|s| s.function != SegmentFunction::Punctuation)
        .enumerate()
        .map(|(index, s)| VocabularyItem {
            id: format!("default-{}", index),
            term: s.text.clone(),
            reading: s.reading.clone(),
            meaning: s.meaning.clone(),
            explanation: s.explanation.clone().unwrap_or_default(),
            examples: vec![sentence.clone()],
            mastery: 1,
            added_at: chrono::Utc::now().timestamp_millis(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_message_shape() {
        let msg = greeting_message("Hello! Let's practice Japanese.");
        let reply = msg.content.as_reply().unwrap();
        assert_eq!(reply.segments.len(), 7);
        assert_eq!(
            reconstruct_sentence(&reply.segments),
            "こんにちは！日本語を練習しましょう。"
        );
    }

    #[test]
    fn test_seed_vocabulary_skips_punctuation() {
        let seed = seed_vocabulary();
        let terms: Vec<&str> = seed.iter().map(|v| v.term.as_str()).collect();
        assert_eq!(terms, ["こんにちは", "日本語", "を", "練習", "しましょう"]);
        assert!(seed.iter().all(|v| v.mastery == 1));
        assert!(
            seed.iter()
                .all(|v| v.examples == ["こんにちは！日本語を練習しましょう。"])
        );
    }
}
