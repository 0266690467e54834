//! Structured tutor reply domain model.
//!
//! The tutor service answers each user message with a segmented sentence:
//! every token carries its reading, meaning, and grammatical function so the
//! client can render furigana and feed vocabulary extraction.

use crate::coerce::{safe_field, safe_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

/// Grammatical function of a reply segment.
///
/// This is a closed variant set; anything the service emits outside the
/// known functions collapses into `Other` rather than failing the parse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SegmentFunction {
    Noun,
    Verb,
    Adjective,
    Particle,
    Punctuation,
    Greeting,
    #[serde(other)]
    #[default]
    Other,
}

impl SegmentFunction {
    /// Whether segments with this function are candidates for the
    /// vocabulary ledger. Particles, punctuation, and greetings are not.
    pub fn is_vocabulary(self) -> bool {
        matches!(self, Self::Noun | Self::Verb | Self::Adjective)
    }
}

/// One token of a tutor reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Surface text as it appears in the sentence
    pub text: String,
    /// Reading in hiragana/katakana
    #[serde(default)]
    pub reading: String,
    /// English meaning
    #[serde(default)]
    pub meaning: String,
    /// Optional grammar note (particles and grammar tokens carry one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Grammatical function
    #[serde(default)]
    pub function: SegmentFunction,
}

impl Segment {
    /// Builds a segment from untyped JSON, coercing malformed fields to a
    /// safe string representation instead of rejecting them.
    ///
    /// An unrecognized or missing `function` becomes
    /// [`SegmentFunction::Other`]; an empty `explanation` becomes `None`.
    pub fn from_value(value: &Value) -> Self {
        let function = value
            .get("function")
            .cloned()
            .map(|v| serde_json::from_value(v).unwrap_or_default())
            .unwrap_or_default();

        let explanation = match value.get("explanation") {
            Some(v) => {
                let s = safe_string(v);
                (!s.is_empty()).then_some(s)
            }
            None => None,
        };

        Self {
            text: safe_field(value, "text"),
            reading: safe_field(value, "reading"),
            meaning: safe_field(value, "meaning"),
            explanation,
            function,
        }
    }
}

/// The tutor service's full response: segments plus an English translation
/// and an optional grammar note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReply {
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar_point: Option<String>,
}

impl StructuredReply {
    /// Builds a reply from untyped JSON, applying segment-level coercion.
    ///
    /// Returns `None` when `segments` is absent or not an array - that is a
    /// contract violation the caller classifies, not something to patch up.
    pub fn from_value(value: &Value) -> Option<Self> {
        let segments = value
            .get("segments")?
            .as_array()?
            .iter()
            .map(Segment::from_value)
            .collect();

        let grammar_point = match value.get("grammar_point") {
            Some(Value::Null) | None => None,
            Some(v) => {
                let s = safe_string(v);
                (!s.is_empty()).then_some(s)
            }
        };

        Some(Self {
            segments,
            english: safe_field(value, "english"),
            grammar_point,
        })
    }
}

/// Reassembles the original sentence from its segments.
///
/// Japanese text carries no inter-token spacing, so this is a plain
/// concatenation of segment texts.
pub fn reconstruct_sentence(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_function_deserializes_lowercase() {
        let f: SegmentFunction = serde_json::from_value(json!("noun")).unwrap();
        assert_eq!(f, SegmentFunction::Noun);
    }

    #[test]
    fn test_unknown_function_becomes_other() {
        let f: SegmentFunction = serde_json::from_value(json!("interjection")).unwrap();
        assert_eq!(f, SegmentFunction::Other);
    }

    #[test]
    fn test_is_vocabulary() {
        assert!(SegmentFunction::Noun.is_vocabulary());
        assert!(SegmentFunction::Verb.is_vocabulary());
        assert!(SegmentFunction::Adjective.is_vocabulary());
        assert!(!SegmentFunction::Particle.is_vocabulary());
        assert!(!SegmentFunction::Punctuation.is_vocabulary());
        assert!(!SegmentFunction::Greeting.is_vocabulary());
        assert!(!SegmentFunction::Other.is_vocabulary());
    }

    #[test]
    fn test_segment_from_value_coerces_malformed_fields() {
        let seg = Segment::from_value(&json!({
            "text": 42,
            "reading": null,
            "meaning": {"nested": true},
            "function": "verb"
        }));
        assert_eq!(seg.text, "42");
        assert_eq!(seg.reading, "");
        assert_eq!(seg.meaning, r#"{"nested":true}"#);
        assert_eq!(seg.explanation, None);
        assert_eq!(seg.function, SegmentFunction::Verb);
    }

    #[test]
    fn test_segment_from_value_empty_explanation_is_none() {
        let seg = Segment::from_value(&json!({"text": "を", "explanation": ""}));
        assert_eq!(seg.explanation, None);
        assert_eq!(seg.function, SegmentFunction::Other);
    }

    #[test]
    fn test_reply_from_value_requires_segments_array() {
        assert!(StructuredReply::from_value(&json!({"english": "hi"})).is_none());
        assert!(StructuredReply::from_value(&json!({"segments": "nope"})).is_none());
    }

    #[test]
    fn test_reply_from_value() {
        let reply = StructuredReply::from_value(&json!({
            "segments": [
                {"text": "猫", "reading": "ねこ", "meaning": "cat", "function": "noun"},
                {"text": "。", "function": "punctuation"}
            ],
            "english": "Cat.",
            "grammar_point": null
        }))
        .unwrap();
        assert_eq!(reply.segments.len(), 2);
        assert_eq!(reply.english, "Cat.");
        assert_eq!(reply.grammar_point, None);
    }

    #[test]
    fn test_reconstruct_sentence() {
        let reply = StructuredReply::from_value(&json!({
            "segments": [
                {"text": "猫", "function": "noun"},
                {"text": "は", "function": "particle"},
                {"text": "可愛い", "function": "adjective"},
                {"text": "。", "function": "punctuation"}
            ],
            "english": "The cat is cute."
        }))
        .unwrap();
        assert_eq!(reconstruct_sentence(&reply.segments), "猫は可愛い。");
    }

    #[test]
    fn test_reconstruct_sentence_empty() {
        assert_eq!(reconstruct_sentence(&[]), "");
    }
}
