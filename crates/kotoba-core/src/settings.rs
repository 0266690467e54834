//! User preferences.
//!
//! Settings are a single mutable record, replaced wholesale on update.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// JLPT level the tutor should target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
    Default,
)]
pub enum TargetLevel {
    #[default]
    N5,
    N4,
    N3,
}

impl TargetLevel {
    /// Human-readable label for settings UIs.
    pub fn label(self) -> &'static str {
        match self {
            Self::N5 => "JLPT N5 (Beginner)",
            Self::N4 => "JLPT N4 (Upper Beginner)",
            Self::N3 => "JLPT N3 (Intermediate)",
        }
    }

    /// The instructional preamble sent with every reply request, telling
    /// the tutor what the user can be expected to understand.
    pub fn prompt_context(self) -> &'static str {
        match self {
            Self::N5 => {
                "The user is a beginner (JLPT N5 level). They understand basic polite forms \
                 (desu/masu), basic particles (wa, ga, o, ni, de), and simple sentence \
                 structures. Stick to simple vocabulary."
            }
            Self::N4 => {
                "The user is an upper beginner (JLPT N4 level). They understand te-form \
                 connections, potential verbs, and basic transitive/intransitive pairs."
            }
            Self::N3 => {
                "The user is intermediate (JLPT N3 level). They can handle passive/causative \
                 forms and more abstract topics. You can use more natural, casual speech."
            }
        }
    }
}

/// How furigana readings are revealed over segments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FuriganaMode {
    #[default]
    Hover,
    Always,
    Hidden,
}

/// Whether the English translation line is shown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EnglishMode {
    #[default]
    Visible,
    Hidden,
}

/// The user's preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub target_level: TargetLevel,
    pub furigana_mode: FuriganaMode,
    pub english_mode: EnglishMode,
    pub tutor_mode: bool,
    /// When true, vocabulary candidates from each reply are merged into the
    /// ledger automatically; when false, growth is manual-only.
    pub auto_add_vocab: bool,
    /// Base URL of the persistence/reply service, e.g.
    /// `http://localhost:5000/api`.
    pub backend_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_level: TargetLevel::N5,
            furigana_mode: FuriganaMode::Hover,
            english_mode: EnglishMode::Visible,
            tutor_mode: true,
            auto_add_vocab: false,
            backend_endpoint: "http://localhost:5000/api".to_string(),
        }
    }
}
