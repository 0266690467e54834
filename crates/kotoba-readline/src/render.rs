//! Terminal rendering for messages and vocabulary.

use colored::Colorize;
use kotoba_core::reply::{SegmentFunction, StructuredReply};
use kotoba_core::session::{Message, MessageContent, MessageRole};
use kotoba_core::settings::{EnglishMode, FuriganaMode, Settings};
use kotoba_core::vocab::VocabularyItem;

/// Prints one message the way the conversation view shows it.
pub fn print_message(message: &Message, settings: &Settings) {
    match (&message.role, &message.content) {
        (MessageRole::User, content) => {
            println!("{}", format!("> {}", content.as_text().unwrap_or_default()).green());
        }
        (MessageRole::Assistant, MessageContent::Reply(reply)) => {
            print_reply(reply, settings);
        }
        (MessageRole::Assistant, MessageContent::Text(text)) => {
            if message.is_error {
                println!("{}", text.red());
            } else {
                println!("{}", text.bright_blue());
            }
        }
    }
}

/// Prints a structured reply: the colored sentence, optional furigana,
/// the English line, and any grammar note.
pub fn print_reply(reply: &StructuredReply, settings: &Settings) {
    let sentence: String = reply
        .segments
        .iter()
        .map(|s| colorize(&s.text, s.function).to_string())
        .collect();
    println!("{}", sentence);

    if settings.furigana_mode == FuriganaMode::Always {
        let furigana: Vec<String> = reply
            .segments
            .iter()
            .filter(|s| !s.reading.is_empty() && s.reading != s.text)
            .map(|s| format!("{}[{}]", s.text, s.reading))
            .collect();
        if !furigana.is_empty() {
            println!("{}", furigana.join(" ").bright_black());
        }
    }

    if settings.english_mode == EnglishMode::Visible && !reply.english.is_empty() {
        println!("{}", reply.english.bright_black().italic());
    }

    if let Some(note) = &reply.grammar_point {
        println!("{}", format!("※ {}", note).yellow());
    }
}

fn colorize(text: &str, function: SegmentFunction) -> colored::ColoredString {
    match function {
        SegmentFunction::Noun => text.bright_cyan(),
        SegmentFunction::Verb => text.bright_green(),
        SegmentFunction::Adjective => text.bright_yellow(),
        SegmentFunction::Particle => text.bright_black(),
        SegmentFunction::Punctuation | SegmentFunction::Greeting | SegmentFunction::Other => {
            text.normal()
        }
    }
}

/// Prints the vocabulary ledger, most recent last.
pub fn print_vocab(items: &[VocabularyItem]) {
    if items.is_empty() {
        println!("{}", "No vocabulary yet.".bright_black());
        return;
    }
    for item in items {
        let mut line = format!(
            "{} ({}) - {}",
            item.term.bright_cyan(),
            item.reading,
            item.meaning
        );
        if !item.explanation.is_empty() {
            line.push_str(&format!("  {}", item.explanation.bright_black()));
        }
        println!("{}", line);
    }
    println!("{}", format!("{} terms", items.len()).bright_black());
}
