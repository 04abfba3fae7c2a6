//! Prompt assembly for the symptom-intake model call.

use crate::reply::Field;

/// Canned answer the model is told to give for off-topic input.
pub const OFF_TOPIC_REPLY: &str = "I am a health support assistant. Please tell me about any pain \
or symptoms you're feeling, and I will try to help.";

const INTRO: &str = "You are a friendly health assistant. Explain possible health issues in \
simple, understandable language for people without medical training.";

const TRAILER: &str = "Best Case Scenario: ...\nWorst Case Scenario: ...";

/// Longest excerpt of a past prompt or condition carried into a new prompt.
const EXCERPT_CHARS: usize = 300;

/// A past exchange offered to the model as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryExcerpt {
    pub prompt: String,
    pub condition: String,
    pub urgency_score: String,
}

/// The fixed instruction block placed before every user message.
pub fn instructions() -> String {
    let mut out = String::from(INTRO);
    out.push_str("\n\nAlways respond using this format:\n\n");
    for field in Field::ALL {
        out.push_str(field.heading());
        out.push_str(": ...\n");
    }
    out.push_str(TRAILER);
    out.push_str("\n\nIf the user types something unrelated to symptoms, reply:\n\"");
    out.push_str(OFF_TOPIC_REPLY);
    out.push('"');
    out
}

/// Build the full prompt sent to the model.
///
/// `history` is rendered oldest first so the model reads it in order; pass an
/// empty slice to leave the section out.
pub fn assemble(user_text: &str, history: &[HistoryExcerpt]) -> String {
    let mut out = instructions();
    if !history.is_empty() {
        out.push_str("\n\nEarlier consultations with this user, oldest first:\n");
        for (i, h) in history.iter().enumerate() {
            out.push_str(&format!("{}. User said: {}\n", i + 1, excerpt(&h.prompt)));
            if !h.condition.is_empty() {
                out.push_str(&format!("   Likely condition then: {}\n", excerpt(&h.condition)));
            }
            if !h.urgency_score.is_empty() {
                out.push_str(&format!("   Urgency then: {}\n", h.urgency_score));
            }
        }
    }
    out.push_str("\n\nUser input: ");
    out.push_str(user_text.trim());
    out
}

fn excerpt(s: &str) -> String {
    let s = s.trim();
    match s.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", &s[..cut]),
        None => s.to_owned(),
    }
}
