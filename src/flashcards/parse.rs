//! Model Output Parsing
//!
//! Best-effort recovery of a flashcard array from free-form model text:
//! strip code fences, grab the bracket-delimited span, parse, validate,
//! clamp. The bracket match is deliberately greedy (first `[` to last `]`);
//! stray brackets in surrounding prose can over- or under-capture. That
//! fragility is documented behavior, not something to strengthen here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A question/answer pair for study review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*").expect("fence-open regex"));
static FENCE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*$").expect("fence-close regex"));
static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("array regex"));

/// Recover at most `count` flashcards from raw model output.
///
/// Elements lacking a `question` or `answer` key are silently dropped;
/// retained strings are trimmed. The model returning more or fewer cards
/// than requested is not an error; the list is clamped to `count`.
///
/// A reply that parses as valid JSON but is not an array (a bare object,
/// say) is rejected as [`AppError::MalformedModelOutput`] rather than
/// flattened into an empty list; an empty result should mean the model
/// produced `[]`, not that we quietly discarded an unexpected shape.
pub fn parse_flashcards(raw: &str, count: usize) -> Result<Vec<Flashcard>> {
    let text = strip_fences(raw.trim());

    let candidate = match JSON_ARRAY.find(&text) {
        Some(m) => m.as_str(),
        // no array-like substring: try the whole reply as JSON
        None => text.as_str(),
    };

    let value: serde_json::Value = serde_json::from_str(candidate).map_err(|e| {
        AppError::MalformedModelOutput(format!("reply is not a JSON flashcard array: {e}"))
    })?;
    let items = value.as_array().ok_or_else(|| {
        AppError::MalformedModelOutput("reply parsed as JSON but not as an array".to_string())
    })?;

    let mut cards: Vec<Flashcard> = items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let question = obj.get("question")?;
            let answer = obj.get("answer")?;
            Some(Flashcard {
                question: value_to_text(question),
                answer: value_to_text(answer),
            })
        })
        .collect();
    cards.truncate(count);
    Ok(cards)
}

fn strip_fences(text: &str) -> String {
    let opened = FENCE_OPEN.replace_all(text, "");
    FENCE_CLOSE.replace(&opened, "").into_owned()
}

/// Stringify a JSON value: strings verbatim, anything else via its JSON
/// rendering, then trimmed.
fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}
