//! Prompt Assembly
//!
//! Deterministic instruction prompts for flashcard generation. Content is
//! truncated to a fixed character budget before embedding so oversized
//! documents stay within the model's context.

/// Character budget for embedded content.
pub const CONTENT_BUDGET: usize = 8000;

/// Prompt for generating flashcards from plain text.
pub fn flashcard_prompt(content: &str, count: usize) -> String {
    format!(
        r#"You are an expert educator creating study flashcards.

Given the following content, create exactly {count} high-quality flashcards.

Requirements:
- Each flashcard must have a clear question and concise answer
- Focus on key concepts, definitions, and important facts
- Make questions specific and answerable
- Return ONLY a valid JSON array with this exact format: [{{"question": "...", "answer": "..."}}, ...]
- Do not include any markdown formatting, code blocks, or additional text

Content:
{content}

Generate {count} flashcards as a JSON array:"#,
        count = count,
        content = truncate_chars(content, CONTENT_BUDGET),
    )
}

/// Prompt asking the vision model for flashcards directly from an image.
pub fn image_flashcard_prompt(count: usize) -> String {
    format!(
        r#"Analyze this image and extract all text, concepts, and information.
Then create {count} educational flashcards based on the content.
Return ONLY a JSON array: [{{"question": "...", "answer": "..."}}, ...]"#
    )
}

/// Fallback prompt when the vision reply was not a parseable flashcard array:
/// ask for a plain transcription and re-run the text pipeline on it.
pub const IMAGE_TRANSCRIPTION_PROMPT: &str =
    "Extract all text and information from this image as plain text.";

/// Longest prefix of `s` holding at most `max_chars` characters.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
