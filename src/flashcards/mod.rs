//! Flashcard Pipeline
//!
//! Content extraction, prompt assembly, Gemini generation, and best-effort
//! JSON recovery for study flashcards. Independent of the speech pipeline.

pub mod extract;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod request;
pub mod service;

pub use parse::Flashcard;
pub use provider::{GeminiClient, GenerativeModel};
pub use request::{FileKind, FlashcardRequest};
pub use service::{ALLOWED_EXTENSIONS, FlashcardService, MAX_COUNT, MIN_COUNT};
