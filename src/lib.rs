//! Pomodorino - Pomodoro Companion Backend
//!
//! HTTP backend for a Pomodoro-timer web app. Two independent pipelines:
//!
//! - **Speech:** spoken session start/end cues synthesized through the
//!   ElevenLabs text-to-speech API and persisted as MP3 files.
//! - **Flashcards:** study flashcards generated from raw text or uploaded
//!   documents (PDF, PPTX, images, plain text) through the Gemini API.
//!
//! ## Quick Start
//!
//! ```bash
//! # .env with ELEVENLABS_API_KEY and GOOGLE_API_KEY
//! pomodorino --port 8001
//!
//! # with file logging
//! pomodorino --debug
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod flashcards;
pub mod http;
pub mod logging;
pub mod speech;

// Re-export commonly used types
pub use error::AppError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
