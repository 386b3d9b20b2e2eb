//! Speech Pipeline
//!
//! Voice settings resolution, ElevenLabs synthesis, and MP3 storage for the
//! Pomodoro start/end announcements. Independent of the flashcard pipeline.

pub mod provider;
pub mod service;
pub mod settings;
pub mod store;

pub use provider::{ElevenLabsClient, SpeechSynthesizer, VoiceInfo};
pub use service::{SavedAudio, SpeechService};
pub use settings::{DEFAULT_VOICE_SETTINGS, VoiceSettings, VoiceSettingsOverrides};
pub use store::AudioStore;
