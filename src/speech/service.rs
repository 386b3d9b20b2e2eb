//! Speech Service
//!
//! Orchestrates announcement generation: pick the voice, synthesize, store.
//! Provider and storage failures never escape this layer; they degrade to a
//! `None` result that the HTTP layer reports as "Audio not generated.".

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SpeechConfig;
use crate::speech::provider::{SpeechSynthesizer, VoiceInfo};
use crate::speech::settings::VoiceSettings;
use crate::speech::store::{AudioStore, timestamped_file_name};

const START_PREFIX: &str = "pomodoro_start_";
const END_PREFIX: &str = "pomodoro_end_";

/// A stored announcement ready to be served.
#[derive(Debug, Clone)]
pub struct SavedAudio {
    pub path: PathBuf,
    pub file_name: String,
}

/// Announcement generation pipeline.
#[derive(Clone)]
pub struct SpeechService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: AudioStore,
    config: SpeechConfig,
}

impl SpeechService {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: AudioStore,
        config: SpeechConfig,
    ) -> Self {
        Self {
            synthesizer,
            store,
            config,
        }
    }

    /// Generate and store the session-start announcement.
    pub async fn start_sound(
        &self,
        voice_id: Option<&str>,
        settings: &VoiceSettings,
    ) -> Option<SavedAudio> {
        let text = self.config.start_text.clone();
        self.announce(START_PREFIX, &text, voice_id, settings).await
    }

    /// Generate and store the session-end announcement.
    pub async fn end_sound(
        &self,
        voice_id: Option<&str>,
        settings: &VoiceSettings,
    ) -> Option<SavedAudio> {
        let text = self.config.end_text.clone();
        self.announce(END_PREFIX, &text, voice_id, settings).await
    }

    /// Voice catalog; provider failure degrades to an empty list.
    pub async fn voices(&self) -> Vec<VoiceInfo> {
        match self.synthesizer.voices().await {
            Ok(voices) => voices,
            Err(e) => {
                tracing::error!("Failed to fetch voice catalog: {}", e);
                Vec::new()
            }
        }
    }

    async fn announce(
        &self,
        prefix: &str,
        text: &str,
        voice_id: Option<&str>,
        settings: &VoiceSettings,
    ) -> Option<SavedAudio> {
        let voice = voice_id
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(&self.config.voice_id);

        let audio = match self.synthesizer.synthesize(text, voice, settings).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Error generating audio: {}", e);
                return None;
            }
        };

        let file_name = timestamped_file_name(prefix);
        self.store
            .save(&audio, &file_name)
            .map(|(path, file_name)| SavedAudio { path, file_name })
    }
}
