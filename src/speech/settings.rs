//! Voice Settings
//!
//! Synthesis tuning parameters and the sparse-override resolver. The default
//! instance is an immutable process-wide value; resolution never mutates it,
//! it copies unset fields out of it.

use serde::{Deserialize, Serialize};

/// Library-wide default synthesis settings.
pub const DEFAULT_VOICE_SETTINGS: VoiceSettings = VoiceSettings {
    stability: 0.5,
    similarity_boost: 0.75,
    style: 0.0,
    use_speaker_boost: true,
};

/// Complete set of synthesis tuning parameters.
///
/// Values are forwarded to the provider as-is; range enforcement is left to
/// the provider itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        DEFAULT_VOICE_SETTINGS
    }
}

/// Sparse per-request overrides, accepting both snake_case and camelCase
/// spellings where the web client historically sent either.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VoiceSettingsOverrides {
    #[serde(default)]
    pub stability: Option<f32>,

    #[serde(default)]
    pub similarity_boost: Option<f32>,
    #[serde(default, rename = "similarityBoost")]
    pub similarity_boost_camel: Option<f32>,

    #[serde(default)]
    pub style: Option<f32>,

    #[serde(default)]
    pub use_speaker_boost: Option<bool>,
    #[serde(default, rename = "speakerBoost")]
    pub speaker_boost_camel: Option<bool>,
}

impl VoiceSettingsOverrides {
    /// Resolve against `defaults`: any field absent or null in the overrides
    /// inherits the default's field. When both spellings of a field are
    /// present, the camelCase one wins.
    pub fn resolve(&self, defaults: &VoiceSettings) -> VoiceSettings {
        VoiceSettings {
            stability: self.stability.unwrap_or(defaults.stability),
            similarity_boost: self
                .similarity_boost_camel
                .or(self.similarity_boost)
                .unwrap_or(defaults.similarity_boost),
            style: self.style.unwrap_or(defaults.style),
            use_speaker_boost: self
                .speaker_boost_camel
                .or(self.use_speaker_boost)
                .unwrap_or(defaults.use_speaker_boost),
        }
    }
}
