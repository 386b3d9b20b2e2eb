//! Configuration Module
//!
//! Handles application configuration loading, validation, and defaults.
//! API keys are never stored here; they come from the environment
//! (`ELEVENLABS_API_KEY`, `GOOGLE_API_KEY`), loaded via dotenvy at startup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Flashcard generation configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: "127.0.0.1")
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listen port (default: 8001)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// ElevenLabs API base URL
    #[serde(default = "default_speech_api_url")]
    pub api_url: String,

    /// Voice used when the request does not name one
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    /// Synthesis model identifier
    #[serde(default = "default_speech_model")]
    pub model_id: String,

    /// Directory generated MP3 files are written to
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// Announcement spoken at session start
    #[serde(default = "default_start_text")]
    pub start_text: String,

    /// Announcement spoken at session end
    #[serde(default = "default_end_text")]
    pub end_text: String,
}

fn default_speech_api_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_voice_id() -> String {
    "NcJuO1kJ19MefFnxN1Ls".to_string()
}

fn default_speech_model() -> String {
    "eleven_monolingual_v1".to_string()
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio_files")
}

fn default_start_text() -> String {
    "Pomodoro session starting now. Focus and be productive!".to_string()
}

fn default_end_text() -> String {
    "Pomodoro session complete. Take a break and recharge!".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_url: default_speech_api_url(),
            voice_id: default_voice_id(),
            model_id: default_speech_model(),
            audio_dir: default_audio_dir(),
            start_text: default_start_text(),
            end_text: default_end_text(),
        }
    }
}

/// Flashcard generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub api_url: String,

    /// Model used for both text and vision calls
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: default_gemini_api_url(),
            model: default_gemini_model(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or from the default location
    /// (`~/.config/pomodorino/config.toml`). A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Default config file location under the platform config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pomodorino")
            .join("config.toml")
    }
}
