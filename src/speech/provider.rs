//! ElevenLabs Provider Implementation
//!
//! Implements the `SpeechSynthesizer` trait against the ElevenLabs
//! text-to-speech HTTP API (`xi-api-key` auth, MP3 response bodies).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::speech::settings::VoiceSettings;

const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60); // Total request timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10); // Connection timeout
const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90); // Keep connections alive

/// A voice exposed by the provider's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
}

/// Boundary contract for speech synthesis providers.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given voice and settings, returning raw
    /// audio bytes.
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &VoiceSettings,
    ) -> Result<Vec<u8>>;

    /// List the voices available to the configured account.
    async fn voices(&self) -> Result<Vec<VoiceInfo>>;
}

/// ElevenLabs text-to-speech client
#[derive(Clone)]
pub struct ElevenLabsClient {
    api_key: String,
    base_url: String,
    model_id: String,
    client: Client,
}

impl ElevenLabsClient {
    /// Create a new ElevenLabs client
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(DEFAULT_POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(2)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            base_url: ELEVENLABS_API_URL.to_string(),
            model_id: "eleven_monolingual_v1".to_string(),
            client,
        }
    }

    /// Override the API base URL (used by tests)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the synthesis model
    pub fn with_model_id(mut self, model_id: String) -> Self {
        self.model_id = model_id;
        self
    }

    /// Translate a non-2xx response into a typed error
    async fn handle_error(&self, response: reqwest::Response) -> AppError {
        let status = response.status().as_u16();

        if let Ok(body) = response.json::<ElevenLabsError>().await {
            return AppError::ExternalService(format!(
                "ElevenLabs API error {}: {}",
                status, body.detail.message
            ));
        }

        AppError::ExternalService(format!("ElevenLabs API error {}", status))
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &VoiceSettings,
    ) -> Result<Vec<u8>> {
        tracing::info!(
            "ElevenLabs synthesis request: voice={}, model={}, chars={}",
            voice_id,
            self.model_id,
            text.len()
        );

        let request = TtsRequest {
            text,
            model_id: &self.model_id,
            voice_settings: settings,
        };

        let url = format!("{}/v1/text-to-speech/{}", self.base_url, voice_id);
        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("ElevenLabs API response status: {}", status);

        if !status.is_success() {
            return Err(self.handle_error(response).await);
        }

        let audio = response.bytes().await?;
        tracing::info!("ElevenLabs synthesis complete: {} bytes", audio.len());
        Ok(audio.to_vec())
    }

    async fn voices(&self) -> Result<Vec<VoiceInfo>> {
        let url = format!("{}/v1/voices", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("xi-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }

        let body: VoicesResponse = response.json().await?;
        Ok(body.voices)
    }
}

// ElevenLabs-specific request format
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

// Voice catalog response format
#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<VoiceInfo>,
}

// ElevenLabs error format
#[derive(Debug, Deserialize)]
struct ElevenLabsError {
    detail: ElevenLabsErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ElevenLabsErrorDetail {
    #[allow(dead_code)]
    #[serde(default)]
    status: String,
    message: String,
}
