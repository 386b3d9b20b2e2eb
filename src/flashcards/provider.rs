//! Gemini Provider Implementation
//!
//! Implements the `GenerativeModel` trait against the Gemini
//! `generateContent` HTTP API. Vision calls attach the image as inline
//! base64 data alongside the prompt.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, Result};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120); // Total request timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10); // Connection timeout
const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90); // Keep connections alive

/// Boundary contract for generative text providers.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send a text prompt, return the model's free-form reply.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Send a prompt with an attached image (vision call).
    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String>;
}

/// Gemini generateContent client
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client
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
            base_url: GEMINI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Override the API base URL (used by tests)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Use a different model (e.g. gemini-1.5-pro for better quality)
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    async fn generate_content(&self, parts: Vec<Part>) -> Result<String> {
        tracing::info!(
            "Gemini API request: model={}, parts={}",
            self.model,
            parts.len()
        );

        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini API response status: {}", status);

        if !status.is_success() {
            return Err(self.handle_error(response).await);
        }

        let body: GenerateResponse = response.json().await?;
        let text: String = body
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::ExternalService(
                "Gemini returned no candidates".to_string(),
            ));
        }

        tracing::info!("Gemini API response: {} chars", text.len());
        Ok(text)
    }

    /// Translate a non-2xx response into a typed error
    async fn handle_error(&self, response: reqwest::Response) -> AppError {
        let status = response.status().as_u16();

        if let Ok(body) = response.json::<GeminiError>().await {
            return AppError::ExternalService(format!(
                "Gemini API error {}: {}",
                status, body.error.message
            ));
        }

        AppError::ExternalService(format!("Gemini API error {}", status))
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(vec![Part::text(prompt)]).await
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String> {
        let inline = Part::inline_image(mime_type, &BASE64.encode(image));
        self.generate_content(vec![Part::text(prompt), inline]).await
    }
}

// Gemini-specific request format
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline_image(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

// Gemini-specific response format
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

// Gemini error format
#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[allow(dead_code)]
    #[serde(default)]
    status: String,
}
