//! HTTP server module
//!
//! Thin boundary over the two pipelines: routing, CORS, request parsing.
//! Handlers validate and relay; all behavior lives in the services.

pub mod handlers;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::{Config, ServerConfig};
use crate::flashcards::{FlashcardService, GeminiClient};
use crate::speech::{AudioStore, ElevenLabsClient, SpeechService};

/// Shared per-process state handed to every handler.
pub struct AppState {
    pub speech: SpeechService,
    pub flashcards: FlashcardService,
    started_at: Instant,
}

impl AppState {
    pub fn new(speech: SpeechService, flashcards: FlashcardService) -> Self {
        Self {
            speech,
            flashcards,
            started_at: Instant::now(),
        }
    }

    /// Wire up the real provider clients from configuration and API keys.
    pub fn from_config(config: &Config, elevenlabs_key: String, google_key: String) -> Self {
        let synthesizer = ElevenLabsClient::new(elevenlabs_key)
            .with_base_url(config.speech.api_url.clone())
            .with_model_id(config.speech.model_id.clone());
        let speech = SpeechService::new(
            Arc::new(synthesizer),
            AudioStore::new(config.speech.audio_dir.clone()),
            config.speech.clone(),
        );

        let model = GeminiClient::new(google_key)
            .with_base_url(config.gemini.api_url.clone())
            .with_model(config.gemini.model.clone());
        let flashcards = FlashcardService::new(Arc::new(model));

        Self::new(speech, flashcards)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/voices", get(handlers::list_voices))
        .route("/api/pomodoro-start", post(handlers::start_session))
        .route("/api/pomodoro-end", post(handlers::end_session))
        .route("/api/generate-flashcards", post(handlers::generate_flashcards))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, create_router(state))
        .await
        .context("Server error")?;
    Ok(())
}
