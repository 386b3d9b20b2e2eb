//! REST API handlers

use std::io::Write;
use std::sync::Arc;

use axum::extract::{Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, RequestExt};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::flashcards::{ALLOWED_EXTENSIONS, Flashcard, FlashcardRequest};
use crate::http::AppState;
use crate::speech::{DEFAULT_VOICE_SETTINGS, SavedAudio, VoiceInfo, VoiceSettingsOverrides};

const DEFAULT_COUNT: usize = 10;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the server
    pub status: String,
    /// Server version
    pub version: String,
    /// Seconds since server started
    pub uptime_seconds: u64,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Response for the voice catalog endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
}

/// List the voices available for announcements
pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: state.speech.voices().await,
    })
}

/// Body for the pomodoro start/end endpoints. Every field is optional; the
/// settings fields accept both snake_case and camelCase spellings.
#[derive(Debug, Default, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(flatten)]
    pub overrides: VoiceSettingsOverrides,
}

/// POST /api/pomodoro-start - synthesize and serve the start announcement
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<SessionRequest>>,
) -> Response {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let settings = request.overrides.resolve(&DEFAULT_VOICE_SETTINGS);
    let saved = state
        .speech
        .start_sound(request.voice_id.as_deref(), &settings)
        .await;
    audio_response(saved)
}

/// POST /api/pomodoro-end - synthesize and serve the end announcement
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<SessionRequest>>,
) -> Response {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let settings = request.overrides.resolve(&DEFAULT_VOICE_SETTINGS);
    let saved = state
        .speech
        .end_sound(request.voice_id.as_deref(), &settings)
        .await;
    audio_response(saved)
}

fn audio_response(saved: Option<SavedAudio>) -> Response {
    let Some(saved) = saved else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Audio not generated." })),
        )
            .into_response();
    };

    match std::fs::read(&saved.path) {
        Ok(bytes) => {
            let disposition = format!("inline; filename=\"{}\"", saved.file_name);
            (
                [
                    (header::CONTENT_TYPE, "audio/mpeg".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Generated audio vanished from {}: {}", saved.path.display(), e);
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Audio not found" })),
            )
                .into_response()
        }
    }
}

/// JSON body variant for flashcard generation
#[derive(Debug, Deserialize)]
pub struct TextFlashcardsBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Successful flashcard reply
#[derive(Debug, Serialize, Deserialize)]
pub struct FlashcardsResponse {
    pub flashcards: Vec<Flashcard>,
}

/// POST /api/generate-flashcards - from raw text (JSON) or an upload
/// (multipart/form-data with a `file` field).
pub async fn generate_flashcards(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<FlashcardsResponse>> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let multipart: Multipart = request
            .extract()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {e}")))?;
        generate_from_upload(&state, multipart).await.map(Json)
    } else if content_type.starts_with("application/json") {
        let Json(body): Json<TextFlashcardsBody> = request
            .extract()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Invalid JSON body: {e}")))?;
        generate_from_text(&state, body).await.map(Json)
    } else {
        Err(AppError::InvalidInput(
            "No file or text provided. Send either a 'file' (multipart) or 'text' (JSON)"
                .to_string(),
        ))
    }
}

async fn generate_from_text(
    state: &AppState,
    body: TextFlashcardsBody,
) -> Result<FlashcardsResponse> {
    let count = body.count.unwrap_or(DEFAULT_COUNT);
    let text = body.text.ok_or_else(|| {
        AppError::InvalidInput(
            "No file or text provided. Send either a 'file' (multipart) or 'text' (JSON)"
                .to_string(),
        )
    })?;

    let request = FlashcardRequest::Text { content: text };
    let flashcards = state.flashcards.generate(&request, count).await?;
    Ok(FlashcardsResponse { flashcards })
}

async fn generate_from_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<FlashcardsResponse> {
    let mut count = DEFAULT_COUNT;
    // the temp file is dropped (and deleted) on every exit path, success or
    // error, so failed generations never leak upload copies
    let mut upload: Option<(tempfile::NamedTempFile, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("count") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Invalid count field: {e}")))?;
                count = raw.trim().parse().map_err(|_| {
                    AppError::InvalidInput("Count must be a number".to_string())
                })?;
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("").to_string();
                if file_name.is_empty() {
                    return Err(AppError::InvalidInput("Empty filename".to_string()));
                }

                let ext = file_name
                    .rsplit_once('.')
                    .map(|(_, e)| e.to_ascii_lowercase())
                    .unwrap_or_default();
                if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
                    return Err(AppError::InvalidInput(format!(
                        "File type not allowed. Supported: {}",
                        ALLOWED_EXTENSIONS.join(", ")
                    )));
                }

                let declared_mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read upload: {e}"))
                })?;

                let mut temp = tempfile::Builder::new()
                    .prefix("pomodorino_upload_")
                    .suffix(&format!(".{ext}"))
                    .tempfile()
                    .map_err(|e| AppError::Storage(format!("Failed to spool upload: {e}")))?;
                temp.write_all(&data)
                    .map_err(|e| AppError::Storage(format!("Failed to spool upload: {e}")))?;

                upload = Some((temp, declared_mime));
            }
            _ => {}
        }
    }

    let (temp, declared_mime) = upload.ok_or_else(|| {
        AppError::InvalidInput(
            "No file or text provided. Send either a 'file' (multipart) or 'text' (JSON)"
                .to_string(),
        )
    })?;

    let request = FlashcardRequest::File {
        path: temp.path().to_path_buf(),
        declared_mime,
    };
    let flashcards = state.flashcards.generate(&request, count).await?;
    Ok(FlashcardsResponse { flashcards })
}
