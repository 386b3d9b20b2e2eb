//! Application error types
//!
//! One taxonomy shared by both pipelines: invalid input is always detected
//! before any external call; provider and parse failures on the flashcard
//! path propagate with context; the speech path degrades to a "not
//! generated" sentinel instead of surfacing these (see `speech::service`).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad count, empty text, malformed request body
    #[error("{0}")]
    InvalidInput(String),

    /// Upload with an extension/MIME type no extractor handles
    #[error("Unsupported file type: {0}")]
    UnsupportedFileKind(String),

    /// Synthesis or generation provider error, network error
    #[error("external service failure: {0}")]
    ExternalService(String),

    /// The model reply contained no parseable flashcard array
    #[error("malformed model output: {0}")]
    MalformedModelOutput(String),

    /// Write/read error on disk
    #[error("storage failure: {0}")]
    Storage(String),
}

impl AppError {
    /// Prefix the message with operation context, preserving the variant.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            AppError::ExternalService(msg) => {
                AppError::ExternalService(format!("{context}: {msg}"))
            }
            AppError::MalformedModelOutput(msg) => {
                AppError::MalformedModelOutput(format!("{context}: {msg}"))
            }
            AppError::Storage(msg) => AppError::Storage(format!("{context}: {msg}")),
            other => other,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::UnsupportedFileKind(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::ExternalService(_)
            | AppError::MalformedModelOutput(_)
            | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalService(err.to_string())
    }
}
