//! Flashcard Service
//!
//! Validates requests, dispatches extraction by file kind, and drives the
//! generate-then-parse loop. All validation happens before the first
//! provider call; provider and parse failures propagate with context.

use std::fs;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::flashcards::extract;
use crate::flashcards::parse::{Flashcard, parse_flashcards};
use crate::flashcards::prompt::{
    IMAGE_TRANSCRIPTION_PROMPT, flashcard_prompt, image_flashcard_prompt,
};
use crate::flashcards::provider::GenerativeModel;
use crate::flashcards::request::{FileKind, FlashcardRequest, image_mime_type};

pub const MIN_COUNT: usize = 1;
pub const MAX_COUNT: usize = 50;

/// Upload extensions accepted at the HTTP boundary.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "ppt", "pptx", "txt", "md", "jpg", "jpeg", "png", "gif", "webp",
];

/// Flashcard generation pipeline.
#[derive(Clone)]
pub struct FlashcardService {
    model: Arc<dyn GenerativeModel>,
}

impl FlashcardService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Generate at most `count` flashcards for the given request.
    pub async fn generate(
        &self,
        request: &FlashcardRequest,
        count: usize,
    ) -> Result<Vec<Flashcard>> {
        validate_count(count)?;

        match request {
            FlashcardRequest::Text { content } => self.from_text(content, count).await,
            FlashcardRequest::File {
                path,
                declared_mime,
            } => {
                let kind = FileKind::detect(path, declared_mime).ok_or_else(|| {
                    AppError::UnsupportedFileKind(declared_mime.to_string())
                })?;

                tracing::info!(
                    "Generating {} flashcards from {} ({:?})",
                    count,
                    path.display(),
                    kind
                );

                match kind {
                    FileKind::Pdf => {
                        self.from_text(&extract::extract_pdf(path)?, count).await
                    }
                    FileKind::Slides => {
                        self.from_text(&extract::extract_slides(path)?, count).await
                    }
                    FileKind::Text => {
                        self.from_text(&extract::extract_text_file(path)?, count)
                            .await
                    }
                    FileKind::Image => self.from_image(path, declared_mime, count).await,
                }
            }
        }
    }

    async fn from_text(&self, text: &str, count: usize) -> Result<Vec<Flashcard>> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("Text cannot be empty".to_string()));
        }

        let prompt = flashcard_prompt(text, count);
        let reply = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| e.with_context("flashcard generation failed"))?;
        parse_flashcards(&reply, count)
    }

    /// Two-step image path: ask the vision model for a flashcard array
    /// directly; if the reply does not parse, ask for a plain transcription
    /// and feed that through the text pipeline. Vision models are less
    /// reliable at strict JSON, so the second pass buys yield at the cost of
    /// one more call.
    async fn from_image(
        &self,
        path: &std::path::Path,
        declared_mime: &str,
        count: usize,
    ) -> Result<Vec<Flashcard>> {
        let image = fs::read(path)
            .map_err(|e| AppError::Storage(format!("Failed to read image: {e}")))?;
        let mime = image_mime_type(path, declared_mime);

        let reply = self
            .model
            .generate_with_image(&image_flashcard_prompt(count), &image, &mime)
            .await
            .map_err(|e| e.with_context("image flashcard generation failed"))?;

        match parse_flashcards(&reply, count) {
            Ok(cards) => Ok(cards),
            Err(e) => {
                tracing::debug!(
                    "Vision reply was not a flashcard array ({}), falling back to transcription",
                    e
                );
                let transcript = self
                    .model
                    .generate_with_image(IMAGE_TRANSCRIPTION_PROMPT, &image, &mime)
                    .await
                    .map_err(|e| e.with_context("image transcription failed"))?;
                self.from_text(&transcript, count).await
            }
        }
    }
}

fn validate_count(count: usize) -> Result<()> {
    if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
        return Err(AppError::InvalidInput(
            "Count must be between 1 and 50".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub model: scripted replies, call counting.
    struct StubModel {
        text_replies: Vec<String>,
        image_replies: Vec<String>,
        text_calls: AtomicUsize,
        image_calls: AtomicUsize,
    }

    impl StubModel {
        fn with_text_reply(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                text_replies: vec![reply.to_string()],
                image_replies: Vec::new(),
                text_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
            })
        }

        fn with_image_replies(replies: &[&str], text_reply: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                text_replies: text_reply.map(|r| vec![r.to_string()]).unwrap_or_default(),
                image_replies: replies.iter().map(|r| r.to_string()).collect(),
                text_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
            })
        }

        fn total_calls(&self) -> usize {
            self.text_calls.load(Ordering::SeqCst) + self.image_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerativeModel for StubModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            let n = self.text_calls.fetch_add(1, Ordering::SeqCst);
            self.text_replies
                .get(n)
                .cloned()
                .ok_or_else(|| AppError::ExternalService("no scripted reply".to_string()))
        }

        async fn generate_with_image(
            &self,
            _prompt: &str,
            _image: &[u8],
            _mime_type: &str,
        ) -> Result<String> {
            let n = self.image_calls.fetch_add(1, Ordering::SeqCst);
            self.image_replies
                .get(n)
                .cloned()
                .ok_or_else(|| AppError::ExternalService("no scripted reply".to_string()))
        }
    }

    fn text_request(content: &str) -> FlashcardRequest {
        FlashcardRequest::Text {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_text_end_to_end() {
        let stub = StubModel::with_text_reply(
            r#"[{"question":"What does photosynthesis convert?","answer":"Light into chemical energy."}]"#,
        );
        let service = FlashcardService::new(stub.clone());

        let cards = service
            .generate(
                &text_request("Photosynthesis converts light into chemical energy."),
                1,
            )
            .await
            .expect("generation succeeds");

        assert_eq!(
            cards,
            vec![Flashcard {
                question: "What does photosynthesis convert?".to_string(),
                answer: "Light into chemical energy.".to_string(),
            }]
        );
        assert_eq!(stub.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_count_out_of_range_rejected_before_any_call() {
        let stub = StubModel::with_text_reply("[]");
        let service = FlashcardService::new(stub.clone());

        for count in [0, 51, 1000] {
            let err = service
                .generate(&text_request("some content"), count)
                .await
                .expect_err("should reject");
            assert!(matches!(err, AppError::InvalidInput(_)));
            assert_eq!(err.to_string(), "Count must be between 1 and 50");
        }
        assert_eq!(stub.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_count_bounds_accepted() {
        for count in [1, 50] {
            let stub = StubModel::with_text_reply(r#"[{"question":"Q","answer":"A"}]"#);
            let service = FlashcardService::new(stub.clone());
            service
                .generate(&text_request("content"), count)
                .await
                .expect("bounds are valid");
            assert_eq!(stub.total_calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_blank_text_rejected_before_any_call() {
        let stub = StubModel::with_text_reply("[]");
        let service = FlashcardService::new(stub.clone());

        for text in ["", "   ", "\n\t "] {
            let err = service
                .generate(&text_request(text), 10)
                .await
                .expect_err("should reject");
            assert_eq!(err.to_string(), "Text cannot be empty");
        }
        assert_eq!(stub.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected_before_any_call() {
        let stub = StubModel::with_text_reply("[]");
        let service = FlashcardService::new(stub.clone());

        let request = FlashcardRequest::File {
            path: PathBuf::from("payload.exe"),
            declared_mime: "application/x-msdownload".to_string(),
        };
        let err = service
            .generate(&request, 10)
            .await
            .expect_err("should reject");
        assert!(matches!(err, AppError::UnsupportedFileKind(_)));
        assert_eq!(stub.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_text_file_request_extracts_then_generates() {
        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .expect("temp file");
        file.write_all(b"The Krebs cycle produces ATP.")
            .expect("write");

        let stub = StubModel::with_text_reply(
            r#"[{"question":"What does the Krebs cycle produce?","answer":"ATP"}]"#,
        );
        let service = FlashcardService::new(stub.clone());

        let request = FlashcardRequest::File {
            path: file.path().to_path_buf(),
            declared_mime: "text/plain".to_string(),
        };
        let cards = service.generate(&request, 10).await.expect("generation");
        assert_eq!(cards.len(), 1);
        assert_eq!(stub.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_image_direct_path_single_call() {
        let mut file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("temp file");
        file.write_all(b"\x89PNG fake").expect("write");

        let stub = StubModel::with_image_replies(
            &[r#"[{"question":"Q","answer":"A"}]"#],
            None,
        );
        let service = FlashcardService::new(stub.clone());

        let request = FlashcardRequest::File {
            path: file.path().to_path_buf(),
            declared_mime: "image/png".to_string(),
        };
        let cards = service.generate(&request, 5).await.expect("generation");
        assert_eq!(cards.len(), 1);
        assert_eq!(stub.image_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.text_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_image_fallback_transcribes_then_regenerates() {
        let mut file = tempfile::Builder::new()
            .suffix(".jpg")
            .tempfile()
            .expect("temp file");
        file.write_all(b"\xFF\xD8 fake jpeg").expect("write");

        // first vision reply is prose, second is the transcription
        let stub = StubModel::with_image_replies(
            &[
                "I see a diagram about cell biology but cannot make cards.",
                "The cell membrane controls what enters and leaves the cell.",
            ],
            Some(r#"[{"question":"What does the membrane control?","answer":"What enters and leaves."}]"#),
        );
        let service = FlashcardService::new(stub.clone());

        let request = FlashcardRequest::File {
            path: file.path().to_path_buf(),
            declared_mime: "image/jpeg".to_string(),
        };
        let cards = service.generate(&request, 3).await.expect("generation");

        assert_eq!(cards.len(), 1);
        assert_eq!(stub.image_calls.load(Ordering::SeqCst), 2);
        assert_eq!(stub.text_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        // no scripted replies: every call errors
        let stub = StubModel::with_image_replies(&[], None);
        let service = FlashcardService::new(stub);

        let err = service
            .generate(&text_request("content"), 10)
            .await
            .expect_err("should fail");
        match err {
            AppError::ExternalService(msg) => {
                assert!(msg.contains("flashcard generation failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
