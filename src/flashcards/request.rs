//! Flashcard Requests
//!
//! The two request variants (raw text vs. uploaded file) as an explicit sum
//! type, resolved once at the HTTP boundary, plus the extension/MIME dispatch
//! that decides which extractor handles a file.

use std::path::{Path, PathBuf};

/// A resolved flashcard generation request.
#[derive(Debug, Clone)]
pub enum FlashcardRequest {
    /// Raw text supplied in the request body.
    Text { content: String },
    /// An uploaded document spooled to disk, with the client's declared
    /// content type kept as a dispatch hint.
    File {
        path: PathBuf,
        declared_mime: String,
    },
}

/// The file families the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Slides,
    Image,
    Text,
}

const OFFICE_SLIDE_MIMES: &[&str] = &[
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

impl FileKind {
    /// Dispatch on file extension or, failing that, the declared MIME type.
    /// `None` means no extractor handles this input.
    pub fn detect(path: &Path, declared_mime: &str) -> Option<FileKind> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => return Some(FileKind::Pdf),
            "ppt" | "pptx" => return Some(FileKind::Slides),
            "jpg" | "jpeg" | "png" | "gif" | "webp" => return Some(FileKind::Image),
            "txt" | "md" => return Some(FileKind::Text),
            _ => {}
        }

        if declared_mime == "application/pdf" {
            Some(FileKind::Pdf)
        } else if OFFICE_SLIDE_MIMES.contains(&declared_mime) {
            Some(FileKind::Slides)
        } else if declared_mime.starts_with("image/") {
            Some(FileKind::Image)
        } else if declared_mime.starts_with("text/") {
            Some(FileKind::Text)
        } else {
            None
        }
    }
}

/// MIME type for an image upload, derived from the extension when the client
/// declared something unhelpful (e.g. application/octet-stream).
pub fn image_mime_type(path: &Path, declared_mime: &str) -> String {
    if declared_mime.starts_with("image/") {
        return declared_mime.to_string();
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        "gif" => "image/gif".to_string(),
        "webp" => "image/webp".to_string(),
        _ => "image/png".to_string(),
    }
}
