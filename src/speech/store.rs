//! Audio Store
//!
//! Writes synthesized MP3 buffers beneath the configured audio directory.
//! Failures degrade to `None`; the caller reports "not generated" upstream.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use uuid::Uuid;

/// Filesystem store for generated announcement audio.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `audio` under the audio directory (created if absent).
    ///
    /// Returns the concrete path plus filename, or `None` when the write
    /// fails.
    pub fn save(&self, audio: &[u8], file_name: &str) -> Option<(PathBuf, String)> {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::error!("Failed to create audio directory {}: {}", self.dir.display(), e);
            return None;
        }

        let path = self.dir.join(file_name);
        match fs::write(&path, audio) {
            Ok(()) => {
                tracing::debug!("Saved {} bytes to {}", audio.len(), path.display());
                Some((path, file_name.to_string()))
            }
            Err(e) => {
                tracing::error!("Failed to save audio to {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Build an announcement filename: fixed prefix, second-resolution timestamp,
/// and a short random suffix so that concurrent requests inside the same
/// wall-clock second still get distinct names.
pub fn timestamped_file_name(prefix: &str) -> String {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}{stamp}_{}.mp3", &suffix[..8])
}
