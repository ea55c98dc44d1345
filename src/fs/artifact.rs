//! Temp files produced by fetch attempts.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::media::MediaKind;

/// A temp file owned by the request that produced it.
///
/// The owner must call [`LocalArtifact::discard`] once the file has been
/// handed to delivery, whatever the delivery outcome.
#[derive(Debug)]
pub struct LocalArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,

    /// Name the file is delivered under.
    pub filename: String,

    pub kind: MediaKind,

    /// Content type reported by the server, if any.
    pub content_type: Option<String>,
}

impl LocalArtifact {
    pub fn new(path: PathBuf, size_bytes: u64, filename: String) -> Self {
        Self {
            path,
            size_bytes,
            filename,
            kind: MediaKind::default(),
            content_type: None,
        }
    }

    pub fn with_kind(mut self, kind: MediaKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_filename(mut self, filename: String) -> Self {
        self.filename = filename;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file from disk.
    pub async fn discard(self) {
        remove_quietly(&self.path).await;
    }
}

/// Remove a file, logging instead of failing. A missing file is not an error.
pub async fn remove_quietly(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => tracing::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
    }
}
