//! Path and directory management.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::Result;
use crate::fs::artifact::remove_quietly;

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        fs::create_dir_all(path).await?;
    }
    Ok(())
}

/// Temp path for a byte fetch attempt.
pub fn download_path(work_dir: &Path, stem: &str) -> PathBuf {
    work_dir.join(format!("{}.download", stem))
}

/// Output template for an extraction attempt; the engine fills in the extension.
pub fn extraction_template(work_dir: &Path, stem: &str) -> PathBuf {
    work_dir.join(format!("{}.%(ext)s", stem))
}

/// Remove every file in `work_dir` whose name starts with `stem`.
///
/// Extraction engines may leave fragments (`.part`, per-stream files) next to
/// the final output; they all share the attempt stem.
pub async fn remove_attempt_files(work_dir: &Path, stem: &str) -> Result<usize> {
    let mut removed = 0;
    let mut entries = match fs::read_dir(work_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(stem) {
            remove_quietly(&entry.path()).await;
            removed += 1;
        }
    }

    Ok(removed)
}
