//! Delivery boundary.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::error::{Error, Result};
use crate::fs::{ensure_dir, make_unique_filename, LocalArtifact};

/// Hands a finished artifact to the user.
///
/// The artifact file is deleted by the caller after this returns, whatever
/// the result, so implementations must copy or upload before returning.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, artifact: &LocalArtifact) -> Result<()>;
}

/// Delivers by copying artifacts into a directory.
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl Delivery for DirectoryDelivery {
    async fn deliver(&self, artifact: &LocalArtifact) -> Result<()> {
        ensure_dir(&self.dir).await?;
        let target = make_unique_filename(&self.dir.join(&artifact.filename));

        fs::copy(&artifact.path, &target).await.map_err(|e| {
            Error::Delivery(format!("Failed to save {}: {}", target.display(), e))
        })?;

        tracing::info!("Saved: {}", target.display());
        Ok(())
    }
}
