//! Extraction client: one engine attempt per quality tier.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;

use crate::config::{Config, SizeBudget};
use crate::error::{Error, Result};
use crate::extract::engine::ExtractionEngine;
use crate::extract::tiers::QualityLadder;
use crate::fs::{
    ensure_dir, extraction_template, remove_attempt_files, remove_quietly, title_to_stem,
    LocalArtifact,
};
use crate::media::DownloadRequest;

/// Result of one tier attempt that did not fail outright.
#[derive(Debug)]
pub enum TierOutcome {
    /// The artifact fits the budget.
    Fits(LocalArtifact),
    /// The artifact was too large and has been deleted; a lower tier exists.
    TooLarge { size_bytes: u64 },
}

/// Wraps an extraction engine with a quality ladder and size budget.
pub struct ExtractionClient {
    engine: Arc<dyn ExtractionEngine>,
    ladder: QualityLadder,
    budget: SizeBudget,
    work_dir: PathBuf,
}

impl ExtractionClient {
    pub fn new(
        engine: Arc<dyn ExtractionEngine>,
        ladder: QualityLadder,
        budget: SizeBudget,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            ladder,
            budget,
            work_dir,
        }
    }

    pub fn from_config(config: &Config, engine: Arc<dyn ExtractionEngine>) -> Self {
        Self::new(
            engine,
            QualityLadder::new(&config.extraction.tiers, &config.extraction.container),
            config.size_budget(),
            config.work_directory(),
        )
    }

    pub fn ladder(&self) -> &QualityLadder {
        &self.ladder
    }

    /// Run the engine at `tier_index` and measure the result.
    ///
    /// Oversize output is deleted. If a lower tier exists the caller gets
    /// [`TierOutcome::TooLarge`]; on the last tier this is [`Error::Oversize`].
    /// Engine failures are returned as-is and never retried here. No file
    /// from this attempt remains on disk unless it is returned in
    /// [`TierOutcome::Fits`].
    pub async fn fetch(&self, request: &DownloadRequest, tier_index: usize) -> Result<TierOutcome> {
        let tier = self.ladder.get(tier_index).ok_or_else(|| {
            Error::Extraction(format!("No quality tier at index {}", tier_index))
        })?;

        ensure_dir(&self.work_dir).await?;
        let stem = request.attempt_stem(&format!("t{}", tier_index));
        let template = extraction_template(&self.work_dir, &stem);

        tracing::info!(
            "Extracting {} at {} with {}",
            request.url,
            tier,
            self.engine.name()
        );

        let output = match self
            .engine
            .extract(&request.url, &tier.format_selector(), &template)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                self.discard_attempt(&stem).await;
                return Err(into_extraction_error(e));
            }
        };

        let size_bytes = match fs::metadata(&output.file_path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                self.discard_attempt(&stem).await;
                return Err(Error::Extraction(format!(
                    "Engine output {} is unreadable: {}",
                    output.file_path.display(),
                    e
                )));
            }
        };

        if self.budget.allows(size_bytes) {
            let ext = output
                .file_path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or(tier.container.as_str())
                .to_string();
            let filename = format!("{}.{}", title_to_stem(&output.title), ext);

            tracing::info!("Extracted {} bytes at {}", size_bytes, tier);
            return Ok(TierOutcome::Fits(LocalArtifact::new(
                output.file_path,
                size_bytes,
                filename,
            )));
        }

        tracing::info!(
            "Output at {} is {} bytes, over the {} budget",
            tier,
            size_bytes,
            self.budget
        );
        remove_quietly(&output.file_path).await;
        self.discard_attempt(&stem).await;

        if self.ladder.has_next(tier_index) {
            Ok(TierOutcome::TooLarge { size_bytes })
        } else {
            Err(Error::Oversize {
                size_bytes,
                budget_bytes: self.budget.max_bytes(),
            })
        }
    }

    async fn discard_attempt(&self, stem: &str) {
        if let Err(e) = remove_attempt_files(&self.work_dir, stem).await {
            tracing::warn!("Failed to clean up attempt {}: {}", stem, e);
        }
    }
}

/// Engine errors keep their class when it is meaningful to the caller;
/// everything else is reported as an extraction failure.
fn into_extraction_error(e: Error) -> Error {
    match e {
        Error::Extraction(_) | Error::ExtractionEngineNotFound(_) | Error::Transport { .. } => e,
        other => Error::Extraction(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::engine::EngineOutput;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Writes a file of the next scripted size on each call.
    struct ScriptedEngine {
        sizes: Mutex<Vec<Result<u64>>>,
        selectors: Mutex<Vec<String>>,
    }

    impl ScriptedEngine {
        fn new(sizes: Vec<Result<u64>>) -> Self {
            Self {
                sizes: Mutex::new(sizes),
                selectors: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ExtractionEngine for ScriptedEngine {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn extract(
            &self,
            _url: &str,
            format_selector: &str,
            output_template: &Path,
        ) -> Result<EngineOutput> {
            self.selectors
                .lock()
                .unwrap()
                .push(format_selector.to_string());
            let size = self.sizes.lock().unwrap().remove(0)?;

            let path = PathBuf::from(output_template.to_str().unwrap().replace("%(ext)s", "mp4"));
            std::fs::File::create(&path).unwrap().set_len(size).unwrap();
            Ok(EngineOutput {
                file_path: path,
                title: "Clip".into(),
            })
        }
    }

    fn client(engine: Arc<ScriptedEngine>, work_dir: &Path) -> ExtractionClient {
        ExtractionClient::new(
            engine,
            QualityLadder::new(&[720, 480], "mp4"),
            SizeBudget::new(50),
            work_dir.to_path_buf(),
        )
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_fitting_artifact_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(ScriptedEngine::new(vec![Ok(30)]));
        let request = DownloadRequest::new("https://youtu.be/x");

        let outcome = client(engine.clone(), dir.path()).fetch(&request, 0).await.unwrap();

        let TierOutcome::Fits(artifact) = outcome else {
            panic!("expected fit");
        };
        assert_eq!(artifact.size_bytes, 30);
        assert_eq!(artifact.filename, "Clip.mp4");
        assert!(artifact.path.exists());
        assert!(engine.selectors.lock().unwrap()[0].contains("height<=720"));
    }

    #[tokio::test]
    async fn test_oversize_with_lower_tier_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(ScriptedEngine::new(vec![Ok(80)]));
        let request = DownloadRequest::new("https://youtu.be/x");

        let outcome = client(engine, dir.path()).fetch(&request, 0).await.unwrap();

        assert!(matches!(outcome, TierOutcome::TooLarge { size_bytes: 80 }));
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_oversize_on_last_tier_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(ScriptedEngine::new(vec![Ok(80)]));
        let request = DownloadRequest::new("https://youtu.be/x");

        let err = client(engine, dir.path()).fetch(&request, 1).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Oversize {
                size_bytes: 80,
                budget_bytes: 50
            }
        ));
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(ScriptedEngine::new(vec![Err(Error::Io(std::io::Error::other(
            "unsupported site",
        )))]));
        let request = DownloadRequest::new("https://youtu.be/x");

        let err = client(engine, dir.path()).fetch(&request, 0).await.unwrap_err();

        assert!(matches!(err, Error::Extraction(_)));
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_unknown_tier_index() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(ScriptedEngine::new(vec![]));
        let request = DownloadRequest::new("https://youtu.be/x");

        assert!(client(engine, dir.path()).fetch(&request, 5).await.is_err());
    }
}
