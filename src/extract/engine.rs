//! Local extraction engine boundary.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};

/// What an engine produced for one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    pub file_path: PathBuf,
    pub title: String,
}

/// Turns a URL into a local file under a format constraint.
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Human-readable engine name.
    fn name(&self) -> &str;

    /// Download `url` using `format_selector`, writing to `output_template`.
    ///
    /// The template may contain `%(ext)s`, which the engine replaces with the
    /// final container extension.
    async fn extract(
        &self,
        url: &str,
        format_selector: &str,
        output_template: &Path,
    ) -> Result<EngineOutput>;
}

/// Engine backed by the `yt-dlp` executable.
pub struct YtDlpEngine {
    binary: String,
    container: String,
    timeout: Duration,
}

impl YtDlpEngine {
    pub fn new(binary: impl Into<String>, container: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            container: container.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.extraction.binary.clone(),
            config.extraction.container.clone(),
            config.extraction_timeout(),
        )
    }
}

#[async_trait]
impl ExtractionEngine for YtDlpEngine {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract(
        &self,
        url: &str,
        format_selector: &str,
        output_template: &Path,
    ) -> Result<EngineOutput> {
        let template = output_template
            .to_str()
            .ok_or_else(|| Error::Extraction("Invalid path encoding for output template".into()))?;

        let child = Command::new(&self.binary)
            .args([
                "--no-playlist",
                "--no-progress",
                "--no-warnings",
                "--quiet",
                "--no-simulate",
                "--format",
                format_selector,
                "--merge-output-format",
                self.container.as_str(),
                "--output",
                template,
                "--print",
                "after_move:%(filepath)s\t%(title)s",
                url,
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ExtractionEngineNotFound(self.binary.clone())
                } else {
                    Error::Extraction(format!("Failed to run {}: {}", self.binary, e))
                }
            })?;

        // Dropping the child on timeout kills the process.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                tracing::error!(
                    "{} timed out after {}s, killed",
                    self.binary,
                    self.timeout.as_secs()
                );
                return Err(Error::Transport {
                    status: None,
                    message: format!("Extraction timed out after {}s", self.timeout.as_secs()),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Extraction(engine_error_message(
                &stderr,
                &output.status.to_string(),
            )));
        }

        parse_print_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse the `filepath<TAB>title` line printed after the final move.
fn parse_print_output(stdout: &str) -> Result<EngineOutput> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| Error::Extraction("Engine reported no output file".into()))?;

    let (path, title) = line.split_once('\t').unwrap_or((line, ""));

    Ok(EngineOutput {
        file_path: PathBuf::from(path.trim()),
        title: title.trim().to_string(),
    })
}

/// Pick the most useful line from the engine's stderr.
fn engine_error_message(stderr: &str, status: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| stderr.lines().rev().find(|l| !l.trim().is_empty()))
        .map(|l| l.trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| format!("engine exited with {}", status))
}
