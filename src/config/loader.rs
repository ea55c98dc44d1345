//! Configuration structures and loading logic.

use crate::config::modes::{BudgetMode, SizeBudget};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aggregation: AggregationConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Aggregation backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Base URL of the aggregation API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Static API key. When absent a session token is negotiated instead.
    #[serde(default)]
    pub api_key: Option<String>,

    /// User agent sent with resolve and byte fetch requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Size limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Deployment mode selecting the size budget.
    #[serde(default)]
    pub budget_mode: BudgetMode,
}

/// Local extraction engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Extraction engine executable.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Hosts routed to the extraction engine (subdomains included).
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,

    /// Quality ladder as maximum video heights, highest first.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<u32>,

    /// Container the engine merges streams into.
    #[serde(default = "default_container")]
    pub container: String,

    /// Seconds before an extraction attempt is killed.
    #[serde(default = "default_extraction_timeout")]
    pub timeout_secs: u64,
}

/// General options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory for in-flight temp files.
    #[serde(default)]
    pub work_directory: Option<PathBuf>,

    /// Directory delivered files are copied into.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Total timeout for one HTTP request, body included.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout for HTTP requests.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Picker items processed at once.
    #[serde(default = "default_max_concurrent_items")]
    pub max_concurrent_items: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            domains: default_domains(),
            tiers: default_tiers(),
            container: default_container(),
            timeout_secs: default_extraction_timeout(),
        }
    }
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            work_directory: None,
            output_directory: None,
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_concurrent_items: default_max_concurrent_items(),
        }
    }
}

fn default_endpoint() -> String {
    "https://co.wuk.sh".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_binary() -> String {
    "yt-dlp".to_string()
}

fn default_domains() -> Vec<String> {
    [
        "youtube.com",
        "youtu.be",
        "vimeo.com",
        "dailymotion.com",
        "twitch.tv",
    ]
    .iter()
    .map(|d| d.to_string())
    .collect()
}

fn default_tiers() -> Vec<u32> {
    vec![1080, 720, 480, 360]
}

fn default_container() -> String {
    "mp4".to_string()
}

fn default_extraction_timeout() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    300
}

fn default_connect_timeout() -> u64 {
    30
}

/// One picker item at a time keeps at most one temp file per request on disk.
fn default_max_concurrent_items() -> usize {
    1
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The size budget of the configured deployment mode.
    pub fn size_budget(&self) -> SizeBudget {
        self.limits.budget_mode.budget()
    }

    /// Get the effective work directory for temp files.
    pub fn work_directory(&self) -> PathBuf {
        self.options
            .work_directory
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("media-grab"))
    }

    /// Get the effective output directory.
    pub fn output_directory(&self) -> PathBuf {
        self.options
            .output_directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.options.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.options.connect_timeout_secs)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction.timeout_secs)
    }
}
