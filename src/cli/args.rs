//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{BudgetMode, Config};

/// Media fetcher CLI.
#[derive(Parser, Debug)]
#[command(
    name = "media-grab",
    version,
    about = "Fetch videos and photos from a link",
    long_about = "Fetch videos and photos from links to YouTube, TikTok, Instagram and more.\n\n\
                  Links to extraction platforms are fetched locally with yt-dlp, stepping down \
                  in quality until the file fits the size budget. Everything else goes through \
                  a cobalt-compatible backend."
)]
pub struct Args {
    /// Links to fetch. Text around a link is ignored.
    #[arg(required = true, num_args = 1..)]
    pub urls: Vec<String>,

    /// Aggregation backend base URL.
    #[arg(long, env = "COBALT_API_URL")]
    pub endpoint: Option<String>,

    /// Static API key for the aggregation backend.
    #[arg(long = "api-key", env = "COBALT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Size budget mode (cloud = 50 MB, local = 2000 MB).
    #[arg(long, env = "MEDIA_GRAB_BUDGET")]
    pub budget: Option<BudgetMode>,

    /// Directory delivered files are saved to.
    #[arg(short, long = "output")]
    pub output_directory: Option<PathBuf>,

    /// Directory for temporary downloads.
    #[arg(long = "work-dir")]
    pub work_directory: Option<PathBuf>,

    /// Quality tiers as max heights, highest first (e.g. 1080,720,480).
    #[arg(long, value_delimiter = ',')]
    pub tiers: Option<Vec<u32>>,

    /// Extraction engine binary.
    #[arg(long)]
    pub engine: Option<String>,

    /// Picker items fetched concurrently (default 1).
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    ///
    /// Returns the links to fetch.
    pub fn merge_into_config(self, config: &mut Config) -> Vec<String> {
        if let Some(endpoint) = self.endpoint {
            config.aggregation.endpoint = endpoint;
        }

        if let Some(api_key) = self.api_key {
            config.aggregation.api_key = Some(api_key);
        }

        if let Some(budget) = self.budget {
            config.limits.budget_mode = budget;
        }

        if let Some(dir) = self.output_directory {
            config.options.output_directory = Some(dir);
        }

        if let Some(dir) = self.work_directory {
            config.options.work_directory = Some(dir);
        }

        if let Some(tiers) = self.tiers {
            config.extraction.tiers = tiers;
        }

        if let Some(engine) = self.engine {
            config.extraction.binary = engine;
        }

        if let Some(concurrency) = self.concurrency {
            config.options.max_concurrent_items = concurrency;
        }

        self.urls
    }
}
