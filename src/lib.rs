//! media-grab - fetch videos and photos from a link under a fixed size budget
//!
//! Links are routed to one of two providers:
//!
//! - Platforms with a local extraction engine (yt-dlp) are fetched locally,
//!   stepping down a quality ladder until the file fits the size budget.
//! - Everything else is resolved through a cobalt-compatible aggregation
//!   backend and streamed to disk, with a direct-link fallback when the file
//!   is too large to deliver.
//!
//! # Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use media_grab::{Config, DirectoryDelivery, Orchestrator, SessionTokenCache, YtDlpEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let orchestrator = Arc::new(Orchestrator::from_config(
//!         &config,
//!         Arc::new(YtDlpEngine::from_config(&config)),
//!         Arc::new(DirectoryDelivery::new(PathBuf::from("downloads"))),
//!         Arc::new(SessionTokenCache::new()),
//!     )?);
//!
//!     let mut events = orchestrator.submit("https://youtu.be/dQw4w9WgXcQ");
//!     while let Some(event) = events.next().await {
//!         println!("{:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{AggregationClient, ResolvedItem, SessionTokenCache};
pub use config::{BudgetMode, Config, SizeBudget};
pub use download::{
    Delivered, Delivery, DeliveryOutcome, DirectoryDelivery, EventSink, Orchestrator,
    OutcomeClass, StatusEvent,
};
pub use error::{Error, Result};
pub use extract::{ExtractionClient, ExtractionEngine, YtDlpEngine};
pub use media::{DownloadRequest, Provider, ProviderRouter};
