//! Local extraction module.
//!
//! This module provides:
//! - The extraction engine boundary and a `yt-dlp` implementation
//! - The quality tier ladder
//! - The extraction client that measures output against the size budget

pub mod client;
pub mod engine;
pub mod tiers;

pub use client::{ExtractionClient, TierOutcome};
pub use engine::{EngineOutput, ExtractionEngine, YtDlpEngine};
pub use tiers::{QualityLadder, QualityTier};
