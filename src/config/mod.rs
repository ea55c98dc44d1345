//! Configuration module for media-grab.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Deployment modes and the size budget
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AggregationConfig, Config, ExtractionConfig, LimitsConfig, OptionsConfig};
pub use modes::{BudgetMode, SizeBudget};
pub use validation::validate_config;
