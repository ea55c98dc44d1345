//! Aggregation API module.
//!
//! This module provides:
//! - HTTP client for resolving URLs and fetching resolved bytes
//! - Session token negotiation and caching
//! - API request and response types

pub mod client;
pub mod session;
pub mod types;

pub use client::AggregationClient;
pub use session::{SessionToken, SessionTokenCache};
pub use types::{ResolveFailure, ResolvedItem, MAX_PICKER_ITEMS};
