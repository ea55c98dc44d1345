//! Download module.
//!
//! This module provides:
//! - The orchestrator that drives a request end to end
//! - Status events reported while a request runs
//! - Delivery outcomes and run totals
//! - The delivery boundary

pub mod delivery;
pub mod events;
pub mod orchestrator;
pub mod outcome;

pub use delivery::{Delivery, DirectoryDelivery};
pub use events::{format_megabytes, Delivered, EventSink, StatusEvent};
pub use orchestrator::Orchestrator;
pub use outcome::{DeliveryOutcome, OutcomeClass, RunTotals};
