//! Delivery outcome tracking.

use crate::error::{exit_codes, Result};

/// User-facing class of a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    /// Everything was delivered.
    Delivered,
    /// Some picker items were delivered, some failed.
    PartiallyDelivered,
    /// The file exceeded the budget and a direct link was offered instead.
    DirectLink,
    /// Nothing was delivered.
    Failed,
}

/// Summary of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub delivered: usize,
    pub failed: usize,
    pub class: OutcomeClass,
}

impl DeliveryOutcome {
    pub fn delivered(count: usize) -> Self {
        Self {
            delivered: count,
            failed: 0,
            class: OutcomeClass::Delivered,
        }
    }

    pub fn failed() -> Self {
        Self {
            delivered: 0,
            failed: 1,
            class: OutcomeClass::Failed,
        }
    }

    pub fn direct_link() -> Self {
        Self {
            delivered: 0,
            failed: 0,
            class: OutcomeClass::DirectLink,
        }
    }

    /// Aggregate per-item results of a fan-out.
    pub fn from_results<T>(results: &[Result<T>]) -> Self {
        let delivered = results.iter().filter(|r| r.is_ok()).count();
        let failed = results.len() - delivered;

        let class = match (delivered, failed) {
            (0, _) => OutcomeClass::Failed,
            (_, 0) => OutcomeClass::Delivered,
            _ => OutcomeClass::PartiallyDelivered,
        };

        Self {
            delivered,
            failed,
            class,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.class, OutcomeClass::Delivered | OutcomeClass::DirectLink)
    }
}

/// Totals across every request of a run.
#[derive(Debug, Default)]
pub struct RunTotals {
    pub requests_processed: u64,
    pub requests_failed: u64,
    pub requests_partial: u64,
    pub files_delivered: u64,
    pub links_offered: u64,
    pub items_failed: u64,
}

impl RunTotals {
    /// Add one request's outcome.
    pub fn add(&mut self, outcome: &DeliveryOutcome) {
        self.requests_processed += 1;
        self.files_delivered += outcome.delivered as u64;
        self.items_failed += outcome.failed as u64;

        match outcome.class {
            OutcomeClass::Failed => self.requests_failed += 1,
            OutcomeClass::PartiallyDelivered => self.requests_partial += 1,
            OutcomeClass::DirectLink => self.links_offered += 1,
            OutcomeClass::Delivered => {}
        }
    }

    /// Process exit code for the run.
    pub fn exit_code(&self) -> i32 {
        if self.requests_failed == self.requests_processed && self.requests_processed > 0 {
            exit_codes::DOWNLOAD_ERROR
        } else if self.requests_failed > 0 || self.requests_partial > 0 {
            exit_codes::SOME_ITEMS_FAILED
        } else {
            exit_codes::SUCCESS
        }
    }
}
