//! Deployment modes and the size budget they imply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MIB: u64 = 1024 * 1024;

/// Deployment mode selecting the maximum deliverable size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetMode {
    /// Hosted delivery limit (50 MiB).
    #[default]
    Cloud,
    /// Self-hosted delivery server limit (2000 MiB).
    Local,
}

impl BudgetMode {
    /// The byte ceiling for this mode.
    pub fn budget(&self) -> SizeBudget {
        match self {
            BudgetMode::Cloud => SizeBudget::new(50 * MIB),
            BudgetMode::Local => SizeBudget::new(2000 * MIB),
        }
    }
}

impl fmt::Display for BudgetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetMode::Cloud => write!(f, "cloud"),
            BudgetMode::Local => write!(f, "local"),
        }
    }
}

impl FromStr for BudgetMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cloud" => Ok(BudgetMode::Cloud),
            "local" => Ok(BudgetMode::Local),
            _ => Err(format!("Unknown budget mode: {}", s)),
        }
    }
}

/// Maximum deliverable size in bytes, fixed for the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBudget(u64);

impl SizeBudget {
    pub const fn new(max_bytes: u64) -> Self {
        Self(max_bytes)
    }

    pub fn max_bytes(&self) -> u64 {
        self.0
    }

    /// Whether `size_bytes` fits within the budget (inclusive).
    pub fn allows(&self, size_bytes: u64) -> bool {
        size_bytes <= self.0
    }
}

impl fmt::Display for SizeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} MB", self.0 as f64 / MIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_per_mode() {
        assert_eq!(BudgetMode::Cloud.budget().max_bytes(), 52_428_800);
        assert_eq!(BudgetMode::Local.budget().max_bytes(), 2_097_152_000);
    }

    #[test]
    fn test_budget_is_inclusive() {
        let budget = SizeBudget::new(100);
        assert!(budget.allows(100));
        assert!(!budget.allows(101));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("CLOUD".parse::<BudgetMode>().unwrap(), BudgetMode::Cloud);
        assert_eq!("local".parse::<BudgetMode>().unwrap(), BudgetMode::Local);
        assert!("huge".parse::<BudgetMode>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(BudgetMode::Cloud.budget().to_string(), "50.0 MB");
    }
}
