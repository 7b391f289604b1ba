//! Collector capacity tiers
//!
//! Each tier carries two independent ceilings: a unitless polling weight and
//! an events-per-second figure for log and flow ingestion.

use crate::error::SizingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named collector size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TierName {
    Xxl,
    Xl,
    Large,
    Medium,
    Small,
}

impl TierName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierName::Xxl => "XXL",
            TierName::Xl => "XL",
            TierName::Large => "LARGE",
            TierName::Medium => "MEDIUM",
            TierName::Small => "SMALL",
        }
    }
}

impl fmt::Display for TierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which load a collector is being sized for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workload {
    /// Device polling, measured in polling weight
    Polling,
    /// Log and flow ingestion, measured in events per second
    Logs,
}

impl Workload {
    pub fn as_str(&self) -> &'static str {
        match self {
            Workload::Polling => "polling",
            Workload::Logs => "logs",
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityTier {
    pub name: TierName,
    pub polling_weight_ceiling: f64,
    pub eps_ceiling: f64,
}

impl CapacityTier {
    pub const fn new(name: TierName, polling_weight_ceiling: f64, eps_ceiling: f64) -> Self {
        Self {
            name,
            polling_weight_ceiling,
            eps_ceiling,
        }
    }

    /// Ceiling that applies to the given workload
    pub fn ceiling(&self, workload: Workload) -> f64 {
        match workload {
            Workload::Polling => self.polling_weight_ceiling,
            Workload::Logs => self.eps_ceiling,
        }
    }

    fn validate(&self) -> Result<(), SizingError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.polling_weight_ceiling) && valid(self.eps_ceiling) {
            Ok(())
        } else {
            Err(SizingError::InvalidCapacityTier { tier: self.name })
        }
    }
}

/// Built-in tier table, in declared (iteration) order
pub const DEFAULT_TIERS: [CapacityTier; 5] = [
    CapacityTier::new(TierName::Xxl, 100_000.0, 40_000.0),
    CapacityTier::new(TierName::Xl, 50_000.0, 25_000.0),
    CapacityTier::new(TierName::Large, 25_000.0, 15_000.0),
    CapacityTier::new(TierName::Medium, 12_500.0, 11_000.0),
    CapacityTier::new(TierName::Small, 6_250.0, 7_800.0),
];

/// Check a tier table is usable by the selector
pub fn validate_tiers(tiers: &[CapacityTier]) -> Result<(), SizingError> {
    if tiers.is_empty() {
        return Err(SizingError::NoCapacityTiers);
    }
    for (i, tier) in tiers.iter().enumerate() {
        tier.validate()?;
        if tiers[..i].iter().any(|other| other.name == tier.name) {
            return Err(SizingError::DuplicateCapacityTier { tier: tier.name });
        }
    }
    Ok(())
}
