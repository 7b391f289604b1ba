//! Errors raised by the sizing engine
//!
//! Every variant is a configuration or input problem detected before any
//! computation starts. The engine never returns partial results.

use crate::tiers::{TierName, Workload};
use crate::weights::CollectionMethod;
use thiserror::Error;

/// Configuration or input error rejected by the sizing engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    /// Maximum load must be a percentage in (0, 100]
    #[error("max load percent must be in (0, 100], got {value}")]
    InvalidMaxLoad { value: f64 },

    /// A device profile references a method absent from the weight table
    #[error("device type '{device}' uses collection method '{method}' which has no weight")]
    UnknownMethod {
        device: String,
        method: CollectionMethod,
    },

    #[error("weight for collection method '{method}' must be a positive number, got {value}")]
    InvalidMethodWeight {
        method: CollectionMethod,
        value: f64,
    },

    #[error("fraction for '{method}' on device type '{device}' must be a non-negative number, got {value}")]
    InvalidMethodFraction {
        device: String,
        method: CollectionMethod,
        value: f64,
    },

    #[error("{source_name} volume on site '{site}' must be a non-negative number, got {value}")]
    InvalidLogVolume {
        site: String,
        source_name: &'static str,
        value: f64,
    },

    /// Device name not in the catalogue and not fully described inline
    #[error("unknown device type '{name}' on site '{site}': provide both 'instances' and 'methods' for custom device types")]
    UnknownDeviceType { site: String, name: String },

    #[error("invalid site: {reason}")]
    InvalidSite { reason: String },

    #[error("capacity tier table is empty")]
    NoCapacityTiers,

    #[error("capacity tier {tier} must have positive ceilings")]
    InvalidCapacityTier { tier: TierName },

    #[error("capacity tier {tier} is declared more than once")]
    DuplicateCapacityTier { tier: TierName },

    /// Demand is not finite, or no tier carries it within the collector cap
    #[error("{workload} demand of {demand} needs more than {max_collectors} collectors on every tier")]
    DemandTooLarge {
        workload: Workload,
        demand: f64,
        max_collectors: u32,
    },
}

impl SizingError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            SizingError::InvalidMaxLoad { .. } => "invalid_max_load",
            SizingError::UnknownMethod { .. } => "unknown_method",
            SizingError::InvalidMethodWeight { .. } => "invalid_method_weight",
            SizingError::InvalidMethodFraction { .. } => "invalid_method_fraction",
            SizingError::InvalidLogVolume { .. } => "invalid_log_volume",
            SizingError::UnknownDeviceType { .. } => "unknown_device_type",
            SizingError::InvalidSite { .. } => "invalid_site",
            SizingError::NoCapacityTiers => "no_capacity_tiers",
            SizingError::InvalidCapacityTier { .. } => "invalid_capacity_tier",
            SizingError::DuplicateCapacityTier { .. } => "duplicate_capacity_tier",
            SizingError::DemandTooLarge { .. } => "demand_too_large",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = SizingError::UnknownMethod {
            device: "Linux Servers".to_string(),
            method: CollectionMethod::Script,
        };
        let msg = err.to_string();
        assert!(msg.contains("Linux Servers"));
        assert!(msg.contains("script"));
        assert_eq!(err.code(), "unknown_method");
    }

    #[test]
    fn test_max_load_error_code() {
        let err = SizingError::InvalidMaxLoad { value: 0.0 };
        assert_eq!(err.code(), "invalid_max_load");
        assert!(err.to_string().contains("(0, 100]"));
    }

    #[test]
    fn test_demand_too_large_message() {
        let err = SizingError::DemandTooLarge {
            workload: Workload::Logs,
            demand: f64::INFINITY,
            max_collectors: 10_000,
        };
        assert_eq!(err.code(), "demand_too_large");
        assert_eq!(
            err.to_string(),
            "logs demand of inf needs more than 10000 collectors on every tier"
        );
    }
}
