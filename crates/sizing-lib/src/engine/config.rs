//! Sizing configuration
//!
//! `SizingConfig` is an immutable value passed into every calculation.
//! User edits arrive as `SizingConfigOverrides` and produce a new value.

use crate::error::SizingError;
use crate::weights::MethodWeights;
use serde::{Deserialize, Serialize};

/// Default ceiling on per-collector load
pub const DEFAULT_MAX_LOAD_PERCENT: f64 = 85.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    pub method_weights: MethodWeights,
    /// Per-collector load ceiling, in (0, 100]
    pub max_load_percent: f64,
    /// Add an N+1 redundant collector to the polling topology
    pub enable_polling_failover: bool,
    /// Add an N+1 redundant collector to the logs topology
    pub enable_logs_failover: bool,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            method_weights: MethodWeights::default(),
            max_load_percent: DEFAULT_MAX_LOAD_PERCENT,
            enable_polling_failover: false,
            enable_logs_failover: false,
        }
    }
}

impl SizingConfig {
    pub fn with_max_load_percent(mut self, max_load_percent: f64) -> Self {
        self.max_load_percent = max_load_percent;
        self
    }

    pub fn with_method_weights(mut self, method_weights: MethodWeights) -> Self {
        self.method_weights = method_weights;
        self
    }

    pub fn with_failover(mut self, polling: bool, logs: bool) -> Self {
        self.enable_polling_failover = polling;
        self.enable_logs_failover = logs;
        self
    }

    /// Reject values the engine cannot compute with
    pub fn validate(&self) -> Result<(), SizingError> {
        validate_max_load(self.max_load_percent)?;
        self.method_weights.validate()
    }

    /// Produce a new config with `overrides` laid on top
    pub fn apply(&self, overrides: &SizingConfigOverrides) -> SizingConfig {
        SizingConfig {
            method_weights: match &overrides.method_weights {
                Some(weights) => self.method_weights.merged(weights),
                None => self.method_weights.clone(),
            },
            max_load_percent: overrides.max_load_percent.unwrap_or(self.max_load_percent),
            enable_polling_failover: overrides
                .enable_polling_failover
                .unwrap_or(self.enable_polling_failover),
            enable_logs_failover: overrides
                .enable_logs_failover
                .unwrap_or(self.enable_logs_failover),
        }
    }
}

pub(crate) fn validate_max_load(max_load_percent: f64) -> Result<(), SizingError> {
    if max_load_percent.is_finite() && max_load_percent > 0.0 && max_load_percent <= 100.0 {
        Ok(())
    } else {
        Err(SizingError::InvalidMaxLoad {
            value: max_load_percent,
        })
    }
}

/// Partial configuration supplied by a user or request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_weights: Option<MethodWeights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_load_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_polling_failover: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_logs_failover: Option<bool>,
}

impl SizingConfigOverrides {
    /// Combine two override layers; values set in `upper` win
    pub fn layered(self, upper: SizingConfigOverrides) -> SizingConfigOverrides {
        let method_weights = match (self.method_weights, upper.method_weights) {
            (Some(lower), Some(upper)) => Some(lower.merged(&upper)),
            (lower, upper) => upper.or(lower),
        };
        SizingConfigOverrides {
            method_weights,
            max_load_percent: upper.max_load_percent.or(self.max_load_percent),
            enable_polling_failover: upper
                .enable_polling_failover
                .or(self.enable_polling_failover),
            enable_logs_failover: upper.enable_logs_failover.or(self.enable_logs_failover),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::CollectionMethod;

    #[test]
    fn test_defaults() {
        let config = SizingConfig::default();
        assert_eq!(config.max_load_percent, 85.0);
        assert!(!config.enable_polling_failover);
        assert!(!config.enable_logs_failover);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_load_bounds() {
        for bad in [0.0, -5.0, 100.5, f64::NAN, f64::INFINITY] {
            let config = SizingConfig::default().with_max_load_percent(bad);
            assert!(
                matches!(config.validate(), Err(SizingError::InvalidMaxLoad { .. })),
                "{bad} should be rejected"
            );
        }
        assert!(SizingConfig::default().with_max_load_percent(100.0).validate().is_ok());
        assert!(SizingConfig::default().with_max_load_percent(0.5).validate().is_ok());
    }

    #[test]
    fn test_apply_leaves_base_untouched() {
        let base = SizingConfig::default();
        let overrides = SizingConfigOverrides {
            method_weights: Some(MethodWeights::empty().with(CollectionMethod::Script, 3.0)),
            max_load_percent: Some(70.0),
            enable_polling_failover: Some(true),
            enable_logs_failover: None,
        };

        let applied = base.apply(&overrides);

        assert_eq!(applied.max_load_percent, 70.0);
        assert!(applied.enable_polling_failover);
        assert!(!applied.enable_logs_failover);
        assert_eq!(applied.method_weights.get(CollectionMethod::Script), Some(3.0));
        assert_eq!(applied.method_weights.get(CollectionMethod::Wmi), Some(2.0));
        assert_eq!(base, SizingConfig::default());
    }

    #[test]
    fn test_layered_upper_wins() {
        let lower = SizingConfigOverrides {
            method_weights: Some(
                MethodWeights::empty()
                    .with(CollectionMethod::Script, 3.0)
                    .with(CollectionMethod::Wmi, 2.5),
            ),
            max_load_percent: Some(70.0),
            enable_polling_failover: Some(true),
            enable_logs_failover: None,
        };
        let upper = SizingConfigOverrides {
            method_weights: Some(MethodWeights::empty().with(CollectionMethod::Script, 4.0)),
            max_load_percent: Some(60.0),
            ..Default::default()
        };

        let layered = lower.layered(upper);
        let weights = layered.method_weights.unwrap();

        assert_eq!(layered.max_load_percent, Some(60.0));
        assert_eq!(layered.enable_polling_failover, Some(true));
        assert_eq!(weights.get(CollectionMethod::Script), Some(4.0));
        assert_eq!(weights.get(CollectionMethod::Wmi), Some(2.5));
    }

    #[test]
    fn test_overrides_deserialize_partial() {
        let overrides: SizingConfigOverrides =
            serde_json::from_str(r#"{"max_load_percent": 80, "method_weights": {"script": 4}}"#)
                .unwrap();
        assert_eq!(overrides.max_load_percent, Some(80.0));
        assert_eq!(overrides.enable_logs_failover, None);
        assert_eq!(
            overrides.method_weights.unwrap().get(CollectionMethod::Script),
            Some(4.0)
        );
    }
}
