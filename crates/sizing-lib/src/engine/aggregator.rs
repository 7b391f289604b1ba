//! Score aggregation
//!
//! Reduces a site's inventory to a single polling weight and a single
//! events-per-second figure.

use crate::error::SizingError;
use crate::models::{DeviceTypeProfile, LogVolumes};
use crate::weights::MethodWeights;
use std::collections::BTreeMap;

/// Weighted polling load of one device of this profile
///
/// `instance_count × Σ(fraction × weight)` over the profile's methods.
pub fn method_score(
    profile: &DeviceTypeProfile,
    weights: &MethodWeights,
) -> Result<f64, SizingError> {
    let mut per_instance = 0.0;
    for (method, fraction) in &profile.collection_methods {
        let weight = weights
            .get(*method)
            .ok_or_else(|| SizingError::UnknownMethod {
                device: profile.name.clone(),
                method: *method,
            })?;
        per_instance += fraction * weight;
    }
    Ok(profile.instance_count as f64 * per_instance)
}

/// Total polling weight of a device inventory
///
/// Profiles with `count == 0` contribute nothing and are skipped.
pub fn compute_weighted_load(
    devices: &BTreeMap<String, DeviceTypeProfile>,
    weights: &MethodWeights,
) -> Result<f64, SizingError> {
    let mut total = 0.0;
    for profile in devices.values().filter(|p| p.count > 0) {
        total += method_score(profile, weights)? * profile.count as f64;
    }
    Ok(total)
}

/// Total streaming ingestion load; a plain sum with no weighting
pub fn compute_total_events_per_second(log_volumes: &LogVolumes) -> f64 {
    log_volumes.netflow + log_volumes.syslog + log_volumes.traps
}
