//! Topology building
//!
//! Expands a tier selection into individual collector placements.

use crate::models::{CollectorPlacement, CollectorRole};
use crate::tiers::TierName;

/// Per-collector load, as a whole percentage of `ceiling`
pub fn load_percent(total_demand: f64, collector_count: u32, ceiling: f64) -> u32 {
    if collector_count == 0 {
        return 0;
    }
    (total_demand / collector_count as f64 / ceiling * 100.0).round() as u32
}

/// Build `collector_count` primary placements plus an optional redundant unit
///
/// With zero primaries no load is computed, but the failover flag is still
/// honored.
pub fn build_topology(
    tier: TierName,
    collector_count: u32,
    total_demand: f64,
    ceiling: f64,
    enable_failover: bool,
) -> Vec<CollectorPlacement> {
    let load = load_percent(total_demand, collector_count, ceiling);

    let mut placements: Vec<CollectorPlacement> = (0..collector_count)
        .map(|_| CollectorPlacement {
            tier,
            role: CollectorRole::Primary,
            load_percent: load,
        })
        .collect();

    if enable_failover {
        placements.push(CollectorPlacement {
            tier,
            role: CollectorRole::Redundant,
            load_percent: 0,
        });
    }

    placements
}
