//! Tier selection
//!
//! Scans the tier table in declared order and keeps the tier needing the
//! fewest collectors. The comparison is `<=`, so on equal counts the tier
//! seen last wins: with the default table that is the smallest tier able to
//! carry the load with the minimum collector count.
//!
//! A tier needing more than [`MAX_COLLECTORS_PER_WORKLOAD`] collectors is not
//! a candidate.

use super::config::validate_max_load;
use crate::error::SizingError;
use crate::tiers::{CapacityTier, Workload};

/// Upper bound on the primary collectors recommended for one workload of a site
pub const MAX_COLLECTORS_PER_WORKLOAD: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSelection {
    pub tier: CapacityTier,
    pub collector_count: u32,
}

impl TierSelection {
    pub fn ceiling(&self, workload: Workload) -> f64 {
        self.tier.ceiling(workload)
    }
}

/// Collectors of `tier` needed so none exceeds `max_load_percent`
///
/// `None` when the count is not finite or exceeds
/// [`MAX_COLLECTORS_PER_WORKLOAD`].
pub fn collectors_needed(
    total_demand: f64,
    tier: &CapacityTier,
    workload: Workload,
    max_load_percent: f64,
) -> Option<u32> {
    let usable = tier.ceiling(workload) * (max_load_percent / 100.0);
    let needed = (total_demand / usable).ceil();
    if !needed.is_finite() || needed > f64::from(MAX_COLLECTORS_PER_WORKLOAD) {
        return None;
    }
    Some(needed.max(0.0) as u32)
}

/// Pick the tier and collector count for `total_demand`
pub fn select_tier(
    total_demand: f64,
    workload: Workload,
    tiers: &[CapacityTier],
    max_load_percent: f64,
) -> Result<TierSelection, SizingError> {
    validate_max_load(max_load_percent)?;
    if tiers.is_empty() {
        return Err(SizingError::NoCapacityTiers);
    }
    let too_large = SizingError::DemandTooLarge {
        workload,
        demand: total_demand,
        max_collectors: MAX_COLLECTORS_PER_WORKLOAD,
    };
    if !total_demand.is_finite() {
        return Err(too_large);
    }

    let mut best: Option<TierSelection> = None;
    for tier in tiers {
        let Some(needed) = collectors_needed(total_demand, tier, workload, max_load_percent) else {
            continue;
        };
        if best.map_or(true, |b| needed <= b.collector_count) {
            best = Some(TierSelection {
                tier: *tier,
                collector_count: needed,
            });
        }
    }

    best.ok_or(too_large)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiers::{TierName, DEFAULT_TIERS};

    #[test]
    fn test_linux_servers_example() {
        let selection = select_tier(22_500.0, Workload::Polling, &DEFAULT_TIERS, 85.0).unwrap();
        // XXL and XL both need one collector; XL is later in declared order
        assert_eq!(selection.tier.name, TierName::Xl);
        assert_eq!(selection.collector_count, 1);

        let medium = DEFAULT_TIERS[3];
        assert_eq!(collectors_needed(22_500.0, &medium, Workload::Polling, 85.0), Some(3));
    }

    #[test]
    fn test_log_side_example() {
        let selection = select_tier(1_500.0, Workload::Logs, &DEFAULT_TIERS, 85.0).unwrap();
        assert_eq!(selection.tier.name, TierName::Small);
        assert_eq!(selection.collector_count, 1);
    }

    #[test]
    fn test_zero_demand_picks_last_tier_with_zero_collectors() {
        let selection = select_tier(0.0, Workload::Polling, &DEFAULT_TIERS, 85.0).unwrap();
        assert_eq!(selection.tier.name, TierName::Small);
        assert_eq!(selection.collector_count, 0);
    }

    #[test]
    fn test_tie_prefers_later_tier() {
        // Two tiers with identical polling ceilings always tie
        let tiers = [
            CapacityTier::new(TierName::Large, 10_000.0, 100.0),
            CapacityTier::new(TierName::Medium, 10_000.0, 200.0),
        ];
        let selection = select_tier(25_000.0, Workload::Polling, &tiers, 100.0).unwrap();
        assert_eq!(selection.tier.name, TierName::Medium);
        assert_eq!(selection.collector_count, 3);

        // Reversing the declaration order flips the winner
        let reversed = [tiers[1], tiers[0]];
        let selection = select_tier(25_000.0, Workload::Polling, &reversed, 100.0).unwrap();
        assert_eq!(selection.tier.name, TierName::Large);
    }

    #[test]
    fn test_tie_between_adjacent_default_tiers() {
        // 8,000 fits one LARGE (21,250) and one MEDIUM (10,625) but needs two SMALL
        let selection = select_tier(8_000.0, Workload::Polling, &DEFAULT_TIERS, 85.0).unwrap();
        assert_eq!(selection.tier.name, TierName::Medium);
        assert_eq!(selection.collector_count, 1);
    }

    #[test]
    fn test_not_sorted_by_capacity() {
        // Declared order is honored even when it is not by capacity
        let tiers = [
            CapacityTier::new(TierName::Small, 1_000.0, 1_000.0),
            CapacityTier::new(TierName::Xxl, 100_000.0, 100_000.0),
        ];
        let selection = select_tier(500.0, Workload::Logs, &tiers, 100.0).unwrap();
        assert_eq!(selection.tier.name, TierName::Xxl);
        assert_eq!(selection.collector_count, 1);
    }

    #[test]
    fn test_load_ceiling_respected() {
        for demand in [1.0, 999.0, 10_625.0, 22_500.0, 123_456.0, 1_000_000.0] {
            for workload in [Workload::Polling, Workload::Logs] {
                let selection = select_tier(demand, workload, &DEFAULT_TIERS, 85.0).unwrap();
                let per_collector = demand / selection.collector_count as f64;
                let allowed = selection.ceiling(workload) * 0.85;
                assert!(
                    per_collector <= allowed + 1e-6,
                    "{demand} {workload}: {per_collector} > {allowed}"
                );

                let again = select_tier(demand, workload, &DEFAULT_TIERS, 85.0).unwrap();
                assert_eq!(selection, again);
            }
        }
    }

    #[test]
    fn test_rejects_zero_max_load() {
        assert_eq!(
            select_tier(100.0, Workload::Polling, &DEFAULT_TIERS, 0.0),
            Err(SizingError::InvalidMaxLoad { value: 0.0 })
        );
    }

    #[test]
    fn test_infinite_demand_rejected() {
        let err = select_tier(f64::INFINITY, Workload::Logs, &DEFAULT_TIERS, 85.0).unwrap_err();
        assert_eq!(
            err,
            SizingError::DemandTooLarge {
                workload: Workload::Logs,
                demand: f64::INFINITY,
                max_collectors: MAX_COLLECTORS_PER_WORKLOAD,
            }
        );
    }

    #[test]
    fn test_collector_cap() {
        let small = DEFAULT_TIERS[4];
        // SMALL carries 6,250 polling weight, so 100% load fits exactly the cap
        let at_cap = 6_250.0 * f64::from(MAX_COLLECTORS_PER_WORKLOAD);
        assert_eq!(
            collectors_needed(at_cap, &small, Workload::Polling, 100.0),
            Some(MAX_COLLECTORS_PER_WORKLOAD)
        );
        assert_eq!(collectors_needed(at_cap + 1.0, &small, Workload::Polling, 100.0), None);

        // Over the cap on SMALL, but within it on XXL
        let selection = select_tier(at_cap + 1.0, Workload::Polling, &DEFAULT_TIERS, 100.0).unwrap();
        assert_eq!(selection.tier.name, TierName::Xxl);
        assert_eq!(selection.collector_count, 626);

        let beyond_xxl = 100_000.0 * f64::from(MAX_COLLECTORS_PER_WORKLOAD) + 1.0;
        assert!(matches!(
            select_tier(beyond_xxl, Workload::Polling, &DEFAULT_TIERS, 100.0),
            Err(SizingError::DemandTooLarge { workload: Workload::Polling, .. })
        ));
    }

    #[test]
    fn test_empty_tier_table() {
        assert_eq!(
            select_tier(100.0, Workload::Polling, &[], 85.0),
            Err(SizingError::NoCapacityTiers)
        );
    }
}
