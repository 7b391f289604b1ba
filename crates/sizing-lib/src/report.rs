//! Deployment-level summary of per-site sizing results
//!
//! Purely a projection of results already computed site by site; nothing
//! here feeds back into the sizing. Tier names are unique in a validated
//! table, so each site lands in exactly one row per workload.

use crate::models::{CollectorRole, SiteSizing, WorkloadSizing};
use crate::tiers::{CapacityTier, TierName, Workload};
use serde::{Deserialize, Serialize};

/// Collectors of one tier recommended for one workload across all sites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    pub workload: Workload,
    pub tier: TierName,
    pub primary: u64,
    pub redundant: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub site_count: usize,
    pub polling_primary: u64,
    pub polling_redundant: u64,
    pub logs_primary: u64,
    pub logs_redundant: u64,
    /// Non-zero tier counts, polling first, tiers in declared order
    pub by_tier: Vec<TierCount>,
}

impl DeploymentSummary {
    pub fn from_sites(sites: &[SiteSizing], tiers: &[CapacityTier]) -> Self {
        let mut summary = DeploymentSummary {
            site_count: sites.len(),
            ..Default::default()
        };

        for site in sites {
            let (primary, redundant) = role_counts(&site.polling);
            summary.polling_primary += primary;
            summary.polling_redundant += redundant;

            let (primary, redundant) = role_counts(&site.logs);
            summary.logs_primary += primary;
            summary.logs_redundant += redundant;
        }

        for workload in [Workload::Polling, Workload::Logs] {
            for tier in tiers {
                let mut row = TierCount {
                    workload,
                    tier: tier.name,
                    primary: 0,
                    redundant: 0,
                };
                for site in sites {
                    let sizing = match workload {
                        Workload::Polling => &site.polling,
                        Workload::Logs => &site.logs,
                    };
                    if sizing.tier == tier.name {
                        let (primary, redundant) = role_counts(sizing);
                        row.primary += primary;
                        row.redundant += redundant;
                    }
                }
                if row.primary + row.redundant > 0 {
                    summary.by_tier.push(row);
                }
            }
        }

        summary
    }

    pub fn total_collectors(&self) -> u64 {
        self.polling_primary + self.polling_redundant + self.logs_primary + self.logs_redundant
    }
}

fn role_counts(sizing: &WorkloadSizing) -> (u64, u64) {
    sizing
        .placements
        .iter()
        .fold((0, 0), |(primary, redundant), p| match p.role {
            CollectorRole::Primary => (primary + 1, redundant),
            CollectorRole::Redundant => (primary, redundant + 1),
        })
}
