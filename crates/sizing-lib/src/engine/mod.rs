//! Collector capacity sizing engine
//!
//! A pure, synchronous computation: the same sites and configuration always
//! produce the same recommendation. Every input is validated before any
//! arithmetic so a call either completes fully or fails without output.

mod aggregator;
mod config;
mod selector;
mod topology;


pub use aggregator::{compute_total_events_per_second, compute_weighted_load, method_score};
pub use config::{SizingConfig, SizingConfigOverrides, DEFAULT_MAX_LOAD_PERCENT};
pub use selector::{collectors_needed, select_tier, TierSelection, MAX_COLLECTORS_PER_WORKLOAD};
pub use topology::{build_topology, load_percent};

use crate::error::SizingError;
use crate::models::{DeploymentSizing, Site, SiteSizing, WorkloadSizing};
use crate::report::DeploymentSummary;
use crate::tiers::{validate_tiers, CapacityTier, Workload, DEFAULT_TIERS};
use crate::weights::MethodWeights;
use tracing::debug;

/// Sizing engine bound to a capacity tier table
#[derive(Debug, Clone)]
pub struct SizingEngine {
    tiers: Vec<CapacityTier>,
}

impl SizingEngine {
    /// Engine using the built-in tier table
    pub fn new() -> Self {
        Self {
            tiers: DEFAULT_TIERS.to_vec(),
        }
    }

    /// Engine using a custom tier table, scanned in the given order
    pub fn with_tiers(tiers: Vec<CapacityTier>) -> Result<Self, SizingError> {
        validate_tiers(&tiers)?;
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[CapacityTier] {
        &self.tiers
    }

    /// Size the polling and logs workloads of one site
    pub fn size_site(&self, site: &Site, config: &SizingConfig) -> Result<SiteSizing, SizingError> {
        config.validate()?;
        validate_site(site, &config.method_weights)?;
        self.size_validated_site(site, config)
    }

    /// Size every site of a deployment independently, in input order
    pub fn size_deployment(
        &self,
        sites: &[Site],
        config: &SizingConfig,
    ) -> Result<DeploymentSizing, SizingError> {
        config.validate()?;
        for site in sites {
            validate_site(site, &config.method_weights)?;
        }

        let sites = sites
            .iter()
            .map(|site| self.size_validated_site(site, config))
            .collect::<Result<Vec<_>, _>>()?;
        let summary = DeploymentSummary::from_sites(&sites, &self.tiers);

        Ok(DeploymentSizing {
            sites,
            summary,
            generated_at: chrono::Utc::now().timestamp(),
        })
    }

    fn size_validated_site(
        &self,
        site: &Site,
        config: &SizingConfig,
    ) -> Result<SiteSizing, SizingError> {
        let polling_weight = compute_weighted_load(&site.devices, &config.method_weights)?;
        let events_per_second = compute_total_events_per_second(&site.log_volumes);

        let polling = self.size_workload(
            Workload::Polling,
            polling_weight,
            config.max_load_percent,
            config.enable_polling_failover,
        )?;
        let logs = self.size_workload(
            Workload::Logs,
            events_per_second,
            config.max_load_percent,
            config.enable_logs_failover,
        )?;

        debug!(
            site = %site.name,
            polling_weight,
            events_per_second,
            polling_tier = %polling.tier,
            polling_collectors = polling.collector_count,
            logs_tier = %logs.tier,
            logs_collectors = logs.collector_count,
            "Sized site"
        );

        Ok(SiteSizing {
            site: site.name.clone(),
            polling_weight,
            events_per_second,
            polling,
            logs,
        })
    }

    fn size_workload(
        &self,
        workload: Workload,
        demand: f64,
        max_load_percent: f64,
        enable_failover: bool,
    ) -> Result<WorkloadSizing, SizingError> {
        let selection = select_tier(demand, workload, &self.tiers, max_load_percent)?;
        let ceiling = selection.ceiling(workload);
        let placements = build_topology(
            selection.tier.name,
            selection.collector_count,
            demand,
            ceiling,
            enable_failover,
        );

        Ok(WorkloadSizing {
            workload,
            tier: selection.tier.name,
            collector_count: selection.collector_count,
            demand,
            ceiling,
            placements,
        })
    }
}

impl Default for SizingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Size one site against the built-in tier table
pub fn calculate_site_collectors(
    site: &Site,
    config: &SizingConfig,
) -> Result<SiteSizing, SizingError> {
    SizingEngine::new().size_site(site, config)
}

/// Check a site can be sized with the given weights
///
/// Every profile is checked, including those with zero devices.
pub fn validate_site(site: &Site, weights: &MethodWeights) -> Result<(), SizingError> {
    if site.name.trim().is_empty() {
        return Err(SizingError::InvalidSite {
            reason: "site name must not be empty".to_string(),
        });
    }

    for profile in site.devices.values() {
        for (method, fraction) in &profile.collection_methods {
            if weights.get(*method).is_none() {
                return Err(SizingError::UnknownMethod {
                    device: profile.name.clone(),
                    method: *method,
                });
            }
            if !fraction.is_finite() || *fraction < 0.0 {
                return Err(SizingError::InvalidMethodFraction {
                    device: profile.name.clone(),
                    method: *method,
                    value: *fraction,
                });
            }
        }
    }

    for (source_name, value) in site.log_volumes.fields() {
        if !value.is_finite() || value < 0.0 {
            return Err(SizingError::InvalidLogVolume {
                site: site.name.clone(),
                source_name,
                value,
            });
        }
    }

    Ok(())
}
