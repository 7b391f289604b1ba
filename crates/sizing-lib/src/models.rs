//! Core data models for collector sizing

use crate::report::DeploymentSummary;
use crate::tiers::{TierName, Workload};
use crate::weights::CollectionMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A device type present at a site, fully resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeProfile {
    pub name: String,
    /// Base instances per device (interfaces, volumes, ...)
    pub instance_count: u32,
    /// Fraction of instances collected through each method; need not sum to 1
    pub collection_methods: BTreeMap<CollectionMethod, f64>,
    /// Number of devices of this type at the site
    pub count: u32,
}

/// Streaming ingestion volumes for a site, in events per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogVolumes {
    pub netflow: f64,
    pub syslog: f64,
    pub traps: f64,
}

impl LogVolumes {
    pub fn fields(&self) -> [(&'static str, f64); 3] {
        [
            ("netflow", self.netflow),
            ("syslog", self.syslog),
            ("traps", self.traps),
        ]
    }
}

/// One independently sized location of a deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub devices: BTreeMap<String, DeviceTypeProfile>,
    #[serde(default)]
    pub log_volumes: LogVolumes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectorRole {
    Primary,
    Redundant,
}

/// A single recommended collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorPlacement {
    pub tier: TierName,
    pub role: CollectorRole,
    /// Expected load under normal operation; always 0 for redundant units
    pub load_percent: u32,
}

/// Sizing outcome for one workload of one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSizing {
    pub workload: Workload,
    pub tier: TierName,
    /// Primary collectors needed, excluding any redundant unit
    pub collector_count: u32,
    pub demand: f64,
    pub ceiling: f64,
    pub placements: Vec<CollectorPlacement>,
}

impl WorkloadSizing {
    pub fn redundant_count(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| p.role == CollectorRole::Redundant)
            .count()
    }
}

/// Sizing outcome for one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSizing {
    pub site: String,
    pub polling_weight: f64,
    pub events_per_second: f64,
    pub polling: WorkloadSizing,
    pub logs: WorkloadSizing,
}

/// Sizing outcome for a whole deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSizing {
    pub sites: Vec<SiteSizing>,
    pub summary: DeploymentSummary,
    pub generated_at: i64,
}
