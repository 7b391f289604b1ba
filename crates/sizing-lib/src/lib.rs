//! Collector capacity sizing for monitoring-platform deployments
//!
//! This crate provides:
//! - The weight model and device catalogue
//! - The collector capacity tier table
//! - The sizing engine (aggregation, tier selection, topology building)
//! - Site inventory resolution and deployment summaries
//! - Health checks and observability for services embedding the engine

pub mod engine;
pub mod error;
pub mod health;
pub mod inventory;
pub mod models;
pub mod observability;
pub mod report;
pub mod tiers;
pub mod weights;

pub use engine::{calculate_site_collectors, SizingConfig, SizingConfigOverrides, SizingEngine};
pub use error::SizingError;
pub use health::{Component, ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse};
pub use inventory::{DeploymentInput, DeviceInput, SiteInput};
pub use models::*;
pub use observability::{SizingMetrics, StructuredLogger};
pub use report::{DeploymentSummary, TierCount};
pub use tiers::{CapacityTier, TierName, Workload, DEFAULT_TIERS};
pub use weights::{CollectionMethod, DeviceCatalogue, DeviceTemplate, MethodWeights};
