//! Observability infrastructure for the sizing service
//!
//! Provides:
//! - Prometheus metrics (request counts, calculation latency, recommended collectors)
//! - Structured logging of sizing events with tracing

use crate::error::SizingError;
use crate::models::DeploymentSizing;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge_vec,
    Histogram, IntCounter, IntCounterVec, IntGaugeVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for calculation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.000_01, 0.000_05, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<SizingMetricsInner> = OnceLock::new();

struct SizingMetricsInner {
    sizing_requests: IntCounter,
    sizing_rejections: IntCounterVec,
    calculation_latency_seconds: Histogram,
    sites_sized: IntCounter,
    recommended_collectors: IntGaugeVec,
}

impl SizingMetricsInner {
    fn new() -> Self {
        Self {
            sizing_requests: register_int_counter!(
                "lmda_sizing_requests_total",
                "Total number of sizing calculations requested"
            )
            .expect("Failed to register sizing_requests_total"),

            sizing_rejections: register_int_counter_vec!(
                "lmda_sizing_rejections_total",
                "Sizing calculations rejected because of invalid input",
                &["code"]
            )
            .expect("Failed to register sizing_rejections_total"),

            calculation_latency_seconds: register_histogram!(
                "lmda_sizing_calculation_latency_seconds",
                "Time spent computing a deployment sizing",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register calculation_latency_seconds"),

            sites_sized: register_int_counter!(
                "lmda_sites_sized_total",
                "Total number of sites sized"
            )
            .expect("Failed to register sites_sized_total"),

            recommended_collectors: register_int_gauge_vec!(
                "lmda_recommended_collectors",
                "Collectors recommended by the most recent calculation",
                &["workload", "role"]
            )
            .expect("Failed to register recommended_collectors"),
        }
    }
}

/// Sizing metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct SizingMetrics {
    _private: (),
}

impl Default for SizingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SizingMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SizingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SizingMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn inc_sizing_requests(&self) {
        self.inner().sizing_requests.inc();
    }

    pub fn inc_rejections(&self, error: &SizingError) {
        self.inner()
            .sizing_rejections
            .with_label_values(&[error.code()])
            .inc();
    }

    pub fn observe_calculation_latency(&self, duration_secs: f64) {
        self.inner().calculation_latency_seconds.observe(duration_secs);
    }

    /// Record the outcome of a successful calculation
    pub fn record_sizing(&self, sizing: &DeploymentSizing) {
        let inner = self.inner();
        inner.sites_sized.inc_by(sizing.sites.len() as u64);

        let summary = &sizing.summary;
        for (workload, role, value) in [
            ("polling", "primary", summary.polling_primary),
            ("polling", "redundant", summary.polling_redundant),
            ("logs", "primary", summary.logs_primary),
            ("logs", "redundant", summary.logs_redundant),
        ] {
            inner
                .recommended_collectors
                .with_label_values(&[workload, role])
                .set(i64::try_from(value).unwrap_or(i64::MAX));
        }
    }
}

/// Structured logger for sizing events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a completed deployment sizing
    pub fn log_sizing(&self, sizing: &DeploymentSizing, max_load_percent: f64, elapsed_secs: f64) {
        let summary = &sizing.summary;
        info!(
            event = "sizing_calculated",
            instance = %self.instance,
            sites = summary.site_count,
            max_load_percent = max_load_percent,
            polling_primary = summary.polling_primary,
            polling_redundant = summary.polling_redundant,
            logs_primary = summary.logs_primary,
            logs_redundant = summary.logs_redundant,
            elapsed_secs = elapsed_secs,
            "Deployment sized"
        );
    }

    /// Log a rejected sizing request
    pub fn log_rejection(&self, error: &SizingError) {
        warn!(
            event = "sizing_rejected",
            instance = %self.instance,
            code = error.code(),
            error = %error,
            "Sizing request rejected"
        );
    }

    /// Log which device catalogue is in use
    pub fn log_catalogue(&self, source: &str, device_types: usize) {
        info!(
            event = "catalogue_loaded",
            instance = %self.instance,
            source = %source,
            device_types = device_types,
            "Device catalogue loaded"
        );
    }

    pub fn log_startup(&self, version: &str, port: u16) {
        info!(
            event = "service_started",
            instance = %self.instance,
            version = %version,
            port = port,
            "Sizing service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Sizing service shutting down"
        );
    }
}
