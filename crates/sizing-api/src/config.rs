//! Service configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use sizing_lib::{SizingConfig, SizingConfigOverrides};

/// Service configuration, read from `SIZING_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Name reported in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// HTTP port for the sizing API, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Default per-collector load ceiling when a request does not set one
    #[serde(default = "default_max_load_percent")]
    pub max_load_percent: f64,

    /// Default N+1 redundancy for polling collectors
    #[serde(default)]
    pub polling_failover: bool,

    /// Default N+1 redundancy for log collectors
    #[serde(default)]
    pub logs_failover: bool,

    /// Optional JSON file extending the built-in device catalogue
    #[serde(default)]
    pub catalogue_path: Option<String>,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "sizing-api".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_max_load_percent() -> f64 {
    sizing_lib::engine::DEFAULT_MAX_LOAD_PERCENT
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            max_load_percent: default_max_load_percent(),
            polling_failover: false,
            logs_failover: false,
            catalogue_path: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("SIZING").try_parsing(true))
            .build()
            .context("Failed to read SIZING_* environment")?;

        config
            .try_deserialize()
            .context("Invalid SIZING_* configuration")
    }

    /// Base sizing configuration applied to every request before its own overrides
    pub fn base_sizing_config(&self) -> Result<SizingConfig> {
        let sizing = SizingConfig::default().apply(&SizingConfigOverrides {
            max_load_percent: Some(self.max_load_percent),
            enable_polling_failover: Some(self.polling_failover),
            enable_logs_failover: Some(self.logs_failover),
            ..Default::default()
        });
        sizing
            .validate()
            .context("Invalid default sizing configuration")?;
        Ok(sizing)
    }
}
