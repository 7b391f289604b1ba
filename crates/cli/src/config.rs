//! Configuration management for the CLI
//!
//! The user configuration is a JSON file holding default sizing settings and
//! the API endpoint. It sits below a deployment file's own `config` block and
//! command-line flags in precedence.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sizing_lib::{CollectionMethod, MethodWeights, SizingConfig, SizingConfigOverrides};
use std::path::{Path, PathBuf};

/// Default API endpoint when neither flag, env nor config sets one
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Sizing API endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_load_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_failover: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_failover: Option<bool>,
    /// Per-method weight overrides, merged over the built-in table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_weights: Option<MethodWeights>,
}

impl Config {
    /// Load configuration from file, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Sizing overrides contributed by this file
    pub fn overrides(&self) -> SizingConfigOverrides {
        SizingConfigOverrides {
            method_weights: self.method_weights.clone(),
            max_load_percent: self.max_load_percent,
            enable_polling_failover: self.polling_failover,
            enable_logs_failover: self.logs_failover,
        }
    }

    /// Sizing configuration this file produces on top of the built-in defaults
    pub fn effective_sizing(&self) -> SizingConfig {
        SizingConfig::default().apply(&self.overrides())
    }

    /// Set a single key; values are validated before they are stored
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                url::Url::parse(value).context("Invalid API URL")?;
                self.api_url = Some(value.to_string());
            }
            "max_load_percent" => {
                let parsed: f64 = value.parse().context("max_load_percent must be a number")?;
                SizingConfig::default()
                    .with_max_load_percent(parsed)
                    .validate()?;
                self.max_load_percent = Some(parsed);
            }
            "polling_failover" => self.polling_failover = Some(parse_flag(value)?),
            "logs_failover" => self.logs_failover = Some(parse_flag(value)?),
            _ => match key.strip_prefix("weight.") {
                Some(method) => {
                    let method: CollectionMethod = method.parse()?;
                    let weight: f64 = value.parse().context("weight must be a number")?;
                    let weights = self
                        .method_weights
                        .clone()
                        .unwrap_or_else(MethodWeights::empty)
                        .with(method, weight);
                    weights.validate()?;
                    self.method_weights = Some(weights);
                }
                None => bail!(
                    "Unknown config key '{}' (expected api_url, max_load_percent, polling_failover, logs_failover or weight.<method>)",
                    key
                ),
            },
        }
        Ok(())
    }

    /// Get the configuration file path
    pub fn path(override_path: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(PathBuf::from(path));
        }

        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("lmda").join("config.json"))
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => bail!("Expected on/off, got '{}'", value),
    }
}
