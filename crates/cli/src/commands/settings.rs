//! User configuration commands

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use crate::config::Config;
use crate::output::{format_flag, print_json, print_success, render_table, OutputFormat};
use sizing_lib::SizingConfig;

/// Effective settings as shown by `config show`
#[derive(Serialize)]
struct EffectiveSettings<'a> {
    path: String,
    api_url: &'a str,
    #[serde(flatten)]
    sizing: SizingConfig,
}

#[derive(Tabled)]
struct WeightRow {
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Weight")]
    weight: f64,
}

/// Print the effective settings and where they were loaded from
pub fn show(config: &Config, path: &Path, api_url: &str, format: OutputFormat) -> Result<()> {
    let settings = EffectiveSettings {
        path: path.display().to_string(),
        api_url,
        sizing: config.effective_sizing(),
    };

    match format {
        OutputFormat::Json => print_json(&settings)?,
        OutputFormat::Table => {
            println!("Config file:       {}", settings.path.dimmed());
            println!("API URL:           {}", settings.api_url.cyan());
            println!("Max load:          {}%", settings.sizing.max_load_percent);
            println!(
                "Polling failover:  {}",
                format_flag(settings.sizing.enable_polling_failover)
            );
            println!(
                "Logs failover:     {}",
                format_flag(settings.sizing.enable_logs_failover)
            );
            println!();
            let rows: Vec<WeightRow> = settings
                .sizing
                .method_weights
                .iter()
                .map(|(method, weight)| WeightRow {
                    method: method.to_string(),
                    weight,
                })
                .collect();
            println!("{}", render_table(rows));
        }
    }

    Ok(())
}

/// Validate and persist a single key
pub fn set(mut config: Config, path: &Path, key: &str, value: &str) -> Result<()> {
    config.set(key, value)?;
    config.save(path)?;
    print_success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// Drop every stored setting
pub fn reset(path: &Path) -> Result<()> {
    Config::default().save(path)?;
    print_success(&format!("Configuration reset ({})", path.display()));
    Ok(())
}
