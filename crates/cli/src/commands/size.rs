//! Deployment sizing command

use anyhow::{Context, Result};
use colored::Colorize;
use sizing_lib::{
    CollectionMethod, DeploymentInput, DeploymentSizing, DeviceCatalogue, MethodWeights,
    SiteSizing, SizingConfig, SizingConfigOverrides, SizingEngine, WorkloadSizing,
};
use std::path::Path;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{
    color_load, format_quantity, print_heading, print_json, print_success, print_warning,
    render_table, OutputFormat,
};

/// Sizing settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct SizeFlags {
    pub max_load: Option<f64>,
    pub weights: Vec<(CollectionMethod, f64)>,
    pub polling_failover: bool,
    pub logs_failover: bool,
}

impl SizeFlags {
    fn overrides(&self) -> SizingConfigOverrides {
        SizingConfigOverrides {
            method_weights: (!self.weights.is_empty())
                .then(|| self.weights.iter().copied().collect::<MethodWeights>()),
            max_load_percent: self.max_load,
            enable_polling_failover: self.polling_failover.then_some(true),
            enable_logs_failover: self.logs_failover.then_some(true),
        }
    }
}

/// Parse a `method=value` weight override
pub fn parse_weight(s: &str) -> Result<(CollectionMethod, f64), String> {
    let (method, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected METHOD=VALUE, got '{}'", s))?;
    let method: CollectionMethod = method.parse().map_err(|e| format!("{}", e))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{}'", value))?;
    Ok((method, value))
}

/// Read a deployment file and fold every configuration layer into it
///
/// Precedence, lowest first: built-in defaults, user config file, the
/// file's own `config` block, command-line flags.
pub fn prepare_input(path: &Path, user_config: &Config, flags: &SizeFlags) -> Result<DeploymentInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read deployment file {}", path.display()))?;
    let mut input: DeploymentInput = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse deployment file {}", path.display()))?;

    input.config = user_config
        .overrides()
        .layered(input.config)
        .layered(flags.overrides());

    Ok(input)
}

/// Size a deployment locally with the built-in catalogue and tier table
pub fn size_locally(input: &DeploymentInput) -> Result<DeploymentSizing> {
    let config = SizingConfig::default().apply(&input.config);
    let sites = input.resolve_sites(&DeviceCatalogue::default())?;
    let sizing = SizingEngine::new().size_deployment(&sites, &config)?;
    Ok(sizing)
}

/// Max load the sizing was computed with
///
/// A remote service lays the request over its own defaults, which may differ
/// from the built-in ones.
pub async fn applied_max_load(input: &DeploymentInput, remote: Option<&ApiClient>) -> Result<f64> {
    let base = match remote {
        Some(client) => client.defaults().await?,
        None => SizingConfig::default(),
    };
    Ok(base.apply(&input.config).max_load_percent)
}

/// Size a deployment file and print the recommendation
pub async fn size_deployment(
    file: &Path,
    user_config: &Config,
    flags: &SizeFlags,
    remote: Option<&ApiClient>,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let input = prepare_input(file, user_config, flags)?;
    if input.sites.is_empty() {
        print_warning("Deployment file contains no sites");
    }

    let sizing = match remote {
        Some(client) => client.size(&input).await?,
        None => size_locally(&input)?,
    };

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&sizing)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        print_success(&format!("Sizing written to {}", path.display()));
    }

    match format {
        OutputFormat::Json => print_json(&sizing)?,
        OutputFormat::Table => {
            let max_load = applied_max_load(&input, remote).await?;
            print_sizing(&sizing, max_load);
        }
    }

    Ok(())
}

/// Row for the per-site workload table
#[derive(Tabled)]
struct WorkloadRow {
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Demand")]
    demand: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Collectors")]
    collectors: u32,
    #[tabled(rename = "N+1")]
    redundant: usize,
    #[tabled(rename = "Load / Collector")]
    load: String,
}

/// Row for the deployment summary table
#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Primary")]
    primary: u64,
    #[tabled(rename = "Redundant")]
    redundant: u64,
}

fn workload_row(sizing: &WorkloadSizing, unit: &str, max_load: f64) -> WorkloadRow {
    let load = sizing
        .placements
        .first()
        .filter(|_| sizing.collector_count > 0)
        .map(|p| color_load(p.load_percent, max_load))
        .unwrap_or_else(|| "-".to_string());

    WorkloadRow {
        workload: sizing.workload.to_string(),
        demand: format!("{} {}", format_quantity(sizing.demand), unit),
        tier: sizing.tier.to_string(),
        collectors: sizing.collector_count,
        redundant: sizing.redundant_count(),
        load,
    }
}

fn print_site(site: &SiteSizing, max_load: f64) {
    println!("{} {}", "Site:".bold(), site.site.cyan());
    let rows = vec![
        workload_row(&site.polling, "weight", max_load),
        workload_row(&site.logs, "EPS", max_load),
    ];
    println!("{}", render_table(rows));
    println!();
}

fn print_sizing(sizing: &DeploymentSizing, max_load: f64) {
    print_heading("Collector Sizing");
    if let Some(generated) = chrono::DateTime::from_timestamp(sizing.generated_at, 0) {
        println!(
            "Generated:              {}",
            generated
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("Max load per collector: {}%", max_load);
    println!();

    for site in &sizing.sites {
        print_site(site, max_load);
    }

    let summary = &sizing.summary;
    if !summary.by_tier.is_empty() {
        println!("{}", "Deployment Summary".bold());
        println!("{}", "-".repeat(60));
        let rows: Vec<TierRow> = summary
            .by_tier
            .iter()
            .map(|row| TierRow {
                workload: row.workload.to_string(),
                tier: row.tier.to_string(),
                primary: row.primary,
                redundant: row.redundant,
            })
            .collect();
        println!("{}", render_table(rows));
    }

    println!(
        "\nTotal: {} collectors across {} sites",
        summary.total_collectors().to_string().green().bold(),
        summary.site_count
    );
}
