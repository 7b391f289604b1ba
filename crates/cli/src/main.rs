//! LM Deployment Assistant CLI
//!
//! Sizes collector deployments from a JSON inventory, either locally with
//! the built-in engine or against a running sizing service.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{reference, settings, size};
use sizing_lib::CollectionMethod;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// LM Deployment Assistant CLI
#[derive(Parser)]
#[command(name = "lmda")]
#[command(author, version, about = "Collector sizing for LM Deployment Assistant", long_about = None)]
pub struct Cli {
    /// Sizing API endpoint URL (can also be set via LMDA_API_URL env var)
    #[arg(long, env = "LMDA_API_URL")]
    pub api_url: Option<String>,

    /// Path to the user config file (defaults to ~/.config/lmda/config.json)
    #[arg(long, env = "LMDA_CONFIG")]
    pub config: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Size the collectors for a deployment file
    Size {
        /// Deployment JSON file
        file: PathBuf,

        /// Maximum load percent per collector
        #[arg(long)]
        max_load: Option<f64>,

        /// Override a method weight (METHOD=VALUE, repeatable)
        #[arg(long = "weight", value_parser = size::parse_weight)]
        weights: Vec<(CollectionMethod, f64)>,

        /// Add an N+1 collector to every polling recommendation
        #[arg(long)]
        polling_failover: bool,

        /// Add an N+1 collector to every logs recommendation
        #[arg(long)]
        logs_failover: bool,

        /// Size on the sizing service instead of locally
        #[arg(long)]
        remote: bool,

        /// Also write the JSON recommendation to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show the collector capacity tiers
    Tiers {
        /// Fetch the tier table from the sizing service
        #[arg(long)]
        remote: bool,
    },

    /// Show the built-in device catalogue
    Catalogue,

    /// Manage the user configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show,

    /// Set a key (api_url, max_load_percent, polling_failover, logs_failover, weight.<method>)
    Set { key: String, value: String },

    /// Remove every stored setting
    Reset,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = config::Config::path(cli.config.as_deref())?;
    let user_config = config::Config::load(&config_path)?;

    // Flag or env first, then the config file
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| user_config.api_url.clone())
        .unwrap_or_else(|| config::DEFAULT_API_URL.to_string());

    match cli.command {
        Commands::Size {
            file,
            max_load,
            weights,
            polling_failover,
            logs_failover,
            remote,
            output,
        } => {
            let flags = size::SizeFlags {
                max_load,
                weights,
                polling_failover,
                logs_failover,
            };
            let client = remote.then(|| client::ApiClient::new(&api_url)).transpose()?;
            size::size_deployment(
                &file,
                &user_config,
                &flags,
                client.as_ref(),
                output.as_deref(),
                cli.format,
            )
            .await?;
        }
        Commands::Tiers { remote } => {
            let client = remote.then(|| client::ApiClient::new(&api_url)).transpose()?;
            reference::show_tiers(client.as_ref(), cli.format).await?;
        }
        Commands::Catalogue => {
            reference::show_catalogue(cli.format)?;
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => settings::show(&user_config, &config_path, &api_url, cli.format)?,
            ConfigCommands::Set { key, value } => {
                settings::set(user_config, &config_path, &key, &value)?
            }
            ConfigCommands::Reset => settings::reset(&config_path)?,
        },
    }

    Ok(())
}
