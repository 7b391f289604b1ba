//! Sizing API - collector capacity sizing service
//!
//! Serves sizing recommendations for monitoring-platform deployments over
//! HTTP, alongside health and metrics endpoints.

use anyhow::Result;
use sizing_api::{api, catalogue, config::ServiceConfig};
use sizing_lib::{
    health::{Component, HealthRegistry},
    observability::{SizingMetrics, StructuredLogger},
    DeviceCatalogue,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting sizing-api");

    let config = ServiceConfig::load()?;
    let base_config = config.base_sizing_config()?;
    info!(
        port = config.api_port,
        max_load_percent = base_config.max_load_percent,
        "Service configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(Component::Catalogue).await;

    let metrics = SizingMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    let device_catalogue = match &config.catalogue_path {
        Some(path) => match catalogue::load_catalogue(Path::new(path)).await {
            Ok(loaded) => {
                logger.log_catalogue(path, loaded.len());
                loaded
            }
            Err(err) => {
                warn!(error = %err, path = %path, "Falling back to built-in device catalogue");
                health_registry
                    .set_degraded(Component::Catalogue, format!("{err:#}"))
                    .await;
                DeviceCatalogue::default()
            }
        },
        None => {
            let built_in = DeviceCatalogue::default();
            logger.log_catalogue("built-in", built_in.len());
            built_in
        }
    };

    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        metrics,
        logger.clone(),
        device_catalogue,
        base_config,
    ));

    health_registry.set_ready(true).await;
    logger.log_startup(SERVICE_VERSION, config.api_port);

    tokio::select! {
        result = api::serve(config.api_port, app_state) => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
