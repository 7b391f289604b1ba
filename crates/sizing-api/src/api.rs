//! HTTP API for collector sizing, reference data, health checks and metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use sizing_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::{SizingMetrics, StructuredLogger},
    DeploymentInput, DeploymentSizing, DeviceCatalogue, SizingConfig, SizingEngine, SizingError,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: SizingMetrics,
    pub logger: StructuredLogger,
    pub engine: SizingEngine,
    pub catalogue: DeviceCatalogue,
    /// Defaults every request's `config` block is laid over
    pub base_config: SizingConfig,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: SizingMetrics,
        logger: StructuredLogger,
        catalogue: DeviceCatalogue,
        base_config: SizingConfig,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            logger,
            engine: SizingEngine::new(),
            catalogue,
            base_config,
        }
    }

    /// Resolve, validate and size a deployment request
    pub fn size(&self, input: &DeploymentInput) -> Result<DeploymentSizing, SizingError> {
        let config = self.base_config.apply(&input.config);
        let sites = input.resolve_sites(&self.catalogue)?;
        self.engine.size_deployment(&sites, &config)
    }
}

/// Error body returned for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

struct ApiError(SizingError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.0.to_string(),
            code: Some(self.0.code().to_string()),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Size a deployment
async fn sizing(
    State(state): State<Arc<AppState>>,
    Json(input): Json<DeploymentInput>,
) -> Result<Json<DeploymentSizing>, ApiError> {
    state.metrics.inc_sizing_requests();
    let started = Instant::now();

    match state.size(&input) {
        Ok(result) => {
            let elapsed = started.elapsed().as_secs_f64();
            state.metrics.observe_calculation_latency(elapsed);
            state.metrics.record_sizing(&result);
            let max_load = input
                .config
                .max_load_percent
                .unwrap_or(state.base_config.max_load_percent);
            state.logger.log_sizing(&result, max_load, elapsed);
            Ok(Json(result))
        }
        Err(err) => {
            state.metrics.inc_rejections(&err);
            state.logger.log_rejection(&err);
            Err(ApiError(err))
        }
    }
}

async fn tiers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.tiers().to_vec())
}

async fn catalogue(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.catalogue.clone())
}

async fn defaults(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.base_config.clone())
}

/// Liveness: a degraded catalogue still serves sizing requests
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = if health.status == ComponentStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %err, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/sizing", post(sizing))
        .route("/api/v1/tiers", get(tiers))
        .route("/api/v1/catalogue", get(catalogue))
        .route("/api/v1/defaults", get(defaults))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
