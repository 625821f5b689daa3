// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard serve`: HTTP front end for the selection engine.
//!
//! Routes:
//! - `GET /health` - liveness and rule store status
//! - `GET /metrics` - Prometheus text format
//! - `GET /models` - the gateway's live model catalog
//! - `POST /estimate` - cost of a prompt for a model, errors reported as 502
//! - `POST /v1/choose` - a selection decision

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use switchyard_config::SwitchyardConfig;
use switchyard_core::{Decision, GatewayApi, SwitchyardError};
use switchyard_engine::{SelectionEngine, Selector};
use switchyard_gateway::GatewayClient;
use switchyard_gateway::types::ModelListResponse;
use switchyard_prometheus::{PrometheusExporter, record_request, record_selection_latency};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::shutdown;

/// Model used by `/estimate` when the request does not name one.
const DEFAULT_ESTIMATE_MODEL: &str = "gpt-3.5-turbo-0125";

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub selector: Selector,
    pub gateway: Arc<dyn GatewayApi>,
    pub metrics: Option<PrometheusExporter>,
    pub start_time: Instant,
}

/// Request body for `POST /v1/choose`.
#[derive(Debug, Deserialize)]
pub struct ChooseBody {
    pub prompt: String,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default, alias = "deadline_sec")]
    pub deadline_secs: Option<u64>,
    #[serde(default)]
    pub max_cost_usd: Option<f64>,
}

/// Request body for `POST /estimate`.
#[derive(Debug, Deserialize)]
pub struct EstimateBody {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Response body for `POST /estimate`.
#[derive(Debug, Serialize)]
pub struct EstimateReply {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    pub estimated_cost: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub rules: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reload_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error carrying the engine error that caused it.
pub struct ApiError(SwitchyardError);

impl From<SwitchyardError> for ApiError {
    fn from(e: SwitchyardError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SwitchyardError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SwitchyardError::Gateway { .. }
            | SwitchyardError::Timeout { .. }
            | SwitchyardError::CatalogUnavailable { .. }
            | SwitchyardError::EstimationDegraded { .. } => StatusCode::BAD_GATEWAY,
            SwitchyardError::Configuration(_)
            | SwitchyardError::ReloadFailure { .. }
            | SwitchyardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Build the router for `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/metrics", get(get_metrics))
        .route("/models", get(get_models))
        .route("/estimate", post(post_estimate))
        .route("/v1/choose", post(post_choose))
        .route_layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until SIGINT or SIGTERM.
pub async fn run_serve(config: SwitchyardConfig) -> Result<(), SwitchyardError> {
    let metrics = PrometheusExporter::install()?;
    let gateway: Arc<dyn GatewayApi> = Arc::new(GatewayClient::new(&config.gateway)?);
    let engine = SelectionEngine::from_config_with_gateway(&config, Arc::clone(&gateway)).await?;
    let selector = Selector::new(Arc::new(engine)).with_defaults(
        switchyard_engine::ChooseOptions::from_config(&config.selection),
    );
    if let Err(_already) = Selector::install(selector.clone()) {
        tracing::warn!("a process selector was already installed, serving with a separate one");
    }

    let state = AppState {
        selector,
        gateway,
        metrics: Some(metrics),
        start_time: Instant::now(),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SwitchyardError::Configuration(format!("failed to bind {addr}: {e}")))?;
    info!(
        %addr,
        gateway = %config.gateway.base_url,
        rules = %config.rules.path,
        "switchyard listening"
    );

    let cancel = shutdown::install_signal_handler();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| SwitchyardError::Internal(format!("server error: {e}")))?;

    info!("switchyard serve shutdown complete");
    Ok(())
}

async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(request).await;
    record_request(&route, response.status().as_u16());
    response
}

async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let rules = state.selector.engine().rules();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
        rules: rules.snapshot().len(),
        last_reload_error: rules.last_reload_error(),
    })
}

async fn get_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(metrics) => (
            [("content-type", "text/plain; version=0.0.4")],
            metrics.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_models(State(state): State<AppState>) -> Result<Json<ModelListResponse>, ApiError> {
    let data = state.gateway.list_models().await?;
    Ok(Json(ModelListResponse { data }))
}

async fn post_estimate(
    State(state): State<AppState>,
    Json(body): Json<EstimateBody>,
) -> Result<Json<EstimateReply>, ApiError> {
    let model = body
        .model
        .unwrap_or_else(|| DEFAULT_ESTIMATE_MODEL.to_string());
    let estimate = state
        .selector
        .engine()
        .estimator()
        .try_estimate(&body.prompt, &model)
        .await?;
    Ok(Json(EstimateReply {
        model,
        tokens: estimate.tokens,
        estimated_cost: estimate.estimated_cost,
    }))
}

async fn post_choose(
    State(state): State<AppState>,
    Json(body): Json<ChooseBody>,
) -> Result<Json<Decision>, ApiError> {
    let mut options = state.selector.options();
    if let Some(task_type) = body.task_type {
        options = options.task_type(task_type);
    }
    if let Some(secs) = body.deadline_secs {
        options = options.deadline_secs(secs);
    }
    if let Some(usd) = body.max_cost_usd {
        options = options.max_cost_usd(usd);
    }

    let started = Instant::now();
    let decision = state.selector.choose_with(&body.prompt, options).await?;
    record_selection_latency(started.elapsed().as_secs_f64());
    Ok(Json(decision))
}
