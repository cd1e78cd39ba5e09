//! HTTP surface: the CSV processing API, health/metrics endpoints, and the
//! dev stubs for translation and scoring.

pub mod dev;
pub mod handlers;
pub mod metrics;

use crate::adapters::{ScoringClient, TranslationClient};
use crate::config::Settings;
use crate::core::pipeline::ModerationPipeline;
use crate::utils::monitor::SystemMonitor;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const MAX_CSV_BODY_BYTES: usize = 10 * 1024 * 1024;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ModerationPipeline<TranslationClient, ScoringClient>>,
    pub monitor: Arc<SystemMonitor>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn from_settings(settings: &Settings, monitor_enabled: bool) -> Self {
        let translator = TranslationClient::new(
            settings.clients.translation_url.clone(),
            settings.clients.retry.clone(),
            settings.circuit_breaker.clone(),
            &settings.cache,
        );
        let scorer = ScoringClient::new(
            settings.clients.scoring_url.clone(),
            settings.clients.retry.clone(),
            settings.circuit_breaker.clone(),
            &settings.cache,
        );
        let pipeline =
            ModerationPipeline::new(translator, scorer, settings.processing.concurrency);

        Self {
            pipeline: Arc::new(pipeline),
            monitor: Arc::new(SystemMonitor::new(monitor_enabled)),
            metrics: metrics::install(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::health))
        .route("/api/csv/process", post(handlers::process_csv))
        .route("/api/csv/sample", get(handlers::sample_csv))
        .route("/q/metrics", get(handlers::prometheus_metrics))
        .route("/api/metrics/simple", get(handlers::simple_metrics))
        .route("/dev/translate", get(dev::translate))
        .route("/dev/score", get(dev::score))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_CSV_BODY_BYTES))
                .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS))),
        )
}

/// Serve the API until Ctrl+C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
