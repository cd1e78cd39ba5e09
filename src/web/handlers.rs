use crate::utils::error::ErrorCategory;
use crate::web::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::time::Instant;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn index() -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\
         <html><head><title>Content Moderation Pipeline</title></head>\
         <body><h1>🛡️ Content Moderation Pipeline</h1>\
         <p>{} v{} running.</p>\
         <ul>\
         <li><a href='/health'>Health Check</a></li>\
         <li><a href='/q/metrics'>Prometheus Metrics</a></li>\
         <li><a href='/api/metrics/simple'>Simple Metrics</a></li>\
         <li><a href='/api/csv/sample'>Sample Input CSV</a></li>\
         <li><a href='/dev/translate?q=hola'>Translation Stub</a></li>\
         <li><a href='/dev/score?q=test'>Scoring Stub</a></li>\
         </ul>\
         </body></html>",
        APP_NAME, APP_VERSION
    ))
}

pub async fn status() -> Json<serde_json::Value> {
    Json(json!({
        "status": "UP",
        "application": APP_NAME,
        "version": APP_VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "UP",
        "checks": [
            { "name": "pipeline", "status": "UP" },
        ],
    }))
}

/// Process a raw CSV body and return the aggregated result CSV.
pub async fn process_csv(State(state): State<AppState>, body: String) -> Response {
    tracing::info!(
        "🚀 Received CSV processing request with {} characters",
        body.len()
    );
    let start = Instant::now();

    match state.pipeline.process(&body).await {
        Ok((output, report)) => {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            tracing::info!(
                "✅ Processing completed in {} ms ({} processed, {} failed)",
                elapsed_ms,
                report.processed,
                report.failed
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::HeaderName::from_static("x-processing-time-ms"),
                        elapsed_ms.to_string(),
                    ),
                ],
                output,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("❌ Error processing CSV: {}", e);
            let status = match e.category() {
                ErrorCategory::Data => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.user_friendly_message()).into_response()
        }
    }
}

pub async fn sample_csv() -> Response {
    let sample = "user_id,message\n\
        alice,\"Hello everyone! How are you doing today?\"\n\
        bob,\"This is terrible! I hate everything about this.\"\n\
        alice,\"hëllo everyone!!! How are you doing today? 🌟\"\n\
        charlie,\"Good morning! Have a wonderful day!\"\n\
        bob,\"This is TERRIBLE! I HATE everything about this!!!\"\n\
        alice,\"Hello everyone! How are you doing today?   \"\n\
        diana,\"The weather is beautiful today.\"\n\
        bob,\"this is terrible i hate everything about this\"\n";

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sample-input.csv\"",
            ),
        ],
        sample,
    )
        .into_response()
}

/// Prometheus text exposition.
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
        .into_response()
}

/// Lightweight JSON metrics for humans and dashboards without a Prometheus
/// scraper.
pub async fn simple_metrics(State(state): State<AppState>) -> Response {
    match state.monitor.get_stats() {
        Some(stats) => Json(json!({
            "system": {
                "cpu_usage_percent": stats.cpu_usage,
                "memory_used_mb": stats.memory_usage_mb,
                "memory_used_percent": stats.memory_usage_percent,
                "peak_memory_mb": stats.peak_memory_mb,
                "total_memory_mb": stats.total_memory_mb,
                "available_processors": stats.cpu_count,
                "uptime_secs": stats.elapsed_time.as_secs(),
            },
            "application": {
                "status": "UP",
                "name": APP_NAME,
                "version": APP_VERSION,
            },
        }))
        .into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "system stats unavailable",
        )
            .into_response(),
    }
}
