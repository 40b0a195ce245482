//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::cleanup::cleanup_old_jobs;
use crate::handlers::health;
use crate::handlers::jobs::{download_file, get_job_results, get_job_status, get_transcript, upload_video};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let job_routes = Router::new()
        .route("/upload", post(upload_video))
        .route("/status/:job_id", get(get_job_status))
        .route("/results/:job_id", get(get_job_results))
        .route("/download/:job_id/:filename", get(download_file))
        .route("/transcript/:job_id", get(get_transcript))
        .route("/cleanup", post(cleanup_old_jobs))
        // Multipart uploads are bounded by the configured body size, not axum's 2MB default
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let health_routes = Router::new().route("/health", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", job_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
