//! Axum API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};

use shortgen_api::{create_router, metrics, ApiConfig, AppState};
use shortgen_worker::{
    init_tracing, Collaborators, FfmpegClipRenderer, FfprobeProbe, SignalFileAnalyzer, WorkerConfig,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing("shortgen=info");

    info!("Starting shortgen-api");

    // Load configuration
    let config = ApiConfig::from_env();
    info!("API config: host={}, port={}", config.host, config.port);

    let worker_config = WorkerConfig::from_env();
    if let Err(e) = worker_config.validate() {
        error!("Invalid worker configuration: {}", e);
        std::process::exit(1);
    }

    for dir in [&worker_config.upload_dir, &worker_config.results_dir] {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            error!("Failed to create {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    let collaborators = Collaborators::from_analyzer(
        Arc::new(SignalFileAnalyzer::new()),
        Arc::new(FfprobeProbe),
        Arc::new(FfmpegClipRenderer),
    );

    // Create application state
    let state = AppState::new(config.clone(), worker_config, collaborators);

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => {
                info!("Prometheus metrics enabled at /metrics");
                Some(handle)
            }
            Err(e) => {
                error!("Failed to install metrics recorder: {}", e);
                None
            }
        }
    } else {
        None
    };

    // Create router
    let app = create_router(state, metrics_handle);

    // Bind and serve
    let addr: SocketAddr = config.bind_address().parse().expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
