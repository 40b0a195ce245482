//! Process one local video into highlight clips.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use shortgen_models::{HighlightRequest, JobId, JobRecord};
use shortgen_worker::{
    init_tracing, Collaborators, FfmpegClipRenderer, FfprobeProbe, JobExecutor, JobRegistry,
    SignalFileAnalyzer, WorkerConfig,
};

#[derive(Debug, Parser)]
#[command(name = "shortgen-worker", version, about = "Extract highlight clips from a video")]
struct Cli {
    /// Video file to process
    video: PathBuf,

    /// Number of highlights to produce
    #[arg(long, default_value_t = 3)]
    num_highlights: u32,

    /// Minimum highlight duration in seconds
    #[arg(long, default_value_t = 20.0)]
    min_duration: f64,

    /// Maximum highlight duration in seconds
    #[arg(long, default_value_t = 30.0)]
    max_duration: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("shortgen=info");

    let cli = Cli::parse();
    let config = WorkerConfig::from_env();
    config.validate().context("invalid worker configuration")?;
    info!("Worker config: {:?}", config);

    let request = HighlightRequest::new(cli.num_highlights, cli.min_duration, cli.max_duration);
    request.validate().context("invalid highlight request")?;

    let filename = cli
        .video
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .context("video path has no file name")?;

    let collaborators = Collaborators::from_analyzer(
        Arc::new(SignalFileAnalyzer::new()),
        Arc::new(FfprobeProbe),
        Arc::new(FfmpegClipRenderer),
    );
    let executor = JobExecutor::new(config, Arc::new(JobRegistry::new()), collaborators);

    let record = JobRecord::new(JobId::new(), filename, cli.video.clone(), &request);
    let job_id = record.id.clone();
    let manifest = executor
        .run(record, request)
        .await
        .with_context(|| format!("job {} failed", job_id))?;

    println!("{}", serde_json::to_string_pretty(&manifest)?);
    info!(
        "Results in {}",
        executor.config().job_results_dir(job_id.as_str()).display()
    );

    Ok(())
}
