//! Job executor.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, Instrument};

use shortgen_models::{HighlightRequest, HighlightsManifest, JobRecord};

use crate::analysis::Collaborators;
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::metrics;
use crate::processor::HighlightProcessor;
use crate::registry::{JobHandle, JobRegistry};

/// Runs highlight jobs on the tokio runtime, at most `max_concurrent_jobs`
/// at a time, each bounded by `job_timeout`.
#[derive(Debug, Clone)]
pub struct JobExecutor {
    config: Arc<WorkerConfig>,
    registry: Arc<JobRegistry>,
    processor: HighlightProcessor,
    job_semaphore: Arc<Semaphore>,
}

impl JobExecutor {
    pub fn new(config: WorkerConfig, registry: Arc<JobRegistry>, collaborators: Collaborators) -> Self {
        let config = Arc::new(config);
        let job_semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let processor = HighlightProcessor::new(Arc::clone(&config), collaborators);

        Self {
            config,
            registry,
            processor,
            job_semaphore,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Number of free job slots.
    pub fn available_slots(&self) -> usize {
        self.job_semaphore.available_permits()
    }

    /// Register a queued job and start processing it in the background.
    pub async fn submit(&self, record: JobRecord, request: HighlightRequest) -> JoinHandle<()> {
        info!(
            job_id = %record.id,
            filename = %record.filename,
            "Submitting highlight job"
        );
        metrics::record_job_submitted();

        let job = self.registry.insert(record).await;
        let executor = self.clone();

        tokio::spawn(async move {
            // Outcome is recorded on the job itself.
            let _ = executor.execute(job, request).await;
        })
    }

    /// Register a job and process it on the current task.
    pub async fn run(&self, record: JobRecord, request: HighlightRequest) -> WorkerResult<HighlightsManifest> {
        metrics::record_job_submitted();
        let job = self.registry.insert(record).await;
        self.execute(job, request).await
    }

    /// Wait for a slot, run the pipeline under the timeout and record the
    /// outcome on the job.
    async fn execute(&self, job: JobHandle, request: HighlightRequest) -> WorkerResult<HighlightsManifest> {
        let job_id = job.lock().await.id.clone();
        let logger = JobLogger::new(&job_id, "highlight_extraction");

        let _permit = self
            .job_semaphore
            .acquire()
            .await
            .map_err(|_| WorkerError::job_failed("Semaphore closed"))?;

        let started = Instant::now();
        let timeout = self.config.job_timeout;

        let result = tokio::time::timeout(timeout, self.processor.process_video(&job, &request))
            .instrument(logger.create_span())
            .await
            .unwrap_or_else(|_| Err(WorkerError::Timeout(timeout.as_secs())));

        match &result {
            Ok(manifest) => {
                metrics::record_job_completed(started.elapsed().as_secs_f64());
                info!(
                    job_id = %job_id,
                    highlights = manifest.highlights.len(),
                    "Job {} completed successfully", job_id
                );
            }
            Err(e) => {
                let reason = match e {
                    WorkerError::Timeout(_) => "timeout",
                    e if e.is_invalid_request() => "invalid_request",
                    _ => "error",
                };
                metrics::record_job_failed(reason);
                logger.log_error(&e.to_string());
                error!(job_id = %job_id, "Job {} failed: {}", job_id, e);
                job.lock().await.fail(e.to_string());
            }
        }

        result
    }
}
