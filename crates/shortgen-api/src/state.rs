//! Application state.

use std::sync::Arc;

use shortgen_worker::{Collaborators, JobExecutor, JobRegistry, WorkerConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub executor: JobExecutor,
}

impl AppState {
    pub fn new(config: ApiConfig, worker_config: WorkerConfig, collaborators: Collaborators) -> Self {
        let registry = Arc::new(JobRegistry::new());
        Self {
            config,
            executor: JobExecutor::new(worker_config, registry, collaborators),
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        self.executor.registry()
    }

    pub fn worker_config(&self) -> &WorkerConfig {
        self.executor.config()
    }
}
