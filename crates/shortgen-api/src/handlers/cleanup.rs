//! Removal of old jobs and their files.

use std::io::ErrorKind;
use std::path::Path;

use axum::extract::State;
use axum::Json;
use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

fn default_hours() -> i64 {
    24
}

/// Cleanup request body. Every field is optional.
#[derive(Debug, Deserialize)]
pub struct CleanupRequest {
    /// Jobs created more than this many hours ago are removed
    #[serde(default = "default_hours")]
    pub hours: i64,
}

impl Default for CleanupRequest {
    fn default() -> Self {
        Self {
            hours: default_hours(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub message: String,
    pub deleted_jobs: Vec<String>,
}

/// Delete jobs older than `hours`, together with their upload and results folder.
pub async fn cleanup_old_jobs(
    State(state): State<AppState>,
    body: Option<Json<CleanupRequest>>,
) -> ApiResult<Json<CleanupResponse>> {
    let Json(request) = body.unwrap_or_default();

    let cutoff = TimeDelta::try_hours(request.hours)
        .and_then(|age| Utc::now().checked_sub_signed(age))
        .ok_or_else(|| {
            ApiError::bad_request(format!("Invalid value for hours: {}", request.hours))
        })?;

    let mut deleted_jobs = Vec::new();
    for record in state.registry().older_than(cutoff).await {
        remove_file_if_exists(&record.file_path).await?;
        remove_dir_if_exists(&state.worker_config().job_results_dir(record.id.as_str())).await?;

        state.registry().remove(&record.id).await;
        deleted_jobs.push(record.id.to_string());
    }

    info!(
        hours = request.hours,
        deleted = deleted_jobs.len(),
        "Cleaned up old jobs"
    );

    Ok(Json(CleanupResponse {
        message: format!("Cleaned up {} old jobs", deleted_jobs.len()),
        deleted_jobs,
    }))
}

async fn remove_file_if_exists(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

async fn remove_dir_if_exists(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;
    use tokio_test::assert_ok;

    #[test]
    fn test_request_defaults_to_a_day() {
        let request: CleanupRequest = assert_ok!(serde_json::from_str("{}"));
        assert_eq!(request.hours, 24);
        assert_eq!(CleanupRequest::default().hours, 24);
    }

    #[tokio::test]
    async fn test_missing_paths_are_not_errors() {
        let dir = TempDir::new().unwrap();
        assert_ok!(remove_file_if_exists(&dir.path().join("gone.mp4")).await);
        assert_ok!(remove_dir_if_exists(&dir.path().join("gone")).await);
    }
}
