//! Highlight job handlers: upload, status polling, results and file downloads.

use std::path::Path as FsPath;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use shortgen_models::{HighlightMetadata, HighlightRequest, JobId, JobRecord, JobStatus};
use shortgen_worker::transcript_path;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::{is_valid_clip_name, secure_filename};
use crate::state::AppState;

// ============================================================================
// Types
// ============================================================================

/// Response for an accepted upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
}

/// Job status response. Mirrors the job record without storage paths.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub filename: String,
    pub status: JobStatus,
    /// Progress percentage (0-100)
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub num_highlights: u32,
    pub highlight_duration: (f64, f64),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<HighlightMetadata>,
}

impl From<JobRecord> for JobStatusResponse {
    fn from(record: JobRecord) -> Self {
        Self {
            id: record.id.to_string(),
            filename: record.filename,
            status: record.status,
            progress: record.progress,
            created_at: record.created_at,
            updated_at: record.updated_at,
            num_highlights: record.num_highlights,
            highlight_duration: record.highlight_duration,
            error: record.error,
            metadata: record.metadata,
        }
    }
}

/// Returned with 202 while a job is still running.
#[derive(Debug, Serialize)]
pub struct PendingResultsResponse {
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One downloadable highlight.
#[derive(Debug, Serialize)]
pub struct HighlightLink {
    pub id: usize,
    pub filename: String,
    pub url: String,
    pub duration: f64,
    pub start_time: f64,
    pub end_time: f64,
}

/// Results of a completed job.
#[derive(Debug, Serialize)]
pub struct JobResultsResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub highlights: Vec<HighlightLink>,
    pub transcript_url: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Accept a video upload and start highlight extraction.
///
/// Multipart fields: `video` (file, required), `num_highlights`,
/// `min_duration`, `max_duration`.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut video: Option<(Option<String>, Bytes)> = None;
    let mut request = HighlightRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                video = Some((file_name, data));
            }
            "num_highlights" => request.num_highlights = parse_field(&name, &field.text().await?)?,
            "min_duration" => request.min_duration = parse_field(&name, &field.text().await?)?,
            "max_duration" => request.max_duration = parse_field(&name, &field.text().await?)?,
            _ => {}
        }
    }

    let (file_name, data) = video.ok_or_else(|| ApiError::bad_request("No video file provided"))?;
    let file_name = file_name.unwrap_or_default();
    if file_name.is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }

    let worker_config = state.worker_config();
    if !worker_config.is_allowed_file(&file_name) {
        return Err(ApiError::bad_request("File type not allowed"));
    }

    let filename = secure_filename(&file_name);
    if filename.is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }

    // Reject bad windows before anything touches disk.
    worker_config.plan_params(&request)?;

    let job_id = JobId::new();
    tokio::fs::create_dir_all(&worker_config.upload_dir).await?;
    let file_path = worker_config
        .upload_dir
        .join(format!("{}_{}", job_id, filename));
    tokio::fs::write(&file_path, &data).await?;
    metrics::record_upload(data.len());

    info!(
        job_id = %job_id,
        filename = %filename,
        bytes = data.len(),
        "Video uploaded"
    );

    let record = JobRecord::new(job_id.clone(), filename, file_path, &request);
    state.executor.submit(record, request).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(UploadResponse {
            job_id: job_id.to_string(),
            status: JobStatus::Queued,
            message: "Video upload successful. Processing started.".to_string(),
        }),
    ))
}

/// Get the current status of a job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let record = find_job(&state, job_id).await?;
    Ok(Json(record.into()))
}

/// Get the highlights of a job, or its progress while it is still running.
pub async fn get_job_results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let record = find_job(&state, job_id).await?;

    if record.status != JobStatus::Complete {
        let pending = PendingResultsResponse {
            status: record.status,
            progress: record.progress,
            message: "Job is not complete yet".to_string(),
            error: record.error,
        };
        return Ok((StatusCode::ACCEPTED, Json(pending)).into_response());
    }

    let job_id = record.id.to_string();
    let highlights = record
        .metadata
        .iter()
        .enumerate()
        .map(|(i, meta)| HighlightLink {
            id: i + 1,
            filename: meta.filename.clone(),
            url: format!("/api/download/{}/{}", job_id, meta.filename),
            duration: meta.duration,
            start_time: meta.start_time,
            end_time: meta.end_time,
        })
        .collect();

    let job_dir = state.worker_config().job_results_dir(&job_id);
    let has_transcript = tokio::fs::try_exists(transcript_path(&job_dir))
        .await
        .unwrap_or(false);
    let transcript_url = has_transcript.then(|| format!("/api/transcript/{}", job_id));

    Ok(Json(JobResultsResponse {
        job_id,
        status: JobStatus::Complete,
        highlights,
        transcript_url,
    })
    .into_response())
}

/// Download a result file of a completed job.
pub async fn download_file(
    State(state): State<AppState>,
    Path((job_id, filename)): Path<(String, String)>,
) -> ApiResult<Response> {
    let record = find_job(&state, job_id).await?;

    if record.status != JobStatus::Complete {
        return Err(ApiError::bad_request("Job is not complete yet"));
    }
    if !is_valid_clip_name(&filename) {
        return Err(ApiError::not_found("File not found"));
    }

    let path = state
        .worker_config()
        .job_results_dir(record.id.as_str())
        .join(&filename);

    attachment(&path, &filename, "File not found").await
}

/// Download the transcript of a job.
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let record = find_job(&state, job_id).await?;
    let path = transcript_path(&state.worker_config().job_results_dir(record.id.as_str()));

    attachment(&path, "transcript.txt", "Transcript not available").await
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_job(state: &AppState, job_id: String) -> ApiResult<JobRecord> {
    state
        .registry()
        .snapshot(&JobId::from_string(job_id))
        .await
        .ok_or_else(|| ApiError::not_found("Job not found"))
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> ApiResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid value for {}", name)))
}

fn content_type_for(filename: &str) -> &'static str {
    match FsPath::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some("mp4") => "video/mp4",
        Some("txt") => "text/plain; charset=utf-8",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

async fn attachment(path: &FsPath, filename: &str, missing: &str) -> ApiResult<Response> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found(missing));
        }
        Err(e) => return Err(e.into()),
    };

    let headers = [
        (header::CONTENT_TYPE, content_type_for(filename).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, data).into_response())
}
