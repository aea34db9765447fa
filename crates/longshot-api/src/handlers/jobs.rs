//! Generation job handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use longshot_jobs::{DEFAULT_LOG_LIMIT, DEFAULT_PAGE_SIZE};
use longshot_models::{
    GenerateRequest, GenerateResponse, JobId, JobListResponse, JobLogsResponse, ResultResponse,
    StatusResponse,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

/// Submit a generation job. Returns as soon as the job is queued.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<GenerateResponse>)> {
    let Json(request) = payload?;
    let job_id = state
        .jobs
        .submit(&request)
        .await
        .map_err(|e| ApiError::from_job(e, state.config.is_production()))?;
    info!(job_id = %job_id, "Queued generation job");

    Ok((StatusCode::ACCEPTED, Json(GenerateResponse { job_id })))
}

/// Jobs newest first, `?limit=&offset=`.
pub async fn list_jobs(
    State(state): State<AppState>,
    query: Result<Query<ListJobsQuery>, QueryRejection>,
) -> ApiResult<Json<JobListResponse>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);
    Ok(Json(state.jobs.list(limit, offset).await))
}

/// Poll job status. Unknown ids yield a `not_found` status, not a 404.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Json<StatusResponse> {
    Json(state.jobs.status(&JobId::from_string(job_id)).await)
}

pub async fn job_result(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Json<ResultResponse> {
    Json(state.jobs.result(&JobId::from_string(job_id)).await)
}

/// The latest log lines, `?limit=` of them.
pub async fn job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> ApiResult<Json<JobLogsResponse>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT);
    Ok(Json(
        state.jobs.logs(&JobId::from_string(job_id), limit).await,
    ))
}
