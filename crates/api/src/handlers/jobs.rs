//! Handlers for the `/jobs` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use runbook_core::types::JobId;
use runbook_db::models::job::JobListQuery;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/jobs
///
/// List jobs, newest-started first. Supports optional `limit` and `offset`
/// query parameters.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = state.service.list(&params).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{identifier}
///
/// Get a single job by identifier.
pub async fn get_job(
    State(state): State<AppState>,
    Path(identifier): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let job = state.service.get(identifier).await?;
    Ok(Json(DataResponse { data: job }))
}

/// DELETE /api/v1/jobs/{identifier}
///
/// Administrative removal of a job row. The core flow never deletes rows;
/// this is an explicit operator action.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(identifier): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    state.service.delete(identifier).await?;
    tracing::info!(%identifier, "Job deleted");
    Ok(StatusCode::NO_CONTENT)
}
