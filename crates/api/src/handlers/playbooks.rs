//! Handlers for the `/playbooks` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use runbook_engine::request::ExtraVars;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Initiator tag recorded for jobs submitted over HTTP.
const INITIATOR_REST: &str = "rest";

/// Body for `POST /api/v1/playbooks/{playbook}`.
#[derive(Debug, Default, Deserialize)]
pub struct StartPlaybookRequest {
    pub extravars: Option<ExtraVars>,
    pub tags: Option<Vec<String>>,
}

/// GET /api/v1/playbooks
///
/// List playbook files (`.yml`/`.yaml`) in the project directory.
pub async fn list_playbooks(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let read_failure =
        |err: std::io::Error| AppError::Internal(format!("Cannot read playbook directory: {err}"));

    let mut entries = tokio::fs::read_dir(&state.playbook_dir)
        .await
        .map_err(read_failure)?;

    let mut playbooks = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_failure)? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.ends_with(".yml") || name.ends_with(".yaml") {
            playbooks.push(name.to_string());
        }
    }
    playbooks.sort();

    Ok(Json(DataResponse { data: playbooks }))
}

/// POST /api/v1/playbooks/{playbook}
///
/// Submit the named playbook as a new job. Returns 201 with the freshly
/// created job; execution failures surface later through the job's status,
/// never through this response.
pub async fn start_playbook(
    State(state): State<AppState>,
    Path(playbook): Path<String>,
    Json(request): Json<StartPlaybookRequest>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .service
        .start(&playbook, request.extravars, request.tags, INITIATOR_REST)
        .await?;

    tracing::info!(
        identifier = %job.job_uuid,
        playbook = %job.job_name,
        "Job submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}
