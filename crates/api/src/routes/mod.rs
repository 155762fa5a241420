pub mod health;
pub mod jobs;
pub mod playbooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /playbooks              GET  list playbooks
/// /playbooks/{playbook}   POST start a job
///
/// /jobs                   GET  list jobs
/// /jobs/{identifier}      GET  get, DELETE remove
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/playbooks", playbooks::router())
        .nest("/jobs", jobs::router())
}
