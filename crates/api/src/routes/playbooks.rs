//! Route definitions for the `/playbooks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::playbooks;
use crate::state::AppState;

/// Routes mounted at `/playbooks`.
///
/// ```text
/// GET  /             -> list_playbooks
/// POST /{playbook}   -> start_playbook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(playbooks::list_playbooks))
        .route("/{playbook}", post(playbooks::start_playbook))
}
