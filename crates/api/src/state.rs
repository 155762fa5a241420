use std::path::PathBuf;
use std::sync::Arc;

use runbook_dispatch::JobService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: runbook_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Directory scanned for playbook files, resolved from the engine
    /// configuration at startup.
    pub playbook_dir: PathBuf,
    /// Job facade (store + dispatcher).
    pub service: Arc<JobService>,
}
