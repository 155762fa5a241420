//! Job entity model and DTOs for the `jobs` table.

use runbook_core::types::{JobId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::JobStatus;

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: i64,
    /// Unique identifier assigned at submission; the lookup key everywhere.
    pub job_uuid: JobId,
    pub job_name: String,
    pub initiator: String,
    pub status: Option<JobStatus>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub result: Option<serde_json::Value>,
}

/// Partial update applied to a single job row.
///
/// `None` fields are left untouched. An all-`None` update is a no-op at the
/// store layer: no query is issued and nothing is committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateJob {
    pub status: Option<JobStatus>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub result: Option<serde_json::Value>,
}

impl UpdateJob {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.result.is_none()
    }
}

/// Query parameters for job listing.
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    /// Maximum number of results. Defaults to 100, capped at 500.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
