//! Job lifecycle status mapping to the `job_status` Postgres enum.

use std::fmt;
use std::str::FromStr;

use runbook_core::error::CoreError;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a job row.
///
/// `created` is set once at insert time; every other value arrives through
/// the status-event channel and is applied by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Created,
    Starting,
    Running,
    Successful,
    Timeout,
    Failed,
    Canceled,
}

impl JobStatus {
    /// Terminal states: no transition is defined out of them.
    pub const TERMINAL: [JobStatus; 4] = [
        JobStatus::Successful,
        JobStatus::Timeout,
        JobStatus::Failed,
        JobStatus::Canceled,
    ];

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Created => "created",
            JobStatus::Starting => "starting",
            JobStatus::Running => "running",
            JobStatus::Successful => "successful",
            JobStatus::Timeout => "timeout",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    /// Parse a raw status string reported by the execution engine.
    ///
    /// Unrecognized values are rejected with [`CoreError::InvalidStatus`]
    /// instead of being persisted.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "created" => Ok(JobStatus::Created),
            "starting" => Ok(JobStatus::Starting),
            "running" => Ok(JobStatus::Running),
            "successful" => Ok(JobStatus::Successful),
            "timeout" => Ok(JobStatus::Timeout),
            "failed" => Ok(JobStatus::Failed),
            "canceled" => Ok(JobStatus::Canceled),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}
