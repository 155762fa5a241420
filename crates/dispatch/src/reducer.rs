//! Pure mapping from raw status events to store mutations.

use runbook_core::error::CoreError;
use runbook_core::types::Timestamp;
use runbook_db::models::job::UpdateJob;
use runbook_db::models::status::JobStatus;
use runbook_engine::RawStatus;

/// Map one raw status event to the fields it sets.
///
/// - `starting` stamps `start_time` and the status.
/// - `running` touches the status only.
/// - Terminal values stamp `end_time`, the status, and the result payload
///   when the event carries one.
///
/// `created` is set at insert time, never via an event, so it is rejected
/// here along with unrecognized strings. The caller performs exactly one
/// store mutation per event and never reads current state first; event
/// ordering per job is guaranteed upstream by the single task owning the
/// identifier.
pub fn reduce(payload: &RawStatus, now: Timestamp) -> Result<UpdateJob, CoreError> {
    let status: JobStatus = payload.status.parse()?;

    let update = match status {
        JobStatus::Created => return Err(CoreError::InvalidStatus(payload.status.clone())),
        JobStatus::Starting => UpdateJob {
            status: Some(status),
            start_time: Some(now),
            ..Default::default()
        },
        JobStatus::Running => UpdateJob {
            status: Some(status),
            ..Default::default()
        },
        JobStatus::Successful | JobStatus::Timeout | JobStatus::Failed | JobStatus::Canceled => {
            UpdateJob {
                status: Some(status),
                end_time: Some(now),
                result: payload.result.clone(),
                ..Default::default()
            }
        }
    };

    Ok(update)
}
