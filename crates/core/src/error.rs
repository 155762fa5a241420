use crate::types::JobId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unrecognized status value: {0:?}")]
    InvalidStatus(String),

    #[error("Failed to dispatch job {identifier}: {reason}")]
    DispatchFailure { identifier: JobId, reason: String },
}
