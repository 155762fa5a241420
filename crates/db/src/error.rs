//! Store-layer error taxonomy.

use runbook_core::types::JobId;

/// Errors surfaced by [`JobStore`](crate::JobStore) operations.
///
/// `Conflict` signals a corrupted table: an identifier matched more than one
/// row. The offending transaction is rolled back before the error is raised,
/// so the store is never left partially mutated.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("A job with identifier {0} already exists")]
    DuplicateIdentifier(JobId),

    #[error("No job with identifier {0}")]
    NotFound(JobId),

    #[error("Identifier {identifier} matched {matched} rows; changes rolled back")]
    Conflict { identifier: JobId, matched: u64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
