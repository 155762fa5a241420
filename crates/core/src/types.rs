/// Jobs are identified by an opaque v4 UUID assigned at submission time.
/// The surrogate `id` column is never used for lookups.
pub type JobId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
