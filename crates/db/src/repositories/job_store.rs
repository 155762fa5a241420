//! Repository for the `jobs` table.
//!
//! Every mutating operation runs inside its own transaction and must match
//! exactly one row: zero matches surface `NotFound` without committing, and
//! more than one match is a corruption signal that rolls back and surfaces
//! `Conflict`.

use runbook_core::types::JobId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::StoreError;
use crate::models::job::{Job, JobListQuery, UpdateJob};
use crate::models::status::JobStatus;

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, job_uuid, job_name, initiator, status, start_time, end_time, result";

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 500;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 100;

/// Unique constraint backing identifier uniqueness.
const UNIQUE_IDENTIFIER_CONSTRAINT: &str = "uq_jobs_job_uuid";

/// Provides CRUD operations for job rows.
pub struct JobStore;

impl JobStore {
    /// Insert a new job with `created` status and no timestamps or result.
    ///
    /// A second insert with the same identifier fails with
    /// [`StoreError::DuplicateIdentifier`] and leaves the first row intact.
    pub async fn create(
        pool: &PgPool,
        identifier: JobId,
        name: &str,
        initiator: &str,
    ) -> Result<Job, StoreError> {
        let query = format!(
            "INSERT INTO jobs (job_uuid, job_name, initiator, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(identifier)
            .bind(name)
            .bind(initiator)
            .bind(JobStatus::Created)
            .fetch_one(pool)
            .await
            .map_err(|err| classify_unique_violation(err, identifier))
    }

    /// Fetch a job by identifier.
    pub async fn get(pool: &PgPool, identifier: JobId) -> Result<Job, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE job_uuid = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await?
            .ok_or(StoreError::NotFound(identifier))
    }

    /// List jobs ordered by `start_time` descending.
    ///
    /// Jobs that have not started yet (`start_time IS NULL`) sort after
    /// started ones; ties fall back to newest row first.
    pub async fn list(pool: &PgPool, params: &JobListQuery) -> Result<Vec<Job>, StoreError> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             ORDER BY start_time DESC NULLS LAST, id DESC \
             LIMIT $1 OFFSET $2"
        );
        Ok(sqlx::query_as::<_, Job>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?)
    }

    /// Apply a partial update to exactly one row.
    ///
    /// An empty field set is a no-op: no query is issued and nothing is
    /// committed.
    pub async fn update(
        pool: &PgPool,
        identifier: JobId,
        fields: &UpdateJob,
    ) -> Result<(), StoreError> {
        if fields.is_empty() {
            return Ok(());
        }

        // Build the SET clause and track the next bind parameter index
        // ($1 is the identifier).
        let mut assignments: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 2;

        if fields.status.is_some() {
            assignments.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        if fields.start_time.is_some() {
            assignments.push(format!("start_time = ${bind_idx}"));
            bind_idx += 1;
        }
        if fields.end_time.is_some() {
            assignments.push(format!("end_time = ${bind_idx}"));
            bind_idx += 1;
        }
        if fields.result.is_some() {
            assignments.push(format!("result = ${bind_idx}"));
        }

        let query = format!(
            "UPDATE jobs SET {} WHERE job_uuid = $1",
            assignments.join(", "),
        );

        let mut tx = pool.begin().await?;

        let mut q = sqlx::query(&query).bind(identifier);
        if let Some(status) = fields.status {
            q = q.bind(status);
        }
        if let Some(start_time) = fields.start_time {
            q = q.bind(start_time);
        }
        if let Some(end_time) = fields.end_time {
            q = q.bind(end_time);
        }
        if let Some(result) = &fields.result {
            q = q.bind(result);
        }

        let matched = q.execute(&mut *tx).await?.rows_affected();
        finish_single_row(tx, identifier, matched).await
    }

    /// Delete a job row.
    ///
    /// Deletion is an explicit administrative operation; the core flow never
    /// invokes it.
    pub async fn delete(pool: &PgPool, identifier: JobId) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;

        let matched = sqlx::query("DELETE FROM jobs WHERE job_uuid = $1")
            .bind(identifier)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        finish_single_row(tx, identifier, matched).await
    }
}

/// Commit when exactly one row matched; roll back and surface `NotFound` on
/// zero matches or `Conflict` on more than one.
async fn finish_single_row(
    tx: Transaction<'_, Postgres>,
    identifier: JobId,
    matched: u64,
) -> Result<(), StoreError> {
    match matched {
        0 => {
            tx.rollback().await?;
            Err(StoreError::NotFound(identifier))
        }
        1 => {
            tx.commit().await?;
            Ok(())
        }
        matched => {
            tx.rollback().await?;
            tracing::error!(%identifier, matched, "Identifier matched multiple rows");
            Err(StoreError::Conflict { identifier, matched })
        }
    }
}

/// Map a unique-constraint violation on the identifier column to
/// [`StoreError::DuplicateIdentifier`].
///
/// PostgreSQL reports unique violations with error code 23505.
fn classify_unique_violation(err: sqlx::Error, identifier: JobId) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(UNIQUE_IDENTIFIER_CONSTRAINT)
        {
            return StoreError::DuplicateIdentifier(identifier);
        }
    }
    StoreError::Database(err)
}
