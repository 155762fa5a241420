//! Facade assembling the store and the dispatcher into one API surface.

use std::sync::Arc;

use sqlx::PgPool;

use runbook_core::error::CoreError;
use runbook_core::types::JobId;
use runbook_db::models::job::{Job, JobListQuery};
use runbook_db::{JobStore, StoreError};
use runbook_engine::request::ExtraVars;

use crate::dispatcher::Dispatcher;

/// Errors from the job facade.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Thin orchestration over [`JobStore`] and [`Dispatcher`], consumed by the
/// transport layer.
pub struct JobService {
    pool: PgPool,
    dispatcher: Arc<Dispatcher>,
}

impl JobService {
    pub fn new(pool: PgPool, dispatcher: Arc<Dispatcher>) -> Self {
        Self { pool, dispatcher }
    }

    /// Create the job row, then hand it to the dispatcher.
    ///
    /// The row exists *before* dispatch so a status event can never race a
    /// missing row. A dispatch failure is surfaced to the caller, who owns
    /// the decision whether to keep or roll back the row it created.
    pub async fn start(
        &self,
        playbook: &str,
        extravars: Option<ExtraVars>,
        tags: Option<Vec<String>>,
        initiator: &str,
    ) -> Result<Job, ServiceError> {
        let identifier = JobId::new_v4();

        let job = JobStore::create(&self.pool, identifier, playbook, initiator).await?;
        self.dispatcher
            .submit(identifier, playbook, extravars, tags)
            .await?;

        Ok(job)
    }

    pub async fn get(&self, identifier: JobId) -> Result<Job, StoreError> {
        JobStore::get(&self.pool, identifier).await
    }

    pub async fn list(&self, params: &JobListQuery) -> Result<Vec<Job>, StoreError> {
        JobStore::list(&self.pool, params).await
    }

    pub async fn delete(&self, identifier: JobId) -> Result<(), StoreError> {
        JobStore::delete(&self.pool, identifier).await
    }
}
