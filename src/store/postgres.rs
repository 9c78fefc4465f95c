//! Postgres-backed [`HistoryStore`] delegating to the model query methods.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{ArchiveAttempt, ArchiveStatus, BatchRun, NewArchiveAttempt, NewBatchRun};
use crate::store::HistoryStore;

#[derive(Debug, Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn create_run(&self, new_run: NewBatchRun) -> Result<BatchRun, sqlx::Error> {
        BatchRun::create(&self.pool, new_run).await
    }

    async fn find_run(&self, id: i64) -> Result<Option<BatchRun>, sqlx::Error> {
        BatchRun::find_by_id(&self.pool, id).await
    }

    async fn latest_completed_run(&self) -> Result<Option<BatchRun>, sqlx::Error> {
        BatchRun::latest_completed(&self.pool).await
    }

    async fn runs_with_status(&self, status: ArchiveStatus) -> Result<Vec<BatchRun>, sqlx::Error> {
        BatchRun::list_by_status(&self.pool, status).await
    }

    async fn mark_run_completed(&self, run_id: i64) -> Result<(), sqlx::Error> {
        BatchRun::mark_completed(&self.pool, run_id).await
    }

    async fn create_attempt(
        &self,
        new_attempt: NewArchiveAttempt,
    ) -> Result<ArchiveAttempt, sqlx::Error> {
        ArchiveAttempt::create(&self.pool, new_attempt).await
    }

    async fn find_attempt(
        &self,
        document_id: &str,
        case_id: &str,
    ) -> Result<Option<ArchiveAttempt>, sqlx::Error> {
        ArchiveAttempt::find_by_document_and_case(&self.pool, document_id, case_id).await
    }

    async fn attempts_for_run(&self, run_id: i64) -> Result<Vec<ArchiveAttempt>, sqlx::Error> {
        ArchiveAttempt::list_by_batch_run(&self.pool, run_id).await
    }

    async fn save_attempt(&self, attempt: &ArchiveAttempt) -> Result<(), sqlx::Error> {
        attempt.save(&self.pool).await
    }

    async fn delete_attempts_for_case(
        &self,
        case_id: &str,
        status: ArchiveStatus,
    ) -> Result<u64, sqlx::Error> {
        ArchiveAttempt::delete_by_case_and_status(&self.pool, case_id, status).await
    }
}
