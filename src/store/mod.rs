//! # History Store
//!
//! Async seam between the archival engine and the persisted run/attempt
//! bookkeeping. The engine only ever talks to [`HistoryStore`], which
//! keeps the orchestration logic testable against an in-memory double;
//! production uses [`PgHistoryStore`] over the model query methods.

pub mod postgres;

pub use postgres::PgHistoryStore;

use async_trait::async_trait;

use crate::models::{ArchiveAttempt, ArchiveStatus, BatchRun, NewArchiveAttempt, NewBatchRun};

/// Run/attempt bookkeeping operations required by the engine.
///
/// Every write that marks a risky external operation (run creation,
/// attempt creation) must be durable before the corresponding external
/// call is made; implementations must not buffer writes.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn create_run(&self, new_run: NewBatchRun) -> Result<BatchRun, sqlx::Error>;

    async fn find_run(&self, id: i64) -> Result<Option<BatchRun>, sqlx::Error>;

    /// The completed run with the latest window end, if any.
    async fn latest_completed_run(&self) -> Result<Option<BatchRun>, sqlx::Error>;

    async fn runs_with_status(&self, status: ArchiveStatus) -> Result<Vec<BatchRun>, sqlx::Error>;

    /// One-way transition; never called in the other direction.
    async fn mark_run_completed(&self, run_id: i64) -> Result<(), sqlx::Error>;

    async fn create_attempt(
        &self,
        new_attempt: NewArchiveAttempt,
    ) -> Result<ArchiveAttempt, sqlx::Error>;

    /// Natural-key lookup backing the idempotency check.
    async fn find_attempt(
        &self,
        document_id: &str,
        case_id: &str,
    ) -> Result<Option<ArchiveAttempt>, sqlx::Error>;

    async fn attempts_for_run(&self, run_id: i64) -> Result<Vec<ArchiveAttempt>, sqlx::Error>;

    async fn save_attempt(&self, attempt: &ArchiveAttempt) -> Result<(), sqlx::Error>;

    /// Supersession delete; returns the number of attempts removed.
    async fn delete_attempts_for_case(
        &self,
        case_id: &str,
        status: ArchiveStatus,
    ) -> Result<u64, sqlx::Error>;
}
