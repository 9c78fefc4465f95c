//! # Completion Reconciler
//!
//! Recomputes batch-level completion from child attempt status: a run is
//! `COMPLETED` exactly when every attempt belonging to it is. Runs with
//! no attempts complete vacuously. The historical sweep picks up runs
//! that were completed indirectly — a later rerun superseded or retried
//! their attempts — so operators never see a finished run reported as
//! unfinished.

use std::sync::Arc;

use tracing::info;

use crate::models::ArchiveStatus;
use crate::store::HistoryStore;

pub struct CompletionReconciler {
    store: Arc<dyn HistoryStore>,
}

impl CompletionReconciler {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Recompute one run's status from its attempts and persist the
    /// (one-way) transition. Returns the resulting status.
    pub async fn finalize_run(&self, run_id: i64) -> Result<ArchiveStatus, sqlx::Error> {
        let attempts = self.store.attempts_for_run(run_id).await?;
        let all_completed = attempts.iter().all(|attempt| attempt.status.is_completed());

        info!(
            run_id,
            attempts = attempts.len(),
            all_completed,
            "reconciling batch run completion"
        );

        if all_completed {
            self.store.mark_run_completed(run_id).await?;
            Ok(ArchiveStatus::Completed)
        } else {
            Ok(ArchiveStatus::NotCompleted)
        }
    }

    /// Sweep all historical `NOT_COMPLETED` runs and complete those whose
    /// attempts have since all completed. Idempotent; invoked after every
    /// run. Returns how many runs were completed.
    pub async fn sweep_incomplete_runs(&self) -> Result<usize, sqlx::Error> {
        let incomplete = self
            .store
            .runs_with_status(ArchiveStatus::NotCompleted)
            .await?;

        let mut completed = 0;
        for run in incomplete {
            let attempts = self.store.attempts_for_run(run.id).await?;
            if attempts.iter().all(|attempt| attempt.status.is_completed()) {
                self.store.mark_run_completed(run.id).await?;
                completed += 1;
                info!(run_id = run.id, "historical batch run is now completed");
            }
        }

        Ok(completed)
    }
}
