//! # Batch Runner
//!
//! Top-level service wiring the window planner, the paged fetch driver,
//! the document archiver and the completion reconciler into the three
//! entry points: the parameterless scheduled run, the manual run with an
//! explicit window and the manual rerun of an existing batch. Every entry
//! point takes the single-flight permit first and holds it for the whole
//! run.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::info;

use crate::config::ArchiverConfig;
use crate::error::{ArchiverError, Result};
use crate::integration::archive_sink::ArchiveSink;
use crate::integration::case_export::CaseExportClient;
use crate::integration::clock::Clock;
use crate::integration::messaging::Notifier;
use crate::integration::property::PropertyLookup;
use crate::models::{ArchiveStatus, BatchRun, BatchTrigger, NewBatchRun};
use crate::orchestration::document_archiver::DocumentArchiver;
use crate::orchestration::fetch_driver::{BatchFilter, PagedFetchDriver};
use crate::orchestration::notifications::NotificationService;
use crate::orchestration::reconciler::CompletionReconciler;
use crate::orchestration::single_flight::RunGuard;
use crate::orchestration::window_planner::{plan_window, WindowPlan};
use crate::store::HistoryStore;

pub struct BatchRunner {
    store: Arc<dyn HistoryStore>,
    case_export: Arc<dyn CaseExportClient>,
    archiver: DocumentArchiver,
    reconciler: CompletionReconciler,
    guard: RunGuard,
    clock: Arc<dyn Clock>,
    config: ArchiverConfig,
}

impl BatchRunner {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        case_export: Arc<dyn CaseExportClient>,
        archive_sink: Arc<dyn ArchiveSink>,
        property_lookup: Arc<dyn PropertyLookup>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: ArchiverConfig,
    ) -> Self {
        let notifications = NotificationService::new(notifier, config.clone());
        let archiver = DocumentArchiver::new(
            Arc::clone(&store),
            Arc::clone(&case_export),
            archive_sink,
            property_lookup,
            notifications,
            config.clone(),
        );
        let reconciler = CompletionReconciler::new(Arc::clone(&store));

        Self {
            store,
            case_export,
            archiver,
            reconciler,
            guard: RunGuard::new(),
            clock,
            config,
        }
    }

    /// Scheduled entry point: archive the window from `lookback` days ago
    /// through yesterday. Subject to window planning, so a request already
    /// covered by the latest completed run returns `None`.
    pub async fn run_scheduled(&self) -> Result<Option<BatchRun>> {
        let today = self.clock.today();
        let start = today - Days::new(self.config.scheduled_lookback_days.unsigned_abs());
        let end = today - Days::new(1);

        self.run_batch(start, end, BatchTrigger::Scheduled).await
    }

    /// Run a batch over `(start, end)`. Scheduled windows are planned
    /// against the latest completed run; manual windows run verbatim.
    pub async fn run_batch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        trigger: BatchTrigger,
    ) -> Result<Option<BatchRun>> {
        let _permit = self
            .guard
            .try_acquire()
            .map_err(|_| ArchiverError::RunInProgress)?;

        info!(%start, %end, %trigger, "batch run requested");

        let latest_completed = self.store.latest_completed_run().await?;
        let (start, end) = match plan_window(start, end, trigger, latest_completed.as_ref()) {
            WindowPlan::Skip { latest_end } => {
                info!(
                    %end,
                    %latest_end,
                    "skipping redundant scheduled run"
                );
                return Ok(None);
            }
            WindowPlan::Proceed { start, end, .. } => (start, end),
        };

        // Persist the start of this batch before any fetch happens.
        let run = self
            .store
            .create_run(NewBatchRun {
                start_date: start,
                end_date: end,
                batch_trigger: trigger,
            })
            .await?;

        let run = self.archive_window(run).await?;
        Ok(Some(run))
    }

    /// Re-execute an existing batch run over its stored window. Rejected
    /// when the run is unknown or already completed; otherwise the
    /// idempotent dedup ensures only previously-failed or newly-appeared
    /// documents are acted upon.
    pub async fn rerun(&self, batch_run_id: i64) -> Result<BatchRun> {
        let _permit = self
            .guard
            .try_acquire()
            .map_err(|_| ArchiverError::RunInProgress)?;

        info!(batch_run_id, "batch rerun requested");

        let run = self
            .store
            .find_run(batch_run_id)
            .await?
            .ok_or(ArchiverError::BatchRunNotFound(batch_run_id))?;

        if run.status == ArchiveStatus::Completed {
            return Err(ArchiverError::RerunConflict(batch_run_id));
        }

        self.archive_window(run).await
    }

    /// Drive the window page by page, then reconcile completion for this
    /// run and for historical ones.
    async fn archive_window(&self, run: BatchRun) -> Result<BatchRun> {
        info!(
            run_id = run.id,
            start = %run.start_date,
            end = %run.end_date,
            "archiving window"
        );

        let filter = BatchFilter::for_window(run.start_date, run.end_date, self.clock.now());
        let mut driver = PagedFetchDriver::new(self.case_export.as_ref(), filter);

        while let Some(page) = driver.next_page().await? {
            self.archiver.process_page(&page, &run).await?;
        }

        let status = self.reconciler.finalize_run(run.id).await?;
        self.reconciler.sweep_incomplete_runs().await?;

        info!(run_id = run.id, %status, "batch run finished");

        self.store
            .find_run(run.id)
            .await?
            .ok_or(ArchiverError::BatchRunNotFound(run.id))
    }
}
