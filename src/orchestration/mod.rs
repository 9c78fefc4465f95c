//! # Archival Orchestration
//!
//! The batch archival engine: everything between "a run was requested"
//! and "every archivable document of the window has a durable attempt
//! record".
//!
//! ## Core Components
//!
//! - **WindowPlanner**: decides the effective window for a scheduled run,
//!   skipping redundant windows and closing gaps
//! - **PagedFetchDriver**: walks the window through the case export
//!   source with a strictly advancing lower bound
//! - **DocumentArchiver**: per-document dedup, durable attempt markers,
//!   archive calls and notifications
//! - **CompletionReconciler**: recomputes run completion from attempt
//!   status, including the historical sweep
//! - **BatchRunner**: the three entry points (scheduled, manual, rerun)
//!   behind the single-flight run guard

pub mod batch_runner;
pub mod document_archiver;
pub mod fetch_driver;
pub mod metadata;
pub mod notifications;
pub mod reconciler;
pub mod single_flight;
pub mod window_planner;

pub use batch_runner::BatchRunner;
pub use document_archiver::DocumentArchiver;
pub use fetch_driver::{BatchFilter, PagedFetchDriver};
pub use notifications::NotificationService;
pub use reconciler::CompletionReconciler;
pub use single_flight::{RunGuard, RunInProgress, RunPermit};
pub use window_planner::{plan_window, WindowPlan};
