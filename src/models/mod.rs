pub mod archive_attempt;
pub mod batch_run;
pub mod statuses;

// Re-export core models for easy access
pub use archive_attempt::{ArchiveAttempt, NewArchiveAttempt};
pub use batch_run::{BatchRun, NewBatchRun};
pub use statuses::{ArchiveStatus, BatchTrigger};
