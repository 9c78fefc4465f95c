//! # Error Types
//!
//! Top-level error enum for the archival engine.
//!
//! Per-document failures (archive sink rejections, payload fetch errors,
//! metadata derivation problems) are deliberately *not* represented here:
//! they are logged and swallowed inside the document archiver so that no
//! single document can abort a batch. Only planning-level rejections and
//! infrastructure failures surface to the caller.

use crate::integration::case_export::CaseExportError;

/// Errors surfaced by the batch archival engine.
#[derive(Debug, thiserror::Error)]
pub enum ArchiverError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("case export source failed: {0}")]
    CaseExport(#[from] CaseExportError),

    #[error("batch run not found: {0}")]
    BatchRunNotFound(i64),

    #[error("batch run {0} is already completed and cannot be rerun")]
    RerunConflict(i64),

    #[error("another archival run is already in progress")]
    RunInProgress,

    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ArchiverError>;
