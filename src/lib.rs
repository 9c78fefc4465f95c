#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Archivist Core
//!
//! Incremental windowed batch archival engine: periodically transfers the
//! documents of closed administrative cases from a case-management source
//! into a long-term archive, exactly once per document, while tolerating
//! partial failures of any downstream call.
//!
//! ## Overview
//!
//! Each batch run owns a date window. The window is fetched from the case
//! export source page by page with a strictly advancing lower bound, so a
//! source that returns stale or empty pages can never stall the run. Each
//! archivable document gets a durable attempt record *before* the archive
//! is called; re-runs dedup against those records, which makes delivery
//! at-least-once on the wire and exactly-once as observed through the
//! bookkeeping.
//!
//! ## Module Organization
//!
//! - [`models`] - Batch run and archive attempt records
//! - [`store`] - History store seam and its Postgres implementation
//! - [`integration`] - Collaborator traits: case export, archive sink,
//!   property lookup, notifier, clock
//! - [`orchestration`] - Window planning, paged fetching, document
//!   archival, completion reconciliation
//! - [`classification`] - Attachment category lookup table
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use archivist_core::config::ArchiverConfig;
//! use archivist_core::integration::SystemClock;
//! use archivist_core::orchestration::BatchRunner;
//! use archivist_core::store::PgHistoryStore;
//!
//! # async fn example(
//! #     pool: sqlx::PgPool,
//! #     case_export: Arc<dyn archivist_core::integration::CaseExportClient>,
//! #     archive_sink: Arc<dyn archivist_core::integration::ArchiveSink>,
//! #     property_lookup: Arc<dyn archivist_core::integration::PropertyLookup>,
//! #     notifier: Arc<dyn archivist_core::integration::Notifier>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiverConfig::from_env()?;
//! let runner = BatchRunner::new(
//!     Arc::new(PgHistoryStore::new(pool)),
//!     case_export,
//!     archive_sink,
//!     property_lookup,
//!     notifier,
//!     Arc::new(SystemClock),
//!     config,
//! );
//!
//! if let Some(run) = runner.run_scheduled().await? {
//!     println!("batch run {} is {}", run.id, run.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classification;
pub mod config;
pub mod constants;
pub mod error;
pub mod integration;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod store;
pub mod util;

pub use config::ArchiverConfig;
pub use error::{ArchiverError, Result};
pub use orchestration::BatchRunner;
