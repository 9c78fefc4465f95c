//! # External Collaborators
//!
//! Traits and wire types for the four external systems the engine talks
//! to, plus a clock abstraction so "now"/"today" are injectable. The core
//! depends only on these traits; transport concerns (authentication,
//! retries, circuit breaking) belong to the implementations behind them.

pub mod archive_sink;
pub mod case_export;
pub mod clock;
pub mod messaging;
pub mod property;

pub use archive_sink::{ArchiveRequest, ArchiveResponse, ArchiveSink, ArchiveSinkError};
pub use case_export::{CaseExportClient, CaseExportError, CasePage, CaseRecord, DocumentPayload};
pub use clock::{Clock, SystemClock};
pub use messaging::{EmailRequest, MessageReceipt, Notifier, NotifierError};
pub use property::{PropertyDescriptor, PropertyLookup, PropertyLookupError};
