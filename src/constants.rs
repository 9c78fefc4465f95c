//! # System Constants
//!
//! Wire-level constants shared by the fetch driver, the document archiver
//! and the notification layer. These mirror the values used by the case
//! export source and the long-term archive, so they live in one place
//! instead of being scattered through the orchestration code.

/// Case status reported by the export source once a case has been closed.
/// Only cases in this status are eligible for archival.
pub const CASE_STATUS_CLOSED: &str = "Closed";

/// Lifecycle event type that marks a case event as carrying archivable
/// documents. Events of any other type are ignored.
pub const EVENT_TYPE_ARCHIVE: &str = "ARCHIVE";

/// Query fragment appended to the configured long-term archive base URL
/// when deriving the public URL of an archived document.
pub const ARCHIVE_URL_QUERY: &str = "/search?archiveId=${archiveId}";

/// Sender display name used for all outgoing notifications.
pub const NOTIFICATION_SENDER_NAME: &str = "Archivist";

/// Subjects for the two operator notifications.
pub mod subjects {
    pub const GEO_DOCUMENT_ARCHIVED: &str = "Archived geotechnical document";
    pub const MANUAL_HANDLING_REQUIRED: &str = "Manual handling required";
}

/// Fallback step used by the paged fetch driver when the source makes no
/// forward progress, expressed in hours.
pub const FETCH_FALLBACK_STEP_HOURS: i64 = 1;
