//! # Configuration
//!
//! Environment-driven configuration for the archival engine. Every value
//! has a sensible default so the engine can be constructed in tests
//! without any environment at all; `from_env` overlays `ARCHIVIST_*`
//! variables on top of the defaults.

use crate::error::{ArchiverError, Result};

#[derive(Debug, Clone)]
pub struct ArchiverConfig {
    pub database_url: String,
    /// Recipient of the notification sent when a geotechnical document
    /// has been archived.
    pub geo_notification_recipient: String,
    /// Sender address for the geotechnical notification.
    pub geo_notification_sender: String,
    /// Recipient of the "manual handling required" notification sent when
    /// the archive rejects a document's file format.
    pub format_error_recipient: String,
    /// Sender address for the format-error notification.
    pub format_error_sender: String,
    /// Base URL of the long-term archive, used to derive public document
    /// URLs from archive ids.
    pub long_term_archive_url: String,
    /// How many days back a scheduled run reaches. The scheduled window is
    /// `today - lookback .. yesterday`.
    pub scheduled_lookback_days: i64,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/archivist_development".to_string(),
            geo_notification_recipient: "surveys@landregistry.example".to_string(),
            geo_notification_sender: "noreply@archivist.example".to_string(),
            format_error_recipient: "operations@archivist.example".to_string(),
            format_error_sender: "noreply@archivist.example".to_string(),
            long_term_archive_url: "https://archive.example".to_string(),
            scheduled_lookback_days: 7,
        }
    }
}

impl ArchiverConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(recipient) = std::env::var("ARCHIVIST_GEO_RECIPIENT") {
            config.geo_notification_recipient = recipient;
        }

        if let Ok(sender) = std::env::var("ARCHIVIST_GEO_SENDER") {
            config.geo_notification_sender = sender;
        }

        if let Ok(recipient) = std::env::var("ARCHIVIST_FORMAT_ERROR_RECIPIENT") {
            config.format_error_recipient = recipient;
        }

        if let Ok(sender) = std::env::var("ARCHIVIST_FORMAT_ERROR_SENDER") {
            config.format_error_sender = sender;
        }

        if let Ok(url) = std::env::var("ARCHIVIST_ARCHIVE_URL") {
            config.long_term_archive_url = url;
        }

        if let Ok(days) = std::env::var("ARCHIVIST_SCHEDULED_LOOKBACK_DAYS") {
            config.scheduled_lookback_days = days.parse().map_err(|e| {
                ArchiverError::Configuration(format!("invalid scheduled_lookback_days: {e}"))
            })?;
        }

        Ok(config)
    }
}
