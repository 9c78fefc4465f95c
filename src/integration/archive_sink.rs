//! # Archive Sink
//!
//! Client trait for the long-term archive. The engine inspects a failed
//! store call for exactly one thing: whether the archive rejected the
//! document's file extension/format, which triggers the manual-handling
//! notification. Every other failure is treated as transient and left
//! for a rerun.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The document content as delivered to the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveAttachment {
    /// File name including its extension.
    pub name: String,
    /// Dotted, lower-case extension (".pdf").
    pub extension: String,
    pub content: Vec<u8>,
}

/// One store request: the attachment plus its derived delivery metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveRequest {
    pub attachment: ArchiveAttachment,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveResponse {
    /// Identifier assigned by the archive. A response without one counts
    /// as a failed attempt.
    pub archive_id: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ArchiveSinkError {
    /// The archive rejected the document's file extension or format.
    #[error("archive rejected the file format: {0}")]
    InvalidFormat(String),

    /// Any other failure; recoverable by rerunning the batch.
    #[error("archive request failed: {0}")]
    Remote(String),
}

impl ArchiveSinkError {
    pub fn is_format_failure(&self) -> bool {
        matches!(self, Self::InvalidFormat(_))
    }
}

#[async_trait]
pub trait ArchiveSink: Send + Sync {
    async fn store(&self, request: ArchiveRequest) -> Result<ArchiveResponse, ArchiveSinkError>;
}
