//! # Case Export Source
//!
//! Client trait and wire types for the case-management export service.
//! The source is queried over bounded timestamp windows and may return a
//! page covering a narrower sub-range than requested; it cannot express
//! "no more data", which is why the fetch driver owns termination.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{CASE_STATUS_CLOSED, EVENT_TYPE_ARCHIVE};

/// One bounded-time-range response from the case source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CasePage {
    pub cases: Vec<CaseRecord>,
    /// Sub-range the source actually covered; may be narrower than the
    /// requested window, or absent entirely.
    pub page_start: Option<NaiveDateTime>,
    pub page_end: Option<NaiveDateTime>,
}

/// An administrative case as delivered by the export source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Case reference number; the `case_id` of every attempt derived from
    /// this case.
    pub case_number: String,
    pub status: Option<String>,
    pub case_type: Option<String>,
    pub description: Option<String>,
    pub registered_date: Option<NaiveDate>,
    /// Date the case arrived at the authority; drives the originator
    /// period and classification code in the delivery metadata.
    pub arrival_date: Option<NaiveDate>,
    pub closed_date: Option<NaiveDate>,
    pub events: Vec<CaseEvent>,
    pub property_objects: Vec<PropertyObject>,
}

impl CaseRecord {
    pub fn is_closed(&self) -> bool {
        self.status.as_deref() == Some(CASE_STATUS_CLOSED)
    }

    /// Documents attached to archive-type events, the only events that
    /// make their documents eligible for archival. Entries without a
    /// document reference are dropped.
    pub fn archivable_documents(&self) -> impl Iterator<Item = &EventDocument> {
        self.events
            .iter()
            .filter(|event| event.event_type.as_deref() == Some(EVENT_TYPE_ARCHIVE))
            .flat_map(|event| event.documents.iter())
            .filter(|doc| doc.document.is_some())
    }

    /// The main property object's lookup reference, if the case has one.
    pub fn main_property_reference(&self) -> Option<i64> {
        self.property_objects
            .iter()
            .find(|object| object.is_main_object)
            .and_then(|object| object.property_reference)
    }
}

/// A lifecycle event on a case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseEvent {
    pub event_type: Option<String>,
    pub documents: Vec<EventDocument>,
}

/// A document entry attached to a case event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDocument {
    pub document: Option<DocumentRef>,
    /// Source-side category code, resolved through the classification
    /// table.
    pub type_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub name: Option<String>,
}

/// A property (real estate) object referenced by a case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyObject {
    pub is_main_object: bool,
    pub property_reference: Option<i64>,
}

/// Full document content fetched for archival.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub document_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub file: DocumentFile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFile {
    /// File extension as reported by the source; when absent it is
    /// sniffed from the content's magic bytes.
    pub extension: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CaseExportError {
    /// Transport-level failure after the collaborator's own retries were
    /// exhausted.
    #[error("case export transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait CaseExportClient: Send + Sync {
    /// Query cases touched in `(lower_exclusive_bound, upper_inclusive_bound]`.
    async fn fetch_page(
        &self,
        lower_exclusive_bound: NaiveDateTime,
        upper_inclusive_bound: NaiveDateTime,
    ) -> Result<CasePage, CaseExportError>;

    /// Fetch the full content of a single document.
    async fn fetch_document(&self, document_id: &str)
        -> Result<DocumentPayload, CaseExportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_with_events(status: &str, events: Vec<CaseEvent>) -> CaseRecord {
        CaseRecord {
            case_number: "BLD 2024-17".to_string(),
            status: Some(status.to_string()),
            events,
            ..CaseRecord::default()
        }
    }

    #[test]
    fn closed_predicate_matches_exact_status() {
        assert!(case_with_events("Closed", vec![]).is_closed());
        assert!(!case_with_events("Pending", vec![]).is_closed());
        assert!(!CaseRecord::default().is_closed());
    }

    #[test]
    fn archivable_documents_filters_event_type_and_missing_refs() {
        let case = case_with_events(
            "Closed",
            vec![
                CaseEvent {
                    event_type: Some("ARCHIVE".to_string()),
                    documents: vec![
                        EventDocument {
                            document: Some(DocumentRef {
                                id: "DOC-1".to_string(),
                                name: None,
                            }),
                            type_code: Some("GEO".to_string()),
                        },
                        // No document reference: dropped
                        EventDocument::default(),
                    ],
                },
                CaseEvent {
                    event_type: Some("NOTE".to_string()),
                    documents: vec![EventDocument {
                        document: Some(DocumentRef {
                            id: "DOC-2".to_string(),
                            name: None,
                        }),
                        type_code: None,
                    }],
                },
            ],
        );

        let ids: Vec<_> = case
            .archivable_documents()
            .filter_map(|d| d.document.as_ref().map(|r| r.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["DOC-1"]);
    }

    #[test]
    fn main_property_reference_picks_main_object() {
        let case = CaseRecord {
            property_objects: vec![
                PropertyObject {
                    is_main_object: false,
                    property_reference: Some(1),
                },
                PropertyObject {
                    is_main_object: true,
                    property_reference: Some(2),
                },
            ],
            ..CaseRecord::default()
        };
        assert_eq!(case.main_property_reference(), Some(2));
    }
}
