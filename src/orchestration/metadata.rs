//! # Delivery Metadata
//!
//! Derives the archive's delivery metadata for one document: the
//! originator hierarchy (whose activity period depends on when the case
//! arrived), the case object with its classification code, and the
//! document/attachment records. The structures serialize with serde and
//! are handed to the archive sink as a JSON value.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::classification::AttachmentCategory;
use crate::integration::case_export::{CaseRecord, DocumentPayload, EventDocument};
use crate::integration::property::PropertyDescriptor;
use crate::util;

/// Case status recorded in the archive; every archived case is closed by
/// definition.
const ARCHIVED_CASE_STATUS: &str = "Closed";

/// Classification codes for building cases. The registry changed its
/// scheme at the end of 2016; cases arriving before the cutoff keep the
/// legacy series code.
const CLASSIFICATION_MODERN: &str = "Manage building permits";
const CLASSIFICATION_LEGACY: &str = "F2 Building permits";

/// The committee responsible for building cases, by era.
const MUNICIPALITY_NAME: &str = "Mellstad Municipality";
const COMMITTEE_MODERN: &str = "Urban Development Committee";
const COMMITTEE_LEGACY: &str = "Municipal Building Committee";

/// Prefix under which attachments are laid out inside a delivery.
const ATTACHMENT_LINK_PREFIX: &str = "Attachments\\";

#[derive(Debug, Clone, thiserror::Error)]
pub enum MetadataError {
    #[error("could not determine a file extension for document {0}")]
    UnknownExtension(String),
}

/// Root of the delivery handed to the archive for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryMetadata {
    pub originator: OriginatorStructure,
    pub cases: Vec<CaseObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginatorStructure {
    pub authority: Originator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Originator {
    pub name: String,
    pub active_from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_originator: Option<Box<Originator>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseObject {
    pub case_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<String>,
    pub classification: String,
    /// Arrival year, kept as a free-text note for archive search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyRecord>,
    pub documents: Vec<DocumentObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_identity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentObject {
    pub document_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    pub document_type_classification: String,
    pub heading: String,
    pub attachment: AttachmentRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub link: String,
}

/// Resolve the payload's file extension: reported by the source if
/// present, sniffed from the content otherwise.
pub fn resolve_extension(payload: &DocumentPayload) -> Result<String, MetadataError> {
    if let Some(extension) = payload.file.extension.as_deref() {
        let trimmed = extension.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.trim_start_matches('.').to_lowercase());
        }
    }

    util::extension_from_bytes(&payload.file.content)
        .map(str::to_string)
        .ok_or_else(|| MetadataError::UnknownExtension(payload.document_id.clone()))
}

/// File name the archive will see for this document: the display name
/// from the payload (or the event entry, or the raw id) with the resolved
/// extension appended.
pub fn attachment_name(
    event_document: &EventDocument,
    payload: &DocumentPayload,
    extension: &str,
) -> String {
    let display_name = payload
        .name
        .as_deref()
        .or(event_document
            .document
            .as_ref()
            .and_then(|r| r.name.as_deref()))
        .unwrap_or(payload.document_id.as_str());
    util::name_with_extension(display_name, extension)
}

/// Build the delivery metadata for one document of a closed case.
pub fn build_delivery_metadata(
    case: &CaseRecord,
    event_document: &EventDocument,
    payload: &DocumentPayload,
    property: Option<&PropertyDescriptor>,
) -> Result<DeliveryMetadata, MetadataError> {
    let extension = resolve_extension(payload)?;
    let category = event_document
        .type_code
        .as_deref()
        .map(AttachmentCategory::resolve)
        .unwrap_or(AttachmentCategory::Attachment);

    let attachment_name = attachment_name(event_document, payload, &extension);

    let attachment = AttachmentRecord {
        link: format!("{ATTACHMENT_LINK_PREFIX}{attachment_name}"),
        name: attachment_name,
        description: payload.description.clone(),
    };

    let document = DocumentObject {
        document_id: payload.document_id.clone(),
        created_date: payload.created.map(iso_date),
        document_type_classification: category.archive_classification().to_string(),
        heading: category.description().to_string(),
        attachment,
    };

    let case_object = CaseObject {
        case_id: case.case_number.clone(),
        heading: case.description.clone(),
        status: ARCHIVED_CASE_STATUS.to_string(),
        case_type: case.case_type.clone(),
        created_date: case.registered_date.map(iso_day),
        closed_date: case.closed_date.map(iso_day),
        classification: classification_for(case.arrival_date).to_string(),
        note: case.arrival_date.map(|d| d.format("%Y").to_string()),
        property: property.map(property_record),
        documents: vec![document],
    };

    Ok(DeliveryMetadata {
        originator: originator_for(case.arrival_date),
        cases: vec![case_object],
    })
}

fn property_record(descriptor: &PropertyDescriptor) -> PropertyRecord {
    PropertyRecord {
        designation: descriptor.full_designation(),
        district: descriptor.district.clone(),
        object_identity: descriptor.object_identity.map(|u| u.to_string()),
    }
}

/// Classification code for a case by its arrival date. Cases without one
/// are treated as current.
fn classification_for(arrival_date: Option<NaiveDate>) -> &'static str {
    match arrival_date {
        Some(date) if date <= legacy_cutoff() => CLASSIFICATION_LEGACY,
        _ => CLASSIFICATION_MODERN,
    }
}

/// Originator hierarchy for a case by its arrival date. The municipality
/// is the root; the responsible committee underneath carries the activity
/// period matching the era the case arrived in.
fn originator_for(arrival_date: Option<NaiveDate>) -> OriginatorStructure {
    let committee = match arrival_date {
        Some(date) if date <= committee_era_cutoff() => Originator {
            name: COMMITTEE_LEGACY.to_string(),
            active_from: "1974".to_string(),
            active_to: Some("1992".to_string()),
            sub_originator: None,
        },
        Some(date) if date <= legacy_cutoff() => Originator {
            name: COMMITTEE_MODERN.to_string(),
            active_from: "1993".to_string(),
            active_to: Some("2016".to_string()),
            sub_originator: None,
        },
        _ => Originator {
            name: COMMITTEE_MODERN.to_string(),
            active_from: "2017".to_string(),
            active_to: None,
            sub_originator: None,
        },
    };

    OriginatorStructure {
        authority: Originator {
            name: MUNICIPALITY_NAME.to_string(),
            active_from: "1974".to_string(),
            active_to: None,
            sub_originator: Some(Box::new(committee)),
        },
    }
}

fn legacy_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 12, 31).expect("valid cutoff date")
}

fn committee_era_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(1992, 12, 31).expect("valid cutoff date")
}

fn iso_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn iso_date(datetime: NaiveDateTime) -> String {
    datetime.date().format("%Y-%m-%d").to_string()
}
