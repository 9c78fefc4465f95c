//! # Document Archiver
//!
//! Handles every `(case, document)` pair a fetched page surfaces: applies
//! the idempotent dedup against previous attempts, persists a durable
//! attempt marker *before* the archive call, interprets the sink's
//! response and fires the category/failure notifications.
//!
//! Failure isolation is the rule here: a document whose payload fetch,
//! metadata derivation or archive call fails is logged and left
//! `NOT_COMPLETED` for a later rerun, and processing moves on to the next
//! document. Only history-store failures abort the run.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::classification::AttachmentCategory;
use crate::config::ArchiverConfig;
use crate::constants::ARCHIVE_URL_QUERY;
use crate::integration::archive_sink::{ArchiveAttachment, ArchiveRequest, ArchiveSink};
use crate::integration::case_export::{CaseExportClient, CasePage, CaseRecord, EventDocument};
use crate::integration::property::{PropertyDescriptor, PropertyLookup};
use crate::models::{ArchiveAttempt, ArchiveStatus, BatchRun, NewArchiveAttempt};
use crate::orchestration::metadata;
use crate::orchestration::notifications::NotificationService;
use crate::store::HistoryStore;
use crate::util::substitute_placeholders;

pub struct DocumentArchiver {
    store: Arc<dyn HistoryStore>,
    case_export: Arc<dyn CaseExportClient>,
    archive_sink: Arc<dyn ArchiveSink>,
    property_lookup: Arc<dyn PropertyLookup>,
    notifications: NotificationService,
    config: ArchiverConfig,
}

impl DocumentArchiver {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        case_export: Arc<dyn CaseExportClient>,
        archive_sink: Arc<dyn ArchiveSink>,
        property_lookup: Arc<dyn PropertyLookup>,
        notifications: NotificationService,
        config: ArchiverConfig,
    ) -> Self {
        Self {
            store,
            case_export,
            archive_sink,
            property_lookup,
            notifications,
            config,
        }
    }

    /// Process every closed case in a page. Must complete before the next
    /// page is fetched: dedup for later pages depends on the attempts
    /// persisted here.
    pub async fn process_page(&self, page: &CasePage, run: &BatchRun) -> Result<(), sqlx::Error> {
        for case in page.cases.iter().filter(|case| case.is_closed()) {
            self.process_case(case, run).await?;
        }

        Ok(())
    }

    async fn process_case(&self, case: &CaseRecord, run: &BatchRun) -> Result<(), sqlx::Error> {
        // A case that has reached closure invalidates half-finished
        // attempts from earlier partial runs; this run re-derives the
        // current document set.
        let superseded = self
            .store
            .delete_attempts_for_case(&case.case_number, ArchiveStatus::NotCompleted)
            .await?;
        if superseded > 0 {
            info!(
                case_id = %case.case_number,
                superseded,
                "dropped unfinished attempts superseded by this run"
            );
        }

        for event_document in case.archivable_documents() {
            let Some(document_ref) = event_document.document.as_ref() else {
                continue;
            };

            if self
                .store
                .find_attempt(&document_ref.id, &case.case_number)
                .await?
                .is_some()
            {
                info!(
                    document_id = %document_ref.id,
                    case_id = %case.case_number,
                    "document is already archived, skipping"
                );
                continue;
            }

            let category = event_document
                .type_code
                .as_deref()
                .map(AttachmentCategory::resolve)
                .unwrap_or(AttachmentCategory::Attachment);

            info!(
                document_id = %document_ref.id,
                case_id = %case.case_number,
                category = %category,
                "new archivable document, archiving"
            );

            // Durable marker first: a crash from here on leaves an
            // inspectable unresolved attempt instead of silent loss.
            let attempt = self
                .store
                .create_attempt(NewArchiveAttempt {
                    document_id: document_ref.id.clone(),
                    case_id: case.case_number.clone(),
                    document_name: document_ref.name.clone(),
                    document_type: Some(category.description().to_string()),
                    batch_run_id: run.id,
                })
                .await?;

            self.archive_document(case, event_document, category, attempt)
                .await?;
        }

        Ok(())
    }

    /// Archive one document. External failures are logged and leave the
    /// attempt `NOT_COMPLETED`; the returned error is only ever a store
    /// failure.
    async fn archive_document(
        &self,
        case: &CaseRecord,
        event_document: &EventDocument,
        category: AttachmentCategory,
        mut attempt: ArchiveAttempt,
    ) -> Result<(), sqlx::Error> {
        let payload = match self.case_export.fetch_document(&attempt.document_id).await {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    document_id = %attempt.document_id,
                    case_id = %attempt.case_id,
                    "failed to fetch document content, leaving attempt unresolved: {e}"
                );
                return Ok(());
            }
        };

        let extension = match metadata::resolve_extension(&payload) {
            Ok(extension) => extension,
            Err(e) => {
                error!(
                    document_id = %attempt.document_id,
                    case_id = %attempt.case_id,
                    "could not derive delivery metadata, leaving attempt unresolved: {e}"
                );
                return Ok(());
            }
        };

        let property = self.resolve_property(case).await;

        let delivery = match metadata::build_delivery_metadata(
            case,
            event_document,
            &payload,
            property.as_ref(),
        ) {
            Ok(delivery) => delivery,
            Err(e) => {
                error!(
                    document_id = %attempt.document_id,
                    case_id = %attempt.case_id,
                    "could not derive delivery metadata, leaving attempt unresolved: {e}"
                );
                return Ok(());
            }
        };

        let metadata_value = match serde_json::to_value(&delivery) {
            Ok(value) => value,
            Err(e) => {
                error!(
                    document_id = %attempt.document_id,
                    case_id = %attempt.case_id,
                    "could not serialize delivery metadata, leaving attempt unresolved: {e}"
                );
                return Ok(());
            }
        };

        let request = ArchiveRequest {
            attachment: ArchiveAttachment {
                name: metadata::attachment_name(event_document, &payload, &extension),
                extension: format!(".{extension}"),
                content: payload.file.content,
            },
            metadata: metadata_value,
        };

        match self.archive_sink.store(request).await {
            Ok(response) => match response.archive_id {
                Some(archive_id) => {
                    attempt.status = ArchiveStatus::Completed;
                    attempt.archive_url = Some(self.archive_url(&archive_id));
                    attempt.archive_id = Some(archive_id);
                    self.store.save_attempt(&attempt).await?;

                    info!(
                        document_id = %attempt.document_id,
                        case_id = %attempt.case_id,
                        archive_id = attempt.archive_id.as_deref().unwrap_or_default(),
                        "document archived"
                    );

                    if category == AttachmentCategory::GeotechnicalSurvey {
                        let designation = property.as_ref().and_then(|p| p.full_designation());
                        self.notifications
                            .geo_document_archived(&attempt, designation.as_deref())
                            .await;
                    }
                }
                None => {
                    warn!(
                        document_id = %attempt.document_id,
                        case_id = %attempt.case_id,
                        "archive response carried no archive id, leaving attempt unresolved"
                    );
                    self.store.save_attempt(&attempt).await?;
                }
            },
            Err(e) if e.is_format_failure() => {
                warn!(
                    document_id = %attempt.document_id,
                    case_id = %attempt.case_id,
                    "archive rejected the file format, requesting manual handling: {e}"
                );
                self.notifications.manual_handling_required(&attempt).await;
                self.store.save_attempt(&attempt).await?;
            }
            Err(e) => {
                error!(
                    document_id = %attempt.document_id,
                    case_id = %attempt.case_id,
                    "archive request failed, continuing with the rest: {e}"
                );
                self.store.save_attempt(&attempt).await?;
            }
        }

        Ok(())
    }

    async fn resolve_property(&self, case: &CaseRecord) -> Option<PropertyDescriptor> {
        let reference = case.main_property_reference()?;

        match self.property_lookup.by_reference(reference).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                // Enrichment only; the delivery proceeds without it.
                warn!(
                    case_id = %case.case_number,
                    property_reference = reference,
                    "property lookup failed: {e}"
                );
                None
            }
        }
    }

    fn archive_url(&self, archive_id: &str) -> String {
        format!(
            "{}{}",
            self.config.long_term_archive_url,
            substitute_placeholders(ARCHIVE_URL_QUERY, &[("archiveId", archive_id)])
        )
    }
}
