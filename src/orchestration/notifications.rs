//! # Notifications
//!
//! Best-effort operator notifications: one when a geotechnical document
//! has been archived (the land registry wants to know) and one when the
//! archive rejects a document's file format (an operator must handle the
//! document manually). Delivery failures are logged and never escalate;
//! they must not influence attempt or run status.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::ArchiverConfig;
use crate::constants::{subjects, NOTIFICATION_SENDER_NAME};
use crate::integration::messaging::{EmailRequest, Notifier};
use crate::models::ArchiveAttempt;
use crate::util::substitute_placeholders;

const GEO_DOCUMENT_TEMPLATE: &str = "\
<html><body>\
<p>A geotechnical document has been archived.</p>\
<p>Case: ${caseId}<br/>Property: ${propertyDesignation}</p>\
</body></html>";

const MANUAL_HANDLING_TEMPLATE: &str = "\
<html><body>\
<p>The archive rejected a document's file format. It needs to be archived manually.</p>\
<p>Case: ${caseId}<br/>Document: ${documentName}<br/>Type: ${documentType}</p>\
</body></html>";

pub struct NotificationService {
    notifier: Arc<dyn Notifier>,
    config: ArchiverConfig,
}

impl NotificationService {
    pub fn new(notifier: Arc<dyn Notifier>, config: ArchiverConfig) -> Self {
        Self { notifier, config }
    }

    /// Tell the land registry that a geotechnical document was archived.
    pub async fn geo_document_archived(
        &self,
        attempt: &ArchiveAttempt,
        property_designation: Option<&str>,
    ) {
        let html_message = substitute_placeholders(
            GEO_DOCUMENT_TEMPLATE,
            &[
                ("caseId", &attempt.case_id),
                ("propertyDesignation", property_designation.unwrap_or_default()),
            ],
        );

        let request = EmailRequest {
            sender_name: NOTIFICATION_SENDER_NAME.to_string(),
            sender_address: self.config.geo_notification_sender.clone(),
            recipient: self.config.geo_notification_recipient.clone(),
            subject: subjects::GEO_DOCUMENT_ARCHIVED.to_string(),
            html_message,
        };

        self.send_best_effort(request, attempt).await;
    }

    /// Tell operations that a document needs manual archival.
    pub async fn manual_handling_required(&self, attempt: &ArchiveAttempt) {
        let html_message = substitute_placeholders(
            MANUAL_HANDLING_TEMPLATE,
            &[
                ("caseId", &attempt.case_id),
                ("documentName", attempt.document_name.as_deref().unwrap_or_default()),
                ("documentType", attempt.document_type.as_deref().unwrap_or_default()),
            ],
        );

        let request = EmailRequest {
            sender_name: NOTIFICATION_SENDER_NAME.to_string(),
            sender_address: self.config.format_error_sender.clone(),
            recipient: self.config.format_error_recipient.clone(),
            subject: subjects::MANUAL_HANDLING_REQUIRED.to_string(),
            html_message,
        };

        self.send_best_effort(request, attempt).await;
    }

    async fn send_best_effort(&self, request: EmailRequest, attempt: &ArchiveAttempt) {
        let recipient = request.recipient.clone();

        match self.notifier.send_email(request).await {
            Ok(receipt) => {
                info!(
                    recipient = %recipient,
                    message_id = receipt.message_id.as_deref().unwrap_or("<none>"),
                    "notification sent"
                );
            }
            Err(e) => {
                // The recipient has to be informed manually; the batch
                // carries on regardless.
                error!(
                    recipient = %recipient,
                    document_id = %attempt.document_id,
                    case_id = %attempt.case_id,
                    "failed to send notification: {e}"
                );
            }
        }
    }
}
