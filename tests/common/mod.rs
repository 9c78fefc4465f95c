//! Shared test harness: an in-memory history store and programmable mock
//! collaborators, wired into a [`BatchRunner`] with a fixed clock.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use archivist_core::config::ArchiverConfig;
use archivist_core::integration::archive_sink::{ArchiveRequest, ArchiveResponse, ArchiveSink, ArchiveSinkError};
use archivist_core::integration::case_export::{
    CaseEvent, CaseExportClient, CaseExportError, CasePage, CaseRecord, DocumentFile,
    DocumentPayload, DocumentRef, EventDocument, PropertyObject,
};
use archivist_core::integration::clock::Clock;
use archivist_core::integration::messaging::{EmailRequest, MessageReceipt, Notifier, NotifierError};
use archivist_core::integration::property::{PropertyDescriptor, PropertyLookup, PropertyLookupError};
use archivist_core::models::{
    ArchiveAttempt, ArchiveStatus, BatchRun, NewArchiveAttempt, NewBatchRun,
};
use archivist_core::orchestration::BatchRunner;
use archivist_core::store::HistoryStore;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, s).unwrap()
}

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

// ---------------------------------------------------------------------------
// In-memory history store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreInner {
    runs: Vec<BatchRun>,
    attempts: Vec<ArchiveAttempt>,
    next_run_id: i64,
    next_attempt_id: i64,
}

/// Infallible in-memory [`HistoryStore`]. Enforces the same
/// `(document_id, case_id)` uniqueness the database schema does.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryHistoryStore {
    pub fn all_runs(&self) -> Vec<BatchRun> {
        self.inner.lock().unwrap().runs.clone()
    }

    pub fn all_attempts(&self) -> Vec<ArchiveAttempt> {
        self.inner.lock().unwrap().attempts.clone()
    }

    pub fn run(&self, id: i64) -> BatchRun {
        self.inner
            .lock()
            .unwrap()
            .runs
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .expect("run exists")
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn create_run(&self, new_run: NewBatchRun) -> Result<BatchRun, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_run_id += 1;
        let run = BatchRun {
            id: inner.next_run_id,
            start_date: new_run.start_date,
            end_date: new_run.end_date,
            batch_trigger: new_run.batch_trigger,
            status: ArchiveStatus::NotCompleted,
            created_at: now(),
            updated_at: now(),
        };
        inner.runs.push(run.clone());
        Ok(run)
    }

    async fn find_run(&self, id: i64) -> Result<Option<BatchRun>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .runs
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn latest_completed_run(&self) -> Result<Option<BatchRun>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .runs
            .iter()
            .filter(|r| r.status == ArchiveStatus::Completed)
            .max_by_key(|r| r.end_date)
            .cloned())
    }

    async fn runs_with_status(&self, status: ArchiveStatus) -> Result<Vec<BatchRun>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .runs
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn mark_run_completed(&self, run_id: i64) -> Result<(), sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(run) = inner.runs.iter_mut().find(|r| r.id == run_id) {
            run.status = ArchiveStatus::Completed;
            run.updated_at = now();
        }
        Ok(())
    }

    async fn create_attempt(
        &self,
        new_attempt: NewArchiveAttempt,
    ) -> Result<ArchiveAttempt, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        assert!(
            !inner.attempts.iter().any(|a| a.document_id == new_attempt.document_id
                && a.case_id == new_attempt.case_id),
            "uniqueness violation: attempt already exists for ({}, {})",
            new_attempt.document_id,
            new_attempt.case_id,
        );

        inner.next_attempt_id += 1;
        let attempt = ArchiveAttempt {
            id: inner.next_attempt_id,
            document_id: new_attempt.document_id,
            case_id: new_attempt.case_id,
            document_name: new_attempt.document_name,
            document_type: new_attempt.document_type,
            batch_run_id: new_attempt.batch_run_id,
            status: ArchiveStatus::NotCompleted,
            archive_id: None,
            archive_url: None,
            created_at: now(),
            updated_at: now(),
        };
        inner.attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn find_attempt(
        &self,
        document_id: &str,
        case_id: &str,
    ) -> Result<Option<ArchiveAttempt>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .attempts
            .iter()
            .find(|a| a.document_id == document_id && a.case_id == case_id)
            .cloned())
    }

    async fn attempts_for_run(&self, run_id: i64) -> Result<Vec<ArchiveAttempt>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .attempts
            .iter()
            .filter(|a| a.batch_run_id == run_id)
            .cloned()
            .collect())
    }

    async fn save_attempt(&self, attempt: &ArchiveAttempt) -> Result<(), sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(stored) = inner.attempts.iter_mut().find(|a| a.id == attempt.id) {
            stored.status = attempt.status;
            stored.archive_id = attempt.archive_id.clone();
            stored.archive_url = attempt.archive_url.clone();
            stored.updated_at = now();
        }
        Ok(())
    }

    async fn delete_attempts_for_case(
        &self,
        case_id: &str,
        status: ArchiveStatus,
    ) -> Result<u64, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.attempts.len();
        inner
            .attempts
            .retain(|a| !(a.case_id == case_id && a.status == status));
        Ok((before - inner.attempts.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Mock collaborators
// ---------------------------------------------------------------------------

/// Programmable case export source. Pages are served in order; once the
/// queue is empty the source reports an empty page covering the whole
/// requested range, so the fetch loop finishes.
#[derive(Default)]
pub struct MockCaseExport {
    pages: Mutex<VecDeque<CasePage>>,
    documents: Mutex<HashMap<String, DocumentPayload>>,
    page_requests: Mutex<Vec<(NaiveDateTime, NaiveDateTime)>>,
}

impl MockCaseExport {
    pub fn push_page(&self, page: CasePage) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn put_document(&self, payload: DocumentPayload) {
        self.documents
            .lock()
            .unwrap()
            .insert(payload.document_id.clone(), payload);
    }

    pub fn page_requests(&self) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaseExportClient for MockCaseExport {
    async fn fetch_page(
        &self,
        lower_exclusive_bound: NaiveDateTime,
        upper_inclusive_bound: NaiveDateTime,
    ) -> Result<CasePage, CaseExportError> {
        self.page_requests
            .lock()
            .unwrap()
            .push((lower_exclusive_bound, upper_inclusive_bound));

        let page = self.pages.lock().unwrap().pop_front();
        Ok(page.unwrap_or(CasePage {
            cases: vec![],
            page_start: Some(lower_exclusive_bound),
            page_end: Some(upper_inclusive_bound),
        }))
    }

    async fn fetch_document(
        &self,
        document_id: &str,
    ) -> Result<DocumentPayload, CaseExportError> {
        self.documents
            .lock()
            .unwrap()
            .get(document_id)
            .cloned()
            .ok_or_else(|| CaseExportError::Transport(format!("no such document: {document_id}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkBehavior {
    Success,
    FailRemote,
    FailFormat,
    NoArchiveId,
}

/// Archive sink with per-document behavior, keyed by the document id in
/// the delivery metadata. Records every store call.
#[derive(Default)]
pub struct MockArchiveSink {
    behaviors: Mutex<HashMap<String, SinkBehavior>>,
    calls: Mutex<Vec<String>>,
}

impl MockArchiveSink {
    pub fn set_behavior(&self, document_id: &str, behavior: SinkBehavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(document_id.to_string(), behavior);
    }

    /// Document ids of every store call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn document_id_of(request: &ArchiveRequest) -> String {
        request
            .metadata
            .pointer("/cases/0/documents/0/document_id")
            .and_then(|v| v.as_str())
            .expect("delivery metadata carries the document id")
            .to_string()
    }
}

#[async_trait]
impl ArchiveSink for MockArchiveSink {
    async fn store(&self, request: ArchiveRequest) -> Result<ArchiveResponse, ArchiveSinkError> {
        let document_id = Self::document_id_of(&request);
        self.calls.lock().unwrap().push(document_id.clone());

        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(&document_id)
            .copied()
            .unwrap_or(SinkBehavior::Success);

        match behavior {
            SinkBehavior::Success => Ok(ArchiveResponse {
                archive_id: Some(format!("ARC-{document_id}")),
            }),
            SinkBehavior::NoArchiveId => Ok(ArchiveResponse { archive_id: None }),
            SinkBehavior::FailRemote => {
                Err(ArchiveSinkError::Remote("internal server error".to_string()))
            }
            SinkBehavior::FailFormat => Err(ArchiveSinkError::InvalidFormat(
                "extension must be valid".to_string(),
            )),
        }
    }
}

#[derive(Default)]
pub struct MockPropertyLookup {
    descriptor: Mutex<Option<PropertyDescriptor>>,
}

impl MockPropertyLookup {
    pub fn set(&self, descriptor: PropertyDescriptor) {
        *self.descriptor.lock().unwrap() = Some(descriptor);
    }
}

#[async_trait]
impl PropertyLookup for MockPropertyLookup {
    async fn by_reference(
        &self,
        _property_reference: i64,
    ) -> Result<Option<PropertyDescriptor>, PropertyLookupError> {
        Ok(self.descriptor.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<EmailRequest>>,
    fail: AtomicBool,
}

impl MockNotifier {
    pub fn fail_deliveries(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<EmailRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_email(&self, request: EmailRequest) -> Result<MessageReceipt, NotifierError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifierError::Delivery("smtp unavailable".to_string()));
        }

        self.sent.lock().unwrap().push(request);
        Ok(MessageReceipt {
            message_id: Some("MSG-1".to_string()),
        })
    }
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A closed case with one archive-type event carrying the given
/// `(document_id, type_code)` documents, anchored on a main property.
pub fn closed_case(case_number: &str, documents: &[(&str, &str)]) -> CaseRecord {
    CaseRecord {
        case_number: case_number.to_string(),
        status: Some("Closed".to_string()),
        case_type: Some("Building permit".to_string()),
        description: Some("New residential building".to_string()),
        registered_date: Some(date(2023, 5, 10)),
        arrival_date: Some(date(2023, 5, 10)),
        closed_date: Some(date(2024, 3, 15)),
        events: vec![CaseEvent {
            event_type: Some("ARCHIVE".to_string()),
            documents: documents
                .iter()
                .map(|(id, type_code)| EventDocument {
                    document: Some(DocumentRef {
                        id: (*id).to_string(),
                        name: Some(format!("document {id}")),
                    }),
                    type_code: Some((*type_code).to_string()),
                })
                .collect(),
        }],
        property_objects: vec![PropertyObject {
            is_main_object: true,
            property_reference: Some(1234),
        }],
    }
}

pub fn pdf_payload(document_id: &str) -> DocumentPayload {
    DocumentPayload {
        document_id: document_id.to_string(),
        name: Some(format!("document {document_id}")),
        description: None,
        created: Some(ts(2024, 3, 10, 9, 0, 0)),
        file: DocumentFile {
            extension: Some("pdf".to_string()),
            content: b"%PDF-1.7 test".to_vec(),
        },
    }
}

/// A page that covers the whole requested window in one go: its reported
/// `page_end` lies far beyond any test window and is clamped by the
/// driver.
pub fn single_page(cases: Vec<CaseRecord>) -> CasePage {
    CasePage {
        cases,
        page_start: Some(ts(2024, 1, 1, 0, 0, 0)),
        page_end: Some(ts(2050, 1, 1, 0, 0, 0)),
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<InMemoryHistoryStore>,
    pub case_export: Arc<MockCaseExport>,
    pub sink: Arc<MockArchiveSink>,
    pub property: Arc<MockPropertyLookup>,
    pub notifier: Arc<MockNotifier>,
    pub runner: BatchRunner,
}

impl Harness {
    /// Harness with the clock fixed at 2024-03-20 12:00:00.
    pub fn new() -> Self {
        Self::at(ts(2024, 3, 20, 12, 0, 0))
    }

    pub fn at(now: NaiveDateTime) -> Self {
        let store = Arc::new(InMemoryHistoryStore::default());
        let case_export = Arc::new(MockCaseExport::default());
        let sink = Arc::new(MockArchiveSink::default());
        let property = Arc::new(MockPropertyLookup::default());
        let notifier = Arc::new(MockNotifier::default());

        let runner = BatchRunner::new(
            Arc::clone(&store) as Arc<dyn HistoryStore>,
            Arc::clone(&case_export) as Arc<dyn CaseExportClient>,
            Arc::clone(&sink) as Arc<dyn ArchiveSink>,
            Arc::clone(&property) as Arc<dyn PropertyLookup>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::new(FixedClock(now)),
            ArchiverConfig::default(),
        );

        Self {
            store,
            case_export,
            sink,
            property,
            notifier,
            runner,
        }
    }

    /// Program one closed case with the given documents, all payloads
    /// present as PDFs.
    pub fn with_case(&self, case_number: &str, documents: &[(&str, &str)]) {
        self.case_export
            .push_page(single_page(vec![closed_case(case_number, documents)]));
        for (document_id, _) in documents {
            self.case_export.put_document(pdf_payload(document_id));
        }
    }
}
