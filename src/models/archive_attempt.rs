//! # Archive Attempt Model
//!
//! One row per `(document_id, case_id)` pair, created the moment a
//! document is identified as archivable and *before* the archive sink is
//! called, so that a crash between creation and completion leaves a
//! durable "attempt unresolved" marker.
//!
//! ## Database Schema
//!
//! Maps to the `archivist_archive_attempts` table:
//! ```sql
//! CREATE TABLE archivist_archive_attempts (
//!   id BIGSERIAL PRIMARY KEY,
//!   document_id VARCHAR NOT NULL,
//!   case_id VARCHAR NOT NULL,
//!   document_name VARCHAR,
//!   document_type VARCHAR,
//!   batch_run_id BIGINT NOT NULL REFERENCES archivist_batch_runs (id),
//!   status VARCHAR NOT NULL,
//!   archive_id VARCHAR,
//!   archive_url VARCHAR,
//!   created_at TIMESTAMP NOT NULL DEFAULT NOW(),
//!   updated_at TIMESTAMP NOT NULL DEFAULT NOW(),
//!   UNIQUE (document_id, case_id)
//! );
//! ```
//!
//! Attempts are never deleted except by supersession: when a closed case
//! is re-encountered, its `NOT_COMPLETED` attempts from earlier partial
//! runs are dropped so the current run can re-derive the document set.
//! `archive_id` and `archive_url` are present only once the attempt has
//! completed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::models::statuses::ArchiveStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ArchiveAttempt {
    pub id: i64,
    pub document_id: String,
    pub case_id: String,
    pub document_name: Option<String>,
    pub document_type: Option<String>,
    pub batch_run_id: i64,
    pub status: ArchiveStatus,
    pub archive_id: Option<String>,
    pub archive_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// New archive attempt for creation (without generated fields). Attempts
/// always start `NOT_COMPLETED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArchiveAttempt {
    pub document_id: String,
    pub case_id: String,
    pub document_name: Option<String>,
    pub document_type: Option<String>,
    pub batch_run_id: i64,
}

impl ArchiveAttempt {
    pub async fn create(
        pool: &PgPool,
        new_attempt: NewArchiveAttempt,
    ) -> Result<ArchiveAttempt, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO archivist_archive_attempts (
                document_id, case_id, document_name, document_type,
                batch_run_id, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'NOT_COMPLETED', NOW(), NOW())
            RETURNING id, document_id, case_id, document_name, document_type,
                      batch_run_id, status, archive_id, archive_url, created_at, updated_at
            "#,
        )
        .bind(new_attempt.document_id)
        .bind(new_attempt.case_id)
        .bind(new_attempt.document_name)
        .bind(new_attempt.document_type)
        .bind(new_attempt.batch_run_id)
        .fetch_one(pool)
        .await
    }

    /// Natural-key lookup backing the idempotency check: at most one
    /// attempt exists per `(document_id, case_id)` across all runs.
    pub async fn find_by_document_and_case(
        pool: &PgPool,
        document_id: &str,
        case_id: &str,
    ) -> Result<Option<ArchiveAttempt>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, document_id, case_id, document_name, document_type,
                   batch_run_id, status, archive_id, archive_url, created_at, updated_at
            FROM archivist_archive_attempts
            WHERE document_id = $1 AND case_id = $2
            "#,
        )
        .bind(document_id)
        .bind(case_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_batch_run(
        pool: &PgPool,
        batch_run_id: i64,
    ) -> Result<Vec<ArchiveAttempt>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, document_id, case_id, document_name, document_type,
                   batch_run_id, status, archive_id, archive_url, created_at, updated_at
            FROM archivist_archive_attempts
            WHERE batch_run_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(batch_run_id)
        .fetch_all(pool)
        .await
    }

    /// Persist a status/outcome mutation.
    pub async fn save(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE archivist_archive_attempts
            SET status = $2, archive_id = $3, archive_url = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(self.status)
        .bind(self.archive_id.as_deref())
        .bind(self.archive_url.as_deref())
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Supersession: drop a case's attempts in the given status. Returns
    /// the number of rows removed.
    pub async fn delete_by_case_and_status(
        pool: &PgPool,
        case_id: &str,
        status: ArchiveStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM archivist_archive_attempts
            WHERE case_id = $1 AND status = $2
            "#,
        )
        .bind(case_id)
        .bind(status)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
