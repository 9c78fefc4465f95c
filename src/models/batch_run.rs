//! # Batch Run Model
//!
//! One row per archival run: the date window the run is responsible for,
//! how it was triggered and whether every archive attempt belonging to it
//! has completed.
//!
//! ## Database Schema
//!
//! Maps to the `archivist_batch_runs` table:
//! ```sql
//! CREATE TABLE archivist_batch_runs (
//!   id BIGSERIAL PRIMARY KEY,
//!   start_date DATE NOT NULL,
//!   end_date DATE NOT NULL,
//!   batch_trigger VARCHAR NOT NULL,
//!   status VARCHAR NOT NULL,
//!   created_at TIMESTAMP NOT NULL DEFAULT NOW(),
//!   updated_at TIMESTAMP NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! A run is created `NOT_COMPLETED` before any fetch happens, so a crash
//! mid-batch leaves a durable marker. Only the completion reconciler ever
//! flips the status, and only in one direction.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::models::statuses::{ArchiveStatus, BatchTrigger};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BatchRun {
    pub id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub batch_trigger: BatchTrigger,
    pub status: ArchiveStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// New batch run for creation (without generated fields). Runs always
/// start `NOT_COMPLETED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatchRun {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub batch_trigger: BatchTrigger,
}

impl BatchRun {
    /// Persist a new run with status `NOT_COMPLETED`.
    pub async fn create(pool: &PgPool, new_run: NewBatchRun) -> Result<BatchRun, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO archivist_batch_runs (start_date, end_date, batch_trigger, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'NOT_COMPLETED', NOW(), NOW())
            RETURNING id, start_date, end_date, batch_trigger, status, created_at, updated_at
            "#,
        )
        .bind(new_run.start_date)
        .bind(new_run.end_date)
        .bind(new_run.batch_trigger)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<BatchRun>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, start_date, end_date, batch_trigger, status, created_at, updated_at
            FROM archivist_batch_runs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// The completed run with the latest window end, if any. This is the
    /// anchor the window planner measures scheduled requests against.
    pub async fn latest_completed(pool: &PgPool) -> Result<Option<BatchRun>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, start_date, end_date, batch_trigger, status, created_at, updated_at
            FROM archivist_batch_runs
            WHERE status = 'COMPLETED'
            ORDER BY end_date DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_status(
        pool: &PgPool,
        status: ArchiveStatus,
    ) -> Result<Vec<BatchRun>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, start_date, end_date, batch_trigger, status, created_at, updated_at
            FROM archivist_batch_runs
            WHERE status = $1
            ORDER BY created_at
            "#,
        )
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// One-way transition to `COMPLETED`.
    pub async fn mark_completed(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE archivist_batch_runs
            SET status = 'COMPLETED', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
