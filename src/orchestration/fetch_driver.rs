//! # Paged Fetch Driver
//!
//! Walks a date window through the case export source page by page. The
//! source may return pages narrower than requested, stale pages or empty
//! pages, and cannot say "no more data"; the driver therefore owns
//! termination through a strictly advancing lower bound: every iteration
//! moves it forward, by the source-reported page end when that makes
//! progress and by a fixed one-hour step otherwise, clamped to the upper
//! bound. Worst case the window is exhausted in
//! `ceil((upper - lower) / 1h)` iterations.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::constants::FETCH_FALLBACK_STEP_HOURS;
use crate::integration::case_export::{CaseExportClient, CaseExportError, CasePage};

/// The timestamp window a run fetches over. The lower bound is exclusive
/// and advances; the upper bound is inclusive and fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchFilter {
    pub lower_exclusive_bound: NaiveDateTime,
    pub upper_inclusive_bound: NaiveDateTime,
}

impl BatchFilter {
    /// Convert a date window to timestamp bounds: lower is `start` at
    /// midnight, upper is `end` at 23:59:59 — unless `end` is today, in
    /// which case the upper bound is `now` so the window never reaches
    /// into the future.
    pub fn for_window(start: NaiveDate, end: NaiveDate, now: NaiveDateTime) -> Self {
        let lower = start.and_time(NaiveTime::MIN);
        let upper = if end < now.date() {
            end.and_hms_opt(23, 59, 59).expect("valid end-of-day time")
        } else {
            now
        };

        Self {
            lower_exclusive_bound: lower,
            upper_inclusive_bound: upper,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.lower_exclusive_bound >= self.upper_inclusive_bound
    }

    /// Advance the lower bound after a page. The source's `page_end` is
    /// trusted only when it actually makes forward progress; otherwise a
    /// fixed step keeps the loop moving. Either way the bound never
    /// passes the upper bound.
    pub fn advance(&mut self, page_end: Option<NaiveDateTime>) {
        let next = match page_end {
            Some(end) if end > self.lower_exclusive_bound => end,
            _ => self.lower_exclusive_bound + Duration::hours(FETCH_FALLBACK_STEP_HOURS),
        };

        self.lower_exclusive_bound = next.min(self.upper_inclusive_bound);
    }
}

/// Sequential page iterator over a [`BatchFilter`] window. Each page must
/// be fully processed before the next call, because dedup decisions for
/// later pages depend on attempts persisted while handling earlier ones.
pub struct PagedFetchDriver<'a> {
    case_export: &'a dyn CaseExportClient,
    filter: BatchFilter,
}

impl<'a> PagedFetchDriver<'a> {
    pub fn new(case_export: &'a dyn CaseExportClient, filter: BatchFilter) -> Self {
        Self {
            case_export,
            filter,
        }
    }

    /// Fetch the next page, or `None` once the window is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<CasePage>, CaseExportError> {
        if self.filter.is_exhausted() {
            return Ok(None);
        }

        debug!(
            lower = %self.filter.lower_exclusive_bound,
            upper = %self.filter.upper_inclusive_bound,
            "fetching case page"
        );

        let page = self
            .case_export
            .fetch_page(
                self.filter.lower_exclusive_bound,
                self.filter.upper_inclusive_bound,
            )
            .await?;

        self.filter.advance(page.page_end);

        Ok(Some(page))
    }

    pub fn filter(&self) -> &BatchFilter {
        &self.filter
    }
}
