//! # Window Planner
//!
//! Decides the effective date window for a new batch run. Manual windows
//! are used verbatim; scheduled windows are measured against the latest
//! *completed* run so that redundant runs are skipped and gaps between
//! runs are closed instead of silently skipped over.

use chrono::{Days, NaiveDate};
use tracing::info;

use crate::models::{BatchRun, BatchTrigger};

/// Outcome of planning a requested window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowPlan {
    /// The requested scheduled window is already covered by the latest
    /// completed run; no batch run is created.
    Skip { latest_end: NaiveDate },
    /// Proceed with this effective window. `adjusted` is set when the
    /// start was pulled back to close a gap.
    Proceed {
        start: NaiveDate,
        end: NaiveDate,
        adjusted: bool,
    },
}

/// Plan the effective window for a `(start, end, trigger)` request given
/// the latest completed run.
pub fn plan_window(
    start: NaiveDate,
    end: NaiveDate,
    trigger: BatchTrigger,
    latest_completed: Option<&BatchRun>,
) -> WindowPlan {
    if trigger == BatchTrigger::Manual {
        return WindowPlan::Proceed {
            start,
            end,
            adjusted: false,
        };
    }

    let Some(latest) = latest_completed else {
        return WindowPlan::Proceed {
            start,
            end,
            adjusted: false,
        };
    };

    // A scheduled window that doesn't reach past the latest completed run
    // adds nothing.
    if end <= latest.end_date {
        info!(
            requested_end = %end,
            latest_end = %latest.end_date,
            "scheduled window is already covered by the latest completed run, skipping"
        );
        return WindowPlan::Skip {
            latest_end: latest.end_date,
        };
    }

    // A gap between the latest completed run and this window would leave
    // documents behind; pull the start back to the day after that run.
    let day_after_latest = latest.end_date + Days::new(1);
    if start > day_after_latest {
        info!(
            requested_start = %start,
            effective_start = %day_after_latest,
            "gap since the latest completed run, adjusting start date"
        );
        return WindowPlan::Proceed {
            start: day_after_latest,
            end,
            adjusted: true,
        };
    }

    WindowPlan::Proceed {
        start,
        end,
        adjusted: false,
    }
}
