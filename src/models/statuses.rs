//! # Status Enums
//!
//! The two-state archival status shared by batch runs and archive
//! attempts, and the trigger kind of a batch run. Both are persisted as
//! VARCHAR columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Archival status of a batch run or an archive attempt.
///
/// The transition `NotCompleted -> Completed` is one-way: a completed
/// record never reverts. Failed work simply stays `NotCompleted` until a
/// rerun resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchiveStatus {
    #[sqlx(rename = "NOT_COMPLETED")]
    NotCompleted,
    #[sqlx(rename = "COMPLETED")]
    Completed,
}

impl ArchiveStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ArchiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCompleted => write!(f, "NOT_COMPLETED"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for ArchiveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOT_COMPLETED" => Ok(Self::NotCompleted),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("unknown archive status: {s}")),
        }
    }
}

/// How a batch run was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchTrigger {
    /// Started by the periodic schedule; subject to window planning.
    #[sqlx(rename = "SCHEDULED")]
    Scheduled,
    /// Started by an operator with an explicit window; used verbatim.
    #[sqlx(rename = "MANUAL")]
    Manual,
}

impl fmt::Display for BatchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "SCHEDULED"),
            Self::Manual => write!(f, "MANUAL"),
        }
    }
}

impl std::str::FromStr for BatchTrigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(Self::Scheduled),
            "MANUAL" => Ok(Self::Manual),
            _ => Err(format!("unknown batch trigger: {s}")),
        }
    }
}
