//! # Single-Flight Run Guard
//!
//! At most one archival run executes at a time. Concurrent runs would
//! race on attempt uniqueness and on bound advancement, so every entry
//! point acquires a permit before touching the history store and holds
//! it for the whole run. Acquisition is non-blocking: a second caller is
//! rejected immediately rather than queued behind a long batch.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, TryLockError};

#[derive(Debug, thiserror::Error)]
#[error("an archival run is already in progress")]
pub struct RunInProgress;

/// Scoped permit; the slot frees when this is dropped.
#[derive(Debug)]
pub struct RunPermit {
    _guard: OwnedMutexGuard<()>,
}

#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    slot: Arc<Mutex<()>>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<RunPermit, RunInProgress> {
        self.slot
            .clone()
            .try_lock_owned()
            .map(|guard| RunPermit { _guard: guard })
            .map_err(|_: TryLockError| RunInProgress)
    }
}
