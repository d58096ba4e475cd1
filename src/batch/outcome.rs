//! Shared, append-only record of a batch run.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Lifecycle of a batch runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Complete,
}

/// Snapshot of batch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl Progress {
    /// Files that reached SUCCESS or FAIL.
    pub fn done(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Completed fraction in `0.0..=1.0`. An empty batch counts as complete.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.done() as f32 / self.total as f32
    }
}

#[derive(Debug, Default)]
struct OutcomeState {
    state: RunState,
    total: usize,
    succeeded: Vec<PathBuf>,
    failed: Vec<PathBuf>,
}

impl OutcomeState {
    fn progress(&self) -> Progress {
        Progress {
            total: self.total,
            succeeded: self.succeeded.len(),
            failed: self.failed.len(),
        }
    }
}

/// Success and failure lists plus the expected total.
///
/// Every mutation happens under one lock, so an append and the counts read
/// back with it are always consistent.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    inner: Mutex<OutcomeState>,
}

impl BatchOutcome {
    /// Clear both lists and start a run of `total` files.
    pub(super) fn reset(&self, total: usize) {
        let mut inner = self.inner.lock();
        inner.succeeded.clear();
        inner.failed.clear();
        inner.total = total;
        inner.state = RunState::Running;
    }

    /// Append `path` to the matching list and return the new counts.
    pub(super) fn record(&self, path: PathBuf, success: bool) -> Progress {
        let mut inner = self.inner.lock();
        if success {
            inner.succeeded.push(path);
        } else {
            inner.failed.push(path);
        }
        inner.progress()
    }

    pub(super) fn complete(&self) -> Progress {
        let mut inner = self.inner.lock();
        inner.state = RunState::Complete;
        inner.progress()
    }

    pub(super) fn contains(&self, path: &Path) -> bool {
        let inner = self.inner.lock();
        inner.succeeded.iter().any(|p| p == path) || inner.failed.iter().any(|p| p == path)
    }

    pub fn state(&self) -> RunState {
        self.inner.lock().state
    }

    pub fn progress(&self) -> Progress {
        self.inner.lock().progress()
    }

    pub fn succeeded(&self) -> Vec<PathBuf> {
        self.inner.lock().succeeded.clone()
    }

    pub fn failed(&self) -> Vec<PathBuf> {
        self.inner.lock().failed.clone()
    }
}
