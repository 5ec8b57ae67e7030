//! Progress reporting for scan phases.
//!
//! The tester announces how many files a phase will process, each file
//! that finishes, and the end of the phase. Implementations only observe;
//! they cannot influence results.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// A scan phase that reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Loading files and running detection predicates
    Detection,
    /// Running extraction functions for rules that hit
    Matching,
}

impl Phase {
    /// Get the phase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detection => "pii_detection",
            Self::Matching => "pii_matcher",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observer for phase progress.
pub trait Progress: Send + Sync {
    /// A phase is starting with `total` units of work.
    fn begin(&self, phase: Phase, total: usize);

    /// One unit of work finished.
    fn advance(&self, phase: Phase);

    /// Every unit of work has joined.
    fn finish(&self, phase: Phase);
}

/// Discards all progress events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn begin(&self, _phase: Phase, _total: usize) {}

    fn advance(&self, _phase: Phase) {}

    fn finish(&self, _phase: Phase) {}
}

/// Logs progress through `tracing`.
#[derive(Debug, Default)]
pub struct LogProgress {
    total: AtomicUsize,
    done: AtomicUsize,
}

impl LogProgress {
    /// Create a new logging progress observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units finished in the current phase.
    #[must_use]
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

impl Progress for LogProgress {
    fn begin(&self, phase: Phase, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
        info!(%phase, total, "Phase started");
    }

    fn advance(&self, phase: Phase) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(%phase, done, total = self.total.load(Ordering::Relaxed), "File finished");
    }

    fn finish(&self, phase: Phase) {
        info!(%phase, done = self.done(), "Phase complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Detection.as_str(), "pii_detection");
        assert_eq!(Phase::Matching.to_string(), "pii_matcher");
    }

    #[test]
    fn test_log_progress_counts() {
        let progress = LogProgress::new();
        progress.begin(Phase::Detection, 3);
        progress.advance(Phase::Detection);
        progress.advance(Phase::Detection);
        progress.finish(Phase::Detection);
        assert_eq!(progress.done(), 2);

        progress.begin(Phase::Matching, 1);
        assert_eq!(progress.done(), 0);
    }
}
