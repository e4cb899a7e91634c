//! Completion notifications during a batch.

use serde::{Deserialize, Serialize};

/// Completion state of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Trials finished so far.
    pub completed: u32,
    /// Trials in the batch.
    pub total: u32,
}

impl Progress {
    /// Completed fraction in `0.0..=1.0`. An empty batch counts as complete.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        f64::from(self.completed) / f64::from(self.total)
    }

    /// Completed percentage in `0.0..=100.0`.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Whether every trial has finished.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// How often progress is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProgressGranularity {
    /// Each time another 5% of the batch completes.
    #[default]
    FivePercent,
    /// After every trial.
    EveryTrial,
    /// Never.
    Silent,
}

impl ProgressGranularity {
    /// Whether the `completed`-th completion out of `total` is reported.
    ///
    /// Each boundary is crossed by exactly one completion count, so
    /// concurrent workers sharing a counter report every boundary once.
    #[must_use]
    pub fn is_boundary(self, completed: u32, total: u32) -> bool {
        match self {
            ProgressGranularity::Silent => false,
            ProgressGranularity::EveryTrial => completed > 0,
            ProgressGranularity::FivePercent => {
                if total == 0 || completed == 0 {
                    return false;
                }
                let bucket = |n: u32| u64::from(n) * 20 / u64::from(total);
                bucket(completed) > bucket(completed - 1)
            }
        }
    }
}

/// Decides which completions are worth reporting.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: u32,
    granularity: ProgressGranularity,
}

impl ProgressTracker {
    /// Track a batch of `total` trials.
    #[must_use]
    pub fn new(total: u32, granularity: ProgressGranularity) -> Self {
        Self { total, granularity }
    }

    /// Record that `completed` trials are done. Returns the progress to
    /// report, if this completion crosses a reporting boundary.
    pub fn record(&self, completed: u32) -> Option<Progress> {
        self.granularity
            .is_boundary(completed, self.total)
            .then_some(Progress {
                completed,
                total: self.total,
            })
    }
}
