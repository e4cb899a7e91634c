//! Parallel batch runner.
//!
//! Trials are independent and seeded by index, so they can be fanned out
//! over a rayon pool in any order and folded back into one
//! [`AggregateResult`] equal to the sequential one.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use skirmish_core::progress::{Progress, ProgressGranularity};
use skirmish_core::roster::build;
use skirmish_core::trial::{precheck, run_batch, AggregateResult, BatchSpec};
use skirmish_core::units::Side;

use crate::scenario::Scenario;

/// Configuration for a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Scenario name, for reports.
    pub scenario: String,
    /// What to run.
    pub spec: BatchSpec,
    /// Worker threads (0 = rayon default).
    pub parallel: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_scenario(&Scenario::classic())
    }
}

impl BatchConfig {
    /// Config for a scenario.
    #[must_use]
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            scenario: scenario.name.clone(),
            spec: scenario.to_batch_spec(),
            parallel: 0,
        }
    }

    /// Set trial count.
    #[must_use]
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.spec.trials = trials;
        self
    }

    /// Set seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.spec.seed = seed;
        self
    }

    /// Set worker thread count.
    #[must_use]
    pub fn with_parallel(mut self, threads: u32) -> Self {
        self.parallel = threads;
        self
    }
}

/// Results from a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used.
    pub config: BatchConfig,
    /// Win counts.
    pub aggregate: AggregateResult,
    /// Wall-clock runtime.
    pub duration_seconds: f64,
    /// Roster entries skipped because of configuration errors.
    pub issues: Vec<String>,
}

impl BatchResults {
    /// Save results to a JSON file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from a JSON file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }

    /// Trials per second of wall-clock time.
    #[must_use]
    pub fn throughput(&self) -> f64 {
        f64::from(self.aggregate.trials_run) / self.duration_seconds.max(0.001)
    }
}

/// Progress tracking shared between worker threads.
#[derive(Debug)]
pub struct BatchProgress {
    /// Total trials.
    pub total: u32,
    /// Reporting granularity.
    pub granularity: ProgressGranularity,
    completed: AtomicU32,
    start_time: Instant,
}

impl BatchProgress {
    /// Create a new progress tracker.
    #[must_use]
    pub fn new(total: u32, granularity: ProgressGranularity) -> Self {
        Self {
            total,
            granularity,
            completed: AtomicU32::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a finished trial. Returns the progress to report if this
    /// completion crosses a reporting boundary.
    pub fn record_completion(&self) -> Option<Progress> {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        self.granularity
            .is_boundary(completed, self.total)
            .then_some(Progress {
                completed,
                total: self.total,
            })
    }

    /// Current completion count.
    #[must_use]
    pub fn current(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Completion percentage.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        f64::from(self.current()) / f64::from(self.total.max(1)) * 100.0
    }

    /// Estimated time remaining.
    #[must_use]
    pub fn eta(&self) -> Duration {
        let completed = self.current();
        if completed == 0 {
            return Duration::from_secs(0);
        }
        let per_trial = self.start_time.elapsed().as_secs_f64() / f64::from(completed);
        let remaining = self.total.saturating_sub(completed);
        Duration::from_secs_f64(per_trial * f64::from(remaining))
    }
}

fn config_issues(spec: &BatchSpec) -> Vec<String> {
    build(&spec.roster, &spec.templates)
        .issues
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn fold_trials(spec: &BatchSpec, progress: &BatchProgress) -> AggregateResult {
    (0..spec.trials)
        .into_par_iter()
        .fold(
            || AggregateResult::new(spec.trials),
            |mut acc, index| {
                acc.record(&spec.run_indexed_trial(index));
                if let Some(p) = progress.record_completion() {
                    debug!(
                        "Percent complete: {:.0} (eta {}s)",
                        p.percent(),
                        progress.eta().as_secs()
                    );
                }
                acc
            },
        )
        .reduce(|| AggregateResult::new(spec.trials), |a, b| a.merge(&b))
}

/// Run a batch across a rayon pool.
///
/// Produces the same [`AggregateResult`] as
/// [`skirmish_core::trial::run_batch`] for the same spec.
pub fn run_batch_parallel(config: BatchConfig) -> BatchResults {
    let start = Instant::now();
    let spec = &config.spec;
    let issues = config_issues(spec);

    if let Some(status) = precheck(spec) {
        info!("Skipping batch '{}': {:?}", config.scenario, status);
        return BatchResults {
            aggregate: AggregateResult::skipped(spec.trials, status),
            duration_seconds: start.elapsed().as_secs_f64(),
            issues,
            config,
        };
    }

    info!(
        "Starting batch '{}': {} trials, {} vs {} units",
        config.scenario,
        spec.trials,
        spec.roster.side_total(Side::One),
        spec.roster.side_total(Side::Two)
    );

    let progress = BatchProgress::new(spec.trials, spec.granularity);
    let aggregate = if config.parallel > 0 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel as usize)
            .build()
        {
            Ok(pool) => pool.install(|| fold_trials(spec, &progress)),
            Err(e) => {
                warn!("Failed to build thread pool: {}, using global pool", e);
                fold_trials(spec, &progress)
            }
        }
    } else {
        fold_trials(spec, &progress)
    };

    let duration_seconds = start.elapsed().as_secs_f64();
    info!(
        "Batch complete: {} - {} ({} stalemates) in {:.2}s",
        aggregate.side_one_wins, aggregate.side_two_wins, aggregate.stalemates, duration_seconds
    );

    BatchResults {
        config,
        aggregate,
        duration_seconds,
        issues,
    }
}

/// Run a batch sequentially on the calling thread.
pub fn run_batch_sequential(config: BatchConfig) -> BatchResults {
    let start = Instant::now();
    let issues = config_issues(&config.spec);
    let aggregate = run_batch(&config.spec, |_| {});
    BatchResults {
        config,
        aggregate,
        duration_seconds: start.elapsed().as_secs_f64(),
        issues,
    }
}

/// Verify determinism: run the batch `runs` times in parallel plus once
/// sequentially, and check every aggregate matches.
pub fn verify_determinism(config: &BatchConfig, runs: u32) -> bool {
    let reference = run_batch_sequential(config.clone()).aggregate;
    (0..runs).all(|run| {
        let aggregate = run_batch_parallel(config.clone()).aggregate;
        let matches = aggregate == reference;
        if !matches {
            warn!(
                "Run {} diverged: {:?} vs sequential {:?}",
                run, aggregate, reference
            );
        }
        matches
    })
}
