//! Trial aggregation: many independent battles, one win-rate summary.
//!
//! Every trial rebuilds its roster from the configuration and draws from
//! its own PRNG seeded with `seed + trial_index`, so a trial's result
//! depends only on the batch spec and its index. That makes sequential and
//! parallel runs of the same batch produce identical aggregates.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::battle::{resolve_with, BattleConfig, BattleOutcome, BattleReport};
use crate::data::{RosterConfig, UnitTemplates};
use crate::draw::{DrawSource, RandomDraws};
use crate::progress::{Progress, ProgressGranularity, ProgressTracker};
use crate::roster::build;
use crate::units::Side;

/// Everything needed to run a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSpec {
    /// Units fielded by each side.
    pub roster: RosterConfig,
    /// Base stats per unit type.
    pub templates: UnitTemplates,
    /// Number of trials.
    pub trials: u32,
    /// Seed of trial 0. Trial `i` uses `seed + i`.
    pub seed: u64,
    /// Resolution settings.
    #[serde(default)]
    pub battle: BattleConfig,
    /// How often progress is reported.
    #[serde(default)]
    pub granularity: ProgressGranularity,
}

impl Default for BatchSpec {
    fn default() -> Self {
        Self {
            roster: RosterConfig::classic(),
            templates: UnitTemplates::default(),
            trials: 100,
            seed: 0,
            battle: BattleConfig::default(),
            granularity: ProgressGranularity::default(),
        }
    }
}

impl BatchSpec {
    /// Create a spec for a roster with default templates.
    #[must_use]
    pub fn new(roster: RosterConfig, trials: u32) -> Self {
        Self {
            roster,
            trials,
            ..Default::default()
        }
    }

    /// Set templates.
    #[must_use]
    pub fn with_templates(mut self, templates: UnitTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Set the starting seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the progress granularity.
    #[must_use]
    pub fn with_granularity(mut self, granularity: ProgressGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Seed used by trial `index`.
    #[must_use]
    pub const fn trial_seed(&self, index: u32) -> u64 {
        self.seed.wrapping_add(index as u64)
    }

    /// Run trial `index` of this batch.
    #[must_use]
    pub fn run_indexed_trial(&self, index: u32) -> BattleReport {
        let mut draws = RandomDraws::seeded(self.trial_seed(index));
        run_trial(
            &self.roster,
            &self.templates,
            &self.battle,
            &mut draws,
        )
    }
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// All requested trials ran.
    Completed,
    /// A side fields no units; no trials ran.
    NoContest,
    /// Zero trials were requested.
    NoTrials,
}

/// Win counts and rates across a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// How the batch ended.
    pub status: BatchStatus,
    /// Trials requested (`N`).
    pub trials_requested: u32,
    /// Trials actually resolved.
    pub trials_run: u32,
    /// Side one victories.
    pub side_one_wins: u32,
    /// Side two victories.
    pub side_two_wins: u32,
    /// Trials stopped by the step limit.
    pub stalemates: u32,
    /// Trials in which a side had no units after building.
    pub no_contests: u32,
    /// Combat steps across all trials.
    pub total_steps: u64,
}

impl AggregateResult {
    /// An empty result for a batch of `trials`.
    #[must_use]
    pub const fn new(trials_requested: u32) -> Self {
        Self {
            status: BatchStatus::Completed,
            trials_requested,
            trials_run: 0,
            side_one_wins: 0,
            side_two_wins: 0,
            stalemates: 0,
            no_contests: 0,
            total_steps: 0,
        }
    }

    /// Result of a batch that never ran.
    #[must_use]
    pub const fn skipped(trials_requested: u32, status: BatchStatus) -> Self {
        let mut result = Self::new(trials_requested);
        result.status = status;
        result
    }

    /// Add one trial's report.
    pub fn record(&mut self, report: &BattleReport) {
        self.trials_run += 1;
        self.total_steps += report.steps;
        match report.outcome {
            BattleOutcome::Victory(Side::One) => self.side_one_wins += 1,
            BattleOutcome::Victory(Side::Two) => self.side_two_wins += 1,
            BattleOutcome::Stalemate => self.stalemates += 1,
            BattleOutcome::NoContest => self.no_contests += 1,
        }
    }

    /// Combine two partial results of the same batch.
    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        self.trials_run += other.trials_run;
        self.side_one_wins += other.side_one_wins;
        self.side_two_wins += other.side_two_wins;
        self.stalemates += other.stalemates;
        self.no_contests += other.no_contests;
        self.total_steps += other.total_steps;
        self
    }

    /// Wins for a side.
    #[must_use]
    pub const fn wins(&self, side: Side) -> u32 {
        match side {
            Side::One => self.side_one_wins,
            Side::Two => self.side_two_wins,
        }
    }

    /// Trials that produced a winner.
    #[must_use]
    pub const fn decided(&self) -> u32 {
        self.side_one_wins + self.side_two_wins
    }

    /// Win rate of a side in percent, rounded to one decimal.
    ///
    /// `None` when no trials were requested.
    #[must_use]
    pub fn win_rate(&self, side: Side) -> Option<f64> {
        win_rate_percent(self.wins(side), self.trials_requested)
    }

    /// Average combat steps per resolved trial.
    #[must_use]
    pub fn avg_steps(&self) -> Option<f64> {
        if self.trials_run == 0 {
            return None;
        }
        Some(self.total_steps as f64 / f64::from(self.trials_run))
    }
}

/// `round(wins / trials * 1000) / 10`, or `None` for an empty batch.
#[must_use]
pub fn win_rate_percent(wins: u32, trials: u32) -> Option<f64> {
    if trials == 0 {
        return None;
    }
    Some((f64::from(wins) / f64::from(trials) * 1000.0).round() / 10.0)
}

/// Build a fresh roster and fight one battle.
///
/// A trial in which a side has no units after building is a no contest.
pub fn run_trial(
    roster: &RosterConfig,
    templates: &UnitTemplates,
    config: &BattleConfig,
    draws: &mut impl DrawSource,
) -> BattleReport {
    let mut battlefield = build(roster, templates).battlefield;
    if battlefield.is_over() {
        return BattleReport {
            outcome: BattleOutcome::NoContest,
            steps: 0,
            survivors: 0,
        };
    }
    resolve_with(&mut battlefield, draws, config, |_| {})
}

/// Check whether a batch can run at all, logging any configuration issues.
///
/// Returns the status to report if it cannot.
#[must_use]
pub fn precheck(spec: &BatchSpec) -> Option<BatchStatus> {
    let build = build(&spec.roster, &spec.templates);
    for issue in &build.issues {
        warn!("Roster configuration issue: {}", issue);
    }
    if build.battlefield.is_over() {
        return Some(BatchStatus::NoContest);
    }
    if spec.trials == 0 {
        return Some(BatchStatus::NoTrials);
    }
    None
}

/// Run every trial of a batch sequentially.
///
/// `on_progress` is called at the boundaries chosen by the batch's
/// granularity. Batches where a side fields no units are skipped entirely.
pub fn run_batch(spec: &BatchSpec, mut on_progress: impl FnMut(Progress)) -> AggregateResult {
    if let Some(status) = precheck(spec) {
        info!("Skipping batch: {:?}", status);
        return AggregateResult::skipped(spec.trials, status);
    }

    info!(
        "Starting batch: {} trials, {} vs {} units",
        spec.trials,
        spec.roster.side_total(Side::One),
        spec.roster.side_total(Side::Two)
    );

    let mut result = AggregateResult::new(spec.trials);
    let tracker = ProgressTracker::new(spec.trials, spec.granularity);

    for index in 0..spec.trials {
        let report = spec.run_indexed_trial(index);
        result.record(&report);

        if let Some(progress) = tracker.record(index + 1) {
            debug!("Percent complete: {:.0}", progress.percent());
            on_progress(progress);
        }
    }

    info!(
        "Batch complete: {} - {} ({} stalemates)",
        result.side_one_wins, result.side_two_wins, result.stalemates
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RosterEntry;
    use crate::units::{UnitTemplate, UnitType};

    #[test]
    fn test_win_rate_rounding() {
        assert_eq!(win_rate_percent(1, 3), Some(33.3));
        assert_eq!(win_rate_percent(2, 3), Some(66.7));
        assert_eq!(win_rate_percent(1, 8), Some(12.5));
        assert_eq!(win_rate_percent(100, 100), Some(100.0));
        assert_eq!(win_rate_percent(0, 0), None);
    }

    #[test]
    fn test_batch_counts_every_trial() {
        let spec = BatchSpec::new(RosterConfig::classic(), 200).with_seed(11);
        let result = run_batch(&spec, |_| {});

        assert_eq!(result.status, BatchStatus::Completed);
        assert_eq!(result.trials_run, 200);
        assert_eq!(result.decided(), 200);
        assert_eq!(result.stalemates, 0);
        assert!(result.decided() <= result.trials_requested);
        assert!(result.avg_steps().unwrap() >= 1.0);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let spec = BatchSpec::new(RosterConfig::classic(), 50).with_seed(99);
        assert_eq!(run_batch(&spec, |_| {}), run_batch(&spec, |_| {}));
    }

    #[test]
    fn test_no_contest_when_side_has_no_units() {
        let roster = RosterConfig::new().with_units(Side::One, UnitType::Archer, 3);
        let spec = BatchSpec::new(roster, 100);
        let mut calls = 0;
        let result = run_batch(&spec, |_| calls += 1);

        assert_eq!(result.status, BatchStatus::NoContest);
        assert_eq!(result.trials_run, 0);
        assert_eq!(result.side_one_wins, 0);
        assert_eq!(result.side_two_wins, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_zero_trials_has_undefined_rates() {
        let spec = BatchSpec::new(RosterConfig::classic(), 0);
        let result = run_batch(&spec, |_| {});
        assert_eq!(result.status, BatchStatus::NoTrials);
        assert_eq!(result.win_rate(Side::One), None);
        assert_eq!(result.win_rate(Side::Two), None);
        assert_eq!(result.avg_steps(), None);
    }

    #[test]
    fn test_unknown_types_are_skipped_not_fatal() {
        let roster = RosterConfig::new()
            .with_units(Side::One, UnitType::Footman, 2)
            .with_entry(RosterEntry {
                side: Side::One,
                unit_type: "catapult".to_string(),
                count: 1,
            })
            .with_units(Side::Two, UnitType::Archer, 2);
        let result = run_batch(&BatchSpec::new(roster, 20), |_| {});
        assert_eq!(result.status, BatchStatus::Completed);
        assert_eq!(result.decided(), 20);
    }

    #[test]
    fn test_invalid_template_leaves_no_contest() {
        let templates = UnitTemplates {
            archer: UnitTemplate::new(5, 1, 0, 10),
            footman: UnitTemplate::footman(),
        };
        let spec = BatchSpec::new(RosterConfig::classic(), 10).with_templates(templates);
        let result = run_batch(&spec, |_| {});
        assert_eq!(result.status, BatchStatus::NoContest);
        assert_eq!(result.trials_run, 0);

        let mut draws = crate::draw::ScriptedDraws::default();
        let report = run_trial(&spec.roster, &spec.templates, &spec.battle, &mut draws);
        assert_eq!(report.outcome, BattleOutcome::NoContest);
        assert!(!draws.is_exhausted());
    }

    #[test]
    fn test_progress_callbacks() {
        let spec = BatchSpec::new(RosterConfig::classic(), 40)
            .with_granularity(ProgressGranularity::EveryTrial);
        let mut seen = Vec::new();
        run_batch(&spec, |p| seen.push(p.completed));
        assert_eq!(seen, (1..=40).collect::<Vec<_>>());

        let spec = spec.with_granularity(ProgressGranularity::FivePercent);
        let mut count = 0;
        run_batch(&spec, |_| count += 1);
        assert_eq!(count, 20);
    }

    #[test]
    fn test_merge_equals_sequential() {
        let spec = BatchSpec::new(RosterConfig::classic(), 30).with_seed(5);
        let mut left = AggregateResult::new(30);
        let mut right = AggregateResult::new(30);
        for i in 0..15 {
            left.record(&spec.run_indexed_trial(i));
        }
        for i in 15..30 {
            right.record(&spec.run_indexed_trial(i));
        }
        assert_eq!(left.merge(&right), run_batch(&spec, |_| {}));
    }
}
