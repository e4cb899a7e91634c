//! Stat sweeps: one batch per value of a single template stat.

use serde::{Deserialize, Serialize};
use tracing::info;

use skirmish_core::error::Result;
use skirmish_core::trial::AggregateResult;
use skirmish_core::units::StatPath;

use crate::batch::{run_batch_parallel, BatchConfig};

/// What to sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Batch run at every point, with the swept stat overwritten.
    pub base: BatchConfig,
    /// Stat to vary.
    pub stat: StatPath,
    /// First value.
    pub from: i32,
    /// Last value, inclusive.
    pub to: i32,
    /// Increment between values.
    pub step: u32,
}

impl SweepConfig {
    /// Values visited by the sweep, in order.
    pub fn values(&self) -> impl Iterator<Item = i32> {
        (self.from..=self.to).step_by(self.step.max(1) as usize)
    }
}

/// Result of one sweep point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Stat value used.
    pub value: i32,
    /// Batch outcome at that value.
    pub aggregate: AggregateResult,
}

/// Run the sweep.
///
/// Every value is checked against the template rules before any batch
/// runs; a non-positive value fails the whole sweep.
pub fn run_sweep(config: &SweepConfig) -> Result<Vec<SweepPoint>> {
    let mut batches = Vec::new();
    for value in config.values() {
        let mut batch = config.base.clone();
        batch.spec.templates.set_stat(config.stat, value)?;
        batches.push((value, batch));
    }

    info!(
        "Sweeping {} over {} values ({} trials each)",
        config.stat,
        batches.len(),
        config.base.spec.trials
    );

    Ok(batches
        .into_iter()
        .map(|(value, batch)| {
            let results = run_batch_parallel(batch);
            info!(
                "{} = {}: {} - {}",
                config.stat, value, results.aggregate.side_one_wins, results.aggregate.side_two_wins
            );
            SweepPoint {
                value,
                aggregate: results.aggregate,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::error::SkirmishError;
    use skirmish_core::units::Side;

    fn sweep(stat: &str, from: i32, to: i32, step: u32) -> SweepConfig {
        SweepConfig {
            base: BatchConfig::default().with_trials(40).with_seed(1),
            stat: stat.parse().unwrap(),
            from,
            to,
            step,
        }
    }

    #[test]
    fn test_values_inclusive() {
        let values: Vec<i32> = sweep("archer.speed", 1, 7, 2).values().collect();
        assert_eq!(values, vec![1, 3, 5, 7]);
        let values: Vec<i32> = sweep("archer.speed", 2, 2, 0).values().collect();
        assert_eq!(values, vec![2]);
    }

    #[test]
    fn test_sweep_runs_one_batch_per_value() {
        let points = run_sweep(&sweep("footman.armor", 1, 3, 1)).unwrap();
        assert_eq!(points.len(), 3);
        for point in &points {
            assert_eq!(point.aggregate.trials_run, 40);
            assert!(point.aggregate.decided() <= 40);
        }
    }

    #[test]
    fn test_archer_hp_sweep_favours_archer() {
        let points = run_sweep(&sweep("archer.hp", 1, 30, 29)).unwrap();
        let weak = points[0].aggregate.wins(Side::One);
        let strong = points[1].aggregate.wins(Side::One);
        assert!(strong > weak);
    }

    #[test]
    fn test_non_positive_values_fail() {
        let err = run_sweep(&sweep("archer.speed", 0, 3, 1)).unwrap_err();
        assert!(matches!(err, SkirmishError::InvalidTemplate { value: 0, .. }));
    }
}
