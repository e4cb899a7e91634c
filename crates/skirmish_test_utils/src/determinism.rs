//! Determinism testing utilities.
//!
//! Provides a harness for verifying that batches produce identical results
//! given identical inputs.
//!
//! # Testing Strategy
//!
//! Every trial draws from its own PRNG seeded with `seed + index`. Sources
//! of non-determinism this harness guards against include:
//!
//! - **Shared RNG state**: trials drawing from a common generator would
//!   make results depend on execution order.
//!
//! - **Aliased units**: a template or unit shared between trials would
//!   carry damage from one trial into the next.
//!
//! - **Thread scheduling**: parallel batches must merge to the same totals
//!   as sequential ones.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use skirmish_core::trial::{run_batch, AggregateResult, BatchSpec};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Result hash from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic batch).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the batch was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Batch is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash of the fields of an aggregate that must be reproducible.
#[must_use]
pub fn aggregate_hash(result: &AggregateResult) -> u64 {
    compute_hash(&(
        result.trials_requested,
        result.trials_run,
        result.side_one_wins,
        result.side_two_wins,
        result.stalemates,
        result.no_contests,
        result.total_steps,
    ))
}

/// Run the same batch `runs` times sequentially and compare results.
pub fn verify_batch_determinism(spec: &BatchSpec, runs: usize) -> DeterminismResult {
    let hashes: Vec<u64> = (0..runs)
        .map(|_| aggregate_hash(&run_batch(spec, |_| {})))
        .collect();
    tracing::debug!("Determinism hashes: {:?}", hashes);
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Run the same batch on `threads` scoped threads and compare results.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn verify_threaded_determinism(spec: &BatchSpec, threads: usize) -> DeterminismResult {
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| aggregate_hash(&run_batch(spec, |_| {}))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Compare two specs trial by trial, finding the first trial whose report
/// differs.
///
/// `None` if every trial matches.
#[must_use]
pub fn find_first_divergence(a: &BatchSpec, b: &BatchSpec) -> Option<u32> {
    let trials = a.trials.min(b.trials);
    (0..trials).find(|&i| a.run_indexed_trial(i) != b.run_indexed_trial(i))
}

/// Proptest strategies for skirmish configurations.
pub mod strategies {
    use proptest::prelude::*;
    use skirmish_core::data::{RosterConfig, UnitTemplates};
    use skirmish_core::units::{Side, UnitTemplate, UnitType};

    /// A valid template with small stats.
    pub fn arb_template() -> impl Strategy<Value = UnitTemplate> {
        (1i32..12, 1i32..8, 1i32..8, 1i32..30)
            .prop_map(|(strength, armor, speed, hp)| UnitTemplate::new(strength, armor, speed, hp))
    }

    /// A pair of valid templates.
    pub fn arb_templates() -> impl Strategy<Value = UnitTemplates> {
        (arb_template(), arb_template())
            .prop_map(|(archer, footman)| UnitTemplates { archer, footman })
    }

    /// A unit type.
    pub fn arb_unit_type() -> impl Strategy<Value = UnitType> {
        prop_oneof![Just(UnitType::Archer), Just(UnitType::Footman)]
    }

    /// A roster where both sides field between 1 and `max_per_side` units.
    pub fn arb_contested_roster(max_per_side: i64) -> impl Strategy<Value = RosterConfig> {
        let side = move || (0..=max_per_side, 0..=max_per_side);
        (side(), side())
            .prop_filter("both sides need units", |((a1, f1), (a2, f2))| {
                a1 + f1 > 0 && a2 + f2 > 0
            })
            .prop_map(|((a1, f1), (a2, f2))| {
                RosterConfig::new()
                    .with_units(Side::One, UnitType::Footman, f1)
                    .with_units(Side::One, UnitType::Archer, a1)
                    .with_units(Side::Two, UnitType::Footman, f2)
                    .with_units(Side::Two, UnitType::Archer, a2)
            })
    }

    /// Templates in which every unit can hurt every other unit, so battles
    /// always terminate: footman strength exceeds both armors.
    pub fn arb_lethal_templates() -> impl Strategy<Value = UnitTemplates> {
        (arb_templates(), 0i32..5).prop_map(|(mut templates, margin)| {
            let max_armor = templates.archer.armor.max(templates.footman.armor);
            templates.footman.strength = max_armor + 1 + margin;
            templates
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{mixed_roster, seeded_spec};
    use proptest::prelude::*;

    #[test]
    fn test_same_seed_is_deterministic() {
        let spec = seeded_spec(mixed_roster(3, 2), 40, 17);
        verify_batch_determinism(&spec, 3).assert_deterministic();
    }

    #[test]
    fn test_threads_agree() {
        let spec = seeded_spec(mixed_roster(2, 2), 40, 3);
        verify_threaded_determinism(&spec, 4).assert_deterministic();
    }

    #[test]
    fn test_divergence_found_for_different_seeds() {
        let a = seeded_spec(mixed_roster(4, 4), 50, 1);
        let b = seeded_spec(mixed_roster(4, 4), 50, 2);
        assert_eq!(find_first_divergence(&a, &a.clone()), None);
        assert!(find_first_divergence(&a, &b).is_some());
    }

    proptest! {
        /// Any roster and template combination replays identically.
        #[test]
        fn prop_batches_are_reproducible(
            roster in strategies::arb_contested_roster(4),
            templates in strategies::arb_lethal_templates(),
            seed in any::<u64>(),
        ) {
            let spec = seeded_spec(roster, 5, seed).with_templates(templates);
            prop_assert!(verify_batch_determinism(&spec, 2).is_deterministic);
        }
    }
}
