//! Integration tests for the headless runner: scenario files, parallel
//! batches and JSON export.

use std::path::PathBuf;

use skirmish_core::trial::{run_batch, BatchStatus};
use skirmish_core::units::{Side, UnitType};
use skirmish_headless::batch::{run_batch_parallel, run_batch_sequential, BatchConfig, BatchResults};
use skirmish_headless::report::summary;
use skirmish_headless::scenario::{Scenario, ScenarioError};
use skirmish_test_utils::balance::within_sigma;
use skirmish_test_utils::fixtures::mixed_roster;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

// =============================================================================
// Scenario files
// =============================================================================

#[test]
fn test_bundled_classic_matches_builtin() {
    let loaded = Scenario::load(scenario_path("classic.ron")).unwrap();
    assert_eq!(loaded, Scenario::classic());
}

#[test]
fn test_bundled_scenarios_parse() {
    for name in ["classic.ron", "mixed_5v5.ron", "armor_wall.ron"] {
        let scenario = Scenario::load(scenario_path(name)).unwrap();
        assert!(scenario.roster.is_contested(), "{name}");
        assert!(scenario.templates.validate().is_ok(), "{name}");
    }
}

#[test]
fn test_load_from_tempfile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.ron");
    std::fs::write(
        &path,
        r#"Scenario(
            name: "Custom",
            roster: RosterConfig(entries: [
                RosterEntry(side: One, unit_type: "archer", count: 2),
                RosterEntry(side: Two, unit_type: "footman", count: 2),
            ]),
            trials: 25,
        )"#,
    )
    .unwrap();

    let scenario = Scenario::load(&path).unwrap();
    assert_eq!(scenario.name, "Custom");
    assert_eq!(scenario.trials, 25);
    assert_eq!(scenario.roster.count(Side::One, UnitType::Archer), 2);

    std::fs::write(&path, "not ron at all (").unwrap();
    assert!(matches!(
        Scenario::load(&path),
        Err(ScenarioError::ParseError(_))
    ));
}

// =============================================================================
// Batches
// =============================================================================

#[test]
fn test_parallel_equals_core_sequential_for_mixed_armies() {
    let scenario = Scenario::load(scenario_path("mixed_5v5.ron")).unwrap();
    let config = BatchConfig::from_scenario(&scenario)
        .with_trials(400)
        .with_parallel(3);

    let parallel = run_batch_parallel(config.clone());
    let sequential = run_batch(&config.spec, |_| {});

    assert_eq!(parallel.aggregate, sequential);
    assert_eq!(parallel.aggregate.decided(), 400);
}

#[test]
fn test_mirror_match_is_even() {
    let mut config = BatchConfig::default().with_trials(2_000).with_seed(77);
    config.spec.roster = mixed_roster(2, 2);
    let results = run_batch_parallel(config);

    let rate = f64::from(results.aggregate.side_one_wins) / 2_000.0;
    assert!(within_sigma(rate, 0.5, 2_000, 4.0), "side one rate {rate}");
}

#[test]
fn test_armor_wall_counts_stalemates() {
    let scenario = Scenario::load(scenario_path("armor_wall.ron")).unwrap();
    let results = run_batch_parallel(BatchConfig::from_scenario(&scenario).with_trials(50));
    let aggregate = &results.aggregate;

    assert_eq!(aggregate.status, BatchStatus::Completed);
    assert!(aggregate.stalemates > 0);
    assert_eq!(aggregate.decided() + aggregate.stalemates, 50);
    assert!(aggregate.decided() <= aggregate.trials_requested);
    assert!(summary(&results).contains("Stalemates"));
}

#[test]
fn test_zero_trials() {
    let results = run_batch_parallel(BatchConfig::default().with_trials(0));
    assert_eq!(results.aggregate.status, BatchStatus::NoTrials);
    assert!(summary(&results).contains("undefined"));
}

// =============================================================================
// JSON export
// =============================================================================

#[test]
fn test_results_save_load() {
    let results = run_batch_sequential(BatchConfig::default().with_trials(20).with_seed(4));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("results.json");
    results.save(&path).unwrap();
    assert!(path.exists());

    let loaded = BatchResults::load(&path).unwrap();
    assert_eq!(loaded.aggregate, results.aggregate);
    assert_eq!(loaded.config, results.config);
    assert_eq!(loaded.issues, results.issues);
}

#[test]
fn test_load_missing_results_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(BatchResults::load(&dir.path().join("missing.json")).is_err());
}
