//! Human-readable batch and sweep reports.

use std::fmt::Write;

use skirmish_core::trial::{AggregateResult, BatchStatus};
use skirmish_core::units::Side;

use crate::batch::BatchResults;
use crate::sweep::SweepPoint;

/// A win rate with one decimal and a percent sign, or `undefined`.
#[must_use]
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{rate:.1}%"),
        None => "undefined".to_string(),
    }
}

/// Win lines for an aggregate.
#[must_use]
pub fn outcome_lines(aggregate: &AggregateResult) -> String {
    let mut out = String::new();
    match aggregate.status {
        BatchStatus::NoContest => {
            out.push_str("No contest: a side has no units, no trials were run\n");
        }
        BatchStatus::NoTrials => {
            out.push_str("No trials requested\n");
        }
        BatchStatus::Completed => {}
    }
    for side in Side::BOTH {
        let _ = writeln!(
            out,
            "{side}: {} wins ({})",
            aggregate.wins(side),
            format_rate(aggregate.win_rate(side))
        );
    }
    let _ = writeln!(out, "Runs: {}", aggregate.decided());
    if aggregate.stalemates > 0 {
        let _ = writeln!(out, "Stalemates: {}", aggregate.stalemates);
    }
    out
}

/// Full summary of a batch.
#[must_use]
pub fn summary(results: &BatchResults) -> String {
    let aggregate = &results.aggregate;
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "{}", results.config.scenario);
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(
        out,
        "Trials: {} (seed {})",
        aggregate.trials_requested, results.config.spec.seed
    );
    out.push_str(&outcome_lines(aggregate));
    if let Some(avg) = aggregate.avg_steps() {
        let _ = writeln!(out, "Average steps: {avg:.1}");
    }
    let _ = writeln!(
        out,
        "Duration: {:.2}s ({:.0} trials/sec)",
        results.duration_seconds,
        results.throughput()
    );
    if !results.issues.is_empty() {
        out.push_str("\nSkipped roster entries:\n");
        for issue in &results.issues {
            let _ = writeln!(out, "  {issue}");
        }
    }
    out
}

/// One row per sweep point.
#[must_use]
pub fn sweep_table(stat: &str, points: &[SweepPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{stat:>16} | {:>10} | {:>10}", "Player 1", "Player 2");
    let _ = writeln!(out, "{}", "-".repeat(42));
    for point in points {
        let _ = writeln!(
            out,
            "{:>16} | {:>10} | {:>10}",
            point.value,
            format_rate(point.aggregate.win_rate(Side::One)),
            format_rate(point.aggregate.win_rate(Side::Two))
        );
    }
    out
}
