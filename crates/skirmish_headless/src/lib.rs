//! Headless batch runner for skirmish win-rate experiments.
//!
//! This crate wraps `skirmish_core` with everything a host needs to run
//! experiments from the command line:
//!
//! - **Scenarios**: RON files bundling templates, roster, trial count and seed
//! - **Batches**: trials fanned out over a rayon thread pool, with results
//!   identical to a sequential run of the same seed
//! - **Sweeps**: one batch per value of a single stat
//! - **Reports**: human-readable summaries and JSON export
//!
//! Logs go to stderr; reports go to stdout.
//!
//! # Example
//!
//! ```bash
//! # Classic 1v1 with 10 000 trials
//! cargo run -p skirmish_headless -- batch --trials 10000
//!
//! # Run a scenario file, save JSON results
//! cargo run -p skirmish_headless -- batch --scenario scenarios/classic.ron --output results.json
//!
//! # Sweep archer speed from 1 to 8
//! cargo run -p skirmish_headless -- sweep --stat archer.speed --from 1 --to 8
//!
//! # Log every combat step of one trial
//! cargo run -p skirmish_headless -- trace --seed 42
//! ```

pub mod batch;
pub mod report;
pub mod scenario;
pub mod sweep;

pub use batch::{run_batch_parallel, BatchConfig, BatchProgress, BatchResults};
pub use report::{format_rate, summary};
pub use scenario::{Scenario, ScenarioError};
pub use sweep::{run_sweep, SweepConfig, SweepPoint};
