//! Headless skirmish runner.
//!
//! Runs win-rate experiments from the command line. Reports go to stdout,
//! logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Classic 1v1, 10 000 trials, 8 threads
//! cargo run -p skirmish_headless -- batch --trials 10000 --parallel 8
//!
//! # Three archers against four footmen
//! cargo run -p skirmish_headless -- batch --p1-archers 3 --p2-footmen 4 --p1-footmen 0
//!
//! # Sweep footman armor
//! cargo run -p skirmish_headless -- sweep --stat footman.armor --from 1 --to 6
//!
//! # Log every combat step of one trial
//! cargo run -p skirmish_headless -- trace --seed 42
//!
//! # Check that parallel and sequential runs agree
//! cargo run -p skirmish_headless -- verify --runs 5
//! ```
//!
//! Set `RUST_LOG` to override the log filter (`RUST_LOG=skirmish_core=trace`
//! logs every step of every trial).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skirmish_core::battle::resolve_with;
use skirmish_core::draw::RandomDraws;
use skirmish_core::roster::build;
use skirmish_core::units::{Side, StatPath, UnitType};
use skirmish_headless::{
    batch::{run_batch_parallel, run_batch_sequential, verify_determinism, BatchConfig},
    report::{summary, sweep_table},
    scenario::Scenario,
    sweep::{run_sweep, SweepConfig},
};

#[derive(Parser)]
#[command(name = "skirmish_headless")]
#[command(about = "Monte-Carlo win rates for archer and footman skirmishes")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Scenario selection and overrides shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct ScenarioArgs {
    /// Scenario RON file (default: classic 1v1)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of trials
    #[arg(short, long)]
    trials: Option<u32>,

    /// Seed of the first trial
    #[arg(long)]
    seed: Option<u64>,

    /// Player 1 archer count
    #[arg(long)]
    p1_archers: Option<i64>,

    /// Player 1 footman count
    #[arg(long)]
    p1_footmen: Option<i64>,

    /// Player 2 archer count
    #[arg(long)]
    p2_archers: Option<i64>,

    /// Player 2 footman count
    #[arg(long)]
    p2_footmen: Option<i64>,

    /// Step limit per trial
    #[arg(long)]
    max_steps: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch of trials and report win rates
    Batch {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Worker threads (0 = all cores)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// Run on the calling thread only
        #[arg(long, conflicts_with = "parallel")]
        sequential: bool,

        /// Save results as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one batch per value of a stat
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Stat to vary, e.g. `archer.speed` or `footman.armor`
        #[arg(long)]
        stat: String,

        /// First value
        #[arg(long)]
        from: i32,

        /// Last value (inclusive)
        #[arg(long)]
        to: i32,

        /// Increment
        #[arg(long, default_value = "1")]
        step: u32,

        /// Worker threads (0 = all cores)
        #[arg(short, long, default_value = "0")]
        parallel: u32,
    },

    /// Resolve a single trial, logging every combat step
    Trace {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Verify that repeated parallel runs match a sequential run
    Verify {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Number of parallel runs to compare
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is for reports
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    match cli.command {
        Commands::Batch {
            scenario,
            parallel,
            sequential,
            output,
        } => cmd_batch(&scenario, parallel, sequential, output),
        Commands::Sweep {
            scenario,
            stat,
            from,
            to,
            step,
            parallel,
        } => cmd_sweep(&scenario, &stat, from, to, step, parallel),
        Commands::Trace { scenario } => cmd_trace(&scenario),
        Commands::Verify { scenario, runs } => cmd_verify(&scenario, runs),
    }
}

fn fail(message: &str) -> ! {
    error!("{}", message);
    std::process::exit(1);
}

/// Load the scenario and apply command-line overrides.
fn load_scenario(args: &ScenarioArgs) -> Scenario {
    let mut scenario = match &args.scenario {
        Some(path) => match Scenario::load(path) {
            Ok(scenario) => {
                info!("Loaded scenario '{}' from {}", scenario.name, path.display());
                scenario
            }
            Err(e) => fail(&e.to_string()),
        },
        None => Scenario::classic(),
    };

    if let Some(trials) = args.trials {
        scenario.trials = trials;
    }
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    if let Some(max_steps) = args.max_steps {
        scenario.battle.max_steps = max_steps;
    }

    let counts = [
        (Side::One, UnitType::Archer, args.p1_archers),
        (Side::One, UnitType::Footman, args.p1_footmen),
        (Side::Two, UnitType::Archer, args.p2_archers),
        (Side::Two, UnitType::Footman, args.p2_footmen),
    ];
    for (side, unit_type, count) in counts {
        if let Some(count) = count {
            if let Err(e) = scenario.roster.set_count(side, unit_type, count) {
                fail(&format!("Invalid count for {side} {unit_type}: {e}"));
            }
        }
    }

    scenario
}

/// Run a batch and print the summary
fn cmd_batch(args: &ScenarioArgs, parallel: u32, sequential: bool, output: Option<PathBuf>) {
    let scenario = load_scenario(args);
    let config = BatchConfig::from_scenario(&scenario).with_parallel(parallel);

    info!(
        scenario = %config.scenario,
        trials = config.spec.trials,
        seed = config.spec.seed,
        parallel = parallel,
        sequential = sequential,
        "Batch configuration"
    );

    let results = if sequential {
        run_batch_sequential(config)
    } else {
        run_batch_parallel(config)
    };

    print!("{}", summary(&results));

    if let Some(path) = output {
        if let Err(e) = results.save(&path) {
            fail(&format!("Failed to save results to {}: {}", path.display(), e));
        }
        info!("Results saved to {}", path.display());
    }
}

/// Sweep a stat and print a table
fn cmd_sweep(args: &ScenarioArgs, stat: &str, from: i32, to: i32, step: u32, parallel: u32) {
    let stat: StatPath = match stat.parse() {
        Ok(stat) => stat,
        Err(e) => fail(&e.to_string()),
    };
    if from > to {
        fail(&format!("Empty range: {from} > {to}"));
    }

    let scenario = load_scenario(args);
    let config = SweepConfig {
        base: BatchConfig::from_scenario(&scenario).with_parallel(parallel),
        stat,
        from,
        to,
        step,
    };

    match run_sweep(&config) {
        Ok(points) => print!("{}", sweep_table(&stat.to_string(), &points)),
        Err(e) => fail(&e.to_string()),
    }
}

/// Resolve one trial with event logging
fn cmd_trace(args: &ScenarioArgs) {
    let scenario = load_scenario(args);
    let spec = scenario.to_batch_spec();

    let built = build(&spec.roster, &spec.templates);
    for issue in &built.issues {
        warn!("Roster configuration issue: {}", issue);
    }
    let mut battlefield = built.battlefield;
    if battlefield.is_over() {
        println!("No contest: a side has no units");
        return;
    }

    for unit in battlefield.units() {
        info!(
            "{} {} {}: str {} armor {} speed {} hp {}",
            unit.side, unit.unit_type, unit.id, unit.strength, unit.armor, unit.speed, unit.hp
        );
    }

    let mut draws = RandomDraws::seeded(spec.trial_seed(0));
    let report = resolve_with(&mut battlefield, &mut draws, &spec.battle, |event| {
        info!(
            "{} {} {} -> {} {}: {} damage, hp {}{}",
            event.attacker_side,
            event.attacker_type,
            event.attacker,
            event.defender_type,
            event.defender,
            event.damage,
            event.defender_hp,
            if event.killed { " (killed)" } else { "" }
        );
    });

    match report.winner() {
        Some(side) => println!(
            "{side} wins after {} steps with {} survivors",
            report.steps, report.survivors
        ),
        None => println!("Stalemate after {} steps", report.steps),
    }
}

/// Verify determinism
fn cmd_verify(args: &ScenarioArgs, runs: u32) {
    let scenario = load_scenario(args);
    let config = BatchConfig::from_scenario(&scenario);

    info!(
        "Verifying '{}': {} parallel runs of {} trials (seed {})",
        config.scenario, runs, config.spec.trials, config.spec.seed
    );

    if verify_determinism(&config, runs) {
        println!("Determinism verified: {runs} runs match the sequential result");
    } else {
        fail("Determinism check FAILED: runs diverged");
    }
}
