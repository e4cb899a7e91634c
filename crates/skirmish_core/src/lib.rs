//! # Skirmish Core
//!
//! Battle simulation core for the skirmish simulator.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO
//! - No system randomness (every draw goes through a [`draw::DrawSource`])
//!
//! This separation enables:
//! - Seeded, reproducible batches
//! - Parallel trial execution in the headless runner
//! - Forced-draw tests that script every attacker/defender pick
//!
//! ## Crate Structure
//!
//! - [`units`] - Unit types, stat templates and concrete units
//! - [`roster`] - Building the speed-weighted pool and side rosters
//! - [`battle`] - Step-by-step battle resolution
//! - [`trial`] - Running batches of independent trials
//! - [`progress`] - Completion notifications during a batch
//! - [`data`] - Serializable configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod data;
pub mod draw;
pub mod error;
pub mod progress;
pub mod roster;
pub mod trial;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{resolve, BattleConfig, BattleReport, Battlefield, CombatEvent};
    pub use crate::data::{RosterConfig, RosterEntry, UnitTemplates};
    pub use crate::draw::{DrawSource, RandomDraws, ScriptedDraws};
    pub use crate::error::{Result, SkirmishError};
    pub use crate::progress::{Progress, ProgressGranularity};
    pub use crate::roster::{build, RosterBuild, SideRoster, SpeedWeightedPool};
    pub use crate::trial::{run_batch, run_trial, AggregateResult, BatchSpec, BatchStatus};
    pub use crate::units::{Side, Stat, Unit, UnitId, UnitTemplate, UnitType};
}
