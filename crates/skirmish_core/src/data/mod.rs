//! Data structures for skirmish configuration.
//!
//! This module contains pure data structures that describe unit templates
//! and roster compositions. All structs are designed to be deserialized
//! from RON.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `skirmish_headless`.

mod roster_config;
mod templates;

pub use roster_config::{RosterConfig, RosterEntry};
pub use templates::UnitTemplates;
