//! # Skirmish Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixture rosters and battlefields
//! - Determinism test harness
//! - Statistical checks for speed-weighted selection
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod balance;
pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
