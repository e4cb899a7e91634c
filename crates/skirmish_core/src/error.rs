//! Error types for the skirmish simulation.

use thiserror::Error;

use crate::units::UnitType;

/// Result type alias using [`SkirmishError`].
pub type Result<T> = std::result::Result<T, SkirmishError>;

/// Top-level error type for simulation configuration errors.
///
/// None of these abort a batch: the roster builder reports them and skips
/// the offending entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkirmishError {
    /// Roster entry names a unit type that does not exist.
    #[error("Unrecognized unit type: '{0}'")]
    UnknownUnitType(String),

    /// Roster entry asks for a negative number of units.
    #[error("Negative unit count {count} for '{unit_type}'")]
    NegativeCount {
        /// Unit type name as written in the configuration.
        unit_type: String,
        /// The offending count.
        count: i64,
    },

    /// A template has a non-positive stat.
    #[error("Invalid {unit_type} template: {stat} must be positive, got {value}")]
    InvalidTemplate {
        /// Template owner.
        unit_type: UnitType,
        /// Stat name.
        stat: &'static str,
        /// Offending value.
        value: i32,
    },

    /// Stat path could not be parsed (expected e.g. `archer.speed`).
    #[error("Invalid stat '{0}', expected <archer|footman>.<strength|armor|speed|hp>")]
    InvalidStat(String),

    /// Configuration text failed to parse.
    #[error("Failed to parse configuration: {0}")]
    DataParseError(String),
}
