//! Scenario loading and configuration.
//!
//! A scenario bundles everything needed to run one experiment: unit
//! templates, the roster of each side, the trial count and the seed.
//!
//! # Example RON
//!
//! ```ron
//! Scenario(
//!     name: "Archer rush",
//!     description: "Three archers against four footmen",
//!     templates: UnitTemplates(
//!         archer: UnitTemplate(strength: 5, armor: 1, speed: 4, hp: 10),
//!         footman: UnitTemplate(strength: 5, armor: 3, speed: 3, hp: 10),
//!     ),
//!     roster: RosterConfig(entries: [
//!         RosterEntry(side: One, unit_type: "archer", count: 3),
//!         RosterEntry(side: Two, unit_type: "footman", count: 4),
//!     ]),
//!     trials: 1000,
//!     seed: 7,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use skirmish_core::battle::BattleConfig;
use skirmish_core::data::{RosterConfig, UnitTemplates};
use skirmish_core::trial::BatchSpec;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

fn default_trials() -> u32 {
    100
}

/// A complete experiment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Base stats per unit type.
    #[serde(default)]
    pub templates: UnitTemplates,
    /// Units fielded by each side.
    pub roster: RosterConfig,
    /// Trials per batch.
    #[serde(default = "default_trials")]
    pub trials: u32,
    /// Seed of the first trial.
    #[serde(default)]
    pub seed: u64,
    /// Resolution settings.
    #[serde(default)]
    pub battle: BattleConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::classic()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// One archer (side one) against one footman (side two), 100 trials.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            name: "Classic 1v1".to_string(),
            description: "One archer against one footman with stock stats".to_string(),
            templates: UnitTemplates::default(),
            roster: RosterConfig::classic(),
            trials: default_trials(),
            seed: 0,
            battle: BattleConfig::default(),
        }
    }

    /// Batch spec for this scenario.
    #[must_use]
    pub fn to_batch_spec(&self) -> BatchSpec {
        let mut spec = BatchSpec::new(self.roster.clone(), self.trials)
            .with_templates(self.templates)
            .with_seed(self.seed);
        spec.battle = self.battle;
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::units::{Side, UnitType};

    #[test]
    fn test_classic_scenario() {
        let scenario = Scenario::classic();
        assert_eq!(scenario.trials, 100);
        assert_eq!(scenario.roster.count(Side::One, UnitType::Archer), 1);
        assert_eq!(scenario.roster.count(Side::Two, UnitType::Footman), 1);
        assert_eq!(scenario.roster.side_total(Side::One), 1);
        assert_eq!(Scenario::default(), scenario);
    }

    #[test]
    fn test_parse_minimal_ron() {
        let ron = r#"
            Scenario(
                name: "Minimal",
                roster: RosterConfig(entries: [
                    RosterEntry(side: One, unit_type: "footman", count: 2),
                    RosterEntry(side: Two, unit_type: "archer", count: 2),
                ]),
            )
        "#;
        let scenario = Scenario::from_ron_str(ron).unwrap();
        assert_eq!(scenario.name, "Minimal");
        assert_eq!(scenario.trials, 100);
        assert_eq!(scenario.seed, 0);
        assert_eq!(scenario.templates, UnitTemplates::default());
        assert_eq!(scenario.roster.count(Side::One, UnitType::Footman), 2);
    }

    #[test]
    fn test_parse_full_ron() {
        let ron = r#"
            Scenario(
                name: "Heavy footmen",
                description: "Armor 5 footmen",
                templates: UnitTemplates(
                    archer: UnitTemplate(strength: 5, armor: 1, speed: 4, hp: 10),
                    footman: UnitTemplate(strength: 5, armor: 5, speed: 3, max_hp: 12),
                ),
                roster: RosterConfig(entries: [
                    RosterEntry(side: One, unit_type: "Archer", count: 3),
                    RosterEntry(side: Two, unit_type: "footman", count: 2),
                ]),
                trials: 500,
                seed: 99,
                battle: BattleConfig(max_steps: 1000),
            )
        "#;
        let scenario = Scenario::from_ron_str(ron).unwrap();
        assert_eq!(scenario.templates.footman.armor, 5);
        assert_eq!(scenario.templates.footman.max_hp, 12);

        let spec = scenario.to_batch_spec();
        assert_eq!(spec.trials, 500);
        assert_eq!(spec.seed, 99);
        assert_eq!(spec.battle.max_steps, 1000);
        assert_eq!(spec.roster.count(Side::One, UnitType::Archer), 3);
    }

    #[test]
    fn test_parse_error() {
        let err = Scenario::from_ron_str("Scenario(name: )").unwrap_err();
        assert!(matches!(err, ScenarioError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Scenario::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ScenarioError::FileNotFound(_)));
    }
}
