//! Per-type base stat templates.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkirmishError};
use crate::units::{StatPath, UnitTemplate, UnitType};

/// Base stats for every unit type.
///
/// # Example RON
///
/// ```ron
/// UnitTemplates(
///     archer: UnitTemplate(strength: 5, armor: 1, speed: 4, max_hp: 10),
///     footman: UnitTemplate(strength: 5, armor: 3, speed: 3, max_hp: 10),
/// )
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplates {
    /// Archer base stats.
    pub archer: UnitTemplate,
    /// Footman base stats.
    pub footman: UnitTemplate,
}

impl Default for UnitTemplates {
    fn default() -> Self {
        Self {
            archer: UnitTemplate::archer(),
            footman: UnitTemplate::footman(),
        }
    }
}

impl UnitTemplates {
    /// Template for a unit type.
    #[must_use]
    pub const fn get(&self, unit_type: UnitType) -> &UnitTemplate {
        match unit_type {
            UnitType::Archer => &self.archer,
            UnitType::Footman => &self.footman,
        }
    }

    /// Mutable template for a unit type.
    pub fn get_mut(&mut self, unit_type: UnitType) -> &mut UnitTemplate {
        match unit_type {
            UnitType::Archer => &mut self.archer,
            UnitType::Footman => &mut self.footman,
        }
    }

    /// Read the stat at `path`.
    #[must_use]
    pub const fn stat(&self, path: StatPath) -> i32 {
        self.get(path.unit_type).get(path.stat)
    }

    /// Overwrite the stat at `path`. Values must be positive.
    pub fn set_stat(&mut self, path: StatPath, value: i32) -> Result<()> {
        self.get_mut(path.unit_type)
            .set(path.unit_type, path.stat, value)
    }

    /// Validate every template.
    pub fn validate(&self) -> Result<()> {
        for unit_type in UnitType::ALL {
            self.get(unit_type).validate(unit_type)?;
        }
        Ok(())
    }

    /// Parse templates from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| SkirmishError::DataParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Stat;

    #[test]
    fn test_defaults_are_classic_stats() {
        let templates = UnitTemplates::default();
        assert_eq!(templates.archer, UnitTemplate::new(5, 1, 4, 10));
        assert_eq!(templates.footman, UnitTemplate::new(5, 3, 3, 10));
        assert!(templates.validate().is_ok());
    }

    #[test]
    fn test_set_stat() {
        let mut templates = UnitTemplates::default();
        let path = StatPath {
            unit_type: UnitType::Footman,
            stat: Stat::Hp,
        };
        templates.set_stat(path, 14).unwrap();
        assert_eq!(templates.stat(path), 14);
        assert_eq!(templates.archer.max_hp, 10);
        assert!(templates.set_stat(path, -1).is_err());
    }

    #[test]
    fn test_from_ron_str() {
        let ron = r"(
            archer: (strength: 6, armor: 1, speed: 5, max_hp: 8),
            footman: (strength: 4, armor: 4, speed: 2, hp: 12),
        )";
        let templates = UnitTemplates::from_ron_str(ron).unwrap();
        assert_eq!(templates.archer.speed, 5);
        assert_eq!(templates.footman.max_hp, 12);
    }

    #[test]
    fn test_from_ron_str_reports_parse_errors() {
        let err = UnitTemplates::from_ron_str("(archer: ())").unwrap_err();
        assert!(matches!(err, SkirmishError::DataParseError(_)));
    }
}
