//! Roster composition: how many of each unit type each side fields.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkirmishError};
use crate::units::{Side, UnitType};

/// One line of a roster configuration.
///
/// The unit type is kept as written so that unknown names can be reported
/// and skipped by the roster builder rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Owning side.
    pub side: Side,
    /// Unit type name (`"archer"` or `"footman"`).
    pub unit_type: String,
    /// Number of units to create. Negative counts are a configuration error.
    pub count: i64,
}

impl RosterEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(side: Side, unit_type: UnitType, count: i64) -> Self {
        Self {
            side,
            unit_type: unit_type.name().to_string(),
            count,
        }
    }

    /// Parse the unit type name.
    pub fn parsed_type(&self) -> Result<UnitType> {
        self.unit_type.parse()
    }

    /// Validate the entry, returning its unit type and count.
    pub fn validate(&self) -> Result<(UnitType, u32)> {
        let unit_type = self.parsed_type()?;
        if self.count < 0 {
            return Err(SkirmishError::NegativeCount {
                unit_type: self.unit_type.clone(),
                count: self.count,
            });
        }
        let count = u32::try_from(self.count).unwrap_or(u32::MAX);
        Ok((unit_type, count))
    }

    fn matches(&self, side: Side, unit_type: UnitType) -> bool {
        self.side == side && self.parsed_type().ok() == Some(unit_type)
    }
}

/// Per-side roster composition.
///
/// Entry order determines unit id assignment: ids are handed out entry by
/// entry, in order.
///
/// # Example RON
///
/// ```ron
/// RosterConfig(
///     entries: [
///         RosterEntry(side: One, unit_type: "archer", count: 3),
///         RosterEntry(side: Two, unit_type: "footman", count: 4),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Roster lines, in creation order.
    pub entries: Vec<RosterEntry>,
}

impl RosterConfig {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The classic one-on-one: a lone archer for side one against a lone
    /// footman for side two.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            entries: vec![
                RosterEntry::new(Side::One, UnitType::Footman, 0),
                RosterEntry::new(Side::One, UnitType::Archer, 1),
                RosterEntry::new(Side::Two, UnitType::Footman, 1),
                RosterEntry::new(Side::Two, UnitType::Archer, 0),
            ],
        }
    }

    /// Append an entry.
    #[must_use]
    pub fn with_units(mut self, side: Side, unit_type: UnitType, count: i64) -> Self {
        self.entries.push(RosterEntry::new(side, unit_type, count));
        self
    }

    /// Append a raw entry, e.g. one with an unrecognized type name.
    #[must_use]
    pub fn with_entry(mut self, entry: RosterEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Configured count of one unit type on one side. Invalid entries count as zero.
    #[must_use]
    pub fn count(&self, side: Side, unit_type: UnitType) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.side == side)
            .filter_map(|e| e.validate().ok())
            .filter(|(t, _)| *t == unit_type)
            .map(|(_, n)| u64::from(n))
            .sum()
    }

    /// Total units a side will field, ignoring entries that would be skipped.
    #[must_use]
    pub fn side_total(&self, side: Side) -> u64 {
        UnitType::ALL
            .iter()
            .map(|&unit_type| self.count(side, unit_type))
            .sum()
    }

    /// Whether both sides field at least one unit.
    #[must_use]
    pub fn is_contested(&self) -> bool {
        Side::BOTH.iter().all(|&side| self.side_total(side) > 0)
    }

    /// Set the count for a side/type pair, collapsing duplicate entries into
    /// the first matching one. Negative counts are rejected.
    pub fn set_count(&mut self, side: Side, unit_type: UnitType, count: i64) -> Result<()> {
        if count < 0 {
            return Err(SkirmishError::NegativeCount {
                unit_type: unit_type.name().to_string(),
                count,
            });
        }
        match self.entries.iter().position(|e| e.matches(side, unit_type)) {
            Some(first) => {
                self.entries[first].count = count;
                let mut index = 0;
                self.entries.retain(|e| {
                    let keep = index <= first || !e.matches(side, unit_type);
                    index += 1;
                    keep
                });
            }
            None => self.entries.push(RosterEntry::new(side, unit_type, count)),
        }
        Ok(())
    }

    /// Change a count by `delta`, but only if it stays non-negative.
    ///
    /// Returns `true` if the change was applied.
    pub fn adjust_count(&mut self, side: Side, unit_type: UnitType, delta: i64) -> bool {
        let current = i64::try_from(self.count(side, unit_type)).unwrap_or(i64::MAX);
        match current.checked_add(delta) {
            Some(next) if next >= 0 => self.set_count(side, unit_type, next).is_ok(),
            _ => false,
        }
    }

    /// Parse a roster from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| SkirmishError::DataParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_roster() {
        let roster = RosterConfig::classic();
        assert_eq!(roster.count(Side::One, UnitType::Archer), 1);
        assert_eq!(roster.count(Side::One, UnitType::Footman), 0);
        assert_eq!(roster.count(Side::Two, UnitType::Footman), 1);
        assert!(roster.is_contested());
    }

    #[test]
    fn test_invalid_entries_do_not_count() {
        let roster = RosterConfig::new()
            .with_units(Side::One, UnitType::Archer, -2)
            .with_entry(RosterEntry {
                side: Side::One,
                unit_type: "knight".to_string(),
                count: 5,
            })
            .with_units(Side::Two, UnitType::Footman, 2);
        assert_eq!(roster.side_total(Side::One), 0);
        assert_eq!(roster.side_total(Side::Two), 2);
        assert!(!roster.is_contested());
    }

    #[test]
    fn test_entry_validation() {
        let entry = RosterEntry::new(Side::Two, UnitType::Footman, -1);
        assert!(matches!(
            entry.validate(),
            Err(SkirmishError::NegativeCount { count: -1, .. })
        ));
        let entry = RosterEntry::new(Side::Two, UnitType::Footman, 3);
        assert_eq!(entry.validate(), Ok((UnitType::Footman, 3)));
    }

    #[test]
    fn test_set_count_collapses_duplicates() {
        let mut roster = RosterConfig::new()
            .with_units(Side::One, UnitType::Archer, 2)
            .with_units(Side::Two, UnitType::Footman, 1)
            .with_units(Side::One, UnitType::Archer, 3);
        roster.set_count(Side::One, UnitType::Archer, 4).unwrap();
        assert_eq!(roster.entries.len(), 2);
        assert_eq!(roster.entries[0].count, 4);
        assert_eq!(roster.count(Side::One, UnitType::Archer), 4);

        roster.set_count(Side::Two, UnitType::Archer, 1).unwrap();
        assert_eq!(roster.entries.len(), 3);
        assert!(roster.set_count(Side::Two, UnitType::Archer, -1).is_err());
    }

    #[test]
    fn test_adjust_count_stays_non_negative() {
        let mut roster = RosterConfig::classic();
        assert!(roster.adjust_count(Side::Two, UnitType::Footman, 2));
        assert_eq!(roster.count(Side::Two, UnitType::Footman), 3);
        assert!(!roster.adjust_count(Side::One, UnitType::Footman, -1));
        assert_eq!(roster.count(Side::One, UnitType::Footman), 0);
    }

    #[test]
    fn test_from_ron_str() {
        let ron = r#"(
            entries: [
                (side: One, unit_type: "archer", count: 3),
                (side: Two, unit_type: "Footman", count: 4),
            ],
        )"#;
        let roster = RosterConfig::from_ron_str(ron).unwrap();
        assert_eq!(roster.side_total(Side::One), 3);
        assert_eq!(roster.side_total(Side::Two), 4);
    }
}
